pub mod composite;
pub mod compose;
pub mod font;
pub mod surface;

pub use compose::{CanvasLayout, compose};
pub use font::{Advance, FontEngine, ParleyFont, ParleyFontEngine};
pub use surface::Surface;
