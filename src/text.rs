pub mod title;
pub mod wrap;

pub use title::title_for;
pub use wrap::{line_capacity, wrap};
