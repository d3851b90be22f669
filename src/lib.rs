//! Caption card rendering: a template image with a dated title and fixed-width body
//! lines stacked beneath it.
//!
//! The pipeline is a single synchronous pass:
//!
//! - parse the font and decode the template
//! - wrap the body text by unit count ([`text::wrap`])
//! - build the title from a caller-supplied timestamp ([`text::title_for`])
//! - composite everything onto a fresh canvas ([`render::compose`])
//! - encode the result as PNG
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod config;
pub mod pipeline;
pub mod render;
pub mod text;

pub use crate::assets::{decode_template, encode_png};
pub use crate::config::{LayoutConfig, RunConfig, WrapUnit};
pub use crate::foundation::core::{Fixed26_6, Origin, Rgba8};
pub use crate::foundation::error::{CaptionError, CaptionResult};
pub use crate::pipeline::{run, run_to_file};
pub use crate::render::{
    Advance, CanvasLayout, FontEngine, ParleyFont, ParleyFontEngine, Surface, compose,
};
