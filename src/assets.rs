pub mod decode;

pub use decode::{decode_template, encode_png};
