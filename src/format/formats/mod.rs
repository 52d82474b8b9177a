//! Annotation format implementations.

mod json;
mod polygon_txt;

#[cfg(test)]
mod tests;

pub use json::AnnotationJsonFormat;
pub use polygon_txt::{POLYGON_TXT_FILENAME, PolygonTxtFormat, format_coordinate};
