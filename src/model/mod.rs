//! Data models for the annotation editor.

mod annotation;
mod category;
mod point;

pub use annotation::{Annotation, MIN_POLYGON_VERTICES, NormalizedPolygon};
pub use category::{
    ClassDefinition, ClassTable, DEFAULT_CLASSES, FALLBACK_CLASS_COLOR, UNKNOWN_CLASS,
};
pub use point::{ImagePoint, ImageSize, NormalizedPoint, ScreenPoint};
