//! Conversion between absolute image space and normalized space.
//!
//! Normalized coordinates survive image resizes and are what the store and the
//! export format hold. No rounding happens here; precision is only reduced when
//! the line format writes six decimals.

use crate::model::{ImagePoint, ImageSize, NormalizedPoint, NormalizedPolygon};

/// Divide each x by the image width and each y by the image height.
pub fn to_normalized(points: &[ImagePoint], size: ImageSize) -> NormalizedPolygon {
    let (w, h) = (size.width_f64(), size.height_f64());
    NormalizedPolygon::from_points(points.iter().map(|p| NormalizedPoint::new(p.x / w, p.y / h)))
}

/// Multiply each x by the image width and each y by the image height.
///
/// A dangling trailing coordinate (only possible for imported rows) has no
/// partner and is not converted.
pub fn to_absolute(polygon: &NormalizedPolygon, size: ImageSize) -> Vec<ImagePoint> {
    let (w, h) = (size.width_f64(), size.height_f64());
    polygon
        .vertices()
        .map(|p| ImagePoint::new(p.x * w, p.y * h))
        .collect()
}
