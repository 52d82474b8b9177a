//! Point types for the three coordinate spaces the editor deals with.
//!
//! - [`ScreenPoint`]: pointer position on the canvas, in CSS/screen pixels.
//! - [`ImagePoint`]: absolute pixel offset in the source image's native resolution.
//! - [`NormalizedPoint`]: image point divided by the image width (x) and height (y).
//!
//! The types are deliberately not convertible into each other with `From`.
//! Screen and image space meet in the viewport, image and normalized space
//! meet in the coordinate codec.

use serde::{Deserialize, Serialize};

/// A position on the canvas in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position in absolute image space (origin top-left, x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &ImagePoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A position as a fraction of the image width and height.
///
/// Not clamped: points placed outside the image stay outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Natural dimensions of a loaded image.
///
/// Both sides are non-zero, so holding an `ImageSize` means the image has
/// finished loading and the codec can divide by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    /// Returns `None` for a zero-sized image.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_point_distance() {
        let p1 = ImagePoint::new(0.0, 0.0);
        let p2 = ImagePoint::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_size_rejects_zero() {
        assert!(ImageSize::new(0, 480).is_none());
        assert!(ImageSize::new(640, 0).is_none());
        let size = ImageSize::new(640, 480).unwrap();
        assert_eq!(size.width(), 640);
        assert_eq!(size.height_f64(), 480.0);
    }
}
