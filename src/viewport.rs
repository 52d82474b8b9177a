//! Pan/zoom transform between screen space and image space.
//!
//! `image = (screen - offset) / scale`, with a uniform scale and no rotation.

use crate::model::{ImagePoint, ScreenPoint};

/// Default zoom factor applied per wheel step.
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Direction of a single wheel zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// A negative vertical delta (wheel rolled away from the user) zooms in.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }
}

/// Zoom step and optional scale bounds.
///
/// Both bounds default to `None`, which leaves zoom unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub step: f64,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
}

impl ZoomLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        let scale = self.max_scale.map_or(scale, |max| scale.min(max));
        self.min_scale.map_or(scale, |min| scale.max(min))
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            step: DEFAULT_ZOOM_STEP,
            min_scale: None,
            max_scale: None,
        }
    }
}

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Uniform scale, 1.0 = no zoom.
    pub scale: f64,
    /// Screen position of the image origin.
    pub offset: ScreenPoint,
}

impl Viewport {
    pub fn new(scale: f64, offset: ScreenPoint) -> Self {
        Self { scale, offset }
    }

    /// Create an identity transform (scale=1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, ScreenPoint::new(0.0, 0.0))
    }

    pub fn screen_to_image(&self, p: ScreenPoint) -> ImagePoint {
        ImagePoint::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    pub fn image_to_screen(&self, p: ImagePoint) -> ScreenPoint {
        ScreenPoint::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }

    /// Rescale while keeping the image point under `pointer` fixed.
    ///
    /// 1. Find the image-space point under the pointer at the old scale
    /// 2. Move the offset so that point lands under the pointer at the new scale
    pub fn zoom_to(&self, new_scale: f64, pointer: ScreenPoint) -> Viewport {
        let mouse_point_to = self.screen_to_image(pointer);
        Viewport {
            scale: new_scale,
            offset: ScreenPoint::new(
                pointer.x - mouse_point_to.x * new_scale,
                pointer.y - mouse_point_to.y * new_scale,
            ),
        }
    }

    /// One wheel step in `direction`, anchored at `pointer`.
    pub fn zoom_at(
        &self,
        pointer: ScreenPoint,
        direction: ZoomDirection,
        limits: &ZoomLimits,
    ) -> Viewport {
        let new_scale = match direction {
            ZoomDirection::In => self.scale * limits.step,
            ZoomDirection::Out => self.scale / limits.step,
        };
        self.zoom_to(limits.clamp(new_scale), pointer)
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Viewport {
        Viewport {
            scale: self.scale,
            offset: ScreenPoint::new(self.offset.x + dx, self.offset.y + dy),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transient state of a middle-button pan drag.
#[derive(Debug, Clone, Default)]
pub struct PanDrag {
    last_pos: Option<ScreenPoint>,
}

impl PanDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Start a drag operation.
    pub fn start(&mut self, pos: ScreenPoint) {
        self.last_pos = Some(pos);
    }

    /// Update drag position and return the delta since the last update.
    pub fn update(&mut self, pos: ScreenPoint) -> Option<(f64, f64)> {
        let last = self.last_pos.as_mut()?;
        let delta = (pos.x - last.x, pos.y - last.y);
        *last = pos;
        Some(delta)
    }

    /// End the drag operation.
    pub fn end(&mut self) {
        self.last_pos = None;
    }
}
