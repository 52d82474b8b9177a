//! Tracking of asynchronous image loads and file reads.
//!
//! The host performs the actual I/O. Each request gets a [`LoadTicket`]; a newer
//! request supersedes older ones, and a completion carrying a stale ticket is
//! ignored.

use std::io::Cursor;

use thiserror::Error;

use crate::model::ImageSize;

/// Errors while determining an image's natural dimensions.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    /// Reported by the host (e.g. a browser `onerror`).
    #[error("Image load failed: {0}")]
    Host(String),
}

/// Identifies one load or read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic request counter; only the most recently issued ticket is current.
#[derive(Debug, Clone, Default)]
pub struct Epoch {
    current: u64,
}

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes all earlier ones.
    pub fn issue(&mut self) -> LoadTicket {
        self.current += 1;
        LoadTicket(self.current)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current != 0 && ticket.0 == self.current
    }
}

/// Load state of the current image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    /// No image requested yet.
    Empty,
    /// Waiting for the host to deliver the image.
    Loading { source: String },
    /// Natural dimensions are known.
    Ready { source: String, size: ImageSize },
    /// The last request failed.
    Failed { source: String, reason: String },
}

/// What happened to a delivered completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// Superseded by a newer request; nothing changed.
    Stale,
}

/// The image currently shown by the editor.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    epoch: Epoch,
    state: ImageState,
}

impl Default for ImageSlot {
    fn default() -> Self {
        Self {
            epoch: Epoch::new(),
            state: ImageState::Empty,
        }
    }
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// Dimensions of the loaded image, `None` until the image is ready.
    pub fn size(&self) -> Option<ImageSize> {
        match &self.state {
            ImageState::Ready { size, .. } => Some(*size),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.size().is_some()
    }

    pub fn source(&self) -> Option<&str> {
        match &self.state {
            ImageState::Empty => None,
            ImageState::Loading { source }
            | ImageState::Ready { source, .. }
            | ImageState::Failed { source, .. } => Some(source),
        }
    }

    /// Start loading `source`, replacing whatever image was current.
    pub fn begin(&mut self, source: impl Into<String>) -> LoadTicket {
        let ticket = self.epoch.issue();
        let source = source.into();
        log::info!("🖼️ Loading image {} (request {})", source, ticket.value());
        self.state = ImageState::Loading { source };
        ticket
    }

    /// Deliver the result of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<(u32, u32), ImageError>,
    ) -> Completion {
        if !self.epoch.is_current(ticket) {
            log::warn!(
                "Ignoring stale image load completion (request {})",
                ticket.value()
            );
            return Completion::Stale;
        }
        let source = self.source().unwrap_or_default().to_string();
        let sized = result.and_then(|(width, height)| {
            ImageSize::new(width, height).ok_or(ImageError::ZeroSized { width, height })
        });
        match sized {
            Ok(size) => {
                log::info!(
                    "🖼️ Image ready: {} ({}x{})",
                    source,
                    size.width(),
                    size.height()
                );
                self.state = ImageState::Ready { source, size };
                Completion::Applied
            }
            Err(e) => {
                log::error!("Image load failed for {}: {}", source, e);
                self.state = ImageState::Failed {
                    source,
                    reason: e.to_string(),
                };
                Completion::Failed
            }
        }
    }
}

/// Read the natural dimensions of an encoded image without decoding pixels.
pub fn decode_image_size(bytes: &[u8]) -> Result<ImageSize, ImageError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    ImageSize::new(width, height).ok_or(ImageError::ZeroSized { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_only_latest_is_current() {
        let mut epoch = Epoch::new();
        let first = epoch.issue();
        assert!(epoch.is_current(first));
        let second = epoch.issue();
        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
    }

    #[test]
    fn test_fresh_epoch_has_no_current_ticket() {
        assert!(!Epoch::new().is_current(LoadTicket::from_raw(0)));
    }

    #[test]
    fn test_slot_ready_after_completion() {
        let mut slot = ImageSlot::new();
        assert!(!slot.is_ready());
        let ticket = slot.begin("weld.jpg");
        assert_eq!(
            slot.state(),
            &ImageState::Loading {
                source: "weld.jpg".into()
            }
        );
        assert_eq!(slot.complete(ticket, Ok((640, 480))), Completion::Applied);
        assert_eq!(slot.size(), ImageSize::new(640, 480));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut slot = ImageSlot::new();
        let old = slot.begin("a.jpg");
        let new = slot.begin("b.jpg");

        assert_eq!(slot.complete(old, Ok((10, 10))), Completion::Stale);
        assert!(!slot.is_ready());
        assert_eq!(slot.source(), Some("b.jpg"));

        assert_eq!(slot.complete(new, Ok((20, 30))), Completion::Applied);
        assert_eq!(slot.size(), ImageSize::new(20, 30));
    }

    #[test]
    fn test_zero_sized_image_fails() {
        let mut slot = ImageSlot::new();
        let ticket = slot.begin("empty.png");
        assert_eq!(slot.complete(ticket, Ok((0, 10))), Completion::Failed);
        assert!(matches!(slot.state(), ImageState::Failed { .. }));
        assert!(slot.size().is_none());
    }

    #[test]
    fn test_decode_image_size_from_png() {
        let img = image::RgbaImage::new(7, 3);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(decode_image_size(&bytes).unwrap(), ImageSize::new(7, 3).unwrap());
    }

    #[test]
    fn test_decode_image_size_rejects_garbage() {
        assert!(decode_image_size(b"not an image").is_err());
    }
}
