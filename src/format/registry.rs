//! Format registry for discovering and accessing annotation formats.

use std::collections::HashMap;

use crate::format::error::FormatError;
use crate::format::formats::{AnnotationJsonFormat, PolygonTxtFormat};
use crate::format::traits::AnnotationFormat;

/// Id of the format used by the export button.
pub const NATIVE_FORMAT_ID: &str = "polygon-txt";

/// Registry of available annotation formats.
///
/// All built-in formats are registered automatically on creation.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn AnnotationFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(PolygonTxtFormat));
        registry.register(Box::new(AnnotationJsonFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn AnnotationFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn AnnotationFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Get a format by its ID, or an [`FormatError::UnknownFormat`].
    pub fn require(&self, id: &str) -> Result<&dyn AnnotationFormat, FormatError> {
        self.get(id).ok_or_else(|| FormatError::unknown_format(id))
    }

    /// Find formats by file extension.
    pub fn by_extension(&self, ext: &str) -> Vec<&dyn AnnotationFormat> {
        let ext = ext.trim_start_matches('.');
        self.formats
            .values()
            .filter(|f| f.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|f| f.as_ref())
            .collect()
    }

    /// Get all registered formats.
    pub fn all(&self) -> Vec<&dyn AnnotationFormat> {
        self.formats.values().map(|f| f.as_ref()).collect()
    }

    /// Get all format IDs.
    pub fn ids(&self) -> Vec<&'static str> {
        self.formats.keys().copied().collect()
    }

    /// The polygon line format, used for export and file import.
    pub fn native(&self) -> &dyn AnnotationFormat {
        self.get(NATIVE_FORMAT_ID).unwrap_or(&PolygonTxtFormat)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
