//! Trait definitions for annotation format implementations.

use crate::format::error::FormatError;
use crate::model::{Annotation, ClassTable};

/// Trait for annotation format import/export implementations.
///
/// Formats convert between the in-memory annotation list and a text payload.
/// The host does the actual file I/O (download, file picker, disk).
pub trait AnnotationFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "polygon-txt", "json").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses (e.g., `["txt"]`).
    fn extensions(&self) -> &[&'static str];

    /// MIME type used when offering the export as a download.
    fn mime_type(&self) -> &'static str;

    /// Suggested file name for an export.
    fn default_filename(&self) -> &'static str;

    /// Serialize the annotation list.
    fn export(
        &self,
        annotations: &[Annotation],
        classes: &ClassTable,
    ) -> Result<ExportResult, FormatError>;

    /// Parse a payload into an annotation list.
    fn import(&self, contents: &str, classes: &ClassTable) -> Result<ImportResult, FormatError>;
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Serialized payload.
    pub contents: String,

    /// Number of annotations exported.
    pub annotations_exported: usize,

    /// Warnings generated during export (e.g., unresolved class names).
    pub warnings: Vec<FormatWarning>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Package the payload as a downloadable file for `format`.
    pub fn into_file(self, format: &dyn AnnotationFormat) -> ExportFile {
        ExportFile {
            filename: format.default_filename().to_string(),
            mime_type: format.mime_type().to_string(),
            contents: self.contents,
        }
    }
}

/// Result of an import operation.
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Parsed annotations in file order.
    pub annotations: Vec<Annotation>,

    /// Problems found in the payload that did not stop the import.
    pub warnings: Vec<FormatWarning>,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A file ready to be handed to the host for download or writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub contents: String,
}

/// Warning generated during format conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatWarning {
    /// 1-based line number in the payload (if applicable).
    pub line: Option<usize>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            line: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Attach the payload line this warning relates to.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message (e.g., polygon below the minimum vertex count)
    Info,
    /// Warning that may indicate data loss (e.g., unknown class id)
    Warning,
    /// Error that caused a value to be replaced (e.g., non-numeric coordinate)
    Error,
}
