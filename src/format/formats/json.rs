//! JSON list format, the payload the host's save callback receives.
//!
//! ```json
//! [{"class": "пора", "points": [0.1, 0.2, 0.3, 0.2, 0.2, 0.4, 0.1, 0.2]}]
//! ```

use crate::format::error::FormatError;
use crate::format::traits::{AnnotationFormat, ExportResult, FormatWarning, ImportResult};
use crate::model::{Annotation, ClassTable};

/// Annotation list as JSON.
///
/// Class names are stored directly, so unknown names round-trip unchanged.
pub struct AnnotationJsonFormat;

impl AnnotationFormat for AnnotationJsonFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "Annotation list (JSON)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn default_filename(&self) -> &'static str {
        "annotations.json"
    }

    fn export(
        &self,
        annotations: &[Annotation],
        classes: &ClassTable,
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::new();
        for (index, annotation) in annotations.iter().enumerate() {
            if !classes.contains(&annotation.class_name) {
                result.add_warning(FormatWarning::info(format!(
                    "Annotation {} uses class '{}' which is not defined",
                    index, annotation.class_name
                )));
            }
        }
        result.contents = serde_json::to_string_pretty(annotations)?;
        result.annotations_exported = annotations.len();
        Ok(result)
    }

    fn import(&self, contents: &str, classes: &ClassTable) -> Result<ImportResult, FormatError> {
        let annotations: Vec<Annotation> = serde_json::from_str(contents)?;
        let mut result = ImportResult::new();
        for (index, annotation) in annotations.iter().enumerate() {
            if !classes.contains(&annotation.class_name) {
                result.add_warning(FormatWarning::warning(format!(
                    "Annotation {} uses class '{}' which is not defined",
                    index, annotation.class_name
                )));
            }
            if !annotation.points.is_well_formed() {
                result.add_warning(FormatWarning::warning(format!(
                    "Annotation {} is not a well-formed polygon",
                    index
                )));
            }
        }
        result.annotations = annotations;
        Ok(result)
    }
}
