//! Annotation format import/export system.
//!
//! Formats implement [`AnnotationFormat`] and convert between the annotation
//! list and a text payload; reading and writing files is left to the host.
//!
//! ## Supported Formats
//!
//! - **Polygon TXT**: one line per polygon, class id followed by normalized
//!   coordinates. Used by the export button and the file import.
//! - **JSON**: the `[{"class", "points"}]` list handed to the host on save.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wdat::format::FormatRegistry;
//!
//! let registry = FormatRegistry::new();
//! let result = registry.native().export(store.annotations(), &classes)?;
//! ```

mod error;
pub mod formats;
mod registry;
mod traits;

pub use error::FormatError;
pub use formats::{AnnotationJsonFormat, POLYGON_TXT_FILENAME, PolygonTxtFormat};
pub use registry::{FormatRegistry, NATIVE_FORMAT_ID};
pub use traits::{
    AnnotationFormat, ExportFile, ExportResult, FormatWarning, ImportResult, WarningSeverity,
};
