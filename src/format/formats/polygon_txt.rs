//! Polygon line text format.
//!
//! One annotation per line:
//!
//! ```text
//! <class_id> <x0> <y0> <x1> <y1> ... <xn> <yn>
//! ```
//!
//! Coordinates are normalized to the image size and written with six decimals,
//! halfway values rounded up. The class id is the token's leading integer.
//! Lines are joined with `\n` and there is no trailing newline.

use crate::format::error::FormatError;
use crate::format::traits::{AnnotationFormat, ExportResult, FormatWarning, ImportResult};
use crate::model::{Annotation, ClassTable, MIN_POLYGON_VERTICES, NormalizedPolygon, UNKNOWN_CLASS};

/// Export file name offered to the user.
pub const POLYGON_TXT_FILENAME: &str = "polygon_annotations.txt";

/// Polygon line text format.
///
/// Import is lenient: malformed rows are kept as they are and reported as
/// warnings, so the format never fails on content.
pub struct PolygonTxtFormat;

impl PolygonTxtFormat {
    /// Serialize a single annotation as one line.
    pub fn format_line(annotation: &Annotation, classes: &ClassTable) -> String {
        let id = classes.id_or_default(&annotation.class_name);
        std::iter::once(id.to_string())
            .chain(annotation.points.as_flat().iter().map(|&c| format_coordinate(c)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse one non-empty, trimmed line. `line_no` is 1-based.
    fn parse_line(
        line: &str,
        line_no: usize,
        classes: &ClassTable,
        warnings: &mut Vec<FormatWarning>,
    ) -> Annotation {
        let mut tokens = line.split_whitespace();
        let class_token = tokens.next().unwrap_or_default();

        let class_name = match leading_integer(class_token) {
            Some((id, rest)) => {
                if !rest.is_empty() {
                    warnings.push(
                        FormatWarning::info(format!(
                            "Class token '{}' read as {}",
                            class_token, id
                        ))
                        .at_line(line_no),
                    );
                }
                let name = u32::try_from(id)
                    .map(|id| classes.name_or_unknown(id))
                    .unwrap_or(UNKNOWN_CLASS);
                if name == UNKNOWN_CLASS {
                    warnings.push(
                        FormatWarning::warning(format!("Unknown class id {}", id))
                            .at_line(line_no),
                    );
                }
                name
            }
            None => {
                warnings.push(
                    FormatWarning::warning(format!("Unparsable class id '{}'", class_token))
                        .at_line(line_no),
                );
                UNKNOWN_CLASS
            }
        };

        let coords: Vec<f64> = tokens
            .map(|token| {
                token.parse::<f64>().unwrap_or_else(|_| {
                    warnings.push(
                        FormatWarning::error(format!("Non-numeric coordinate '{}'", token))
                            .at_line(line_no),
                    );
                    f64::NAN
                })
            })
            .collect();

        let points = NormalizedPolygon::from_flat(coords);
        if points.has_dangling_coordinate() {
            warnings.push(
                FormatWarning::warning(format!(
                    "Odd number of coordinates ({})",
                    points.scalar_count()
                ))
                .at_line(line_no),
            );
        }
        if points.distinct_vertex_count() < MIN_POLYGON_VERTICES {
            warnings.push(
                FormatWarning::info(format!(
                    "Polygon has {} vertices, fewer than {}",
                    points.distinct_vertex_count(),
                    MIN_POLYGON_VERTICES
                ))
                .at_line(line_no),
            );
        }

        Annotation::new(class_name, points)
    }
}

/// Six-decimal fixed notation with exact halfway values rounded away from zero.
///
/// Negative zero prints as `0.000000`. Non-finite values print as `NaN`,
/// `Infinity` and `-Infinity`.
pub fn format_coordinate(c: f64) -> String {
    if c.is_nan() {
        return "NaN".to_string();
    }
    if c.is_infinite() {
        return if c > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = c.abs();
    let scaled = magnitude * 1e6;
    // The product is a tie only if it was computed without rounding error.
    let tie = scaled.fract() == 0.5 && magnitude.mul_add(1e6, -scaled) == 0.0;
    let magnitude = if tie { scaled.ceil() / 1e6 } else { magnitude };
    let sign = if c < 0.0 { "-" } else { "" };
    format!("{}{:.6}", sign, magnitude)
}

/// Leading optionally signed decimal integer of a token and the text after it.
fn leading_integer(token: &str) -> Option<(i64, &str)> {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let end = token.len() - unsigned.len() + digits;
    let id = token[..end].parse::<i64>().ok()?;
    Some((id, &token[end..]))
}

impl AnnotationFormat for PolygonTxtFormat {
    fn id(&self) -> &'static str {
        "polygon-txt"
    }

    fn display_name(&self) -> &'static str {
        "Polygon lines (TXT)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn default_filename(&self) -> &'static str {
        POLYGON_TXT_FILENAME
    }

    fn export(
        &self,
        annotations: &[Annotation],
        classes: &ClassTable,
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::new();

        let lines: Vec<String> = annotations
            .iter()
            .enumerate()
            .map(|(index, annotation)| {
                if !classes.contains(&annotation.class_name) {
                    result.add_warning(
                        FormatWarning::warning(format!(
                            "Class '{}' is not defined, exported as id 0",
                            annotation.class_name
                        ))
                        .at_line(index + 1),
                    );
                }
                Self::format_line(annotation, classes)
            })
            .collect();

        result.contents = lines.join("\n");
        result.annotations_exported = lines.len();

        log::info!(
            "📤 Exported {} polygons ({} warnings)",
            result.annotations_exported,
            result.warnings.len()
        );
        Ok(result)
    }

    fn import(&self, contents: &str, classes: &ClassTable) -> Result<ImportResult, FormatError> {
        let mut result = ImportResult::new();

        for (index, raw) in contents.split('\n').enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let annotation = Self::parse_line(line, index + 1, classes, &mut result.warnings);
            result.annotations.push(annotation);
        }

        log::info!(
            "📥 Imported {} polygons ({} warnings)",
            result.annotations.len(),
            result.warnings.len()
        );
        for warning in &result.warnings {
            log::warn!("Import: {}", warning);
        }
        Ok(result)
    }
}
