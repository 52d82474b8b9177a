//! Tests for the polygon line text format.

use crate::format::formats::{PolygonTxtFormat, format_coordinate};
use crate::format::traits::{AnnotationFormat, WarningSeverity};
use crate::model::{Annotation, ClassTable, NormalizedPolygon, UNKNOWN_CLASS};

fn triangle(class: &str) -> Annotation {
    Annotation::new(
        class,
        NormalizedPolygon::from_flat(vec![0.5, 0.5, 0.25, 0.25, 0.75, 0.25]),
    )
}

#[test]
fn test_polygon_txt_format_metadata() {
    let format = PolygonTxtFormat;

    assert_eq!(format.id(), "polygon-txt");
    assert!(format.extensions().contains(&"txt"));
    assert_eq!(format.mime_type(), "text/plain");
    assert_eq!(format.default_filename(), "polygon_annotations.txt");
}

#[test]
fn test_export_single_line_literal() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .export(&[triangle("пора")], &classes)
        .unwrap();

    assert_eq!(
        result.contents,
        "0 0.500000 0.500000 0.250000 0.250000 0.750000 0.250000"
    );
    assert_eq!(result.annotations_exported, 1);
    assert!(!result.has_warnings());
}

#[test]
fn test_export_rounds_halfway_values_up() {
    assert_eq!(format_coordinate(0.0078125), "0.007813");
    assert_eq!(format_coordinate(10.0 / 1280.0), "0.007813");
    assert_eq!(format_coordinate(3.0 / 128.0), "0.023438");
    assert_eq!(format_coordinate(11.0 / 128.0), "0.085938");
    assert_eq!(format_coordinate(-0.0078125), "-0.007813");
    assert_eq!(format_coordinate(0.25), "0.250000");
}

#[test]
fn test_export_negative_zero_and_non_finite() {
    assert_eq!(format_coordinate(-0.0), "0.000000");
    assert_eq!(format_coordinate(-0.0000001), "-0.000000");
    assert_eq!(format_coordinate(f64::NAN), "NaN");
    assert_eq!(format_coordinate(f64::INFINITY), "Infinity");
    assert_eq!(format_coordinate(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_export_line_with_ties_and_negative_zero() {
    let classes = ClassTable::builtin();
    let annotation = Annotation::new(
        "пора",
        NormalizedPolygon::from_flat(vec![10.0 / 1280.0, 0.5, 3.0 / 128.0, 0.25, -0.0, 0.0]),
    );
    let result = PolygonTxtFormat.export(&[annotation], &classes).unwrap();

    assert_eq!(
        result.contents,
        "0 0.007813 0.500000 0.023438 0.250000 0.000000 0.000000"
    );
}

#[test]
fn test_export_joins_lines_without_trailing_newline() {
    let classes = ClassTable::builtin();
    let annotations = vec![triangle("пора"), triangle("непровар корня")];
    let result = PolygonTxtFormat.export(&annotations, &classes).unwrap();

    let lines: Vec<&str> = result.contents.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0 "));
    assert!(lines[1].starts_with("12 "));
    assert!(!result.contents.ends_with('\n'));
}

#[test]
fn test_export_empty_list_is_empty_string() {
    let result = PolygonTxtFormat
        .export(&[], &ClassTable::builtin())
        .unwrap();
    assert_eq!(result.contents, "");
    assert_eq!(result.annotations_exported, 0);
}

#[test]
fn test_export_unknown_class_uses_id_zero() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .export(&[triangle(UNKNOWN_CLASS)], &classes)
        .unwrap();

    assert!(result.contents.starts_with("0 "));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].line, Some(1));
}

#[test]
fn test_import_resolves_class_ids() {
    let classes = ClassTable::builtin();
    let text = "4 0.1 0.1 0.2 0.1 0.2 0.2 0.1 0.1\n2 0.3 0.3 0.4 0.3 0.4 0.4";
    let result = PolygonTxtFormat.import(text, &classes).unwrap();

    assert_eq!(result.annotations.len(), 2);
    assert_eq!(result.annotations[0].class_name, "трещина");
    assert_eq!(result.annotations[0].points.scalar_count(), 8);
    assert_eq!(result.annotations[1].class_name, "подрез");
    assert!(!result.has_warnings());
}

#[test]
fn test_import_skips_blank_lines_and_trims() {
    let classes = ClassTable::builtin();
    let text = "\n  0 0.1 0.1 0.2 0.1 0.2 0.2  \r\n\n   \n1\t0.5 0.5 0.6 0.5 0.6 0.6\n";
    let result = PolygonTxtFormat.import(text, &classes).unwrap();

    assert_eq!(result.annotations.len(), 2);
    assert_eq!(result.annotations[1].class_name, "включение");
    assert_eq!(result.annotations[1].points.scalar_count(), 6);
}

#[test]
fn test_import_unknown_class_id() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("99 0.1 0.1 0.2 0.1 0.2 0.2", &classes)
        .unwrap();

    assert_eq!(result.annotations[0].class_name, UNKNOWN_CLASS);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].severity, WarningSeverity::Warning);
    assert_eq!(result.warnings[0].line, Some(1));
}

#[test]
fn test_import_unparsable_class_token() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("weld 0.1 0.1 0.2 0.1 0.2 0.2", &classes)
        .unwrap();

    assert_eq!(result.annotations[0].class_name, UNKNOWN_CLASS);
    assert_eq!(result.annotations[0].points.scalar_count(), 6);
}

#[test]
fn test_import_class_token_uses_leading_integer() {
    let classes = ClassTable::builtin();
    let text = "1abc 0.1 0.1 0.2 0.1 0.2 0.2\n3.0 0.1 0.1 0.2 0.1 0.2 0.2\n+2 0.1 0.1 0.2 0.1 0.2 0.2";
    let result = PolygonTxtFormat.import(text, &classes).unwrap();

    assert_eq!(result.annotations[0].class_name, "включение");
    assert_eq!(result.annotations[1].class_name, classes.name_or_unknown(3));
    assert_eq!(result.annotations[2].class_name, "подрез");
    assert_eq!(result.warnings.len(), 2);
    assert!(
        result
            .warnings
            .iter()
            .all(|w| w.severity == WarningSeverity::Info)
    );
    assert_eq!(result.warnings[0].line, Some(1));
    assert_eq!(result.warnings[1].line, Some(2));
}

#[test]
fn test_import_negative_class_id_is_unknown() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("-1 0.1 0.1 0.2 0.1 0.2 0.2", &classes)
        .unwrap();

    assert_eq!(result.annotations[0].class_name, UNKNOWN_CLASS);
    assert_eq!(result.warnings[0].to_string(), "line 1: Unknown class id -1");
}

#[test]
fn test_import_keeps_odd_length_row() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("0 0.1 0.1 0.2 0.1 0.2 0.2 0.9", &classes)
        .unwrap();

    let points = &result.annotations[0].points;
    assert_eq!(points.scalar_count(), 7);
    assert!(points.has_dangling_coordinate());
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message.contains("Odd number"))
    );
}

#[test]
fn test_import_keeps_short_polygon_with_info() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat.import("0 0.1 0.1 0.2 0.2", &classes).unwrap();

    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].severity, WarningSeverity::Info);
}

#[test]
fn test_import_non_numeric_coordinate_becomes_nan() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("0 0.1 abc 0.2 0.1 0.2 0.2", &classes)
        .unwrap();

    let flat = result.annotations[0].points.as_flat();
    assert!(flat[1].is_nan());
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error && w.line == Some(1))
    );
}

#[test]
fn test_import_reports_original_line_numbers() {
    let classes = ClassTable::builtin();
    let result = PolygonTxtFormat
        .import("\n\n77 0.1 0.1 0.2 0.1 0.2 0.2", &classes)
        .unwrap();

    assert_eq!(result.warnings[0].line, Some(3));
    assert_eq!(result.warnings[0].to_string(), "line 3: Unknown class id 77");
}

#[test]
fn test_import_empty_payload() {
    let result = PolygonTxtFormat
        .import("   \n\n", &ClassTable::builtin())
        .unwrap();
    assert!(result.annotations.is_empty());
    assert!(!result.has_warnings());
}
