//! Tests for the JSON list format.

use crate::format::error::FormatError;
use crate::format::formats::AnnotationJsonFormat;
use crate::format::traits::AnnotationFormat;
use crate::model::{Annotation, ClassTable, NormalizedPolygon};

#[test]
fn test_json_export_shape() {
    let annotations = vec![Annotation::new(
        "пора",
        NormalizedPolygon::from_flat(vec![0.1, 0.2, 0.3, 0.2, 0.2, 0.4, 0.1, 0.2]),
    )];
    let result = AnnotationJsonFormat
        .export(&annotations, &ClassTable::builtin())
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&result.contents).unwrap();
    assert_eq!(value[0]["class"], "пора");
    assert_eq!(value[0]["points"].as_array().unwrap().len(), 8);
    assert_eq!(result.annotations_exported, 1);
}

#[test]
fn test_json_import_keeps_unknown_class_name() {
    let text = r#"[{"class": "misc", "points": [0.1, 0.1, 0.5, 0.1, 0.5, 0.5, 0.1, 0.1]}]"#;
    let result = AnnotationJsonFormat
        .import(text, &ClassTable::builtin())
        .unwrap();

    assert_eq!(result.annotations[0].class_name, "misc");
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_json_import_rejects_malformed_payload() {
    let err = AnnotationJsonFormat
        .import("{not json", &ClassTable::builtin())
        .unwrap_err();
    assert!(matches!(err, FormatError::Json(_)));
}

#[test]
fn test_json_null_coordinate_reads_as_nan() {
    let text = r#"[{"class": "пора", "points": [null, 0.1, 0.5, 0.1, 0.5, 0.5]}]"#;
    let result = AnnotationJsonFormat
        .import(text, &ClassTable::builtin())
        .unwrap();

    assert!(result.annotations[0].points.as_flat()[0].is_nan());
    assert_eq!(result.warnings.len(), 1);
}
