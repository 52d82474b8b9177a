//! Toolkit-neutral description of what the canvas should draw.
//!
//! Geometry is in image space; the host applies the viewport transform
//! (`translate(offset)` then `scale(scale)`). Stroke widths, dash lengths and
//! font sizes are pre-divided by the scale so they stay constant on screen.

use serde::Serialize;

use crate::codec;
use crate::color::{Rgb, Rgba};
use crate::editor::Editor;
use crate::model::ImagePoint;

/// Alpha of a committed polygon's fill.
pub const POLYGON_FILL_ALPHA: f32 = 0.1;
/// Alpha of the in-progress polygon's fill.
pub const PENDING_FILL_ALPHA: f32 = 0.2;
/// Alpha of the selected polygon's red fill.
pub const SELECTED_FILL_ALPHA: f32 = 0.2;
/// Alpha of label backgrounds.
pub const LABEL_BACKGROUND_ALPHA: f32 = 0.7;

const STROKE_WIDTH: f64 = 2.0;
const SELECTED_STROKE_WIDTH: f64 = 3.0;
const SELECTED_DASH: [f64; 2] = [10.0, 5.0];
const PENDING_DASH: [f64; 2] = [5.0, 5.0];
const VERTEX_RADIUS: f64 = 4.0;
const VERTEX_STROKE_WIDTH: f64 = 1.0;
const LABEL_FONT_SIZE: f64 = 16.0;
const SELECTED_LABEL_FONT_SIZE: f64 = 18.0;
const LABEL_PADDING: f64 = 4.0;

/// A committed, closed polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonPrimitive {
    pub index: usize,
    pub points: Vec<ImagePoint>,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub fill: Rgba,
    /// Empty for a solid line.
    pub dash: Vec<f64>,
    pub selected: bool,
}

/// Class name drawn at a polygon's centroid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPrimitive {
    pub index: usize,
    pub text: String,
    pub position: ImagePoint,
    pub font_size: f64,
    pub bold: bool,
    pub padding: f64,
    pub text_color: Rgba,
    pub background: Rgba,
}

/// The open polyline being drawn, with a handle per vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingPrimitive {
    pub points: Vec<ImagePoint>,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub fill: Rgba,
    pub dash: Vec<f64>,
    pub vertex_radius: f64,
    pub vertex_fill: Rgba,
    pub vertex_stroke: Rgba,
    pub vertex_stroke_width: f64,
}

/// One row of the side panel's annotation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationSummary {
    pub index: usize,
    pub class_name: String,
    pub color: Rgb,
    pub vertex_count: usize,
    pub selected: bool,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderScene {
    /// False until the image's natural size is known; show a placeholder.
    pub image_ready: bool,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub polygons: Vec<PolygonPrimitive>,
    pub labels: Vec<LabelPrimitive>,
    pub pending: Option<PendingPrimitive>,
    pub list: Vec<AnnotationSummary>,
}

impl RenderScene {
    /// Count shown on the annotation list badge.
    pub fn annotation_count(&self) -> usize {
        self.list.len()
    }
}

/// Mean of the vertices, including a closing repeat.
pub fn centroid(points: &[ImagePoint]) -> Option<ImagePoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(ImagePoint::new(sx / n, sy / n))
}

/// Build the scene for the editor's current state.
pub fn build_scene(editor: &Editor) -> RenderScene {
    let viewport = editor.viewport();
    let scale = viewport.scale;
    let classes = editor.classes();
    let store = editor.store();
    let selected = store.selected();

    let list = store
        .iter()
        .enumerate()
        .map(|(index, ann)| AnnotationSummary {
            index,
            class_name: ann.class_name.clone(),
            color: classes.color_for(&ann.class_name),
            vertex_count: ann.points.vertex_count(),
            selected: selected == Some(index),
        })
        .collect();

    let mut polygons = Vec::new();
    let mut labels = Vec::new();
    let size = editor.image().size();

    if let Some(size) = size {
        for (index, ann) in store.iter().enumerate() {
            let points = codec::to_absolute(&ann.points, size);
            let is_selected = selected == Some(index);
            let color = classes.color_for(&ann.class_name);

            if let Some(position) = centroid(&points) {
                let (font_size, background) = if is_selected {
                    (SELECTED_LABEL_FONT_SIZE, Rgb::RED)
                } else {
                    (LABEL_FONT_SIZE, Rgb::BLACK)
                };
                labels.push(LabelPrimitive {
                    index,
                    text: ann.class_name.clone(),
                    position,
                    font_size: font_size / scale,
                    bold: is_selected,
                    padding: LABEL_PADDING / scale,
                    text_color: Rgb::WHITE.opaque(),
                    background: background.with_alpha(LABEL_BACKGROUND_ALPHA),
                });
            }

            polygons.push(if is_selected {
                PolygonPrimitive {
                    index,
                    points,
                    stroke: Rgb::RED.opaque(),
                    stroke_width: SELECTED_STROKE_WIDTH / scale,
                    fill: Rgb::RED.with_alpha(SELECTED_FILL_ALPHA),
                    dash: SELECTED_DASH.iter().map(|d| d / scale).collect(),
                    selected: true,
                }
            } else {
                PolygonPrimitive {
                    index,
                    points,
                    stroke: color.opaque(),
                    stroke_width: STROKE_WIDTH / scale,
                    fill: color.with_alpha(POLYGON_FILL_ALPHA),
                    dash: Vec::new(),
                    selected: false,
                }
            });
        }
    }

    let pending = editor.drawing().is_drawing().then(|| {
        let color = classes.color_for(editor.current_class());
        PendingPrimitive {
            points: editor.drawing().pending_points().to_vec(),
            stroke: color.opaque(),
            stroke_width: STROKE_WIDTH / scale,
            fill: color.with_alpha(PENDING_FILL_ALPHA),
            dash: PENDING_DASH.iter().map(|d| d / scale).collect(),
            vertex_radius: VERTEX_RADIUS / scale,
            vertex_fill: Rgb::WHITE.opaque(),
            vertex_stroke: color.opaque(),
            vertex_stroke_width: VERTEX_STROKE_WIDTH / scale,
        }
    });

    RenderScene {
        image_ready: size.is_some(),
        scale,
        offset_x: viewport.offset.x,
        offset_y: viewport.offset.y,
        polygons,
        labels,
        pending,
        list,
    }
}
