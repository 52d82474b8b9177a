//! The polygon editor: one owned instance per mounted image.
//!
//! [`Editor`] holds the viewport, pan drag, drawing session and annotation
//! store. Host input arrives as [`PointerEvent`]s or [`Command`]s and each one
//! is applied to completion before the next.

use crate::codec;
use crate::config::EditorConfig;
use crate::drawing::{DrawingState, FinishOutcome};
use crate::format::{
    ExportFile, ExportResult, FormatError, FormatRegistry, FormatWarning, NATIVE_FORMAT_ID,
};
use crate::loading::{Completion, Epoch, ImageError, ImageSlot, LoadTicket};
use crate::message::{Command, MouseButton, PointerEvent};
use crate::model::{Annotation, ClassTable, ScreenPoint};
use crate::status::StatusLine;
use crate::store::AnnotationStore;
use crate::viewport::{PanDrag, Viewport, ZoomDirection, ZoomLimits};

/// Title of the drawing hint shown while a polygon is in progress.
pub const DRAWING_HINT: &str = "Drawing mode: Click to add points, double-click to finish";

/// Screen radius of a pending vertex handle, including half its outline.
const PENDING_VERTEX_HIT_RADIUS: f64 = 4.5;
/// Half the screen width of the pending outline.
const PENDING_LINE_HIT_HALF_WIDTH: f64 = 1.0;

/// Hint shown over the canvas while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingHint {
    pub points: usize,
}

impl DrawingHint {
    pub fn title(&self) -> &'static str {
        DRAWING_HINT
    }

    pub fn points_label(&self) -> String {
        format!("Points: {}", self.points)
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    pub warnings: Vec<FormatWarning>,
}

/// Polygon annotation editor state.
pub struct Editor {
    classes: ClassTable,
    formats: FormatRegistry,
    store: AnnotationStore,
    viewport: Viewport,
    pan: PanDrag,
    drawing: DrawingState,
    /// Class given to the next committed polygon.
    current_class: String,
    image: ImageSlot,
    imports: Epoch,
    status: StatusLine,
    zoom_limits: ZoomLimits,
    /// View changed (pan, zoom, drawing, image) since the last render.
    dirty: bool,
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_annotations(config, Vec::new())
    }

    /// An editor seeded with the host's initial annotation list.
    pub fn with_annotations(config: &EditorConfig, annotations: Vec<Annotation>) -> Self {
        let classes = ClassTable::builtin();
        let current_class = config.default_class(&classes);
        log::info!(
            "🏷️ Editor ready with {} annotations, class '{}'",
            annotations.len(),
            current_class
        );
        Self {
            classes,
            formats: FormatRegistry::new(),
            store: AnnotationStore::with_annotations(annotations),
            viewport: Viewport::identity(),
            pan: PanDrag::new(),
            drawing: DrawingState::default(),
            current_class,
            image: ImageSlot::new(),
            imports: Epoch::new(),
            status: StatusLine::new(config.status_ttl()),
            zoom_limits: config.zoom.to_limits(),
            dirty: true,
        }
    }

    /// Install the host's "labels changed" callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(&[Annotation]) + 'static) {
        self.store.set_on_change(callback);
    }

    // Accessors

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn current_class(&self) -> &str {
        &self.current_class
    }

    pub fn image(&self) -> &ImageSlot {
        &self.image
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn zoom_limits(&self) -> &ZoomLimits {
        &self.zoom_limits
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    /// Hint to show while a polygon is in progress.
    pub fn drawing_hint(&self) -> Option<DrawingHint> {
        self.drawing.is_drawing().then(|| DrawingHint {
            points: self.drawing.pending_points().len(),
        })
    }

    /// Whether anything visible changed since [`Editor::mark_rendered`].
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.store.is_dirty()
    }

    pub fn mark_rendered(&mut self) {
        self.dirty = false;
        self.store.clear_dirty();
    }

    // Input

    /// Translate a pointer event and apply the resulting command.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(command) = self.translate(&event) {
            self.apply(command);
        }
    }

    /// Map a pointer event to a command, if it has one.
    ///
    /// A left press over an annotation selects it instead of placing a point.
    /// A left press on the in-progress outline or its handles does nothing.
    pub fn translate(&self, event: &PointerEvent) -> Option<Command> {
        match *event {
            PointerEvent::Press {
                button: MouseButton::Middle,
                pos,
            } => Some(Command::PanStart(pos)),
            PointerEvent::Press {
                button: MouseButton::Left,
                pos,
            } if self.pending_at(pos) => None,
            PointerEvent::Press {
                button: MouseButton::Left,
                pos,
            } => match self.annotation_at(pos) {
                Some(index) => Some(Command::SelectAnnotation(Some(index))),
                None => Some(Command::PlacePoint(pos)),
            },
            PointerEvent::Press {
                button: MouseButton::Right,
                ..
            } => None,
            PointerEvent::Move { pos } => self.pan.is_active().then_some(Command::PanMove(pos)),
            PointerEvent::Release {
                button: MouseButton::Middle,
                ..
            } => Some(Command::PanEnd),
            PointerEvent::Release { .. } => None,
            PointerEvent::Wheel { pos, delta_y } => Some(Command::ZoomAt {
                pointer: pos,
                delta_y,
            }),
            PointerEvent::DoubleClick { .. } => Some(Command::CommitPolygon),
        }
    }

    /// Topmost annotation under a screen position. Requires a loaded image.
    pub fn annotation_at(&self, pos: ScreenPoint) -> Option<usize> {
        let size = self.image.size()?;
        self.store
            .hit_test(&self.viewport.screen_to_image(pos), size)
    }

    /// Whether a screen position lies on the pending outline or a handle.
    pub fn pending_at(&self, pos: ScreenPoint) -> bool {
        let screen: Vec<ScreenPoint> = self
            .drawing
            .pending_points()
            .iter()
            .map(|&p| self.viewport.image_to_screen(p))
            .collect();
        let near_vertex = screen
            .iter()
            .any(|v| distance(pos, *v) <= PENDING_VERTEX_HIT_RADIUS);
        near_vertex
            || screen
                .windows(2)
                .any(|w| segment_distance(pos, w[0], w[1]) <= PENDING_LINE_HIT_HALF_WIDTH)
    }

    /// Apply one command to the editor state.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::PanStart(pos) => {
                self.pan.start(pos);
                log::debug!("Pan drag started at ({:.1}, {:.1})", pos.x, pos.y);
            }
            Command::PanMove(pos) => {
                if let Some((dx, dy)) = self.pan.update(pos) {
                    self.viewport = self.viewport.pan_by(dx, dy);
                    self.dirty = true;
                    log::debug!(
                        "Pan drag: delta=({:.1}, {:.1}), offset=({:.1}, {:.1})",
                        dx,
                        dy,
                        self.viewport.offset.x,
                        self.viewport.offset.y
                    );
                }
            }
            Command::PanEnd => {
                if self.pan.is_active() {
                    self.pan.end();
                    log::debug!("Pan drag ended");
                }
            }
            Command::ZoomAt { pointer, delta_y } => {
                let direction = ZoomDirection::from_wheel_delta(delta_y);
                self.viewport = self.viewport.zoom_at(pointer, direction, &self.zoom_limits);
                self.dirty = true;
                log::debug!("🔍 Zoom {:?}: {:.2}x", direction, self.viewport.scale);
            }
            Command::PlacePoint(pos) => self.place_point(pos),
            Command::CommitPolygon => self.commit_polygon(),
            Command::CancelDrawing => self.cancel_drawing(),
            Command::SelectAnnotation(index) => self.select(index),
            Command::SetClass(name) => self.set_class(name),
            Command::DeleteSelected => self.delete_selected(),
        }
    }

    fn place_point(&mut self, pos: ScreenPoint) {
        if !self.image.is_ready() {
            log::debug!("Ignoring point at ({:.1}, {:.1}): no image loaded", pos.x, pos.y);
            return;
        }
        let point = self.viewport.screen_to_image(pos);
        if self.drawing.add_point(point) {
            log::debug!(
                "✏️ Added point {} at ({:.1}, {:.1})",
                self.drawing.pending_points().len(),
                point.x,
                point.y
            );
            self.status
                .set(format!("Added point at {:.0}, {:.0}", point.x, point.y));
        } else {
            self.drawing.start(point);
            self.select(None);
            log::debug!("✏️ Started polygon at ({:.1}, {:.1})", point.x, point.y);
            self.status
                .set(format!("Started drawing at {:.0}, {:.0}", point.x, point.y));
        }
        self.dirty = true;
    }

    fn commit_polygon(&mut self) {
        match self.drawing.finish() {
            FinishOutcome::NotDrawing => {
                log::debug!("Double-click outside drawing mode");
                return;
            }
            FinishOutcome::TooFewPoints { placed } => {
                log::info!("Polygon discarded with {} points", placed);
                self.status
                    .set("Cancelled: Need at least 3 points to create a polygon");
            }
            FinishOutcome::Closed(ring) => match self.image.size() {
                Some(size) => {
                    let annotation =
                        Annotation::new(self.current_class.clone(), codec::to_normalized(&ring, size));
                    let index = self.store.add(annotation);
                    log::info!(
                        "✏️ Completed polygon {} with {} points ({})",
                        index,
                        ring.len(),
                        self.current_class
                    );
                    self.status
                        .set(format!("Completed polygon with {} points", ring.len()));
                }
                None => log::warn!("Polygon discarded: image is no longer loaded"),
            },
        }
        self.dirty = true;
    }

    fn cancel_drawing(&mut self) {
        if self.drawing.is_drawing() {
            let dropped = self.drawing.cancel();
            log::debug!("Drawing cancelled, {} points dropped", dropped);
            self.status.set("Drawing cancelled");
            self.dirty = true;
        }
    }

    fn select(&mut self, index: Option<usize>) {
        match self.store.select(index) {
            Ok(()) => log::debug!("🔍 Selected annotation {:?}", index),
            Err(e) => log::warn!("Selection ignored: {}", e),
        }
    }

    /// Set the class for the next polygon and relabel the selected annotation.
    fn set_class(&mut self, name: String) {
        if !self.classes.contains(&name) {
            log::warn!("Ignoring unknown class '{}'", name);
            return;
        }
        log::debug!("🏷️ Class: {}", name);
        if let Some(index) = self.store.selected() {
            match self.store.update_class(index, &name) {
                Ok(()) => log::info!("🏷️ Annotation {} relabeled as '{}'", index, name),
                Err(e) => log::warn!("Relabel failed: {}", e),
            }
        }
        self.current_class = name;
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.store.selected() else {
            log::debug!("Delete requested with nothing selected");
            return;
        };
        match self.store.delete(index) {
            Ok(removed) => log::info!("🗑️ Deleted annotation {} ({})", index, removed.class_name),
            Err(e) => log::warn!("Delete failed: {}", e),
        }
    }

    // Image loading

    /// Start loading a new image. Any polygon in progress is discarded.
    pub fn begin_image_load(&mut self, source: impl Into<String>) -> LoadTicket {
        if self.drawing.is_drawing() {
            let dropped = self.drawing.cancel();
            log::debug!("New image requested, dropped {} pending points", dropped);
        }
        self.dirty = true;
        self.image.begin(source)
    }

    /// Deliver natural dimensions (or a failure) for a load request.
    pub fn complete_image_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<(u32, u32), ImageError>,
    ) -> Completion {
        let completion = self.image.complete(ticket, result);
        if completion != Completion::Stale {
            self.dirty = true;
        }
        completion
    }

    // Import / export

    /// Start reading an import file; only the latest request is applied.
    pub fn begin_import(&mut self) -> LoadTicket {
        let ticket = self.imports.issue();
        log::debug!("📥 Import requested (request {})", ticket.value());
        ticket
    }

    /// Deliver the text of a polygon line file. Returns `None` for a stale request.
    pub fn complete_import(
        &mut self,
        ticket: LoadTicket,
        contents: &str,
    ) -> Result<Option<ImportSummary>, FormatError> {
        self.complete_import_as(ticket, NATIVE_FORMAT_ID, contents)
    }

    /// [`Editor::complete_import`] for a payload in the format `format_id`.
    pub fn complete_import_as(
        &mut self,
        ticket: LoadTicket,
        format_id: &str,
        contents: &str,
    ) -> Result<Option<ImportSummary>, FormatError> {
        if !self.imports.is_current(ticket) {
            log::warn!("Ignoring stale import (request {})", ticket.value());
            return Ok(None);
        }
        self.import_with(format_id, contents).map(Some)
    }

    /// Replace all annotations with the contents of a polygon line file.
    pub fn import_text(&mut self, contents: &str) -> Result<ImportSummary, FormatError> {
        self.import_with(NATIVE_FORMAT_ID, contents)
    }

    /// Replace all annotations with a payload in the format `format_id`.
    pub fn import_with(
        &mut self,
        format_id: &str,
        contents: &str,
    ) -> Result<ImportSummary, FormatError> {
        let result = self
            .formats
            .require(format_id)?
            .import(contents, &self.classes)?;
        let imported = result.annotations.len();
        self.store.replace_all(result.annotations);
        self.status.set(format!("Imported {} annotations", imported));
        Ok(ImportSummary {
            imported,
            warnings: result.warnings,
        })
    }

    /// Serialize the annotations as polygon lines.
    pub fn export_text(&self) -> Result<ExportResult, FormatError> {
        self.export_with(NATIVE_FORMAT_ID)
    }

    pub fn export_with(&self, format_id: &str) -> Result<ExportResult, FormatError> {
        self.formats
            .require(format_id)?
            .export(self.store.annotations(), &self.classes)
    }

    /// The export offered by the download button.
    pub fn export_file(&self) -> Result<ExportFile, FormatError> {
        let format = self.formats.native();
        let result = format.export(self.store.annotations(), &self.classes)?;
        for warning in &result.warnings {
            log::warn!("Export: {}", warning);
        }
        Ok(result.into_file(format))
    }

    /// The annotation list as the JSON the host's callback receives.
    pub fn annotations_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string(self.store.annotations())?)
    }
}

fn distance(a: ScreenPoint, b: ScreenPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    distance(p, ScreenPoint::new(a.x + t * dx, a.y + t * dy))
}
