//! Browser binding for the editor.
//!
//! The host page forwards canvas mouse events, image `onload` dimensions and
//! file reader results, and redraws from [`WasmEditor::scene_json`] whenever
//! [`WasmEditor::needs_redraw`] reports a change.

use std::fmt::Display;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::loading::{ImageError, LoadTicket};
use crate::message::{Command, MouseButton, PointerEvent};
use crate::model::{Annotation, ScreenPoint};
use crate::render::build_scene;
use crate::wasm_file::download_text_file;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = EditorConfig::load_or_default();
    if let Err(e) = console_log::init_with_level(config.preferences.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger already initialized: {}", e).into());
    }
    log::info!("WDAT WASM starting...");
}

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn ticket(raw: f64) -> LoadTicket {
    LoadTicket::from_raw(raw as u64)
}

/// Editor handle exported to JavaScript.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    config: EditorConfig,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor, optionally seeded with a JSON annotation list.
    #[wasm_bindgen(constructor)]
    pub fn new(initial_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let config = EditorConfig::load_or_default();
        let annotations: Vec<Annotation> = match initial_json {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(&json).map_err(to_js)?,
            _ => Vec::new(),
        };
        Ok(Self {
            editor: Editor::with_annotations(&config, annotations),
            config,
        })
    }

    /// Register `callback(list)`, called with the full list after each change.
    pub fn set_on_change(&mut self, callback: Function) {
        self.editor.set_on_change(move |annotations| {
            let value = serde_json::to_string(annotations)
                .map_err(to_js)
                .and_then(|json| js_sys::JSON::parse(&json));
            match value {
                Ok(list) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &list) {
                        log::error!("Labels changed callback failed: {:?}", e);
                    }
                }
                Err(e) => log::error!("Failed to serialize annotations: {:?}", e),
            }
        });
    }

    pub fn pointer_down(&mut self, button: i16, x: f64, y: f64) {
        if let Some(button) = MouseButton::from_dom(button) {
            self.editor.handle_pointer(PointerEvent::Press {
                button,
                pos: ScreenPoint::new(x, y),
            });
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.editor.handle_pointer(PointerEvent::Move {
            pos: ScreenPoint::new(x, y),
        });
    }

    pub fn pointer_up(&mut self, button: i16, x: f64, y: f64) {
        if let Some(button) = MouseButton::from_dom(button) {
            self.editor.handle_pointer(PointerEvent::Release {
                button,
                pos: ScreenPoint::new(x, y),
            });
        }
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        self.editor.handle_pointer(PointerEvent::Wheel {
            pos: ScreenPoint::new(x, y),
            delta_y,
        });
    }

    pub fn double_click(&mut self, x: f64, y: f64) {
        self.editor.handle_pointer(PointerEvent::DoubleClick {
            pos: ScreenPoint::new(x, y),
        });
    }

    pub fn cancel_drawing(&mut self) {
        self.editor.apply(Command::CancelDrawing);
    }

    /// Select by list index, or clear the selection with `undefined`.
    pub fn select_annotation(&mut self, index: Option<u32>) {
        self.editor
            .apply(Command::SelectAnnotation(index.map(|i| i as usize)));
    }

    /// Pick the class for new polygons. The choice is kept in localStorage.
    pub fn set_class(&mut self, name: String) {
        self.editor.apply(Command::SetClass(name));
        if !self.config.remember_class(self.editor.current_class()) {
            return;
        }
        if let Err(e) = self.config.save_to_local_storage() {
            log::warn!("Failed to save class preference: {}", e);
        }
    }

    pub fn delete_selected(&mut self) {
        self.editor.apply(Command::DeleteSelected);
    }

    /// Call before assigning the image `src`; pass the result to the completion.
    pub fn begin_image_load(&mut self, source: String) -> f64 {
        self.editor.begin_image_load(source).value() as f64
    }

    /// Image `onload` with its natural size. Returns false if the load was stale or failed.
    pub fn complete_image_load(&mut self, ticket_id: f64, width: u32, height: u32) -> bool {
        self.editor
            .complete_image_load(ticket(ticket_id), Ok((width, height)))
            == crate::loading::Completion::Applied
    }

    /// Image `onerror`.
    pub fn fail_image_load(&mut self, ticket_id: f64, reason: String) {
        self.editor
            .complete_image_load(ticket(ticket_id), Err(ImageError::Host(reason)));
    }

    pub fn begin_import(&mut self) -> f64 {
        self.editor.begin_import().value() as f64
    }

    /// File reader result for an import. Returns the warning messages, or
    /// `null` when a newer import superseded this one.
    pub fn complete_import(&mut self, ticket_id: f64, contents: &str) -> Result<JsValue, JsValue> {
        let summary = self
            .editor
            .complete_import(ticket(ticket_id), contents)
            .map_err(to_js)?;
        Ok(match summary {
            Some(summary) => summary
                .warnings
                .iter()
                .map(|w| JsValue::from_str(&w.to_string()))
                .collect::<js_sys::Array>()
                .into(),
            None => JsValue::NULL,
        })
    }

    pub fn export_text(&self) -> Result<String, JsValue> {
        self.editor
            .export_text()
            .map(|result| result.contents)
            .map_err(to_js)
    }

    /// Download `polygon_annotations.txt`.
    pub fn download_export(&self) -> Result<(), JsValue> {
        let file = self.editor.export_file().map_err(to_js)?;
        download_text_file(&file)
    }

    pub fn annotations_json(&self) -> Result<String, JsValue> {
        self.editor.annotations_json().map_err(to_js)
    }

    pub fn needs_redraw(&self) -> bool {
        self.editor.needs_redraw()
    }

    /// The render scene as JSON. Clears the redraw flag.
    pub fn scene_json(&mut self) -> Result<String, JsValue> {
        let json = serde_json::to_string(&build_scene(&self.editor)).map_err(to_js)?;
        self.editor.mark_rendered();
        Ok(json)
    }

    pub fn status(&self) -> Option<String> {
        self.editor.status().current().map(str::to_string)
    }

    /// Hint lines shown while drawing; empty when idle.
    pub fn drawing_hint(&self) -> Vec<String> {
        self.editor
            .drawing_hint()
            .map(|hint| vec![hint.title().to_string(), hint.points_label()])
            .unwrap_or_default()
    }

    pub fn current_class(&self) -> String {
        self.editor.current_class().to_string()
    }

    /// The class table as `[{id, name, color}]` JSON, colors as CSS strings.
    pub fn classes_json(&self) -> Result<String, JsValue> {
        let classes: Vec<serde_json::Value> = self
            .editor
            .classes()
            .all()
            .iter()
            .map(|c| serde_json::json!({ "id": c.id, "name": c.name, "color": c.color.to_css() }))
            .collect();
        serde_json::to_string(&classes).map_err(to_js)
    }
}
