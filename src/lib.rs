//! WDAT - Weld Defect Annotation Tool
//!
//! The polygon annotation editor behind the web front end: a pan/zoom
//! viewport, a polygon drawing state machine, an ordered annotation store and
//! the normalized polygon line format used for export and import.
//!
//! The crate is toolkit agnostic. Hosts feed [`message::PointerEvent`]s into an
//! [`Editor`] and draw the [`render::RenderScene`] it produces.

pub mod codec;
pub mod color;
pub mod config;
pub mod drawing;
pub mod editor;
pub mod format;
pub mod loading;
pub mod message;
pub mod model;
pub mod render;
pub mod status;
pub mod store;
pub mod viewport;

pub use config::EditorConfig;
pub use editor::Editor;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod wasm_file;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
