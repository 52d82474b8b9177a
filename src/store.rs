//! Ordered annotation storage for the current image.
//!
//! The store is the single source of truth for rendering and export. Every
//! mutation of the annotation list marks the store dirty for the renderer and
//! hands the full list to the host's "labels changed" callback.

use std::fmt;

use thiserror::Error;

use crate::codec;
use crate::model::{Annotation, ImagePoint, ImageSize};

/// Callback receiving the full annotation list after each mutation.
pub type LabelsChanged = Box<dyn FnMut(&[Annotation])>;

/// Errors from index based store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Annotation index {index} out of range (store has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Storage for annotations on a single image.
///
/// The list index is the annotation's transient identity.
#[derive(Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    selected: Option<usize>,
    /// Set when annotations or selection change; cleared by the renderer.
    dirty: bool,
    on_change: Option<LabelsChanged>,
}

impl fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("annotations", &self.annotations)
            .field("selected", &self.selected)
            .field("dirty", &self.dirty)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            dirty: true, // Start dirty so the first render happens
            ..Self::default()
        }
    }

    /// A store seeded with the host's initial list. Does not notify.
    pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            ..Self::new()
        }
    }

    /// Install the "labels changed" callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(&[Annotation]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after rebuilding the render scene.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn changed(&mut self) {
        self.dirty = true;
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.annotations);
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.annotations.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.annotations.len(),
            })
        }
    }

    /// Append an annotation and return its index.
    pub fn add(&mut self, annotation: Annotation) -> usize {
        self.annotations.push(annotation);
        self.changed();
        self.annotations.len() - 1
    }

    /// Reassign the class of the annotation at `index`.
    pub fn update_class(&mut self, index: usize, class_name: &str) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.annotations[index].class_name = class_name.to_string();
        self.changed();
        Ok(())
    }

    /// Remove the annotation at `index`; later indices shift down by one.
    ///
    /// Deleting the selected annotation clears the selection. Deleting one
    /// before it moves the selection down so it keeps pointing at the same
    /// annotation.
    pub fn delete(&mut self, index: usize) -> Result<Annotation, StoreError> {
        self.check_index(index)?;
        let removed = self.annotations.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        self.changed();
        Ok(removed)
    }

    /// Select an annotation, or clear the selection with `None`.
    pub fn select(&mut self, index: Option<usize>) -> Result<(), StoreError> {
        if let Some(i) = index {
            self.check_index(i)?;
        }
        if self.selected != index {
            self.selected = index;
            self.dirty = true;
        }
        Ok(())
    }

    /// Replace the whole list (import). Always clears the selection.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.selected = None;
        self.changed();
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.and_then(|i| self.annotations.get(i))
    }

    /// Topmost annotation whose polygon contains `point`.
    ///
    /// Later annotations are drawn over earlier ones, so the search runs from
    /// the end of the list.
    pub fn hit_test(&self, point: &ImagePoint, size: ImageSize) -> Option<usize> {
        self.annotations
            .iter()
            .enumerate()
            .rev()
            .find(|(_, ann)| polygon_contains(&codec::to_absolute(&ann.points, size), point))
            .map(|(i, _)| i)
    }
}

/// Point-in-polygon test using ray casting.
fn polygon_contains(vertices: &[ImagePoint], point: &ImagePoint) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizedPolygon;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn square(class: &str, x0: f64, y0: f64, side: f64) -> Annotation {
        Annotation::new(
            class,
            NormalizedPolygon::from_flat(vec![
                x0,
                y0,
                x0 + side,
                y0,
                x0 + side,
                y0 + side,
                x0,
                y0 + side,
                x0,
                y0,
            ]),
        )
    }

    fn store_of(n: usize) -> AnnotationStore {
        AnnotationStore::with_annotations(
            (0..n)
                .map(|i| square("пора", 0.1 * i as f64, 0.1, 0.05))
                .collect(),
        )
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.add(square("пора", 0.0, 0.0, 0.1)), 0);
        assert_eq!(store.add(square("подрез", 0.5, 0.5, 0.1)), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().class_name, "подрез");
    }

    #[test]
    fn test_callback_receives_full_list() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = AnnotationStore::new();
        store.set_on_change(move |list| sink.borrow_mut().push(list.len()));

        store.add(square("пора", 0.0, 0.0, 0.1));
        store.add(square("пора", 0.2, 0.0, 0.1));
        store.update_class(0, "наплыв").unwrap();
        store.select(Some(1)).unwrap();
        store.delete(0).unwrap();
        store.replace_all(Vec::new());

        // Selection changes do not notify the host.
        assert_eq!(*seen.borrow(), vec![1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = store_of(3);
        store.select(Some(1)).unwrap();
        store.delete(1).unwrap();
        assert_eq!(store.selected(), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_earlier_index_shifts_selection() {
        let mut store = store_of(3);
        store.update_class(2, "трещина").unwrap();
        store.select(Some(2)).unwrap();

        store.delete(0).unwrap();

        assert_eq!(store.selected(), Some(1));
        assert_eq!(store.selected_annotation().unwrap().class_name, "трещина");
    }

    #[test]
    fn test_delete_later_index_keeps_selection() {
        let mut store = store_of(3);
        store.select(Some(0)).unwrap();
        store.delete(2).unwrap();
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut store = store_of(1);
        assert_eq!(
            store.delete(5),
            Err(StoreError::IndexOutOfRange { index: 5, len: 1 })
        );
        assert!(store.update_class(1, "пора").is_err());
        assert!(store.select(Some(1)).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_all_resets_selection() {
        let mut store = store_of(2);
        store.select(Some(1)).unwrap();
        store.replace_all(vec![square("прожог", 0.0, 0.0, 0.3)]);
        assert_eq!(store.selected(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_dirty_flag() {
        let mut store = AnnotationStore::new();
        assert!(store.is_dirty());
        store.clear_dirty();
        store.select(None).unwrap();
        assert!(!store.is_dirty());
        store.add(square("пора", 0.0, 0.0, 0.1));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let size = ImageSize::new(1000, 1000).unwrap();
        let mut store = AnnotationStore::new();
        store.add(square("пора", 0.1, 0.1, 0.4));
        store.add(square("наплыв", 0.2, 0.2, 0.1));

        assert_eq!(store.hit_test(&ImagePoint::new(250.0, 250.0), size), Some(1));
        assert_eq!(store.hit_test(&ImagePoint::new(450.0, 450.0), size), Some(0));
        assert_eq!(store.hit_test(&ImagePoint::new(900.0, 900.0), size), None);
    }

    #[test]
    fn test_polygon_contains_needs_three_vertices() {
        let line = [ImagePoint::new(0.0, 0.0), ImagePoint::new(10.0, 10.0)];
        assert!(!polygon_contains(&line, &ImagePoint::new(5.0, 5.0)));
    }
}
