//! Polygon drawing state machine.
//!
//! ```text
//!            press (background)            press (background)
//!   Idle ────────────────────────▶ Drawing ◀──────────────────┐
//!    ▲                              │  └──────────────────────┘
//!    │   double-click, ≥3 vertices  │
//!    ├──────────── commit ──────────┤
//!    │   double-click, <3 / cancel  │
//!    └──────────── abort ───────────┘
//! ```
//!
//! Pending points are held in absolute image space. Conversion to normalized
//! space happens when the committed ring is handed to the store.

use crate::model::{ImagePoint, MIN_POLYGON_VERTICES};

/// State for a polygon currently being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Drawing a polygon - stores points placed so far.
    Drawing { points: Vec<ImagePoint> },
}

/// Result of a finish (double-click) request.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// No polygon was in progress.
    NotDrawing,
    /// Fewer than three distinct vertices; the session was discarded.
    TooFewPoints { placed: usize },
    /// Closed ring ready to commit, first point repeated at the end.
    Closed(Vec<ImagePoint>),
}

impl DrawingState {
    /// Check if we're currently drawing something.
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawingState::Drawing { .. })
    }

    /// Points placed so far (empty when idle).
    pub fn pending_points(&self) -> &[ImagePoint] {
        match self {
            DrawingState::Idle => &[],
            DrawingState::Drawing { points } => points,
        }
    }

    /// Start a new polygon with `point` as its only vertex.
    pub fn start(&mut self, point: ImagePoint) {
        *self = DrawingState::Drawing {
            points: vec![point],
        };
    }

    /// Add a point to the polygon in progress. Returns false when idle.
    pub fn add_point(&mut self, point: ImagePoint) -> bool {
        match self {
            DrawingState::Idle => false,
            DrawingState::Drawing { points } => {
                points.push(point);
                true
            }
        }
    }

    /// Discard the polygon in progress, returning the number of dropped points.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending_points().len();
        *self = DrawingState::Idle;
        dropped
    }

    /// Finish the polygon, always returning to `Idle`.
    pub fn finish(&mut self) -> FinishOutcome {
        match std::mem::take(self) {
            DrawingState::Idle => FinishOutcome::NotDrawing,
            DrawingState::Drawing { points } => {
                if distinct_vertex_count(&points) < MIN_POLYGON_VERTICES {
                    FinishOutcome::TooFewPoints {
                        placed: points.len(),
                    }
                } else {
                    FinishOutcome::Closed(close_ring(points))
                }
            }
        }
    }
}

/// Vertices not counting a trailing repeat of the first point.
fn distinct_vertex_count(points: &[ImagePoint]) -> usize {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
        _ => points.len(),
    }
}

/// Append a copy of the first point unless the ring is already closed.
pub fn close_ring(mut points: Vec<ImagePoint>) -> Vec<ImagePoint> {
    match (points.first().copied(), points.last().copied()) {
        (Some(first), Some(last)) if first != last => points.push(first),
        _ => {}
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> ImagePoint {
        ImagePoint::new(x, y)
    }

    #[test]
    fn test_start_and_add() {
        let mut state = DrawingState::default();
        assert!(!state.is_drawing());
        assert!(!state.add_point(p(1.0, 1.0)));

        state.start(p(10.0, 10.0));
        assert!(state.add_point(p(20.0, 10.0)));
        assert_eq!(state.pending_points(), &[p(10.0, 10.0), p(20.0, 10.0)]);
    }

    #[test]
    fn test_finish_with_two_points_aborts() {
        let mut state = DrawingState::default();
        state.start(p(0.0, 0.0));
        state.add_point(p(10.0, 0.0));

        assert_eq!(state.finish(), FinishOutcome::TooFewPoints { placed: 2 });
        assert!(!state.is_drawing());
        assert!(state.pending_points().is_empty());
    }

    #[test]
    fn test_finish_with_three_points_closes_ring() {
        let mut state = DrawingState::default();
        state.start(p(0.0, 0.0));
        state.add_point(p(10.0, 0.0));
        state.add_point(p(5.0, 8.0));

        match state.finish() {
            FinishOutcome::Closed(ring) => {
                assert_eq!(ring.len(), 4);
                assert_eq!(ring.first(), ring.last());
            }
            other => panic!("Expected closed ring, got {:?}", other),
        }
        assert_eq!(state, DrawingState::Idle);
    }

    #[test]
    fn test_already_closed_ring_is_not_extended() {
        let mut state = DrawingState::default();
        state.start(p(0.0, 0.0));
        state.add_point(p(10.0, 0.0));
        state.add_point(p(5.0, 8.0));
        state.add_point(p(0.0, 0.0));

        match state.finish() {
            FinishOutcome::Closed(ring) => assert_eq!(ring.len(), 4),
            other => panic!("Expected closed ring, got {:?}", other),
        }
    }

    #[test]
    fn test_closing_repeat_does_not_count_as_vertex() {
        let mut state = DrawingState::default();
        state.start(p(0.0, 0.0));
        state.add_point(p(10.0, 0.0));
        state.add_point(p(0.0, 0.0));

        assert_eq!(state.finish(), FinishOutcome::TooFewPoints { placed: 3 });
    }

    #[test]
    fn test_finish_while_idle() {
        let mut state = DrawingState::Idle;
        assert_eq!(state.finish(), FinishOutcome::NotDrawing);
    }

    #[test]
    fn test_cancel_discards_points() {
        let mut state = DrawingState::default();
        state.start(p(0.0, 0.0));
        state.add_point(p(1.0, 1.0));
        assert_eq!(state.cancel(), 2);
        assert_eq!(state, DrawingState::Idle);
        assert_eq!(state.cancel(), 0);
    }
}
