//! Whiteboard state machine.
//!
//! Tracks the active shapes of every whiteboard. Whiteboards are created on
//! first use and never removed. Shapes keep the stacking position of their
//! first insertion, so redrawing a shape under the same id does not bring it
//! to the front.

use std::collections::HashMap;
use std::sync::Arc;

use slidecast_model::shape::{ShapeRecord, WhiteboardId};

/// Result of an add-shape event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New shape id on this whiteboard.
    Inserted,
    /// Existing id; the record was replaced in place.
    Replaced,
    /// Stroke still being drawn; nothing changed.
    InProgress,
}

impl AddOutcome {
    /// Whether the active-shape set changed.
    pub fn is_applied(self) -> bool {
        !matches!(self, AddOutcome::InProgress)
    }
}

/// Undo of a shape id that is not active on the whiteboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShape {
    pub whiteboard: WhiteboardId,
    pub shape_id: String,
}

#[derive(Debug, Default, Clone)]
struct Whiteboard {
    shapes: HashMap<String, (u64, Arc<ShapeRecord>)>,
}

/// Active shapes of all whiteboards in one run.
#[derive(Debug, Default, Clone)]
pub struct WhiteboardState {
    boards: HashMap<WhiteboardId, Whiteboard>,
    next_seq: u64,
}

impl WhiteboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an add-shape event. Only finished strokes are stored.
    pub fn apply_add_shape(
        &mut self,
        whiteboard: &WhiteboardId,
        shape_id: &str,
        record: ShapeRecord,
        draw_end: bool,
    ) -> AddOutcome {
        if !draw_end {
            return AddOutcome::InProgress;
        }

        let seq = self.next_seq;
        let board = self.boards.entry(whiteboard.clone()).or_default();
        match board.shapes.get_mut(shape_id) {
            Some(slot) => {
                slot.1 = Arc::new(record);
                AddOutcome::Replaced
            }
            None => {
                board
                    .shapes
                    .insert(shape_id.to_string(), (seq, Arc::new(record)));
                self.next_seq += 1;
                AddOutcome::Inserted
            }
        }
    }

    /// Remove a shape. Leaves the state untouched when the id is not active.
    pub fn apply_undo(
        &mut self,
        whiteboard: &WhiteboardId,
        shape_id: &str,
    ) -> Result<Arc<ShapeRecord>, UnknownShape> {
        self.boards
            .get_mut(whiteboard)
            .and_then(|board| board.shapes.remove(shape_id))
            .map(|(_, record)| record)
            .ok_or_else(|| UnknownShape {
                whiteboard: whiteboard.clone(),
                shape_id: shape_id.to_string(),
            })
    }

    /// Active shapes in stacking order (bottom first).
    pub fn snapshot(&self, whiteboard: &WhiteboardId) -> Vec<Arc<ShapeRecord>> {
        let Some(board) = self.boards.get(whiteboard) else {
            return Vec::new();
        };
        let mut shapes: Vec<_> = board.shapes.values().collect();
        shapes.sort_by_key(|(seq, _)| *seq);
        shapes.into_iter().map(|(_, record)| Arc::clone(record)).collect()
    }

    pub fn contains(&self, whiteboard: &WhiteboardId, shape_id: &str) -> bool {
        self.boards
            .get(whiteboard)
            .is_some_and(|board| board.shapes.contains_key(shape_id))
    }

    pub fn shape_count(&self, whiteboard: &WhiteboardId) -> usize {
        self.boards
            .get(whiteboard)
            .map_or(0, |board| board.shapes.len())
    }

    /// Every whiteboard touched so far, in id order.
    pub fn whiteboards(&self) -> Vec<&WhiteboardId> {
        let mut ids: Vec<_> = self.boards.keys().collect();
        ids.sort();
        ids
    }
}
