//! Session-wide undo/redo timeline across every surface.

use crate::changes::{ChangeRecord, ChangeStream};
use crate::surface::{DrawingSurface, SurfaceId};
use std::cell::{RefCell, RefMut};

/// Undo/redo history shared by all surfaces.
///
/// Holds one undo stack and one redo stack ordered by when edits actually
/// happened, regardless of which page they landed on. Surfaces never touch
/// these stacks; they only report edits through their change streams and
/// replay undo/redo when asked.
///
/// Edits that were reported but not yet absorbed already count: the queries
/// see them as undoable, and their presence means nothing is redoable.
#[derive(Debug, Default)]
pub struct UndoRedoCoordinator {
    streams: Vec<ChangeStream>,
    /// User edits pulled from the streams but not yet on the undo stack.
    pending: RefCell<Vec<ChangeRecord>>,
    undo_stack: Vec<ChangeRecord>,
    redo_stack: Vec<ChangeRecord>,
}

impl UndoRedoCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording user edits made on `surface`.
    pub fn track(&mut self, surface: &mut DrawingSurface) {
        log::debug!("Tracking changes on surface {}", surface.index());
        self.streams.push(ChangeStream::observe(surface));
    }

    /// Record every pending user edit from the tracked surfaces.
    ///
    /// Any new edit invalidates the redo future, so the redo stack is
    /// cleared and the affected surfaces drop their undone strokes.
    pub fn absorb(&mut self, surfaces: &mut [DrawingSurface]) {
        let mut pending = std::mem::take(&mut *self.collect());
        if pending.is_empty() {
            return;
        }
        pending.sort_by_key(|record| record.sequence);

        if !self.redo_stack.is_empty() {
            let mut stale: Vec<SurfaceId> = self.redo_stack.drain(..).map(|record| record.surface).collect();
            stale.sort_unstable();
            stale.dedup();
            for surface in surfaces.iter_mut().filter(|s| stale.contains(&s.index())) {
                surface.discard_undone();
            }
        }

        log::debug!("Recorded {} new edits", pending.len());
        self.undo_stack.extend(pending);
    }

    /// Undo the most recent edit on whichever surface it happened.
    /// Returns false when there is nothing to undo.
    pub fn request_undo(&mut self, surfaces: &mut [DrawingSurface]) -> bool {
        self.absorb(surfaces);
        Self::step(&mut self.undo_stack, &mut self.redo_stack, surfaces, DrawingSurface::undo, "undo")
    }

    /// Redo the most recently undone edit.
    /// Returns false when there is nothing to redo.
    pub fn request_redo(&mut self, surfaces: &mut [DrawingSurface]) -> bool {
        self.absorb(surfaces);
        Self::step(&mut self.redo_stack, &mut self.undo_stack, surfaces, DrawingSurface::redo, "redo")
    }

    fn step(
        from: &mut Vec<ChangeRecord>,
        to: &mut Vec<ChangeRecord>,
        surfaces: &mut [DrawingSurface],
        replay: fn(&mut DrawingSurface) -> bool,
        action: &str,
    ) -> bool {
        let Some(record) = from.last() else {
            log::debug!("Nothing to {}", action);
            return false;
        };

        let Some(surface) = surfaces.iter_mut().find(|s| s.index() == record.surface) else {
            log::warn!("Cannot {}: surface {} is not available", action, record.surface);
            return false;
        };

        if !replay(surface) {
            log::warn!("Surface {} had nothing to {} for {}", record.surface, action, record.object);
        }

        if let Some(record) = from.pop() {
            to.push(record);
        }
        true
    }

    /// Pull reported edits into the pending buffer.
    fn collect(&self) -> RefMut<'_, Vec<ChangeRecord>> {
        let mut pending = self.pending.borrow_mut();
        for stream in &self.streams {
            pending.extend(stream.drain());
        }
        pending
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.collect().is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty() && self.collect().is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len() + self.collect().len()
    }

    pub fn redo_depth(&self) -> usize {
        if self.collect().is_empty() {
            self.redo_stack.len()
        } else {
            0
        }
    }
}
