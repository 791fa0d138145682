//! Change notifications emitted by drawing surfaces.
//!
//! A surface reports every object it adds as a [`ChangeRecord`] tagged with
//! its [`Origin`]. [`ChangeStream`] is the filtered view that only yields
//! edits made by the user, which is what the undo history records.

use crate::shapes::DrawableId;
use crate::surface::{DrawingSurface, SurfaceId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Who caused a canvas mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A direct user gesture.
    User,
    /// Programmatic replay from undo/redo.
    System,
}

/// Kind of canvas event a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    ObjectAdded,
}

/// One reported canvas mutation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub surface: SurfaceId,
    pub object: DrawableId,
    pub kind: ChangeKind,
    pub origin: Origin,
    /// Process-wide stamp, strictly increasing in creation order.
    pub sequence: u64,
}

impl ChangeRecord {
    pub(crate) fn new(surface: SurfaceId, object: DrawableId, kind: ChangeKind, origin: Origin) -> Self {
        Self {
            surface,
            object,
            kind,
            origin,
            sequence: next_sequence(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }
}

fn next_sequence() -> u64 {
    static SEQUENCE: AtomicU64 = AtomicU64::new(1);
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Every add record of one surface, both origins, in emission order.
///
/// Only sees records emitted after it was created.
#[derive(Debug)]
pub struct SurfaceChanges {
    surface: SurfaceId,
    receiver: Receiver<ChangeRecord>,
}

impl SurfaceChanges {
    pub(crate) fn new(surface: SurfaceId, receiver: Receiver<ChangeRecord>) -> Self {
        Self { surface, receiver }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Next pending record, if any. Never blocks.
    pub fn try_next(&self) -> Option<ChangeRecord> {
        match self.receiver.try_recv() {
            Ok(record) => Some(record),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All pending records.
    pub fn drain(&self) -> Vec<ChangeRecord> {
        self.receiver.try_iter().collect()
    }
}

/// User-originated edits of one surface.
#[derive(Debug)]
pub struct ChangeStream {
    changes: SurfaceChanges,
}

impl ChangeStream {
    /// Start observing a surface. Earlier edits are not replayed.
    pub fn observe(surface: &mut DrawingSurface) -> Self {
        Self {
            changes: surface.observe_changes(),
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.changes.surface()
    }

    /// Next pending user edit, skipping system replays.
    pub fn try_next(&self) -> Option<ChangeRecord> {
        while let Some(record) = self.changes.try_next() {
            if record.is_user() {
                return Some(record);
            }
            log::trace!("Swallowed system change on surface {}", record.surface);
        }
        None
    }

    /// All pending user edits.
    pub fn drain(&self) -> Vec<ChangeRecord> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
