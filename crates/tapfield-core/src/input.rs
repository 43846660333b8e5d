//! Pointer input - one event model for mouse and touch
//!
//! Hosts translate their native input (mouse buttons, touch lists) into
//! [`PointerEvent`] batches through a [`PointerSource`]. A mouse is a single
//! pointer; a touch screen may report several pointers in one batch.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::geometry::Point;

/// Host-assigned pointer identity (mouse = 0, touches use the host's touch id)
pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One pointer's position in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub id: PointerId,
    pub position: Point,
}

impl PointerSample {
    pub fn new(id: PointerId, position: Point) -> Self {
        Self { id, position }
    }
}

/// A batch of pointers sharing one phase, in host delivery order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pointers: Vec<PointerSample>,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, pointers: Vec<PointerSample>) -> Self {
        Self { phase, pointers }
    }

    /// Single-pointer event (mouse, or a lone touch)
    pub fn single(phase: PointerPhase, id: PointerId, position: Point) -> Self {
        Self::new(phase, vec![PointerSample::new(id, position)])
    }

    /// The pointer that drives dragging for this batch
    pub fn primary(&self) -> Option<&PointerSample> {
        primary_pointer(&self.pointers)
    }
}

/// Primary pointer selection: the first pointer in the batch.
///
/// Only the primary pointer updates the drag state; every pointer in the
/// batch still gets its own marker.
pub fn primary_pointer(pointers: &[PointerSample]) -> Option<&PointerSample> {
    pointers.first()
}

/// Producer of pointer events, polled once per frame by the host loop
pub trait PointerSource {
    /// Drain the events gathered since the last poll, in delivery order
    fn poll_events(&mut self) -> Vec<PointerEvent>;
}

/// Replays a fixed list of events; used for tests and scripted input
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Vec<PointerEvent>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events delivered by one future poll
    pub fn push_frame(&mut self, events: Vec<PointerEvent>) {
        self.queue.push_back(events);
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}

impl PointerSource for ScriptedSource {
    fn poll_events(&mut self) -> Vec<PointerEvent> {
        self.queue.pop_front().unwrap_or_default()
    }
}
