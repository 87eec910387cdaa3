//! Deterministic frame timer for tests, demos and headless rendering

use super::frame::{FrameRequestId, FrameTimer};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Frame timer advanced explicitly by the caller.
///
/// Each call to [`advance_frame`](ManualFrameTimer::advance_frame) crosses
/// one frame boundary and returns the requests due on it, in request order.
/// No borrow of the pending set outlives a single method call, so the
/// timer can be advanced, inspected and requested from in one expression.
#[derive(Debug, Default)]
pub struct ManualFrameTimer {
    next_id: Cell<u64>,
    pending: RefCell<BTreeSet<FrameRequestId>>,
    frame_number: Cell<u64>,
    requested: Cell<u64>,
    cancelled: Cell<u64>,
}

impl ManualFrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer already wrapped for sharing with controllers
    pub fn shared() -> Rc<ManualFrameTimer> {
        Rc::new(Self::new())
    }

    /// Cross one frame boundary, draining every request made before it
    pub fn advance_frame(&self) -> Vec<FrameRequestId> {
        self.frame_number.set(self.frame_number.get() + 1);
        self.pending.take().into_iter().collect()
    }

    /// Number of frame boundaries crossed so far
    pub fn frame_number(&self) -> u64 {
        self.frame_number.get()
    }

    /// Requests waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.borrow().contains(&id)
    }

    /// Total requests and successful cancellations since creation
    pub fn counters(&self) -> (u64, u64) {
        (self.requested.get(), self.cancelled.get())
    }
}

impl FrameTimer for ManualFrameTimer {
    fn request_frame(&self) -> FrameRequestId {
        let id = FrameRequestId::new(self.next_id.get() + 1);
        self.next_id.set(id.id());
        self.requested.set(self.requested.get() + 1);
        self.pending.borrow_mut().insert(id);
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if self.pending.borrow_mut().remove(&id) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}
