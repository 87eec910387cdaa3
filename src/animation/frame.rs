//! Frame timing abstraction supplied by the host rendering environment

use std::fmt;
use std::rc::Rc;

/// Identifier of one pending frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(u64);

impl FrameRequestId {
    pub fn new(id: u64) -> Self {
        FrameRequestId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Request-next-frame / cancel-pending-frame primitive.
///
/// A request fires at most once, on the next frame boundary after it was
/// made. Requests made while a frame is being dispatched belong to the
/// following frame. Once `cancel_frame` returns the id must never fire.
///
/// Both calls take `&self` and must always succeed, whatever the host is
/// doing with the timer at the time. Implementations keep their own state
/// behind interior mutability.
pub trait FrameTimer {
    /// Schedule a callback for the next frame
    fn request_frame(&self) -> FrameRequestId;

    /// Cancel a pending request. Unknown or already fired ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Frame timer shared by every controller on one rendering thread
pub type SharedFrameTimer = Rc<dyn FrameTimer>;
