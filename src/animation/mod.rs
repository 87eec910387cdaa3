//! Frame-driven marker animation
//!
//! Single-threaded and cooperative: the host supplies a [`FrameTimer`],
//! each controller keeps at most one request outstanding on it, and the
//! host routes fired requests back to controllers.

pub mod frame;
pub mod manual;
pub mod controller;

pub use frame::{FrameRequestId, FrameTimer, SharedFrameTimer};
pub use manual::ManualFrameTimer;
pub use controller::{AnimatedMarkerController, MarkerState, PositionCallback};
