//! Traveling marker that loops along one attack vector
//!
//! The controller owns its path and a fractional cursor. Each frame
//! callback advances the cursor by a fixed step modulo the path length and
//! emits `path[floor(cursor)]`, then requests the next frame. Stopping
//! cancels the pending request before returning, so no callback outlives
//! the controller.

use super::frame::{FrameRequestId, SharedFrameTimer};
use crate::algorithms::{AttackColor, CurvePath};
use crate::core::{GeoPoint, MARKER_TICK_STEP};
use crate::validation::error::{MapError, MapResult};
use serde::Serialize;

/// Callback invoked with the marker position on every frame
pub type PositionCallback = Box<dyn FnMut(GeoPoint)>;

/// Lifecycle of a marker controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerState {
    /// Constructed, no frame requested yet
    Idle,
    /// A frame request is outstanding and the cursor advances on each frame
    Running,
    /// Pending request cancelled; terminal
    Stopped,
}

/// Per-path animation controller
pub struct AnimatedMarkerController {
    path: CurvePath,
    color: AttackColor,
    step: f64,
    cursor: f64,
    state: MarkerState,
    pending: Option<FrameRequestId>,
    timer: SharedFrameTimer,
    on_position: Option<PositionCallback>,
    ticks: u64,
}

impl AnimatedMarkerController {
    /// Create an idle controller advancing 0.5 path points per frame
    pub fn new(path: CurvePath, color: AttackColor, timer: SharedFrameTimer) -> Self {
        Self {
            path,
            color,
            step: MARKER_TICK_STEP,
            cursor: 0.0,
            state: MarkerState::Idle,
            pending: None,
            timer,
            on_position: None,
            ticks: 0,
        }
    }

    /// Override the per-frame cursor step
    pub fn with_step(mut self, step: f64) -> MapResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(MapError::invalid_argument(
                "step",
                step,
                "must be a positive finite number",
            ));
        }
        self.step = step;
        Ok(self)
    }

    /// Subscribe to position updates, replacing any previous subscriber
    pub fn on_position(&mut self, callback: PositionCallback) {
        self.on_position = Some(callback);
    }

    /// Begin the frame loop.
    ///
    /// Returns the resulting state: an empty path keeps the controller
    /// `Idle`, and a stopped controller cannot be restarted.
    pub fn start(&mut self) -> MarkerState {
        match self.state {
            MarkerState::Running => {}
            MarkerState::Stopped => {
                tracing::warn!("start() on a stopped marker controller ignored");
            }
            MarkerState::Idle if self.path.is_empty() => {
                tracing::debug!("marker path is empty, controller stays idle");
            }
            MarkerState::Idle => {
                let id = self.timer.request_frame();
                self.pending = Some(id);
                self.state = MarkerState::Running;
                tracing::debug!(
                    path_len = self.path.len(),
                    color = %self.color,
                    frame = %id,
                    "marker started"
                );
            }
        }
        self.state
    }

    /// Cancel the pending frame and release the subscriber.
    ///
    /// Safe to call any number of times, from any state.
    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timer.cancel_frame(id);
        }
        if self.state != MarkerState::Stopped {
            tracing::debug!(ticks = self.ticks, "marker stopped");
        }
        self.state = MarkerState::Stopped;
        self.on_position = None;
    }

    /// Handle a fired frame request.
    ///
    /// Ignores requests that are not this controller's outstanding one,
    /// including any that fire after `stop()`. Returns the emitted position.
    pub fn on_frame(&mut self, id: FrameRequestId) -> Option<GeoPoint> {
        if self.state != MarkerState::Running || self.pending != Some(id) {
            return None;
        }
        self.pending = None;

        let point = self.advance()?;
        if let Some(callback) = self.on_position.as_mut() {
            callback(point);
        }

        self.pending = Some(self.timer.request_frame());
        Some(point)
    }

    fn advance(&mut self) -> Option<GeoPoint> {
        let len = self.path.len();
        if len == 0 {
            return None;
        }
        let len_f = len as f64;

        if !(self.cursor.is_finite() && self.cursor >= 0.0 && self.cursor < len_f) {
            let clamped = if self.cursor.is_finite() {
                self.cursor.rem_euclid(len_f)
            } else {
                0.0
            };
            tracing::warn!(cursor = self.cursor, clamped, path_len = len, "marker cursor out of range");
            self.cursor = clamped;
        }

        self.cursor = (self.cursor + self.step) % len_f;
        if self.cursor >= len_f {
            self.cursor = 0.0;
        }
        self.ticks += 1;

        self.current_index().and_then(|index| self.path.get(index).copied())
    }

    /// Current marker position; `None` for an empty path or once stopped
    pub fn position(&self) -> Option<GeoPoint> {
        if self.state == MarkerState::Stopped {
            return None;
        }
        self.current_index().and_then(|index| self.path.get(index).copied())
    }

    /// Path index under the cursor
    pub fn current_index(&self) -> Option<usize> {
        if self.path.is_empty() {
            return None;
        }
        let index = self.cursor.floor().max(0.0) as usize;
        Some(index.min(self.path.len() - 1))
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MarkerState::Running
    }

    /// Outstanding frame request, if any
    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.pending
    }

    pub fn path(&self) -> &CurvePath {
        &self.path
    }

    pub fn color(&self) -> AttackColor {
        self.color
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Frames handled since start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub(crate) fn set_cursor_for_test(&mut self, cursor: f64) {
        self.cursor = cursor;
    }
}

impl Drop for AnimatedMarkerController {
    fn drop(&mut self) {
        self.stop();
    }
}
