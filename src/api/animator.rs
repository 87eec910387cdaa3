//! Keyed set of animated attack vectors driven by polled snapshots
//!
//! The animator keeps one [`AttackVector`] per visible threat id. Each sync
//! diffs the new snapshot against the map: vanished events are stopped and
//! removed first, changed events are stopped and rebuilt, new events get a
//! fresh curve and a started controller. Frame callbacks fired by the host
//! timer are routed back to the owning controllers with `dispatch_frame`.

use crate::algorithms::{generate_curve, resolve_color, AttackColor, CurvePath};
use crate::animation::{AnimatedMarkerController, FrameRequestId, MarkerState, SharedFrameTimer};
use crate::api::types::{AnimatorStats, CallbackHandle, MarkerFrame, SyncReport, ThreatEvent};
use crate::core::{GeoPoint, ThreatId};
use crate::utils::config::{ConfigurationManager, ThreatMapConfig};
use crate::validation::data::{SnapshotValidator, VisibleThreat};
use crate::validation::error::{MapError, MapResult};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Callback invoked for every marker position emitted on a frame
pub type FrameCallback = Box<dyn FnMut(&MarkerFrame)>;

/// One drawn attack vector: curve, color and traveling marker
pub struct AttackVector {
    event: ThreatEvent,
    origin: GeoPoint,
    destination: GeoPoint,
    controller: AnimatedMarkerController,
}

impl AttackVector {
    pub fn event(&self) -> &ThreatEvent {
        &self.event
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn destination(&self) -> GeoPoint {
        self.destination
    }

    pub fn path(&self) -> &CurvePath {
        self.controller.path()
    }

    pub fn color(&self) -> AttackColor {
        self.controller.color()
    }

    /// Current traveling-marker position
    pub fn marker_position(&self) -> Option<GeoPoint> {
        self.controller.position()
    }

    pub fn marker_state(&self) -> MarkerState {
        self.controller.state()
    }

    fn matches(&self, threat: &VisibleThreat) -> bool {
        self.origin == threat.origin && self.event.attack_type == threat.event.attack_type
    }
}

/// Threat map animation facade
pub struct ThreatMapAnimator {
    config: ThreatMapConfig,
    timer: SharedFrameTimer,
    vectors: BTreeMap<ThreatId, AttackVector>,
    /// Visible ids in snapshot order
    order: Vec<ThreatId>,
    frame_callbacks: HashMap<CallbackHandle, FrameCallback>,
    callback_counter: u32,
    stats: AnimatorStats,
}

impl ThreatMapAnimator {
    /// Create an animator; the configuration is validated first
    pub fn new(config: ThreatMapConfig, timer: SharedFrameTimer) -> MapResult<Self> {
        let validation = ConfigurationManager::validate_config(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        Ok(Self {
            config,
            timer,
            vectors: BTreeMap::new(),
            order: Vec::new(),
            frame_callbacks: HashMap::new(),
            callback_counter: 0,
            stats: AnimatorStats::default(),
        })
    }

    /// Apply a freshly polled snapshot
    pub fn sync(&mut self, events: &[ThreatEvent]) -> MapResult<SyncReport> {
        let validation = SnapshotValidator::new(&self.config).validate(events);
        let mut report = SyncReport {
            skipped: validation.rejected.len(),
            excluded: validation.excluded,
            ..SyncReport::default()
        };

        let visible_ids: HashSet<ThreatId> =
            validation.visible.iter().map(|threat| threat.event.id).collect();

        // Stop everything leaving the map before any replacement starts
        let vanished: Vec<ThreatId> = self
            .vectors
            .keys()
            .filter(|id| !visible_ids.contains(id))
            .copied()
            .collect();
        for id in vanished {
            if let Some(mut vector) = self.vectors.remove(&id) {
                vector.controller.stop();
                report.removed += 1;
                tracing::debug!(event_id = id, "attack vector removed");
            }
        }

        let changed: Vec<ThreatId> = validation
            .visible
            .iter()
            .filter(|threat| {
                self.vectors
                    .get(&threat.event.id)
                    .is_some_and(|vector| !vector.matches(threat))
            })
            .map(|threat| threat.event.id)
            .collect();
        for id in &changed {
            if let Some(mut vector) = self.vectors.remove(id) {
                vector.controller.stop();
            }
        }

        let mut order = Vec::with_capacity(validation.visible.len());
        for threat in validation.visible {
            let id = threat.event.id;
            order.push(id);

            if let Some(vector) = self.vectors.get_mut(&id) {
                // Same origin and type: keep the running marker, refresh metadata
                vector.event = threat.event;
                report.unchanged += 1;
                continue;
            }

            let vector = self.build_vector(threat)?;
            if changed.contains(&id) {
                report.replaced += 1;
                tracing::debug!(event_id = id, "attack vector replaced");
            } else {
                report.added += 1;
                tracing::debug!(event_id = id, color = %vector.color(), "attack vector added");
            }
            self.vectors.insert(id, vector);
        }
        self.order = order;

        self.stats.syncs += 1;
        self.stats.vectors_added += (report.added + report.replaced) as u64;
        self.stats.vectors_removed += (report.removed + report.replaced) as u64;
        self.stats.events_skipped += report.skipped as u64;
        self.stats.active_vectors = self.vectors.len();

        if report.has_changes() {
            tracing::info!(
                added = report.added,
                removed = report.removed,
                replaced = report.replaced,
                skipped = report.skipped,
                active = self.vectors.len(),
                "threat snapshot synced"
            );
        }
        Ok(report)
    }

    fn build_vector(&self, threat: VisibleThreat) -> MapResult<AttackVector> {
        let destination = self.config.home;
        let path = generate_curve(threat.origin, destination, self.config.sample_count)?;
        let color = resolve_color(&threat.event.attack_type);

        let mut controller = AnimatedMarkerController::new(path, color, self.timer.clone())
            .with_step(self.config.tick_step)?;
        controller.start();

        Ok(AttackVector {
            event: threat.event,
            origin: threat.origin,
            destination,
            controller,
        })
    }

    /// Route fired frame requests to their controllers.
    ///
    /// Returns the number of marker positions emitted.
    pub fn dispatch_frame(&mut self, fired: &[FrameRequestId]) -> usize {
        self.stats.frames_dispatched += 1;
        let fired: HashSet<FrameRequestId> = fired.iter().copied().collect();

        let mut frames = Vec::new();
        for (id, vector) in self.vectors.iter_mut() {
            let Some(pending) = vector.controller.pending_frame() else {
                continue;
            };
            if !fired.contains(&pending) {
                continue;
            }
            if let Some(position) = vector.controller.on_frame(pending) {
                frames.push(MarkerFrame {
                    event_id: *id,
                    position,
                    color: vector.controller.color(),
                });
            }
        }

        for frame in &frames {
            for callback in self.frame_callbacks.values_mut() {
                callback(frame);
            }
        }

        self.stats.positions_emitted += frames.len() as u64;
        frames.len()
    }

    /// Register a marker position callback
    pub fn register_frame_callback(&mut self, callback: FrameCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.frame_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> MapResult<()> {
        match self.frame_callbacks.remove(&handle) {
            Some(_) => Ok(()),
            None => Err(MapError::UnknownCallback { handle: handle.id() }),
        }
    }

    /// Stop every marker and forget all vectors and callbacks
    pub fn shutdown(&mut self) {
        for vector in self.vectors.values_mut() {
            vector.controller.stop();
        }
        let stopped = self.vectors.len();
        self.vectors.clear();
        self.order.clear();
        self.frame_callbacks.clear();
        self.stats.vectors_removed += stopped as u64;
        self.stats.active_vectors = 0;
        tracing::info!(stopped, "threat map animator shut down");
    }

    /// Vectors in the order their events appeared in the last snapshot
    pub fn visible_vectors(&self) -> impl Iterator<Item = &AttackVector> + '_ {
        self.order.iter().filter_map(|id| self.vectors.get(id))
    }

    pub fn vector(&self, id: ThreatId) -> Option<&AttackVector> {
        self.vectors.get(&id)
    }

    pub fn active_count(&self) -> usize {
        self.vectors.len()
    }

    pub fn config(&self) -> &ThreatMapConfig {
        &self.config
    }

    pub fn stats(&self) -> &AnimatorStats {
        &self.stats
    }

    pub fn callback_count(&self) -> usize {
        self.frame_callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{FrameTimer, ManualFrameTimer};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TimerCall {
        Request(FrameRequestId),
        Cancel(FrameRequestId),
    }

    /// Frame timer that only logs calls, in the order they were made
    #[derive(Debug, Default)]
    struct RecordingFrameTimer {
        next_id: Cell<u64>,
        calls: RefCell<Vec<TimerCall>>,
    }

    impl RecordingFrameTimer {
        fn take_calls(&self) -> Vec<TimerCall> {
            self.calls.take()
        }
    }

    impl FrameTimer for RecordingFrameTimer {
        fn request_frame(&self) -> FrameRequestId {
            let id = FrameRequestId::new(self.next_id.get() + 1);
            self.next_id.set(id.id());
            self.calls.borrow_mut().push(TimerCall::Request(id));
            id
        }

        fn cancel_frame(&self, id: FrameRequestId) {
            self.calls.borrow_mut().push(TimerCall::Cancel(id));
        }
    }

    fn animator() -> (ThreatMapAnimator, Rc<ManualFrameTimer>) {
        let timer = ManualFrameTimer::shared();
        let animator = ThreatMapAnimator::new(ThreatMapConfig::default(), timer.clone()).unwrap();
        (animator, timer)
    }

    fn run_frame(animator: &mut ThreatMapAnimator, timer: &Rc<ManualFrameTimer>) -> usize {
        let fired = timer.advance_frame();
        animator.dispatch_frame(&fired)
    }

    fn snapshot() -> Vec<ThreatEvent> {
        vec![
            ThreatEvent::new(1, 35.8617, 104.1954, "DDoS").with_country("China"),
            ThreatEvent::new(2, 61.524, 105.3188, "Bot").with_country("Russia"),
            ThreatEvent::new(3, 0.0, 0.0, "Normal Traffic").with_country("Unknown"),
        ]
    }

    #[test]
    fn test_sync_creates_running_vectors() {
        let (mut animator, timer) = animator();
        let report = animator.sync(&snapshot()).unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.excluded, 1);
        assert_eq!(animator.active_count(), 2);
        assert_eq!(timer.pending_count(), 2);

        let vector = animator.vector(2).unwrap();
        assert_eq!(vector.color(), AttackColor::Magenta);
        assert_eq!(vector.path().len(), 81);
        assert_eq!(vector.path().last(), Some(&animator.config().home));
        assert_eq!(vector.marker_state(), MarkerState::Running);
    }

    #[test]
    fn test_frames_emit_one_position_per_vector() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        animator.register_frame_callback(Box::new(move |frame| sink.borrow_mut().push(*frame)));

        assert_eq!(run_frame(&mut animator, &timer), 2);
        assert_eq!(run_frame(&mut animator, &timer), 2);
        assert_eq!(seen.borrow().len(), 4);
        assert_eq!(animator.stats().positions_emitted, 4);
        assert_eq!(timer.pending_count(), 2);
    }

    #[test]
    fn test_vanished_event_stopped_before_new_one_starts() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();
        run_frame(&mut animator, &timer);

        let next = vec![
            ThreatEvent::new(2, 61.524, 105.3188, "Bot"),
            ThreatEvent::new(4, 51.1657, 10.4515, "FTP Brute Force"),
        ];
        let report = animator.sync(&next).unwrap();

        assert_eq!(report.removed, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.unchanged, 1);
        assert!(animator.vector(1).is_none());
        // One pending request per live vector, none leaked
        assert_eq!(timer.pending_count(), 2);
        assert_eq!(timer.counters().1, 1);
    }

    #[test]
    fn test_removal_cancels_before_new_request() {
        let timer = Rc::new(RecordingFrameTimer::default());
        let mut animator = ThreatMapAnimator::new(ThreatMapConfig::default(), timer.clone()).unwrap();
        animator.sync(&[ThreatEvent::new(1, 35.8617, 104.1954, "DDoS")]).unwrap();
        let first = FrameRequestId::new(1);
        assert_eq!(timer.take_calls(), vec![TimerCall::Request(first)]);

        animator.sync(&[ThreatEvent::new(4, 51.1657, 10.4515, "FTP Brute Force")]).unwrap();

        assert_eq!(
            timer.take_calls(),
            vec![TimerCall::Cancel(first), TimerCall::Request(FrameRequestId::new(2))]
        );
    }

    #[test]
    fn test_replacement_cancels_before_new_request() {
        let timer = Rc::new(RecordingFrameTimer::default());
        let mut animator = ThreatMapAnimator::new(ThreatMapConfig::default(), timer.clone()).unwrap();
        animator.sync(&snapshot()).unwrap();
        timer.take_calls();

        // Event 1 moves, event 2 leaves, event 5 is new
        let next = vec![
            ThreatEvent::new(1, 40.3399, 127.5101, "DDoS"),
            ThreatEvent::new(5, 20.5937, 78.9629, "Bot"),
        ];
        let report = animator.sync(&next).unwrap();

        assert_eq!((report.replaced, report.removed, report.added), (1, 1, 1));
        assert_eq!(
            timer.take_calls(),
            vec![
                TimerCall::Cancel(FrameRequestId::new(2)),
                TimerCall::Cancel(FrameRequestId::new(1)),
                TimerCall::Request(FrameRequestId::new(3)),
                TimerCall::Request(FrameRequestId::new(4)),
            ]
        );
    }

    #[test]
    fn test_inline_dispatch_keeps_markers_moving() {
        let (mut animator, timer) = animator();
        animator.sync(&[ThreatEvent::new(1, 35.8617, 104.1954, "DDoS")]).unwrap();

        for _ in 0..10 {
            assert_eq!(animator.dispatch_frame(&timer.advance_frame()), 1);
        }
        assert_eq!(timer.pending_count(), 1);
        assert_eq!(animator.vector(1).unwrap().marker_state(), MarkerState::Running);
        assert_eq!(animator.stats().positions_emitted, 10);
    }

    #[test]
    fn test_metadata_change_keeps_marker() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();
        run_frame(&mut animator, &timer);
        let before = animator.vector(2).unwrap().marker_position();

        let refreshed = vec![
            ThreatEvent::new(1, 35.8617, 104.1954, "DDoS").with_country("China"),
            ThreatEvent::new(2, 61.524, 105.3188, "Bot")
                .with_country("Russia")
                .with_src_ip("192.168.1.42"),
        ];
        let report = animator.sync(&refreshed).unwrap();

        assert_eq!(report.unchanged, 2);
        assert!(!report.has_changes());
        let vector = animator.vector(2).unwrap();
        assert_eq!(vector.event().src_ip, "192.168.1.42");
        assert_eq!(vector.marker_position(), before);
        assert_eq!(timer.counters().1, 0);
    }

    #[test]
    fn test_unchanged_vector_keeps_cursor() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();
        for _ in 0..6 {
            run_frame(&mut animator, &timer);
        }
        let before = animator.vector(1).unwrap().marker_position();

        animator.sync(&snapshot()).unwrap();
        assert_eq!(animator.vector(1).unwrap().marker_position(), before);
    }

    #[test]
    fn test_moved_event_replaced() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();
        run_frame(&mut animator, &timer);

        let moved = vec![
            ThreatEvent::new(1, 40.3399, 127.5101, "DDoS"),
            ThreatEvent::new(2, 61.524, 105.3188, "DoS Hulk"),
        ];
        let report = animator.sync(&moved).unwrap();

        assert_eq!(report.replaced, 2);
        assert_eq!(animator.vector(1).unwrap().origin(), GeoPoint::new(40.3399, 127.5101));
        assert_eq!(animator.vector(2).unwrap().color(), AttackColor::Orange);
        assert_eq!(animator.vector(1).unwrap().marker_position(), animator.vector(1).unwrap().path().first().copied());
        assert_eq!(timer.pending_count(), 2);
    }

    #[test]
    fn test_malformed_event_does_not_block_others() {
        let (mut animator, _timer) = animator();
        let mut broken = ThreatEvent::new(9, 0.0, 0.0, "DDoS");
        broken.lat = None;

        let report = animator.sync(&[broken, ThreatEvent::new(10, 20.5937, 78.9629, "DDoS")]).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.added, 1);
        assert!(animator.vector(10).is_some());
    }

    #[test]
    fn test_visible_vectors_follow_snapshot_order() {
        let (mut animator, _timer) = animator();
        let events = vec![
            ThreatEvent::new(30, 1.0, 1.0, "DDoS"),
            ThreatEvent::new(10, 2.0, 2.0, "DDoS"),
            ThreatEvent::new(20, 3.0, 3.0, "DDoS"),
        ];
        animator.sync(&events).unwrap();

        let ids: Vec<ThreatId> = animator.visible_vectors().map(|v| v.event().id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_shutdown_cancels_everything() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();
        animator.register_frame_callback(Box::new(|_| {}));

        animator.shutdown();
        animator.shutdown();

        assert_eq!(animator.active_count(), 0);
        assert_eq!(animator.callback_count(), 0);
        assert_eq!(timer.pending_count(), 0);
        assert_eq!(run_frame(&mut animator, &timer), 0);
    }

    #[test]
    fn test_shutdown_cancels_while_host_holds_timer() {
        let (mut animator, timer) = animator();
        animator.sync(&snapshot()).unwrap();

        let host: &ManualFrameTimer = &timer;
        assert_eq!(host.pending_count(), 2);
        animator.shutdown();

        assert_eq!(host.pending_count(), 0);
        assert_eq!(host.counters(), (2, 2));
    }

    #[test]
    fn test_drop_releases_frame_requests() {
        let timer = ManualFrameTimer::shared();
        {
            let mut animator = ThreatMapAnimator::new(ThreatMapConfig::default(), timer.clone()).unwrap();
            animator.sync(&snapshot()).unwrap();
            assert_eq!(timer.pending_count(), 2);
        }
        assert_eq!(timer.pending_count(), 0);
    }

    #[test]
    fn test_unregister_unknown_callback() {
        let (mut animator, _timer) = animator();
        let handle = animator.register_frame_callback(Box::new(|_| {}));

        assert!(animator.unregister_callback(handle).is_ok());
        assert_eq!(
            animator.unregister_callback(handle),
            Err(MapError::UnknownCallback { handle: handle.id() })
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ThreatMapConfig {
            sample_count: 0,
            ..ThreatMapConfig::default()
        };
        assert!(ThreatMapAnimator::new(config, ManualFrameTimer::shared()).is_err());
    }
}
