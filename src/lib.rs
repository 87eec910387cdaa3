//! Threat Vector Map
//!
//! Attack-vector geometry and marker animation for a live threat map:
//! lifted Bézier arcs from each attack origin to the monitored network,
//! color tokens per attack type, and frame-driven traveling markers kept
//! in sync with polled threat snapshots.

pub mod core;
pub mod algorithms;
pub mod animation;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{GeoPoint, ThreatId, DEFAULT_SAMPLE_COUNT, MARKER_TICK_STEP};
pub use algorithms::{generate_curve, generate_default_curve, resolve_color, AttackColor, CurvePath};
pub use animation::{
    AnimatedMarkerController, FrameRequestId, FrameTimer, ManualFrameTimer, MarkerState,
    SharedFrameTimer,
};
pub use validation::{parse_snapshot, MapError, MapResult};
pub use utils::{ConfigurationManager, ThreatMapConfig};
pub use api::{
    MarkerFrame, SceneBuilder, SyncReport, ThreatEvent, ThreatMapAnimator, ThreatMapScene,
};
