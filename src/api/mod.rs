//! Rendering-facing API: snapshot sync, frame dispatch and scene output

pub mod animator;
pub mod formatting;
pub mod types;

pub use animator::{AttackVector, FrameCallback, ThreatMapAnimator};
pub use formatting::{ActiveVectorEntry, MapView, SceneBuilder, ThreatMapScene, VectorScene};
pub use types::{AnimatorStats, CallbackHandle, MarkerFrame, SyncReport, ThreatEvent};
