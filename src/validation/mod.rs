//! Error types and snapshot validation

pub mod data;
pub mod error;

pub use data::{parse_snapshot, RejectionReason, SnapshotValidation, SnapshotValidator, VisibleThreat};
pub use error::{ErrorSeverity, MapError, MapResult};
