use crate::api::types::ThreatEvent;
use crate::core::{GeoPoint, ThreatId};
use crate::utils::config::ThreatMapConfig;
use crate::validation::error::MapResult;
use std::collections::HashSet;
use thiserror::Error;

/// Why a threat event was left off the map
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectionReason {
    #[error("latitude or longitude missing")]
    MissingCoordinates,
    #[error("non-finite coordinates ({lat}, {lon})")]
    NonFiniteCoordinates { lat: f64, lon: f64 },
    #[error("duplicate event id")]
    DuplicateId,
}

/// Event accepted for drawing, with its resolved origin
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleThreat {
    pub event: ThreatEvent,
    pub origin: GeoPoint,
}

/// Outcome of validating one snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotValidation {
    /// Events to draw, in snapshot order
    pub visible: Vec<VisibleThreat>,
    /// Events skipped because their data is unusable
    pub rejected: Vec<(ThreatId, RejectionReason)>,
    /// Events filtered out by traffic type (benign traffic)
    pub excluded: usize,
}

/// Splits a polled snapshot into drawable threats and skipped events
pub struct SnapshotValidator<'a> {
    config: &'a ThreatMapConfig,
}

impl<'a> SnapshotValidator<'a> {
    pub fn new(config: &'a ThreatMapConfig) -> Self {
        Self { config }
    }

    /// Validate a batch of events.
    ///
    /// Unusable events are reported, never fatal: the rest of the snapshot
    /// still renders. The first occurrence of a repeated id wins.
    pub fn validate(&self, events: &[ThreatEvent]) -> SnapshotValidation {
        let mut result = SnapshotValidation::default();
        let mut seen_ids = HashSet::new();

        for event in events {
            if self.config.is_excluded(&event.attack_type) {
                result.excluded += 1;
                continue;
            }

            match Self::validate_single_event(event) {
                Ok(origin) => {
                    if !seen_ids.insert(event.id) {
                        result.rejected.push((event.id, RejectionReason::DuplicateId));
                        continue;
                    }
                    result.visible.push(VisibleThreat {
                        event: event.clone(),
                        origin,
                    });
                }
                Err(reason) => {
                    tracing::debug!(event_id = event.id, %reason, "threat event skipped");
                    result.rejected.push((event.id, reason));
                }
            }
        }

        result
    }

    fn validate_single_event(event: &ThreatEvent) -> Result<GeoPoint, RejectionReason> {
        let (lat, lon) = match (event.lat, event.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(RejectionReason::MissingCoordinates),
        };

        let origin = GeoPoint::new(lat, lon);
        if !origin.is_finite() {
            return Err(RejectionReason::NonFiniteCoordinates { lat, lon });
        }
        Ok(origin)
    }
}

/// Parse a live-traffic JSON array leniently.
///
/// The payload must be a JSON array; entries that do not decode as a
/// [`ThreatEvent`] are dropped with a warning instead of failing the batch.
pub fn parse_snapshot(json: &str) -> MapResult<Vec<ThreatEvent>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut events = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ThreatEvent>(entry) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(index, error = %e, "malformed snapshot entry dropped"),
        }
    }

    Ok(events)
}
