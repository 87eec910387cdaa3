//! Common API types and data structures

use crate::algorithms::AttackColor;
use crate::core::{GeoPoint, ThreatId};
use serde::{Deserialize, Serialize};

/// Threat event as polled from the live-traffic endpoint.
///
/// Only the fields the map needs are decoded; anything else in the packet
/// is ignored. Coordinates are optional so that one bad packet can be
/// skipped without rejecting the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatEvent {
    pub id: ThreatId,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(rename = "type", default)]
    pub attack_type: String,
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub country: String,
}

impl ThreatEvent {
    pub fn new(id: ThreatId, lat: f64, lon: f64, attack_type: &str) -> Self {
        Self {
            id,
            lat: Some(lat),
            lon: Some(lon),
            attack_type: attack_type.to_string(),
            src_ip: String::new(),
            country: String::new(),
        }
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_src_ip(mut self, src_ip: &str) -> Self {
        self.src_ip = src_ip.to_string();
        self
    }
}

/// One marker position emitted on a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerFrame {
    pub event_id: ThreatId,
    pub position: GeoPoint,
    pub color: AttackColor,
}

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub(crate) fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Changes applied by one snapshot sync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Vectors created for newly visible events
    pub added: usize,
    /// Vectors stopped because their event left the visible set
    pub removed: usize,
    /// Vectors rebuilt because origin or attack type changed
    pub replaced: usize,
    /// Vectors left running untouched
    pub unchanged: usize,
    /// Events skipped for unusable data
    pub skipped: usize,
    /// Events filtered out by traffic type
    pub excluded: usize,
}

impl SyncReport {
    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.replaced > 0
    }
}

/// Running totals kept by the animator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnimatorStats {
    /// Snapshots synced
    pub syncs: u64,
    /// Frame batches dispatched
    pub frames_dispatched: u64,
    /// Marker positions emitted
    pub positions_emitted: u64,
    pub vectors_added: u64,
    pub vectors_removed: u64,
    pub events_skipped: u64,
    /// Vectors currently on the map
    pub active_vectors: usize,
}
