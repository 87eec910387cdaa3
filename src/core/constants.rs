//! Visual constants for attack-vector rendering

/// Default number of curve segments per attack vector
pub const DEFAULT_SAMPLE_COUNT: usize = 80;

/// Control-point lift as a fraction of the planar endpoint distance
pub const CURVE_LIFT_FACTOR: f64 = 0.3;

/// Cursor advance per animation frame (path-index units)
pub const MARKER_TICK_STEP: f64 = 0.5;

/// Monitored network location (latitude, longitude in degrees)
pub const DEFAULT_HOME_LAT: f64 = 37.0902;
pub const DEFAULT_HOME_LON: f64 = -95.7129;

/// Traffic label the backend uses for benign packets
pub const NORMAL_TRAFFIC_LABEL: &str = "Normal Traffic";

/// Active vectors panel text when nothing is on the map
pub const EMPTY_PANEL_MESSAGE: &str = "No active threats visualized.";
