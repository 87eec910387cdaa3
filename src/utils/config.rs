use crate::core::{
    GeoPoint, DEFAULT_HOME_LAT, DEFAULT_HOME_LON, DEFAULT_SAMPLE_COUNT, MARKER_TICK_STEP,
    NORMAL_TRAFFIC_LABEL,
};
use crate::validation::error::{MapError, MapResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Threat map configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatMapConfig {
    /// Monitored network location; every attack vector ends here
    pub home: GeoPoint,
    /// Short label for the monitored network in the vector list
    pub home_label: String,
    /// Curve segments per attack vector
    pub sample_count: usize,
    /// Marker cursor advance per frame (path points)
    pub tick_step: f64,
    /// Traffic types never drawn (case-insensitive)
    pub excluded_types: Vec<String>,
    /// Entries shown in the active vectors panel
    pub max_listed_vectors: usize,
    /// Initial map viewport
    pub map_view: MapViewConfig,
    /// Default log verbosity when RUST_LOG is unset
    pub log_level: LogLevel,
}

/// Map viewport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    /// Initial center
    pub center: GeoPoint,
    /// Initial zoom level
    pub zoom: u8,
    /// Minimum zoom level
    pub min_zoom: u8,
    /// South-west corner of the panning bounds
    pub south_west: GeoPoint,
    /// North-east corner of the panning bounds
    pub north_east: GeoPoint,
    /// Disable horizontal world wrapping of tiles
    pub no_wrap: bool,
}

/// Logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for ThreatMapConfig {
    fn default() -> Self {
        Self {
            home: GeoPoint::new(DEFAULT_HOME_LAT, DEFAULT_HOME_LON),
            home_label: "US".to_string(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            tick_step: MARKER_TICK_STEP,
            excluded_types: vec![NORMAL_TRAFFIC_LABEL.to_string()],
            max_listed_vectors: 3,
            map_view: MapViewConfig::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(20.0, 0.0),
            zoom: 2,
            min_zoom: 2,
            south_west: GeoPoint::new(-90.0, -180.0),
            north_east: GeoPoint::new(90.0, 180.0),
            no_wrap: true,
        }
    }
}

impl ThreatMapConfig {
    /// Whether events of this traffic type are left off the map
    pub fn is_excluded(&self, attack_type: &str) -> bool {
        let attack_type = attack_type.trim();
        self.excluded_types
            .iter()
            .any(|excluded| excluded.trim().eq_ignore_ascii_case(attack_type))
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<MapError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Loads, validates and persists the threat map configuration
pub struct ConfigurationManager {
    config: ThreatMapConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: ThreatMapConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &ThreatMapConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: ThreatMapConfig) -> MapResult<()> {
        let validation = Self::validate_config(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> MapResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| MapError::ConfigIo {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: ThreatMapConfig =
            serde_json::from_str(&content).map_err(|e| MapError::Serialization {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;

        let validation = Self::validate_config(&config);
        for warning in &validation.warnings {
            tracing::warn!(path = %path_str, "{}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        tracing::info!(path = %path_str, "threat map configuration loaded");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> MapResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&path, content).map_err(|e| MapError::ConfigIo {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> MapResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(MapError::ConfigIo {
                message: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update the monitored network location, returning the old one
    pub fn set_home(&mut self, home: GeoPoint) -> MapResult<GeoPoint> {
        if !home.is_finite() {
            return Err(MapError::invalid_config("home", home, "coordinates must be finite"));
        }
        let old_value = self.config.home;
        self.config.home = home;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Update the curve sample count, returning the old one
    pub fn set_sample_count(&mut self, sample_count: usize) -> MapResult<usize> {
        if sample_count == 0 {
            return Err(MapError::invalid_config(
                "sample_count",
                sample_count,
                "must be a positive integer",
            ));
        }
        let old_value = self.config.sample_count;
        self.config.sample_count = sample_count;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Update the marker tick step, returning the old one
    pub fn set_tick_step(&mut self, tick_step: f64) -> MapResult<f64> {
        if !tick_step.is_finite() || tick_step <= 0.0 {
            return Err(MapError::invalid_config(
                "tick_step",
                tick_step,
                "must be a positive finite number",
            ));
        }
        let old_value = self.config.tick_step;
        self.config.tick_step = tick_step;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Validate a configuration, collecting every problem found
    pub fn validate_config(config: &ThreatMapConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !config.home.is_finite() {
            errors.push(MapError::invalid_config("home", config.home, "coordinates must be finite"));
        } else if config.home.lat.abs() > 90.0 || config.home.lon.abs() > 180.0 {
            warnings.push(format!("home {} lies outside the map bounds", config.home));
        }

        if config.home_label.trim().is_empty() {
            errors.push(MapError::invalid_config("home_label", "", "must not be empty"));
        }

        if config.sample_count == 0 {
            errors.push(MapError::invalid_config(
                "sample_count",
                config.sample_count,
                "must be a positive integer",
            ));
        } else if config.sample_count > 2000 {
            warnings.push("very high sample count inflates every rendered polyline".to_string());
        }

        if !config.tick_step.is_finite() || config.tick_step <= 0.0 {
            errors.push(MapError::invalid_config(
                "tick_step",
                config.tick_step,
                "must be a positive finite number",
            ));
        }

        let view = &config.map_view;
        if view.min_zoom > view.zoom {
            errors.push(MapError::invalid_config(
                "map_view.zoom",
                view.zoom,
                "must not be below map_view.min_zoom",
            ));
        }
        if !(view.south_west.lat < view.north_east.lat && view.south_west.lon < view.north_east.lon) {
            errors.push(MapError::invalid_config(
                "map_view.bounds",
                format!("{} .. {}", view.south_west, view.north_east),
                "south-west corner must lie below and left of north-east corner",
            ));
        }

        if config.max_listed_vectors == 0 {
            warnings.push("active vectors panel will always be empty".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
