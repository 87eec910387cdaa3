//! Scene description handed to the map rendering surface
//!
//! The renderer draws exactly what is listed here: the viewport, and per
//! attack vector a faint base trail, a dashed overlay, source and
//! destination markers, and the traveling marker (a translucent halo under
//! a white-rimmed core).

use crate::api::animator::{AttackVector, ThreatMapAnimator};
use crate::core::{GeoPoint, ThreatId, EMPTY_PANEL_MESSAGE};
use crate::utils::config::MapViewConfig;
use crate::validation::error::MapResult;
use serde::Serialize;

/// Complete frame description for the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatMapScene {
    pub view: MapView,
    pub vectors: Vec<VectorScene>,
    pub active_vectors: Vec<ActiveVectorEntry>,
    /// Panel text shown in place of an empty vector list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_placeholder: Option<&'static str>,
}

/// Viewport and panning limits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_bounds: [GeoPoint; 2],
    pub no_wrap: bool,
}

/// Everything drawn for one attack vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorScene {
    pub event_id: ThreatId,
    pub attack_type: String,
    pub color: &'static str,
    pub source: GeoPoint,
    pub destination: GeoPoint,
    pub curve: Vec<GeoPoint>,
    pub trail: LineStyle,
    pub dash: LineStyle,
    pub source_marker: CircleStyle,
    pub destination_marker: CircleStyle,
    /// Absent while the marker has no position to show
    pub traveling_marker: Option<TravelingMarker>,
}

/// Polyline stroke
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
}

/// Circle marker stroke and fill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleStyle {
    pub radius: f32,
    pub stroke_color: &'static str,
    pub stroke_weight: f32,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
}

/// Animated marker at its current position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelingMarker {
    pub position: GeoPoint,
    pub halo: CircleStyle,
    pub core: CircleStyle,
}

/// Row of the active vectors panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveVectorEntry {
    pub attack_type: String,
    pub route: String,
}

const CORE_STROKE: &str = "#ffffff";

impl MapView {
    pub fn from_config(view: &MapViewConfig) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            min_zoom: view.min_zoom,
            max_bounds: [view.south_west, view.north_east],
            no_wrap: view.no_wrap,
        }
    }
}

/// Builds [`ThreatMapScene`]s from animator state
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    pretty: bool,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indent JSON output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Describe the current state of every visible vector
    pub fn build(&self, animator: &ThreatMapAnimator) -> ThreatMapScene {
        let config = animator.config();

        let vectors = animator.visible_vectors().map(Self::vector_scene).collect();

        let active_vectors = animator
            .visible_vectors()
            .take(config.max_listed_vectors)
            .map(|vector| ActiveVectorEntry {
                attack_type: vector.event().attack_type.clone(),
                route: format!("{} -> {}", vector.event().country, config.home_label),
            })
            .collect::<Vec<_>>();
        let panel_placeholder = active_vectors.is_empty().then_some(EMPTY_PANEL_MESSAGE);

        ThreatMapScene {
            view: MapView::from_config(&config.map_view),
            vectors,
            active_vectors,
            panel_placeholder,
        }
    }

    fn vector_scene(vector: &AttackVector) -> VectorScene {
        let color = vector.color().hex();

        let endpoint = CircleStyle {
            radius: 6.0,
            stroke_color: color,
            stroke_weight: 3.0,
            fill_color: color,
            fill_opacity: 0.4,
        };

        VectorScene {
            event_id: vector.event().id,
            attack_type: vector.event().attack_type.clone(),
            color,
            source: vector.origin(),
            destination: vector.destination(),
            curve: vector.path().points().to_vec(),
            trail: LineStyle {
                color,
                weight: 2.0,
                opacity: 0.3,
                dash_array: None,
            },
            dash: LineStyle {
                color,
                weight: 3.0,
                opacity: 1.0,
                dash_array: Some("10, 15"),
            },
            source_marker: endpoint.clone(),
            destination_marker: endpoint,
            traveling_marker: vector.marker_position().map(|position| TravelingMarker {
                position,
                halo: CircleStyle {
                    radius: 10.0,
                    stroke_color: color,
                    stroke_weight: 0.0,
                    fill_color: color,
                    fill_opacity: 0.2,
                },
                core: CircleStyle {
                    radius: 4.0,
                    stroke_color: CORE_STROKE,
                    stroke_weight: 1.0,
                    fill_color: color,
                    fill_opacity: 1.0,
                },
            }),
        }
    }

    /// Serialize a scene to JSON
    pub fn to_json(&self, scene: &ThreatMapScene) -> MapResult<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(scene)?
        } else {
            serde_json::to_string(scene)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualFrameTimer;
    use crate::api::types::ThreatEvent;
    use crate::utils::config::ThreatMapConfig;

    fn populated_animator() -> ThreatMapAnimator {
        let config = ThreatMapConfig {
            sample_count: 8,
            ..ThreatMapConfig::default()
        };
        let mut animator = ThreatMapAnimator::new(config, ManualFrameTimer::shared()).unwrap();
        animator
            .sync(&[
                ThreatEvent::new(1, 35.8617, 104.1954, "DDoS").with_country("China"),
                ThreatEvent::new(2, 61.524, 105.3188, "DoS Hulk").with_country("Russia"),
                ThreatEvent::new(3, 40.3399, 127.5101, "Bot").with_country("North Korea"),
                ThreatEvent::new(4, -14.235, -51.9253, "SSH Brute Force").with_country("Brazil"),
            ])
            .unwrap();
        animator
    }

    #[test]
    fn test_scene_lists_every_vector() {
        let animator = populated_animator();
        let scene = SceneBuilder::new().build(&animator);

        assert_eq!(scene.vectors.len(), 4);
        let first = &scene.vectors[0];
        assert_eq!(first.color, "#ef4444");
        assert_eq!(first.curve.len(), 9);
        assert_eq!(first.source, GeoPoint::new(35.8617, 104.1954));
        assert_eq!(first.destination, GeoPoint::new(37.0902, -95.7129));
        assert_eq!(first.dash.dash_array, Some("10, 15"));
        assert_eq!(scene.vectors[3].color, "#06b6d4");
    }

    #[test]
    fn test_traveling_marker_styles() {
        let animator = populated_animator();
        let scene = SceneBuilder::new().build(&animator);

        let marker = scene.vectors[1].traveling_marker.as_ref().unwrap();
        assert_eq!(marker.position, GeoPoint::new(61.524, 105.3188));
        assert_eq!(marker.halo.radius, 10.0);
        assert_eq!(marker.halo.fill_opacity, 0.2);
        assert_eq!(marker.core.stroke_color, "#ffffff");
        assert_eq!(marker.core.fill_color, "#f97316");
    }

    #[test]
    fn test_active_vectors_panel_truncated() {
        let animator = populated_animator();
        let scene = SceneBuilder::new().build(&animator);

        assert_eq!(scene.active_vectors.len(), 3);
        assert_eq!(scene.active_vectors[0].route, "China -> US");
        assert_eq!(scene.active_vectors[2].attack_type, "Bot");
        assert_eq!(scene.panel_placeholder, None);
    }

    #[test]
    fn test_empty_map_shows_placeholder() {
        let mut animator = populated_animator();
        animator.sync(&[ThreatEvent::new(9, 0.0, 0.0, "Normal Traffic")]).unwrap();
        let builder = SceneBuilder::new();
        let scene = builder.build(&animator);

        assert!(scene.vectors.is_empty());
        assert!(scene.active_vectors.is_empty());
        assert_eq!(scene.panel_placeholder, Some("No active threats visualized."));

        let value: serde_json::Value = serde_json::from_str(&builder.to_json(&scene).unwrap()).unwrap();
        assert_eq!(value["panel_placeholder"], "No active threats visualized.");
    }

    #[test]
    fn test_view_from_config() {
        let animator = populated_animator();
        let scene = SceneBuilder::new().build(&animator);

        assert_eq!(scene.view.center, GeoPoint::new(20.0, 0.0));
        assert_eq!(scene.view.zoom, 2);
        assert_eq!(scene.view.max_bounds[0], GeoPoint::new(-90.0, -180.0));
    }

    #[test]
    fn test_json_output() {
        let animator = populated_animator();
        let builder = SceneBuilder::new();
        let json = builder.to_json(&builder.build(&animator)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["vectors"][0]["color"], "#ef4444");
        assert_eq!(value["vectors"][0]["dash"]["dash_array"], "10, 15");
        assert!(value["vectors"][0]["trail"].get("dash_array").is_none());
        assert_eq!(value["active_vectors"][1]["route"], "Russia -> US");
        assert!(value.get("panel_placeholder").is_none());
    }
}
