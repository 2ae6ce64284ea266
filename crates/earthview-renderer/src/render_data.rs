use serde::{Deserialize, Serialize};

use earthview_core::{Category, LayerId, LayerKind};

use crate::viewport::Viewport;

/// What the engine needs to know about one layer to draw it this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLayer {
    pub unique_id: LayerId,
    pub kind: LayerKind,
    pub category: Category,
    pub opacity: f64,
    pub pick_enabled: bool,
}

/// Complete frame description sent from Rust to the in-page globe engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub sequence: u64,
    pub surface_id: String,
    pub width: u32,
    pub height: u32,
    /// Eye altitude in meters the layer list was filtered for.
    pub altitude: f64,
    /// Active layers in draw order (bottom first).
    pub layers: Vec<RenderLayer>,
}

impl RenderFrame {
    pub fn new(viewport: &Viewport, altitude: f64) -> Self {
        Self {
            sequence: viewport.frame_count(),
            surface_id: viewport.surface_id.clone(),
            width: viewport.width,
            height: viewport.height,
            altitude,
            layers: viewport
                .active_layers(altitude)
                .map(|l| RenderLayer {
                    unique_id: l.unique_id,
                    kind: l.kind.clone(),
                    category: l.category,
                    opacity: l.opacity,
                    pick_enabled: l.pick_enabled,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthview_core::{LayerHost, LayerOptions, NewLayer};

    #[test]
    fn test_frame_filters_by_altitude() {
        let mut viewport = Viewport::new("globe-canvas", 800, 600);
        let mut image = NewLayer::new(LayerKind::BmngOneImage);
        image.apply(&LayerOptions::new().category(Category::Background));
        viewport.push_layer(image.register(1));
        let mut roads = NewLayer::new(LayerKind::BingRoads);
        roads.apply(&LayerOptions::new().opacity(0.8));
        viewport.push_layer(roads.register(2));

        // Below 3000 km only the roads overlay is active.
        let low = RenderFrame::new(&viewport, 1e5);
        assert_eq!(low.layers.len(), 1);
        assert_eq!(low.layers[0].unique_id, 2);
        assert_eq!(low.layers[0].opacity, 0.8);

        let high = RenderFrame::new(&viewport, 1e7);
        let ids: Vec<_> = high.layers.iter().map(|l| l.unique_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_frame_json() {
        let viewport = Viewport::new("globe-canvas", 800, 600);
        let json = RenderFrame::new(&viewport, 1e7).to_json().unwrap();
        assert!(json.contains("\"surfaceId\":\"globe-canvas\""));
        assert!(json.contains("\"layers\":[]"));
    }
}
