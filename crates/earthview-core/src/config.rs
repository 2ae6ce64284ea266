use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::GlobeError;
use crate::table::LayerTable;

/// Where the in-page engine loads its own images and shaders from.
pub const DEFAULT_RESOURCE_BASE_URL: &str = "https://files.worldwind.arc.nasa.gov/artifactory/web/0.9.0/";

/// Host-level settings for one globe viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobeSettings {
    /// Id of the canvas element the engine draws into.
    pub surface_id: String,
    pub surface_width: u32,
    pub surface_height: u32,
    pub resource_base_url: String,
    /// Eye altitude in meters used for the first frame.
    pub initial_altitude: f64,
    /// Replaces the built-in layer table when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<LayerTable>,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            surface_id: "globe-canvas".to_string(),
            surface_width: 1400,
            surface_height: 900,
            resource_base_url: DEFAULT_RESOURCE_BASE_URL.to_string(),
            initial_altitude: 1e7,
            layers: None,
        }
    }
}

impl GlobeSettings {
    /// The layer table to initialize with.
    pub fn layer_table(&self) -> LayerTable {
        self.layers.clone().unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GlobeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GlobeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        info!("loaded globe settings from {}", path.display());
        Ok(settings)
    }
}
