use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// A unique layer identifier, assigned by the registry at add time.
pub type LayerId = u32;

/// Altitude used as the "no upper bound" value for active altitude ranges.
pub const UNBOUNDED_ALTITUDE: f64 = f64::MAX;

/// Coarse grouping of a layer's role, used for mutual exclusion and UI grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Background,
    Base,
    #[default]
    Overlay,
    Setting,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Background,
        Category::Base,
        Category::Overlay,
        Category::Setting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Background => "background",
            Category::Base => "base",
            Category::Overlay => "overlay",
            Category::Setting => "setting",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GlobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GlobeError::UnknownCategory(s.to_string()))
    }
}

/// The engine layer a [`Layer`] stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// Single-image Blue Marble, used as the always-present background.
    BmngOneImage,
    /// Blue Marble Next Generation imagery.
    Bmng,
    /// Blue Marble with Landsat imagery.
    BmngLandsat,
    BingAerial,
    BingAerialWithLabels,
    BingRoads,
    ShowTessellation,
    Compass,
    /// Cursor coordinates readout; binds to the drawing surface.
    CoordinatesDisplay,
    /// Pan/zoom/tilt controls; binds to the drawing surface.
    ViewControls,
    StarField,
    Atmosphere,
    FrameStatistics,
    /// A host-defined layer the engine draws from its own configuration.
    Custom { name: String },
}

impl LayerKind {
    /// Name shown in layer pickers unless the host overrides it.
    pub fn display_name(&self) -> &str {
        match self {
            LayerKind::BmngOneImage => "Blue Marble Image",
            LayerKind::Bmng => "Blue Marble",
            LayerKind::BmngLandsat => "Blue Marble & Landsat",
            LayerKind::BingAerial => "Bing Aerial",
            LayerKind::BingAerialWithLabels => "Bing Aerial with Labels",
            LayerKind::BingRoads => "Bing Roads",
            LayerKind::ShowTessellation => "Show Tessellation",
            LayerKind::Compass => "Compass",
            LayerKind::CoordinatesDisplay => "Coordinates",
            LayerKind::ViewControls => "View Controls",
            LayerKind::StarField => "StarField",
            LayerKind::Atmosphere => "Atmosphere",
            LayerKind::FrameStatistics => "Frame Statistics",
            LayerKind::Custom { name } => name,
        }
    }

    /// Whether the engine constructor for this kind needs the drawing surface.
    pub fn needs_surface(&self) -> bool {
        matches!(self, LayerKind::CoordinatesDisplay | LayerKind::ViewControls)
    }

    /// Minimum eye altitude (meters) the engine's constructor sets for this kind.
    pub fn default_min_active_altitude(&self) -> f64 {
        match self {
            // The one-image background hides itself below 3000 km by default.
            LayerKind::BmngOneImage => 3e6,
            _ => 0.0,
        }
    }

    /// Screen decorations and sky effects are not pickable.
    pub fn default_pick_enabled(&self) -> bool {
        !matches!(
            self,
            LayerKind::ShowTessellation
                | LayerKind::Compass
                | LayerKind::CoordinatesDisplay
                | LayerKind::ViewControls
                | LayerKind::StarField
                | LayerKind::Atmosphere
                | LayerKind::FrameStatistics
        )
    }
}

/// Overrides applied to a layer when it is added or reconfigured.
///
/// Only the enumerated fields are recognized; unknown keys are rejected when
/// options are read from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_active_altitude: Option<f64>,
}

impl LayerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn min_active_altitude(mut self, altitude: f64) -> Self {
        self.min_active_altitude = Some(altitude);
        self
    }
}

/// A freshly constructed engine layer that has not been registered yet.
///
/// Carries the engine defaults for its kind; `category` stays unset until
/// options or the registry decide it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLayer {
    pub kind: LayerKind,
    pub display_name: String,
    pub category: Option<Category>,
    pub enabled: bool,
    pub opacity: f64,
    pub min_active_altitude: f64,
    pub max_active_altitude: f64,
    pub pick_enabled: bool,
    pub surface: Option<String>,
}

impl NewLayer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            display_name: kind.display_name().to_string(),
            category: None,
            enabled: true,
            opacity: 1.0,
            min_active_altitude: kind.default_min_active_altitude(),
            max_active_altitude: UNBOUNDED_ALTITUDE,
            pick_enabled: kind.default_pick_enabled(),
            surface: None,
            kind,
        }
    }

    /// Bind the layer to a drawing surface (for controls that read input from it).
    pub fn with_surface(mut self, surface_id: &str) -> Self {
        self.surface = Some(surface_id.to_string());
        self
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = name.to_string();
        self
    }

    /// Overwrite every field present in `options`.
    pub fn apply(&mut self, options: &LayerOptions) {
        if let Some(category) = options.category {
            self.category = Some(category);
        }
        if let Some(enabled) = options.enabled {
            self.enabled = enabled;
        }
        if let Some(opacity) = options.opacity {
            self.opacity = opacity;
        }
        if let Some(altitude) = options.min_active_altitude {
            self.min_active_altitude = altitude;
        }
    }

    /// Finish construction with an identity; an unset category becomes `Overlay`.
    pub fn register(self, unique_id: LayerId) -> Layer {
        Layer {
            unique_id,
            kind: self.kind,
            display_name: self.display_name,
            category: self.category.unwrap_or_default(),
            enabled: self.enabled,
            opacity: self.opacity,
            min_active_altitude: self.min_active_altitude,
            max_active_altitude: self.max_active_altitude,
            pick_enabled: self.pick_enabled,
            surface: self.surface,
        }
    }
}

/// A registered layer as it sits in the viewport's layer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub unique_id: LayerId,
    pub kind: LayerKind,
    pub display_name: String,
    pub category: Category,
    pub enabled: bool,
    pub opacity: f64,
    pub min_active_altitude: f64,
    pub max_active_altitude: f64,
    pub pick_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
}

impl Layer {
    /// Overwrite the configurable fields; the identity never changes.
    pub fn apply(&mut self, options: &LayerOptions) {
        if let Some(category) = options.category {
            self.category = category;
        }
        if let Some(enabled) = options.enabled {
            self.enabled = enabled;
        }
        if let Some(opacity) = options.opacity {
            self.opacity = opacity;
        }
        if let Some(altitude) = options.min_active_altitude {
            self.min_active_altitude = altitude;
        }
    }

    /// Whether the engine would draw this layer at the given eye altitude.
    pub fn is_active_at(&self, altitude: f64) -> bool {
        self.enabled && altitude >= self.min_active_altitude && altitude <= self.max_active_altitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("base".parse::<Category>().unwrap(), Category::Base);
        assert_eq!("setting".parse::<Category>().unwrap(), Category::Setting);
        assert!(matches!(
            "terrain".parse::<Category>(),
            Err(GlobeError::UnknownCategory(ref s)) if s == "terrain"
        ));
    }

    #[test]
    fn test_unset_category_defaults_to_overlay() {
        let layer = NewLayer::new(LayerKind::Custom { name: "Flights".into() }).register(7);
        assert_eq!(layer.category, Category::Overlay);
        assert_eq!(layer.unique_id, 7);
        assert_eq!(layer.display_name, "Flights");
    }

    #[test]
    fn test_options_overwrite_defaults() {
        let mut layer = NewLayer::new(LayerKind::BmngOneImage);
        assert_eq!(layer.min_active_altitude, 3e6);
        layer.apply(&LayerOptions::new().category(Category::Background).min_active_altitude(0.0));
        assert_eq!(layer.min_active_altitude, 0.0);
        assert_eq!(layer.category, Some(Category::Background));
        // Absent fields keep the constructor defaults.
        assert!(layer.enabled);
        assert_eq!(layer.opacity, 1.0);
    }

    #[test]
    fn test_options_reject_unknown_fields() {
        let ok: LayerOptions =
            serde_json::from_str(r#"{"category":"overlay","opacity":0.8}"#).unwrap();
        assert_eq!(ok.category, Some(Category::Overlay));
        assert_eq!(ok.opacity, Some(0.8));
        assert!(serde_json::from_str::<LayerOptions>(r#"{"uniqueId":3}"#).is_err());
    }

    #[test]
    fn test_active_altitude_range() {
        let mut layer = NewLayer::new(LayerKind::BmngOneImage).register(1);
        assert!(!layer.is_active_at(1e5));
        assert!(layer.is_active_at(1e7));
        layer.enabled = false;
        assert!(!layer.is_active_at(1e7));
    }
}
