use serde::{Deserialize, Serialize};

use crate::error::GlobeError;
use crate::layer::{Category, LayerKind, LayerOptions, NewLayer};

/// One row of the initial layer table: which engine layer to build and how
/// to configure it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayerConfig {
    pub kind: LayerKind,
    #[serde(default)]
    pub options: LayerOptions,
}

impl LayerConfig {
    pub fn new(kind: LayerKind, options: LayerOptions) -> Self {
        Self { kind, options }
    }

    /// Construct the engine layer, binding surface-dependent kinds to `surface_id`.
    pub fn instantiate(&self, surface_id: &str) -> NewLayer {
        let layer = NewLayer::new(self.kind.clone());
        if self.kind.needs_surface() {
            layer.with_surface(surface_id)
        } else {
            layer
        }
    }
}

/// The ordered set of layers a viewport starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerTable {
    entries: Vec<LayerConfig>,
}

impl LayerTable {
    pub fn new(entries: Vec<LayerConfig>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LayerConfig] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GlobeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for LayerTable {
    /// Background, three base imagery choices, one overlay, then UI settings.
    fn default() -> Self {
        use Category::*;
        let row = |kind, category, enabled| {
            LayerConfig::new(kind, LayerOptions::new().category(category).enabled(enabled))
        };
        Self::new(vec![
            LayerConfig::new(
                LayerKind::BmngOneImage,
                LayerOptions::new()
                    .category(Background)
                    .enabled(true)
                    .min_active_altitude(0.0),
            ),
            row(LayerKind::Bmng, Base, true),
            row(LayerKind::BmngLandsat, Base, false),
            row(LayerKind::BingAerial, Base, false),
            LayerConfig::new(
                LayerKind::BingRoads,
                LayerOptions::new().category(Overlay).enabled(false).opacity(0.8),
            ),
            row(LayerKind::ShowTessellation, Setting, false),
            row(LayerKind::Compass, Setting, false),
            row(LayerKind::CoordinatesDisplay, Setting, true),
            row(LayerKind::ViewControls, Setting, true),
            row(LayerKind::StarField, Setting, false),
            row(LayerKind::Atmosphere, Setting, false),
            row(LayerKind::FrameStatistics, Setting, false),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(table: &LayerTable, category: Category) -> usize {
        table
            .entries()
            .iter()
            .filter(|e| e.options.category == Some(category))
            .count()
    }

    #[test]
    fn test_default_table_shape() {
        let table = LayerTable::default();
        assert_eq!(table.len(), 12);
        assert_eq!(count(&table, Category::Background), 1);
        assert_eq!(count(&table, Category::Base), 3);
        assert_eq!(count(&table, Category::Overlay), 1);
        assert_eq!(count(&table, Category::Setting), 7);
    }

    #[test]
    fn test_surface_binding() {
        let table = LayerTable::default();
        let bound: Vec<_> = table
            .entries()
            .iter()
            .map(|e| e.instantiate("globe-canvas"))
            .filter(|l| l.surface.is_some())
            .map(|l| l.kind)
            .collect();
        assert_eq!(bound, vec![LayerKind::CoordinatesDisplay, LayerKind::ViewControls]);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"[
            {"kind": "bmng", "options": {"category": "base", "enabled": true}},
            {"kind": {"custom": {"name": "Weather"}}},
            {"kind": "compass", "options": {"category": "setting"}}
        ]"#;
        let table = LayerTable::from_json(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.entries()[1].options, LayerOptions::default());
        assert_eq!(table.entries()[1].kind, LayerKind::Custom { name: "Weather".into() });
    }

    #[test]
    fn test_table_rejects_unknown_option() {
        let json = r#"[{"kind": "bmng", "options": {"zIndex": 4}}]"#;
        assert!(matches!(LayerTable::from_json(json), Err(GlobeError::Config(_))));
    }
}
