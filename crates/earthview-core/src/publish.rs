//! Category-scoped update notifications for the host UI.
//!
//! Every mutation of the layer set is turned into one [`LayerUpdate`] carrying
//! the complete current list of the affected category. The serialized form is
//! `{"baseLayers": {"layers": [...], "lastUpdated": <ms since epoch>}}` (or
//! `overlayLayers` / `settingLayers`), exactly one key per event.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Serializer};

use crate::layer::{Category, Layer};

/// The current layers of one category plus the time the list was generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    pub layers: Vec<Layer>,
    #[serde(serialize_with = "serialize_epoch_millis")]
    pub last_updated: SystemTime,
}

/// A notification delivered to the host after a layer-set mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerUpdate {
    BaseLayers(LayerSnapshot),
    OverlayLayers(LayerSnapshot),
    SettingLayers(LayerSnapshot),
}

impl LayerUpdate {
    /// Package `layers` for `category`. Background layers have no UI group and
    /// produce no update.
    pub fn for_category(category: Category, layers: Vec<Layer>, last_updated: SystemTime) -> Option<Self> {
        let snapshot = LayerSnapshot { layers, last_updated };
        match category {
            Category::Base => Some(LayerUpdate::BaseLayers(snapshot)),
            Category::Overlay => Some(LayerUpdate::OverlayLayers(snapshot)),
            Category::Setting => Some(LayerUpdate::SettingLayers(snapshot)),
            Category::Background => None,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            LayerUpdate::BaseLayers(_) => Category::Base,
            LayerUpdate::OverlayLayers(_) => Category::Overlay,
            LayerUpdate::SettingLayers(_) => Category::Setting,
        }
    }

    pub fn snapshot(&self) -> &LayerSnapshot {
        match self {
            LayerUpdate::BaseLayers(s) | LayerUpdate::OverlayLayers(s) | LayerUpdate::SettingLayers(s) => s,
        }
    }
}

/// Receives layer updates synchronously, in the same call as the mutation.
pub trait UpdateSink: Send {
    fn on_update(&mut self, update: LayerUpdate);
}

impl<F> UpdateSink for F
where
    F: FnMut(LayerUpdate) + Send,
{
    fn on_update(&mut self, update: LayerUpdate) {
        self(update)
    }
}

fn serialize_epoch_millis<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    // Clocks set before 1970 report 0 rather than failing the whole event.
    let millis = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    serializer.serialize_u64(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerKind, LayerOptions, NewLayer};
    use std::time::Duration;

    #[test]
    fn test_background_is_not_published() {
        assert!(LayerUpdate::for_category(Category::Background, Vec::new(), SystemTime::now()).is_none());
    }

    #[test]
    fn test_update_wire_shape() {
        let mut new_layer = NewLayer::new(LayerKind::Bmng);
        new_layer.apply(&LayerOptions::new().category(Category::Base));
        let layer = new_layer.register(2);
        let at = UNIX_EPOCH + Duration::from_millis(1_500);
        let update = LayerUpdate::for_category(Category::Base, vec![layer], at).unwrap();
        let json = serde_json::to_value(&update).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let base = &object["baseLayers"];
        assert_eq!(base["lastUpdated"], 1_500);
        assert_eq!(base["layers"][0]["uniqueId"], 2);
        assert_eq!(base["layers"][0]["category"], "base");
    }

    #[test]
    fn test_closure_sink() {
        let mut received = Vec::new();
        {
            let mut sink = |u: LayerUpdate| received.push(u.category());
            for category in Category::ALL {
                if let Some(update) = LayerUpdate::for_category(category, Vec::new(), SystemTime::now()) {
                    sink.on_update(update);
                }
            }
        }
        assert_eq!(received, vec![Category::Base, Category::Overlay, Category::Setting]);
    }
}
