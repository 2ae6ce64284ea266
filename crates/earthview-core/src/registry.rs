use std::time::SystemTime;

use log::{debug, info, warn};

use crate::error::GlobeError;
use crate::layer::{Category, Layer, LayerId, LayerOptions, NewLayer};
use crate::publish::{LayerUpdate, UpdateSink};
use crate::table::LayerTable;

/// The engine-side drawing surface that owns the ordered layer list.
pub trait LayerHost {
    /// Id of the drawing surface; surface-bound layers reference it.
    fn surface_id(&self) -> &str;
    /// All layers in draw order.
    fn layers(&self) -> &[Layer];
    fn layers_mut(&mut self) -> &mut [Layer];
    /// Append a layer on top of the current list.
    fn push_layer(&mut self, layer: Layer);
    /// Ask the engine to draw a new frame as soon as possible.
    fn request_redraw(&mut self);
}

type MapCreatedHook<H> = Box<dyn FnOnce(&H) + Send>;

/// Layer bookkeeping for one globe viewport.
///
/// Assigns identities, groups layers by category, keeps at most one base
/// layer enabled, and reports every change to the host's [`UpdateSink`].
pub struct LayerRegistry<H: LayerHost> {
    host: Option<H>,
    next_id: LayerId,
    sink: Option<Box<dyn UpdateSink>>,
    on_map_created: Option<MapCreatedHook<H>>,
}

impl<H: LayerHost> LayerRegistry<H> {
    pub fn new() -> Self {
        Self {
            host: None,
            next_id: 1,
            sink: None,
            on_map_created: None,
        }
    }

    /// Deliver layer updates to `sink`.
    pub fn with_sink(mut self, sink: impl UpdateSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Run `hook` once with the live viewport right after initialization.
    pub fn on_map_created(mut self, hook: impl FnOnce(&H) + Send + 'static) -> Self {
        self.on_map_created = Some(Box::new(hook));
        self
    }

    // ── Initialization ───────────────────────────────────────────────

    /// Attach the viewport and populate it with the default layer table.
    pub fn initialize(&mut self, host: H) -> Result<(), GlobeError> {
        self.initialize_with(host, &LayerTable::default())
    }

    /// Attach the viewport and populate it with `table`, in table order.
    pub fn initialize_with(&mut self, host: H, table: &LayerTable) -> Result<(), GlobeError> {
        if self.host.is_some() {
            warn!("ignoring second initialization of surface '{}'", host.surface_id());
            return Err(GlobeError::AlreadyInitialized);
        }
        let surface_id = host.surface_id().to_string();
        self.host = Some(host);

        for entry in table.entries() {
            self.add_layer(entry.instantiate(&surface_id), entry.options)?;
        }
        info!("initialized globe on '{}' with {} layers", surface_id, table.len());

        if let (Some(hook), Some(host)) = (self.on_map_created.take(), self.host.as_ref()) {
            hook(host);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.host.is_some()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Configure `layer` from `options`, give it the next id and append it
    /// to the viewport. An enabled base layer turns every other base layer off.
    pub fn add_layer(&mut self, mut layer: NewLayer, options: LayerOptions) -> Result<LayerId, GlobeError> {
        let next_id = self.next_id;
        let host = self.host.as_mut().ok_or(GlobeError::NotInitialized)?;

        layer.apply(&options);
        let layer = layer.register(next_id);
        let category = layer.category;
        let exclusive = category == Category::Base && layer.enabled;
        debug!("adding layer {} '{}' ({})", next_id, layer.display_name, category);
        host.push_layer(layer);
        if exclusive {
            let index = position(host.layers(), next_id)?;
            disable_other_bases(host.layers_mut(), index);
        }
        self.next_id += 1;

        host.request_redraw();
        self.publish(category);
        Ok(next_id)
    }

    /// Flip a layer's visibility. Enabling or disabling a base layer first
    /// turns every other base layer off. Returns the layer's new state.
    pub fn toggle_layer(&mut self, id: LayerId) -> Result<bool, GlobeError> {
        let host = self.host.as_mut().ok_or(GlobeError::NotInitialized)?;
        let index = position(host.layers(), id)?;

        let layers = host.layers_mut();
        let category = layers[index].category;
        if category == Category::Base {
            disable_other_bases(layers, index);
        }
        let target = &mut layers[index];
        target.enabled = !target.enabled;
        let enabled = target.enabled;
        debug!("toggled layer {} to {}", id, if enabled { "on" } else { "off" });

        host.request_redraw();
        self.publish(category);
        Ok(enabled)
    }

    /// Overwrite a registered layer's configuration in place.
    ///
    /// A category change is published for both the old and the new category.
    pub fn configure_layer(&mut self, id: LayerId, options: LayerOptions) -> Result<(), GlobeError> {
        let host = self.host.as_mut().ok_or(GlobeError::NotInitialized)?;
        let index = position(host.layers(), id)?;

        let layers = host.layers_mut();
        let previous = layers[index].category;
        layers[index].apply(&options);
        let current = layers[index].category;
        if current == Category::Base && layers[index].enabled {
            disable_other_bases(layers, index);
        }
        debug!("configured layer {} ({:?})", id, options);

        host.request_redraw();
        self.publish(previous);
        if current != previous {
            self.publish(current);
        }
        Ok(())
    }

    /// Ask the viewport for a new frame without changing any layer.
    pub fn redraw(&mut self) -> Result<(), GlobeError> {
        self.host
            .as_mut()
            .ok_or(GlobeError::NotInitialized)?
            .request_redraw();
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Layers of `category` in registration order; empty before initialization.
    pub fn get_layers(&self, category: Category) -> Vec<Layer> {
        self.layers_in(category).cloned().collect()
    }

    pub fn layers_in(&self, category: Category) -> impl Iterator<Item = &Layer> {
        self.layers().iter().filter(move |l| l.category == category)
    }

    pub fn layers(&self) -> &[Layer] {
        self.host.as_ref().map(|h| h.layers()).unwrap_or(&[])
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers().iter().find(|l| l.unique_id == id)
    }

    pub fn viewport(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn viewport_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    // ── Publishing ───────────────────────────────────────────────────

    fn publish(&mut self, category: Category) {
        if self.sink.is_none() {
            return;
        }
        let layers = self.get_layers(category);
        match LayerUpdate::for_category(category, layers, SystemTime::now()) {
            Some(update) => {
                if let Some(sink) = self.sink.as_mut() {
                    sink.on_update(update);
                }
            }
            None => debug!("no update published for {} layers", category),
        }
    }
}

impl<H: LayerHost> Default for LayerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep `layers[keep]` as the only base layer that may be enabled.
fn disable_other_bases(layers: &mut [Layer], keep: usize) {
    for (i, other) in layers.iter_mut().enumerate() {
        if i != keep && other.category == Category::Base && other.enabled {
            debug!("disabling base layer {}", other.unique_id);
            other.enabled = false;
        }
    }
}

fn position(layers: &[Layer], id: LayerId) -> Result<usize, GlobeError> {
    layers
        .iter()
        .position(|l| l.unique_id == id)
        .ok_or(GlobeError::UnknownLayer(id))
}
