use log::trace;

use earthview_core::{Layer, LayerHost};

use crate::render_data::RenderFrame;

/// The live drawing surface the globe engine renders into.
///
/// Owns the ordered layer list; the registry annotates and mutates the layers
/// it holds. Redraw requests are coalesced until the engine takes a frame.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Id of the canvas element.
    pub surface_id: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    layers: Vec<Layer>,
    redraw_pending: bool,
    /// Number of frames handed to the engine so far.
    frames: u64,
}

impl Viewport {
    pub fn new(surface_id: &str, width: u32, height: u32) -> Self {
        Self {
            surface_id: surface_id.to_string(),
            width,
            height,
            layers: Vec::new(),
            redraw_pending: false,
            frames: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.redraw_pending = true;
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Layers the engine draws when the eye is at `altitude` meters.
    pub fn active_layers(&self, altitude: f64) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |l| l.is_active_at(altitude))
    }

    /// Consume a pending redraw and describe the frame to draw.
    pub fn take_frame(&mut self, altitude: f64) -> Option<RenderFrame> {
        if !self.redraw_pending {
            return None;
        }
        self.redraw_pending = false;
        self.frames += 1;
        let frame = RenderFrame::new(self, altitude);
        trace!("frame {} with {} active layers", frame.sequence, frame.layers.len());
        Some(frame)
    }
}

impl LayerHost for Viewport {
    fn surface_id(&self) -> &str {
        &self.surface_id
    }

    fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }
}
