//! # Earthview Renderer
//!
//! The viewport handle the globe engine draws into, and the frame data handed
//! across to the in-page engine after every redraw request.
//!
//! Tile fetching, projection, and the frame loop itself stay in the engine;
//! this crate only decides which layers a frame contains.

pub mod viewport;
pub mod render_data;

pub use viewport::Viewport;
pub use render_data::{RenderFrame, RenderLayer};
