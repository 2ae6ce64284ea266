//! # Earthview Core
//!
//! Layer bookkeeping for the Earthview globe: layer identities, categories,
//! the single-active-base rule, and category-scoped update notifications for
//! the host UI. Drawing, tiling, and navigation belong to the globe engine
//! behind [`LayerHost`].

pub mod config;
pub mod error;
pub mod layer;
pub mod publish;
pub mod registry;
pub mod table;

pub use config::GlobeSettings;
pub use error::GlobeError;
pub use layer::{Category, Layer, LayerId, LayerKind, LayerOptions, NewLayer};
pub use publish::{LayerSnapshot, LayerUpdate, UpdateSink};
pub use registry::{LayerHost, LayerRegistry};
pub use table::{LayerConfig, LayerTable};
