use std::io;

use thiserror::Error;

use crate::layer::LayerId;

#[derive(Error, Debug)]
pub enum GlobeError {
    #[error("the globe viewport has not been initialized")]
    NotInitialized,

    #[error("the globe viewport is already initialized")]
    AlreadyInitialized,

    #[error("no layer with id {0} is registered")]
    UnknownLayer(LayerId),

    #[error("unknown layer category '{0}'")]
    UnknownCategory(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid globe configuration: {0}")]
    Config(#[from] serde_json::Error),
}
