use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::document::DocumentError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid controller configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Document operation failed: {source}")]
    Document {
        #[from]
        source: DocumentError,
    },
}
