//! @ai:module:intent Define error types for the benchmark harness
//! @ai:module:layer domain
//! @ai:module:public_api BenchError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for definition loading and tool execution
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read benchmark definition {path}: {source}")]
    DefinitionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid benchmark definition {path}: {source}")]
    DefinitionParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid XML benchmark definition {path}: {message}")]
    DefinitionXml { path: PathBuf, message: String },

    #[error("Could not find {program} executable")]
    ToolNotFound { program: String },

    #[error(
        "Failed to launch {program}: {source}. Make sure the directory containing \
         the tool to be benchmarked is included in the PATH environment variable"
    )]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted by user")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, BenchError>;
