//! Error types for configuration loading.

use thiserror::Error;

/// Errors that can occur while loading the gateway configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the supplied path nor the fallback path could be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// The path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents were not valid YAML for [`crate::Config`].
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}
