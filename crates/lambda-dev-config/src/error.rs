use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

/// Errors raised while assembling the gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration layer could not be loaded or merged.
    ///
    /// Rejected flags and malformed files or variables land here, and so do
    /// help requests.
    #[error(transparent)]
    Load(Arc<OrthoError>),

    /// No runtime name was supplied by any layer.
    #[error("a runtime must be configured (for example --runtime nodejs8.10)")]
    MissingRuntime,

    /// A `[[routes]]` entry failed validation.
    #[error("route #{index} is invalid: {message}")]
    InvalidRoute {
        /// Zero-based position of the route in the file.
        index: usize,
        /// Description of the problem.
        message: String,
    },

    /// The process working directory could not be determined.
    #[error("failed to resolve the working directory: {source}")]
    WorkingDirectory {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The working directory is not valid UTF-8.
    #[error("working directory '{}' is not valid UTF-8", path.display())]
    NonUtf8WorkingDirectory {
        /// Offending path.
        path: PathBuf,
    },
}

impl ConfigError {
    pub(crate) fn invalid_route(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRoute {
            index,
            message: message.into(),
        }
    }

    /// Returns the clap error when flag parsing stopped the load.
    ///
    /// Help requests surface this way too, so callers print it and pick the
    /// exit code from [`clap::Error::use_stderr`].
    #[must_use]
    pub fn as_cli(&self) -> Option<&clap::Error> {
        let Self::Load(error) = self else {
            return None;
        };
        match error.as_ref() {
            OrthoError::CliParsing(cli) => Some(cli.as_ref()),
            _ => None,
        }
    }
}
