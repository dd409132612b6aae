//! Manifest assembly and emission errors.

use std::path::PathBuf;

use ossmeta_core::{MetaReadError, ResolveError};
use thiserror::Error;

/// Failure while assembling the license manifest.
///
/// Wrapped errors display their own message unchanged so build output shows
/// the resolver's wording verbatim.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A package manifest could not be read or parsed.
    #[error(transparent)]
    Meta(#[from] MetaReadError),

    /// License identifier or text resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The include-packages provider failed.
    #[error("failed to collect additional packages: {reason}")]
    Provider {
        /// Provider-supplied description.
        reason: String,
    },
}

/// Failure while rendering or writing manifest artifacts.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The manifest could not be serialized.
    #[error("failed to serialize license manifest: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A derived-artifact renderer failed.
    #[error("failed to render artifact '{file_name}': {reason}")]
    Render {
        /// Artifact being rendered.
        file_name: String,
        /// Renderer-supplied description.
        reason: String,
    },

    /// An artifact could not be written.
    #[error("failed to write artifact {}: {source}", .path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}
