//! Errors raised while building a scene.
//!
//! The per-frame simulation never fails: bad input there is clamped, skipped,
//! or logged. Everything that can go wrong happens up front, while loading
//! scene files and heightmaps or validating cloth descriptions.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load heightmap '{}': {source}", path.display())]
    Heightmap {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid cloth: {0}")]
    InvalidCloth(String),

    #[error("invalid sphere: {0}")]
    InvalidSphere(String),

    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),
}
