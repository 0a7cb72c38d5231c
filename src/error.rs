use std::path::PathBuf;

use thiserror::Error;

/// Failures the sound engine can surface to callers.
///
/// Asset problems are recovered internally (the engine falls back to
/// procedural synthesis), so `AssetLoad` mostly shows up in logs; only an
/// unusable output device reaches the caller, and only on the first start.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("failed to load audio asset {path:?}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },
}
