//! Error type for the vignette library.

use std::path::PathBuf;
use thiserror::Error;

use crate::ending::EndingMode;
use crate::loading::AssetKind;

#[derive(Debug, Error)]
pub enum VignetteError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("could not serialise config: {0}")]
    ConfigWrite(#[from] ron::Error),

    #[error("unknown tuning field `{0}`")]
    UnknownTuningField(String),

    #[error("failed to load {kind:?} asset `{path}`: {reason}")]
    AssetLoad {
        kind: AssetKind,
        path: String,
        reason: String,
    },

    #[error("ending already triggered ({0:?})")]
    EndingAlreadyTriggered(EndingMode),

    #[error("no character attached")]
    NoCharacter,
}

pub type Result<T> = std::result::Result<T, VignetteError>;
