//! Emitter errors

use crate::artifact::ArtifactKind;
use isagen_spec::{ConfigError, SpecError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Opcode table is empty")]
    EmptyTable,

    #[error("{artifact}: {source}")]
    Validation {
        artifact: ArtifactKind,
        source: SpecError,
    },

    #[error("{artifact}: opcode {opcode} {reason}")]
    Unsupported {
        artifact: ArtifactKind,
        opcode: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EmitError>;
