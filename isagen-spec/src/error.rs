//! # Error Types for the descriptor model

use crate::config::ConfigError;
use crate::descriptor::Field;
use crate::operand::OperandWidth;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Load errors
    #[error("Malformed opcode table: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid opcode name {0:?}: must be a non-empty ASCII identifier")]
    InvalidName(String),

    #[error("Duplicate opcode name: {0}")]
    DuplicateName(String),

    #[error("Too many opcodes: {0} (at most {} fit in one byte)", crate::MAX_OPCODES)]
    TooManyOpcodes(usize),

    #[error("Opcode {name} pins ordinal {pinned} but sits at position {position}")]
    OrdinalMismatch {
        name: String,
        pinned: u8,
        position: usize,
    },

    #[error("Opcode {name} has {writers} operand writers for {operands} runtime operands")]
    WriterCountMismatch {
        name: String,
        writers: usize,
        operands: usize,
    },

    #[error("Opcode {name}: writer references arg{index} but only {available} builder operands exist")]
    WriterArgOutOfRange {
        name: String,
        index: usize,
        available: usize,
    },

    #[error("Opcode {name}: writer {position} casts to {writer} but runtime operand {position} is {operand}")]
    WriterWidthMismatch {
        name: String,
        position: usize,
        writer: OperandWidth,
        operand: OperandWidth,
    },

    #[error("Opcode {name} writes {width} operand {position} from builder operand {index} of type {ty} and needs a cast")]
    WriterNeedsCast {
        name: String,
        position: usize,
        index: usize,
        ty: String,
        width: OperandWidth,
    },

    // Field access errors
    #[error("Opcode {opcode} is missing required field `{field}`")]
    MissingField { opcode: String, field: Field },

    // Manifest (append-only) errors
    #[error("Published opcode {name} (ordinal {ordinal}) was removed or moved")]
    ManifestRemoved { name: String, ordinal: u8 },

    #[error("Ordinal {ordinal} was published as {expected} but the table now has {found}")]
    ManifestRenamed {
        ordinal: u8,
        expected: String,
        found: String,
    },

    #[error("Published opcode {name} changed its wire operands")]
    ManifestOperandsChanged { name: String },

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SpecError {
    /// Check if this error means previously encoded bytecode would decode differently
    pub fn breaks_bytecode(&self) -> bool {
        matches!(
            self,
            SpecError::OrdinalMismatch { .. }
                | SpecError::ManifestRemoved { .. }
                | SpecError::ManifestRenamed { .. }
                | SpecError::ManifestOperandsChanged { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
