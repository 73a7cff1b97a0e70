//! Runtime error types for the reference codec

use isagen_spec::{OperandWidth, SpecError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Spec error: {0}")]
    SpecError(#[from] SpecError),

    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("{name} takes {expected} operands, got {found}")]
    OperandCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{name}: operand {index} value {value} does not fit in {width}")]
    OperandOutOfRange {
        name: String,
        index: usize,
        value: i64,
        width: OperandWidth,
    },

    #[error("{name}: writer `{writer}` is not a passthrough or cast and cannot be evaluated")]
    OpaqueWriter { name: String, writer: String },

    #[error("Unknown opcode {byte:#04x} at offset {offset}")]
    UnknownOpcode { offset: usize, byte: u8 },

    #[error("Truncated instruction {name} at offset {offset}")]
    Truncated { offset: usize, name: String },
}

impl RuntimeError {
    /// Check if this error came from reading bytecode rather than building it
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::UnknownOpcode { .. } | RuntimeError::Truncated { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
