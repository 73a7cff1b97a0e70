//! Assembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("ast creation error: {0}")]
    AstGenerationError(String),
}

pub type AssemblerResult<T> = std::result::Result<T, AssemblerError>;
