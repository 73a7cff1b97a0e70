//! AST of the fixture assembler
//!
//! `instructions` is the generated enum and parse dispatch; the per-opcode
//! constructors it delegates to live in `handwritten/ast`.

use crate::parser::Rule;
use crate::result::{AssemblerError, AssemblerResult};
use pest::iterators::Pair;
use std::str::FromStr;

pub mod instructions {
    include!(concat!(env!("OUT_DIR"), "/ast/instructions/mod.rs"));
}

pub use instructions::Instruction;

/// Value pushed by `push`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub i64);

/// A parsed program
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub instructions: Vec<Instruction>,
}

/// Operand texts of a statement, in source order
pub(crate) fn operands<'i>(p: Pair<'i, Rule>) -> Vec<&'i str> {
    p.into_inner().map(|operand| operand.as_str()).collect()
}

/// Parse one numeric operand into its AST type
pub(crate) fn number<T: FromStr>(text: &str) -> AssemblerResult<T> {
    text.parse()
        .map_err(|_| AssemblerError::AstGenerationError(format!("operand {} out of range", text)))
}
