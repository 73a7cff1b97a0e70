//! Generated instruction set for the fixture table in `ops.json`
//!
//! The build script runs every emitter and this crate compiles the output into
//! a small assembler: source text is parsed with the generated grammar, turned
//! into AST instructions by the generated dispatch, lowered by the generated
//! lowering dispatch, and encoded and decoded by the generated codec against
//! the reference [`Bytecode`](isagen_runtime::Bytecode) buffer. A generator
//! change that produces invalid Rust fails the build here.

pub mod ast;
pub mod lowering;
pub mod parser;
pub mod result;

pub mod bytecode {
    pub use isagen_runtime::Bytecode;
}

pub mod opcodes {
    include!(concat!(env!("OUT_DIR"), "/opcodes.rs"));
}

pub mod instruction_def {
    include!(concat!(env!("OUT_DIR"), "/instruction_def.rs"));
}

pub mod instruction_runtime {
    include!(concat!(env!("OUT_DIR"), "/instruction_runtime.rs"));
}

pub use ast::{Constant, Instruction, Module};
pub use bytecode::Bytecode;
pub use instruction_def::InstructionDef;
pub use instruction_runtime::RuntimeInstruction;
pub use lowering::{lower, lower_lagging, Builder, Lowered, ModuleDef};
pub use opcodes::Opcode;
pub use parser::{assemble, FixtureGrammar, Rule};
pub use result::{AssemblerError, AssemblerResult};
