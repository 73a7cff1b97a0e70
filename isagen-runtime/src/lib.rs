//! # isagen Reference Codec
//!
//! Encode and decode bytecode straight from a loaded opcode table, without
//! generating code first. The wire format is the one the generated
//! `InstructionDef`/`RuntimeInstruction` pair uses, so this crate doubles as
//! the oracle the generated artifacts are tested against.
//!
//! ## Example
//!
//! ```rust
//! use isagen_runtime::{disassemble, encode, InstructionDef};
//! use isagen_spec::OpcodeTable;
//!
//! let table = OpcodeTable::from_json_str(r#"[
//!     {"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"],
//!      "operand_writers": ["arg0 as u8"]},
//!     {"name": "JUMP", "runtime_operands": ["u16"], "operand_writers": ["arg0"],
//!      "is_terminal": true}
//! ]"#).unwrap();
//!
//! let program = vec![
//!     InstructionDef::new(&table, "PUSH", vec![5]).unwrap(),
//!     InstructionDef::new(&table, "JUMP", vec![300]).unwrap(),
//! ];
//! let bc = encode(&program).unwrap();
//! assert_eq!(bc.len(), 5);
//! assert!(disassemble(&table, &bc).unwrap().starts_with("0000: PUSH 5\n"));
//! ```

pub mod bytecode;
pub mod disassembler;
pub mod error;
pub mod instruction;
pub mod program;

pub use bytecode::Bytecode;
pub use disassembler::disassemble;
pub use error::{Result, RuntimeError};
pub use instruction::{InstructionDef, RuntimeInstruction};
pub use program::{decode, encode, layout};
