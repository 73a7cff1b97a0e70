//! # isagen Opcode Descriptor Model
//!
//! One ordered JSON table describes every instruction of a bytecode VM. This
//! crate loads that table into strongly-typed [`OpcodeDescriptor`]s and keeps
//! the invariants every generated artifact relies on.
//!
//! ## Key Features
//! - Table position assigns the opcode ordinal (the wire byte)
//! - Optional ordinal pins, checked against the record position
//! - Append-only evolution checked against a published [`Manifest`]
//! - Typed operand widths and writer expressions
//! - Per-field presence checks used by the emitters before they run
//!
//! ## Example
//!
//! ```rust
//! use isagen_spec::OpcodeTable;
//!
//! let table = OpcodeTable::from_json_str(r#"[
//!     {"name": "NOP", "is_terminal": false},
//!     {"name": "RET", "is_terminal": true}
//! ]"#).unwrap();
//!
//! assert_eq!(table.ordinal_of("RET"), Some(1));
//! assert_eq!(table.sentinel(), 2);
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod operand;
pub mod ordinal;
pub mod table;

pub use config::{CodePaths, ConfigError, GenConfig, OutputPaths};
pub use descriptor::{Absent, Field, OpcodeDescriptor, Requirement};
pub use error::{Result, SpecError};
pub use operand::{OperandWidth, OperandWriter};
pub use ordinal::{Manifest, ManifestEntry};
pub use table::OpcodeTable;

/// Largest number of real opcodes a table may hold.
///
/// The `MAX` sentinel sits one past the last opcode and must still fit in
/// the single opcode byte.
pub const MAX_OPCODES: usize = u8::MAX as usize;

/// Width in bytes of the opcode tag that starts every encoded instruction.
pub const OPCODE_BYTES: usize = 1;
