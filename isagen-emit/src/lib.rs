//! isagen Emitters
//!
//! Render the seven source artifacts of a bytecode VM from one opcode table:
//! the pest grammar, the AST enum and its parse dispatch, the lowering
//! dispatch, the build-time instruction definition, the runtime decoder and
//! the opcode ordinal enum.
//!
//! ## Example
//!
//! ```rust
//! use isagen_emit::{generate, ArtifactKind};
//! use isagen_spec::{GenConfig, OpcodeTable};
//!
//! let table = OpcodeTable::from_json_str(r#"[
//!     {"name": "Push", "builder_operands": ["i64"], "runtime_operands": ["u8"],
//!      "operand_writers": ["arg0 as u8"]},
//!     {"name": "Jump", "runtime_operands": ["u16"], "operand_writers": ["arg0"],
//!      "is_terminal": true}
//! ]"#).unwrap();
//!
//! let opcodes = generate(ArtifactKind::Opcodes, &table, &GenConfig::default()).unwrap();
//! assert!(opcodes.contains("Jump = 1,"));
//! assert!(opcodes.contains("MAX = 2,"));
//! ```

pub mod artifact;
pub mod ast;
pub mod error;
pub mod formatter;
pub mod grammar;
pub mod instruction_def;
pub mod lowering;
pub mod opcodes;
pub mod pipeline;
pub mod runtime_decoder;

pub use artifact::{generate, generate_all, Artifact, ArtifactKind};
pub use error::{EmitError, Result};
pub use formatter::{Formatter, Fragment};
pub use pipeline::{Emitter, BANNER};
