//! # Opcode descriptors
//!
//! A descriptor is one record of the opcode table. Every field except `name`
//! is optional in the JSON; absence is kept explicit so each emitter can
//! decide upfront whether it tolerates a missing field or must refuse it.

use crate::error::{Result, SpecError};
use crate::operand::{OperandWidth, OperandWriter};
use crate::OPCODE_BYTES;
use serde::Deserialize;
use std::fmt;

/// One instruction kind, as loaded from the table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodeDescriptor {
    /// Symbol used for enum variants; lowercased it is the source keyword
    pub name: String,
    /// Wire byte, assigned from the table position
    pub ordinal: u8,
    pub ast_args: Option<Vec<String>>,
    pub pest_args: Option<String>,
    pub trivial_ast: Option<bool>,
    pub trivial_lowering: Option<bool>,
    pub runtime_operands: Option<Vec<OperandWidth>>,
    pub operand_writers: Option<Vec<OperandWriter>>,
    pub builder_operands: Option<Vec<String>>,
    pub is_terminal: Option<bool>,
}

/// Wire form of a table record
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDescriptor {
    pub name: String,
    pub ordinal: Option<u8>,
    pub ast_args: Option<Vec<String>>,
    pub pest_args: Option<String>,
    pub trivial_ast: Option<bool>,
    pub trivial_lowering: Option<bool>,
    pub runtime_operands: Option<Vec<OperandWidth>>,
    pub operand_writers: Option<Vec<OperandWriter>>,
    pub builder_operands: Option<Vec<String>>,
    pub is_terminal: Option<bool>,
}

impl RawDescriptor {
    pub(crate) fn into_descriptor(self, ordinal: u8) -> OpcodeDescriptor {
        OpcodeDescriptor {
            name: self.name,
            ordinal,
            ast_args: self.ast_args,
            pest_args: self.pest_args,
            trivial_ast: self.trivial_ast,
            trivial_lowering: self.trivial_lowering,
            runtime_operands: self.runtime_operands,
            operand_writers: self.operand_writers,
            builder_operands: self.builder_operands,
            is_terminal: self.is_terminal,
        }
    }
}

/// Optional descriptor fields an emitter may read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    AstArgs,
    PestArgs,
    TrivialAst,
    TrivialLowering,
    RuntimeOperands,
    OperandWriters,
    BuilderOperands,
    IsTerminal,
}

impl Field {
    /// JSON key of the field
    pub const fn key(self) -> &'static str {
        match self {
            Field::AstArgs => "ast_args",
            Field::PestArgs => "pest_args",
            Field::TrivialAst => "trivial_ast",
            Field::TrivialLowering => "trivial_lowering",
            Field::RuntimeOperands => "runtime_operands",
            Field::OperandWriters => "operand_writers",
            Field::BuilderOperands => "builder_operands",
            Field::IsTerminal => "is_terminal",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// What an emitter does when a field is absent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Absent {
    /// Fall back to the empty/false default
    Default,
    /// Refuse the table
    Error,
}

/// One entry of an emitter's required-field set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub field: Field,
    pub absent: Absent,
}

impl Requirement {
    pub const fn required(field: Field) -> Self {
        Self {
            field,
            absent: Absent::Error,
        }
    }

    pub const fn defaulted(field: Field) -> Self {
        Self {
            field,
            absent: Absent::Default,
        }
    }
}

impl OpcodeDescriptor {
    /// Check if a field was given in the table.
    ///
    /// Writers are implied when there are no runtime operands to write.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::AstArgs => self.ast_args.is_some(),
            Field::PestArgs => self.pest_args.is_some(),
            Field::TrivialAst => self.trivial_ast.is_some(),
            Field::TrivialLowering => self.trivial_lowering.is_some(),
            Field::RuntimeOperands => self.runtime_operands.is_some(),
            Field::OperandWriters => {
                self.operand_writers.is_some() || self.runtime_operands().is_empty()
            }
            Field::BuilderOperands => self.builder_operands.is_some(),
            Field::IsTerminal => self.is_terminal.is_some(),
        }
    }

    /// Enforce one requirement of an emitter's field set
    pub fn check(&self, requirement: &Requirement) -> Result<()> {
        if requirement.absent == Absent::Error && !self.has(requirement.field) {
            return Err(SpecError::MissingField {
                opcode: self.name.clone(),
                field: requirement.field,
            });
        }
        Ok(())
    }

    pub fn ast_args(&self) -> &[String] {
        self.ast_args.as_deref().unwrap_or(&[])
    }

    /// Grammar fragment after the keyword; an empty fragment counts as none
    pub fn pest_args(&self) -> Option<&str> {
        self.pest_args
            .as_deref()
            .map(str::trim)
            .filter(|args| !args.is_empty())
    }

    pub fn trivial_ast(&self) -> bool {
        self.trivial_ast.unwrap_or(false)
    }

    pub fn trivial_lowering(&self) -> bool {
        self.trivial_lowering.unwrap_or(false)
    }

    pub fn runtime_operands(&self) -> &[OperandWidth] {
        self.runtime_operands.as_deref().unwrap_or(&[])
    }

    pub fn operand_writers(&self) -> &[OperandWriter] {
        self.operand_writers.as_deref().unwrap_or(&[])
    }

    /// Build-time operand types; without an explicit list these are the wire types
    pub fn builder_operands(&self) -> Vec<&str> {
        match &self.builder_operands {
            Some(types) => types.iter().map(String::as_str).collect(),
            None => self
                .runtime_operands()
                .iter()
                .map(|width| width.rust_type())
                .collect(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal.unwrap_or(false)
    }

    /// Encoded size: opcode byte plus every runtime operand
    pub fn wire_size(&self) -> usize {
        OPCODE_BYTES
            + self
                .runtime_operands()
                .iter()
                .map(|width| width.size())
                .sum::<usize>()
    }

    /// Case-insensitive source keyword
    pub fn keyword(&self) -> String {
        self.name.to_lowercase()
    }

    /// Grammar rule naming this opcode's statement
    pub fn rule_name(&self) -> String {
        format!("stmt_{}", self.name.to_uppercase())
    }

    /// Module holding hand-written AST/lowering code for this opcode
    pub fn module_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Check that passthrough writers read builder operands of their wire type.
    ///
    /// An integer builder operand of another width must be narrowed with `as`;
    /// other builder types are left to the compiler.
    pub fn check_passthrough(&self) -> Result<()> {
        let builder = self.builder_operands();
        let aligned = self.operand_writers().iter().zip(self.runtime_operands());
        for (position, (writer, width)) in aligned.enumerate() {
            let OperandWriter::Arg(index) = writer else {
                continue;
            };
            let Some(&ty) = builder.get(*index) else {
                continue;
            };
            if INTEGER_TYPES.contains(&ty) && ty != width.rust_type() {
                return Err(SpecError::WriterNeedsCast {
                    name: self.name.clone(),
                    position,
                    index: *index,
                    ty: ty.to_string(),
                    width: *width,
                });
            }
        }
        Ok(())
    }
}

/// Strict and reserved Rust keywords; a lowercased name must avoid them
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Builder types known to be primitive integers
const INTEGER_TYPES: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize",
];

/// Check that a name can be both a Rust symbol and a keyword.
///
/// The name is used as an enum variant and, lowercased, as a module name.
pub(crate) fn is_identifier(name: &str) -> bool {
    if name == "_" || RUST_KEYWORDS.contains(&name.to_lowercase().as_str()) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> OpcodeDescriptor {
        let raw: RawDescriptor = serde_json::from_str(json).unwrap();
        raw.into_descriptor(0)
    }

    #[test]
    fn test_defaults() {
        let d = descriptor(r#"{"name": "NOP"}"#);
        assert!(d.ast_args().is_empty());
        assert_eq!(d.pest_args(), None);
        assert!(!d.trivial_ast());
        assert!(!d.is_terminal());
        assert_eq!(d.wire_size(), 1);
        assert!(d.builder_operands().is_empty());
    }

    #[test]
    fn test_wire_size() {
        let d = descriptor(r#"{"name": "CALL", "runtime_operands": ["u8", "u16", "u16"]}"#);
        assert_eq!(d.wire_size(), 6);
    }

    #[test]
    fn test_builder_operands_default_to_wire_types() {
        let d = descriptor(r#"{"name": "JUMP", "runtime_operands": ["u16"], "operand_writers": ["arg0"]}"#);
        assert_eq!(d.builder_operands(), vec!["u16"]);

        let d = descriptor(
            r#"{"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg0 as u8"]}"#,
        );
        assert_eq!(d.builder_operands(), vec!["i64"]);
    }

    #[test]
    fn test_names() {
        let d = descriptor(r#"{"name": "FromSlot"}"#);
        assert_eq!(d.keyword(), "fromslot");
        assert_eq!(d.rule_name(), "stmt_FROMSLOT");
        assert_eq!(d.module_name(), "fromslot");
    }

    #[test]
    fn test_keyword_names_rejected() {
        assert!(!is_identifier("Return"));
        assert!(!is_identifier("LOOP"));
        assert!(!is_identifier("Self"));
        assert!(!is_identifier("_"));
        assert!(is_identifier("Ret"));
        assert!(is_identifier("_Spill"));
        assert!(is_identifier("Returns"));
    }

    #[test]
    fn test_check_passthrough() {
        let d = descriptor(
            r#"{"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg0"]}"#,
        );
        let err = d.check_passthrough().unwrap_err();
        assert!(matches!(
            err,
            SpecError::WriterNeedsCast { position: 0, index: 0, width: OperandWidth::U8, .. }
        ));

        let d = descriptor(
            r#"{"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg0 as u8"]}"#,
        );
        assert!(d.check_passthrough().is_ok());

        let d = descriptor(
            r#"{"name": "CALL", "builder_operands": ["Label"], "runtime_operands": ["u16"], "operand_writers": ["arg0"]}"#,
        );
        assert!(d.check_passthrough().is_ok());
    }

    #[test]
    fn test_empty_pest_args_is_absent() {
        let d = descriptor(r#"{"name": "NOP", "pest_args": "  "}"#);
        assert!(d.has(Field::PestArgs));
        assert_eq!(d.pest_args(), None);
    }

    #[test]
    fn test_check_required_field() {
        let d = descriptor(r#"{"name": "JUMP"}"#);
        let err = d.check(&Requirement::required(Field::TrivialAst)).unwrap_err();
        assert!(matches!(err, SpecError::MissingField { field: Field::TrivialAst, .. }));
        assert!(d.check(&Requirement::defaulted(Field::TrivialAst)).is_ok());
    }

    #[test]
    fn test_writers_implied_without_operands() {
        let d = descriptor(r#"{"name": "RET"}"#);
        assert!(d.check(&Requirement::required(Field::OperandWriters)).is_ok());

        let d = descriptor(r#"{"name": "JUMP", "runtime_operands": ["u16"]}"#);
        assert!(d.check(&Requirement::required(Field::OperandWriters)).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<RawDescriptor>(r#"{"name": "NOP", "is_termnal": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("PUSH"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1PUSH"));
        assert!(!is_identifier("PU SH"));
    }
}
