//! # Opcode table loading and validation
//!
//! The table is a JSON array; record position is the opcode ordinal. Loading
//! validates everything that does not depend on which artifact is generated:
//! names, ordinals, writer alignment. Field presence is checked later, per
//! emitter.

use crate::descriptor::{is_identifier, OpcodeDescriptor, RawDescriptor};
use crate::error::{Result, SpecError};
use crate::operand::OperandWriter;
use crate::MAX_OPCODES;
use std::collections::HashSet;
use std::path::Path;

/// Immutable, ordered view over every opcode descriptor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodeTable {
    opcodes: Vec<OpcodeDescriptor>,
}

impl OpcodeTable {
    /// Load and validate a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            opcodes = table.len(),
            "loaded opcode table"
        );
        Ok(table)
    }

    /// Parse and validate a table from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<RawDescriptor> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    fn from_records(records: Vec<RawDescriptor>) -> Result<Self> {
        if records.len() > MAX_OPCODES {
            return Err(SpecError::TooManyOpcodes(records.len()));
        }

        let mut seen = HashSet::new();
        let mut opcodes = Vec::with_capacity(records.len());

        for (position, record) in records.into_iter().enumerate() {
            if !is_identifier(&record.name) {
                return Err(SpecError::InvalidName(record.name));
            }
            if !seen.insert(record.name.to_lowercase()) {
                return Err(SpecError::DuplicateName(record.name));
            }
            if let Some(pinned) = record.ordinal {
                if pinned as usize != position {
                    return Err(SpecError::OrdinalMismatch {
                        name: record.name,
                        pinned,
                        position,
                    });
                }
            }

            // Position fits: the count was checked against MAX_OPCODES.
            let descriptor = record.into_descriptor(position as u8);
            validate_writers(&descriptor)?;
            opcodes.push(descriptor);
        }

        Ok(Self { opcodes })
    }

    /// Descriptors in table (ordinal) order
    pub fn iter(&self) -> std::slice::Iter<'_, OpcodeDescriptor> {
        self.opcodes.iter()
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// The `MAX` sentinel: one past the last real ordinal
    pub fn sentinel(&self) -> u8 {
        self.opcodes.len() as u8
    }

    pub fn get(&self, name: &str) -> Option<&OpcodeDescriptor> {
        self.opcodes.iter().find(|d| d.name == name)
    }

    pub fn ordinal_of(&self, name: &str) -> Option<u8> {
        self.get(name).map(|d| d.ordinal)
    }

    /// Bounds-checked ordinal lookup; `None` at or past the sentinel
    pub fn by_ordinal(&self, ordinal: u8) -> Option<&OpcodeDescriptor> {
        self.opcodes.get(ordinal as usize)
    }
}

impl<'a> IntoIterator for &'a OpcodeTable {
    type Item = &'a OpcodeDescriptor;
    type IntoIter = std::slice::Iter<'a, OpcodeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writers must line up with runtime operands, cast to their width and read
/// existing builder operands
fn validate_writers(descriptor: &OpcodeDescriptor) -> Result<()> {
    if descriptor.operand_writers.is_none() {
        return Ok(());
    }

    let writers = descriptor.operand_writers();
    let operands = descriptor.runtime_operands();
    if writers.len() != operands.len() {
        return Err(SpecError::WriterCountMismatch {
            name: descriptor.name.clone(),
            writers: writers.len(),
            operands: operands.len(),
        });
    }

    let available = descriptor.builder_operands().len();
    for (position, (writer, operand)) in writers.iter().zip(operands).enumerate() {
        if let OperandWriter::Cast { width, .. } = writer {
            if width != operand {
                return Err(SpecError::WriterWidthMismatch {
                    name: descriptor.name.clone(),
                    position,
                    writer: *width,
                    operand: *operand,
                });
            }
        }
        if let Some(index) = writer.arg_index() {
            if index >= available {
                return Err(SpecError::WriterArgOutOfRange {
                    name: descriptor.name.clone(),
                    index,
                    available,
                });
            }
        } else {
            tracing::warn!(
                opcode = %descriptor.name,
                writer = %writer,
                "opaque operand writer is emitted verbatim"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::OperandWidth;

    const SCENARIO: &str = r#"[
        {"name": "Push", "builder_operands": ["i64"], "runtime_operands": ["u8"],
         "operand_writers": ["arg0 as u8"], "is_terminal": false},
        {"name": "Jump", "runtime_operands": ["u16"], "operand_writers": ["arg0"],
         "is_terminal": true}
    ]"#;

    #[test]
    fn test_load_preserves_order() {
        let table = OpcodeTable::from_json_str(SCENARIO).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.ordinal_of("Push"), Some(0));
        assert_eq!(table.ordinal_of("Jump"), Some(1));
        assert_eq!(table.sentinel(), 2);
        assert_eq!(
            table.by_ordinal(1).unwrap().runtime_operands(),
            &[OperandWidth::U16]
        );
        assert!(table.by_ordinal(2).is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = OpcodeTable::from_json_str("[]").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.sentinel(), 0);
    }

    #[test]
    fn test_not_a_list() {
        let err = OpcodeTable::from_json_str(r#"{"name": "NOP"}"#).unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));

        let err = OpcodeTable::from_json_str(r#"[{"ast_args": []}]"#).unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));
    }

    #[test]
    fn test_bad_width_tag() {
        let err = OpcodeTable::from_json_str(r#"[{"name": "X", "runtime_operands": ["u32"]}]"#)
            .unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));
    }

    #[test]
    fn test_duplicate_names() {
        let err = OpcodeTable::from_json_str(r#"[{"name": "NOP"}, {"name": "nop"}]"#).unwrap_err();
        assert!(matches!(err, SpecError::DuplicateName(name) if name == "nop"));
    }

    #[test]
    fn test_invalid_name() {
        let err = OpcodeTable::from_json_str(r#"[{"name": "no-op"}]"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidName(_)));
    }

    #[test]
    fn test_keyword_and_wildcard_names() {
        let err = OpcodeTable::from_json_str(r#"[{"name": "Return", "trivial_ast": false}]"#)
            .unwrap_err();
        assert!(matches!(err, SpecError::InvalidName(name) if name == "Return"));

        let err = OpcodeTable::from_json_str(r#"[{"name": "NOP"}, {"name": "_"}]"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidName(name) if name == "_"));

        assert!(OpcodeTable::from_json_str(r#"[{"name": "Ret"}, {"name": "Moves"}]"#).is_ok());
    }

    #[test]
    fn test_ordinal_pin() {
        let ok = r#"[{"name": "NOP", "ordinal": 0}, {"name": "RET", "ordinal": 1}]"#;
        assert!(OpcodeTable::from_json_str(ok).is_ok());

        let moved = r#"[{"name": "RET", "ordinal": 1}, {"name": "NOP", "ordinal": 0}]"#;
        let err = OpcodeTable::from_json_str(moved).unwrap_err();
        assert!(matches!(
            err,
            SpecError::OrdinalMismatch { pinned: 1, position: 0, .. }
        ));
        assert!(err.breaks_bytecode());
    }

    #[test]
    fn test_writer_count_mismatch() {
        let json = r#"[{"name": "PUSH", "runtime_operands": ["u8", "u8"], "operand_writers": ["arg0"]}]"#;
        let err = OpcodeTable::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            SpecError::WriterCountMismatch { writers: 1, operands: 2, .. }
        ));
    }

    #[test]
    fn test_writer_arg_out_of_range() {
        let json = r#"[{"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg1 as u8"]}]"#;
        let err = OpcodeTable::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            SpecError::WriterArgOutOfRange { index: 1, available: 1, .. }
        ));
    }

    #[test]
    fn test_cast_width_must_match_operand() {
        let json = r#"[{"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg0 as u16"]}]"#;
        let err = OpcodeTable::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            SpecError::WriterWidthMismatch {
                position: 0,
                writer: OperandWidth::U16,
                operand: OperandWidth::U8,
                ..
            }
        ));

        let json = r#"[{"name": "CALL", "builder_operands": ["i64", "i64"], "runtime_operands": ["u16", "u8"], "operand_writers": ["arg0 as u16", "arg1 as u16"]}]"#;
        let err = OpcodeTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, SpecError::WriterWidthMismatch { position: 1, .. }));
    }

    #[test]
    fn test_too_many_opcodes() {
        let records: Vec<String> = (0..256).map(|i| format!(r#"{{"name": "OP{}"}}"#, i)).collect();
        let json = format!("[{}]", records.join(","));
        let err = OpcodeTable::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SpecError::TooManyOpcodes(256)));

        let records: Vec<String> = (0..255).map(|i| format!(r#"{{"name": "OP{}"}}"#, i)).collect();
        let json = format!("[{}]", records.join(","));
        let table = OpcodeTable::from_json_str(&json).unwrap();
        assert_eq!(table.sentinel(), 255);
    }

    #[test]
    fn test_load_missing_file() {
        let err = OpcodeTable::load("/nonexistent/ops.json").unwrap_err();
        assert!(matches!(err, SpecError::IoError(_)));
    }
}
