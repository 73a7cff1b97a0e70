//! # Published ordinal manifest
//!
//! Ordinals are wire bytes: once bytecode has shipped, an opcode must keep
//! its ordinal and its operand widths forever. The manifest records what was
//! published so a later table can be checked for append-only evolution.

use crate::error::{Result, SpecError};
use crate::operand::OperandWidth;
use crate::table::OpcodeTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One published opcode
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub ordinal: u8,
    #[serde(default)]
    pub operands: Vec<OperandWidth>,
}

/// Opcodes as last published, in ordinal order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub opcodes: Vec<ManifestEntry>,
}

impl Manifest {
    /// Snapshot the ordinals and wire operands of a table
    pub fn from_table(table: &OpcodeTable) -> Self {
        let opcodes = table
            .iter()
            .map(|d| ManifestEntry {
                name: d.name.clone(),
                ordinal: d.ordinal,
                operands: d.runtime_operands().to_vec(),
            })
            .collect();
        Self { opcodes }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest; a missing file means nothing was published yet
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no published manifest");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Pretty JSON with a trailing newline, stable across runs
    pub fn to_json_string(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Check that `table` only appends to what was published
    pub fn check(&self, table: &OpcodeTable) -> Result<()> {
        for entry in &self.opcodes {
            let current = match table.by_ordinal(entry.ordinal) {
                Some(current) => current,
                None => {
                    return Err(SpecError::ManifestRemoved {
                        name: entry.name.clone(),
                        ordinal: entry.ordinal,
                    })
                }
            };

            if current.name != entry.name {
                // Distinguish a moved opcode from a renamed slot.
                if table.get(&entry.name).is_some() {
                    return Err(SpecError::ManifestRemoved {
                        name: entry.name.clone(),
                        ordinal: entry.ordinal,
                    });
                }
                return Err(SpecError::ManifestRenamed {
                    ordinal: entry.ordinal,
                    expected: entry.name.clone(),
                    found: current.name.clone(),
                });
            }

            if current.runtime_operands() != entry.operands.as_slice() {
                return Err(SpecError::ManifestOperandsChanged {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}
