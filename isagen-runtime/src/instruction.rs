//! Table-driven instruction encoding and decoding
//!
//! Interprets a loaded [`OpcodeTable`] directly, with the same wire format the
//! generated `InstructionDef::write` and `RuntimeInstruction::from_bytecode`
//! produce: the ordinal byte, then each runtime operand little endian.

use crate::bytecode::Bytecode;
use crate::error::{Result, RuntimeError};
use isagen_spec::{
    Field, OpcodeDescriptor, OpcodeTable, OperandWidth, OperandWriter, Requirement, OPCODE_BYTES,
};
use std::fmt;

/// Build-time instruction: an opcode with its builder operand values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionDef<'t> {
    descriptor: &'t OpcodeDescriptor,
    operands: Vec<i64>,
}

impl<'t> InstructionDef<'t> {
    /// Look up `name` and bind builder operands.
    ///
    /// Fails when the opcode is unknown, the operand count is wrong, a
    /// runtime operand has no writer, or an integer passthrough lacks a cast.
    pub fn new(table: &'t OpcodeTable, name: &str, operands: Vec<i64>) -> Result<Self> {
        let descriptor = table
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownInstruction(name.to_string()))?;
        descriptor.check(&Requirement::required(Field::OperandWriters))?;
        descriptor.check_passthrough()?;

        let expected = descriptor.builder_operands().len();
        if operands.len() != expected {
            return Err(RuntimeError::OperandCount {
                name: descriptor.name.clone(),
                expected,
                found: operands.len(),
            });
        }
        Ok(Self {
            descriptor,
            operands,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn opcode(&self) -> u8 {
        self.descriptor.ordinal
    }

    pub fn operands(&self) -> &[i64] {
        &self.operands
    }

    /// Encoded size in bytes, opcode included
    pub fn runtime_size(&self) -> usize {
        self.descriptor.wire_size()
    }

    pub fn is_terminal(&self) -> bool {
        self.descriptor.is_terminal()
    }

    /// Append the encoded instruction; nothing is written on error
    pub fn write(&self, bc: &mut Bytecode) -> Result<()> {
        let values = self.wire_values()?;
        bc.write_u8(self.opcode());
        for (value, width) in values.into_iter().zip(self.descriptor.runtime_operands()) {
            match width {
                OperandWidth::U8 => bc.write_u8(value as u8),
                OperandWidth::U16 => bc.write_u16(value),
            }
        }
        Ok(())
    }

    /// Evaluate every writer to its wire value
    fn wire_values(&self) -> Result<Vec<u16>> {
        self.descriptor
            .operand_writers()
            .iter()
            .zip(self.descriptor.runtime_operands())
            .map(|(writer, width)| self.evaluate(writer, *width))
            .collect()
    }

    fn evaluate(&self, writer: &OperandWriter, width: OperandWidth) -> Result<u16> {
        match writer {
            OperandWriter::Arg(index) => {
                let value = self.operands[*index];
                if value < 0 || value as u64 > width.max_value() {
                    return Err(RuntimeError::OperandOutOfRange {
                        name: self.descriptor.name.clone(),
                        index: *index,
                        value,
                        width,
                    });
                }
                Ok(value as u16)
            }
            // Narrowing `as` keeps the low bits, like the generated code.
            OperandWriter::Cast { index, width } => {
                let value = self.operands[*index];
                Ok(match width {
                    OperandWidth::U8 => value as u8 as u16,
                    OperandWidth::U16 => value as u16,
                })
            }
            OperandWriter::Opaque(source) => Err(RuntimeError::OpaqueWriter {
                name: self.descriptor.name.clone(),
                writer: source.clone(),
            }),
        }
    }
}

/// Decoded instruction with wire-accurate operands
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeInstruction<'t> {
    descriptor: &'t OpcodeDescriptor,
    operands: Vec<u16>,
}

impl<'t> RuntimeInstruction<'t> {
    /// Decode the instruction at `i`, with the offset just past it.
    ///
    /// `None` for an offset past the end, an unknown opcode byte, or a
    /// stream too short for the operands.
    pub fn from_bytecode(
        table: &'t OpcodeTable,
        bc: &Bytecode,
        i: usize,
    ) -> Option<(Self, usize)> {
        if i >= bc.len() {
            return None;
        }
        let descriptor = table.by_ordinal(bc.read_u8(i))?;
        if bc.len() < i + descriptor.wire_size() {
            return None;
        }

        let mut idx = i + OPCODE_BYTES;
        let mut operands = Vec::with_capacity(descriptor.runtime_operands().len());
        for width in descriptor.runtime_operands() {
            let value = match width {
                OperandWidth::U8 => bc.read_u8(idx) as u16,
                OperandWidth::U16 => bc.read_u16(idx),
            };
            operands.push(value);
            idx += width.size();
        }
        Some((
            Self {
                descriptor,
                operands,
            },
            idx,
        ))
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn opcode(&self) -> u8 {
        self.descriptor.ordinal
    }

    pub fn operands(&self) -> &[u16] {
        &self.operands
    }

    pub fn is_terminal(&self) -> bool {
        self.descriptor.is_terminal()
    }
}

impl fmt::Display for RuntimeInstruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor.name)?;
        for (n, operand) in self.operands.iter().enumerate() {
            let sep = if n == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, operand)?;
        }
        Ok(())
    }
}
