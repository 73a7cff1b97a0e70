//! Instruction sequences: layout, encoding and decoding

use crate::bytecode::Bytecode;
use crate::error::{Result, RuntimeError};
use crate::instruction::{InstructionDef, RuntimeInstruction};
use isagen_spec::OpcodeTable;

/// Start offset of each instruction, from `runtime_size` alone
pub fn layout(defs: &[InstructionDef<'_>]) -> Vec<usize> {
    defs.iter()
        .scan(0usize, |offset, def| {
            let start = *offset;
            *offset += def.runtime_size();
            Some(start)
        })
        .collect()
}

/// Encode a sequence of instructions into one buffer
pub fn encode(defs: &[InstructionDef<'_>]) -> Result<Bytecode> {
    let mut bc = Bytecode::new();
    for def in defs {
        def.write(&mut bc)?;
    }
    tracing::debug!(instructions = defs.len(), bytes = bc.len(), "encoded bytecode");
    Ok(bc)
}

/// Decode a whole buffer, with the offset of every instruction
pub fn decode<'t>(
    table: &'t OpcodeTable,
    bc: &Bytecode,
) -> Result<Vec<(usize, RuntimeInstruction<'t>)>> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < bc.len() {
        let (instruction, next) = RuntimeInstruction::from_bytecode(table, bc, offset)
            .ok_or_else(|| decode_error(table, bc, offset))?;
        out.push((offset, instruction));
        offset = next;
    }
    Ok(out)
}

/// Explain why the instruction at `offset` could not be decoded
fn decode_error(table: &OpcodeTable, bc: &Bytecode, offset: usize) -> RuntimeError {
    let byte = bc.read_u8(offset);
    match table.by_ordinal(byte) {
        Some(descriptor) => RuntimeError::Truncated {
            offset,
            name: descriptor.name.clone(),
        },
        None => RuntimeError::UnknownOpcode { offset, byte },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OpcodeTable {
        OpcodeTable::from_json_str(
            r#"[
            {"name": "NOP"},
            {"name": "PUSH", "builder_operands": ["i64"], "runtime_operands": ["u8"],
             "operand_writers": ["arg0 as u8"]},
            {"name": "CALL", "runtime_operands": ["u8", "u16"], "operand_writers": ["arg0", "arg1"]},
            {"name": "RET", "is_terminal": true}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_layout_matches_encoding() {
        let table = table();
        let defs = vec![
            InstructionDef::new(&table, "NOP", vec![]).unwrap(),
            InstructionDef::new(&table, "PUSH", vec![9]).unwrap(),
            InstructionDef::new(&table, "CALL", vec![2, 1000]).unwrap(),
            InstructionDef::new(&table, "RET", vec![]).unwrap(),
        ];
        assert_eq!(layout(&defs), vec![0, 1, 3, 7]);

        let bc = encode(&defs).unwrap();
        assert_eq!(bc.len(), 8);

        let offsets: Vec<usize> = decode(&table, &bc)
            .unwrap()
            .into_iter()
            .map(|(offset, _)| offset)
            .collect();
        assert_eq!(offsets, layout(&defs));
    }

    #[test]
    fn test_decode_errors() {
        let table = table();
        let err = decode(&table, &Bytecode::from_bytes(vec![0, 9])).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOpcode { offset: 1, byte: 9 }));

        let err = decode(&table, &Bytecode::from_bytes(vec![2, 1, 0])).unwrap_err();
        assert!(matches!(err, RuntimeError::Truncated { offset: 0, .. }));
    }

    #[test]
    fn test_empty() {
        assert!(layout(&[]).is_empty());
        assert!(decode(&table(), &Bytecode::new()).unwrap().is_empty());
    }
}
