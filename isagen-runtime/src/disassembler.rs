//! Bytecode listing

use crate::bytecode::Bytecode;
use crate::error::Result;
use crate::program::decode;
use isagen_spec::OpcodeTable;

/// One line per instruction: hex offset, name, operands
pub fn disassemble(table: &OpcodeTable, bc: &Bytecode) -> Result<String> {
    let mut output = String::new();
    for (offset, instruction) in decode(table, bc)? {
        output.push_str(&format!("{:04X}: {}", offset, instruction));
        if instruction.is_terminal() {
            output.push_str("  ; terminal");
        }
        output.push('\n');
    }
    Ok(output)
}
