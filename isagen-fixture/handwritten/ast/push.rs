use crate::ast::{number, operands, Constant};
use crate::parser::Rule;
use crate::result::{AssemblerError, AssemblerResult};

use super::Instruction;

pub(crate) fn from_parse_tree(p: pest::iterators::Pair<'_, Rule>) -> AssemblerResult<Instruction> {
    match operands(p).as_slice() {
        [value] => Ok(Instruction::Push(Constant(number(value)?))),
        _ => Err(AssemblerError::AstGenerationError(
            "push takes one operand".to_string(),
        )),
    }
}
