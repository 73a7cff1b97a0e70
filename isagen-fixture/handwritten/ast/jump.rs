use crate::ast::{number, operands};
use crate::parser::Rule;
use crate::result::{AssemblerError, AssemblerResult};

use super::Instruction;

pub(crate) fn from_parse_tree(p: pest::iterators::Pair<'_, Rule>) -> AssemblerResult<Instruction> {
    match operands(p).as_slice() {
        [target] => Ok(Instruction::Jump(number(target)?)),
        _ => Err(AssemblerError::AstGenerationError(
            "jump takes a target".to_string(),
        )),
    }
}
