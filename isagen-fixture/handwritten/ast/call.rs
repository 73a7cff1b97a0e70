use crate::ast::{number, operands};
use crate::parser::Rule;
use crate::result::{AssemblerError, AssemblerResult};

use super::Instruction;

pub(crate) fn from_parse_tree(p: pest::iterators::Pair<'_, Rule>) -> AssemblerResult<Instruction> {
    match operands(p).as_slice() {
        [target, arity] => Ok(Instruction::Call(number(target)?, number(arity)?)),
        _ => Err(AssemblerError::AstGenerationError(
            "call takes a target and an arity".to_string(),
        )),
    }
}
