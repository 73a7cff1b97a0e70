use crate::ast::{Instruction, Module};
use crate::instruction_def::InstructionDef;
use crate::lowering::{Builder, ModuleDef};

pub(crate) fn lower_instruction(
    _ast: &Module,
    _mdef: &mut ModuleDef,
    input: &Instruction,
    _b: &mut Builder,
) -> Vec<InstructionDef> {
    if let Instruction::Push(constant) = input {
        vec![InstructionDef::Push(constant.0)]
    } else {
        panic!("invalid lowering");
    }
}
