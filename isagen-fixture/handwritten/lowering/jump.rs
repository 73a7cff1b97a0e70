use crate::ast::{Instruction, Module};
use crate::instruction_def::InstructionDef;
use crate::lowering::{Builder, ModuleDef};

pub(crate) fn lower_instruction(
    _ast: &Module,
    _mdef: &mut ModuleDef,
    input: &Instruction,
    b: &mut Builder,
) -> Vec<InstructionDef> {
    if let Instruction::Jump(target) = input {
        b.jump_targets.push(*target);
        vec![InstructionDef::Jump(*target)]
    } else {
        panic!("invalid lowering");
    }
}
