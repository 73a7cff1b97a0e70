use crate::ast::{Instruction, Module};
use crate::instruction_def::InstructionDef;
use crate::lowering::{Builder, ModuleDef};

pub(crate) fn lower_instruction(
    _ast: &Module,
    mdef: &mut ModuleDef,
    input: &Instruction,
    _b: &mut Builder,
) -> Vec<InstructionDef> {
    if let Instruction::Call(target, arity) = input {
        mdef.call_sites += 1;
        vec![InstructionDef::Call(*target, *arity)]
    } else {
        panic!("invalid lowering");
    }
}
