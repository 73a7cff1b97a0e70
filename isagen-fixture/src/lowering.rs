//! Lowering of a parsed [`Module`] to instruction definitions
//!
//! `instructions` is the generated dispatch for the current table.
//! `lagging` was rendered from the table before its last opcode was appended,
//! so lowering that opcode through it hits the fatal drift path.

use crate::ast::{Instruction, Module};
use crate::instruction_def::InstructionDef;

mod instructions {
    include!(concat!(env!("OUT_DIR"), "/lowering/instructions/mod.rs"));
}

mod lagging {
    include!(concat!(env!("OUT_DIR"), "/lagging/lowering/instructions/mod.rs"));
}

/// Module definition under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDef {
    pub call_sites: usize,
}

/// Bytecode builder state shared across one lowering pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
    pub jump_targets: Vec<u16>,
}

/// Result of lowering a whole module
#[derive(Debug, Clone)]
pub struct Lowered {
    pub defs: Vec<InstructionDef>,
    pub module_def: ModuleDef,
    pub builder: Builder,
}

type LowerFn = fn(&Module, &mut ModuleDef, &Instruction, &mut Builder) -> Vec<InstructionDef>;

fn lower_with(ast: &Module, lower_instruction: LowerFn) -> Lowered {
    let mut module_def = ModuleDef::default();
    let mut builder = Builder::default();
    let mut defs = Vec::new();
    for instruction in &ast.instructions {
        defs.extend(lower_instruction(ast, &mut module_def, instruction, &mut builder));
    }
    Lowered {
        defs,
        module_def,
        builder,
    }
}

/// Lower every instruction through the generated dispatch
pub fn lower(ast: &Module) -> Lowered {
    lower_with(ast, instructions::lower_instruction)
}

/// Lower through the dispatch rendered before the last opcode existed.
///
/// Panics on that opcode.
pub fn lower_lagging(ast: &Module) -> Lowered {
    lower_with(ast, lagging::lower_instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Constant;

    fn lower_one(instruction: Instruction) -> (Vec<InstructionDef>, ModuleDef, Builder) {
        let ast = Module {
            instructions: vec![instruction.clone()],
        };
        let mut mdef = ModuleDef::default();
        let mut b = Builder::default();
        let defs = instructions::lower_instruction(&ast, &mut mdef, &instruction, &mut b);
        (defs, mdef, b)
    }

    #[test]
    fn test_trivial_variant_lowers_to_one_def() {
        let (defs, mdef, b) = lower_one(Instruction::Nop);
        assert_eq!(defs.len(), 1);
        assert!(matches!(defs[0], InstructionDef::Nop));
        assert_eq!(mdef, ModuleDef::default());
        assert_eq!(b, Builder::default());

        let (defs, _, _) = lower_one(Instruction::Ret);
        assert_eq!(defs.len(), 1);
        assert!(matches!(defs[0], InstructionDef::Ret));
    }

    #[test]
    fn test_non_trivial_variants_delegate() {
        let (defs, _, b) = lower_one(Instruction::Jump(300));
        assert!(matches!(defs.as_slice(), [InstructionDef::Jump(300)]));
        assert_eq!(b.jump_targets, vec![300]);

        let (defs, mdef, _) = lower_one(Instruction::Call(7, 2));
        assert!(matches!(defs.as_slice(), [InstructionDef::Call(7, 2)]));
        assert_eq!(mdef.call_sites, 1);

        let (defs, _, _) = lower_one(Instruction::Push(Constant(-1)));
        assert!(matches!(defs.as_slice(), [InstructionDef::Push(-1)]));
    }

    #[test]
    fn test_lagging_dispatch_still_lowers_known_opcodes() {
        let ast = Module {
            instructions: vec![Instruction::Nop, Instruction::Jump(4)],
        };
        let lowered = lower_lagging(&ast);
        assert!(matches!(
            lowered.defs.as_slice(),
            [InstructionDef::Nop, InstructionDef::Jump(4)]
        ));
    }

    #[test]
    #[should_panic(expected = "instruction Ret should have been handled but is not")]
    fn test_unhandled_variant_panics() {
        let ast = Module {
            instructions: vec![Instruction::Nop, Instruction::Ret],
        };
        lower_lagging(&ast);
    }
}
