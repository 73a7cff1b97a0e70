//! Lowering dispatch artifact
//!
//! Maps each AST instruction to build-time instruction definitions. Trivial
//! opcodes lower through a discriminant lookup to the same-named payload-free
//! definition; the rest go to a hand-written `<opcode>::lower_instruction`.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{any_payload, last_segment, render, section, Emitter};
use crate::ArtifactKind;
use isagen_spec::{CodePaths, Field, OpcodeDescriptor, OpcodeTable, Requirement};

const REQUIREMENTS: &[Requirement] = &[
    Requirement::required(Field::TrivialLowering),
    Requirement::defaulted(Field::AstArgs),
    Requirement::defaulted(Field::BuilderOperands),
    Requirement::defaulted(Field::RuntimeOperands),
];

/// Module declarations, imports and `TRIVIAL_LOWERING`
struct TrivialLoweringEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for TrivialLoweringEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn validate(&self, descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
        if !descriptor.trivial_lowering() {
            return Ok(());
        }
        if !descriptor.ast_args().is_empty() {
            return Err("has trivial_lowering set but carries ast_args".to_string());
        }
        if !descriptor.builder_operands().is_empty() {
            return Err("has trivial_lowering set but carries builder operands".to_string());
        }
        Ok(())
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if descriptor.trivial_lowering() {
            return Vec::new();
        }
        vec![Fragment::line(format!("mod {};", descriptor.module_name()))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        let p = self.paths;
        vec![
            Fragment::line(format!("use {};", p.instruction)),
            Fragment::line(format!("use {};", p.module)),
            Fragment::line(format!("use {};", p.instruction_def)),
            Fragment::line(format!("use {};", p.module_def)),
        ]
    }
}

/// Entries of `TRIVIAL_LOWERING`
struct TrivialTableEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for TrivialTableEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![Fragment::open(format!(
            "const TRIVIAL_LOWERING: &[({}, {})] = &[",
            last_segment(&self.paths.instruction),
            last_segment(&self.paths.instruction_def)
        ))]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if !descriptor.trivial_lowering() {
            return Vec::new();
        }
        vec![Fragment::line(format!(
            "({}::{name}, {}::{name}),",
            last_segment(&self.paths.instruction),
            last_segment(&self.paths.instruction_def),
            name = descriptor.name
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![Fragment::close("];")]
    }
}

/// `lower_instruction`: discriminant lookup, then hand-written lowering
struct LowerDispatchEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for LowerDispatchEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        let p = self.paths;
        vec![
            Fragment::open(format!(
                "pub(crate) fn lower_instruction(ast: &{}, mdef: &mut {}, input: &{}, b: &mut {}) -> Vec<{}> {{",
                last_segment(&p.module),
                last_segment(&p.module_def),
                last_segment(&p.instruction),
                p.builder,
                last_segment(&p.instruction_def)
            )),
            Fragment::line("let tag = std::mem::discriminant(input);"),
            Fragment::open(
                "if let Some((_, def)) = TRIVIAL_LOWERING.iter().find(|(candidate, _)| std::mem::discriminant(candidate) == tag) {",
            ),
            Fragment::line("return vec![def.clone()];"),
            Fragment::close("}"),
            Fragment::open("match input {"),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if descriptor.trivial_lowering() {
            return Vec::new();
        }
        vec![Fragment::line(format!(
            "{}::{}{} => {}::lower_instruction(ast, mdef, input, b),",
            last_segment(&self.paths.instruction),
            descriptor.name,
            any_payload(!descriptor.ast_args().is_empty()),
            descriptor.module_name()
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line(
                "_ => panic!(\"instruction {:?} should have been handled but is not\", input),",
            ),
            Fragment::close("}"),
            Fragment::close("}"),
        ]
    }
}

pub fn generate(table: &OpcodeTable, paths: &CodePaths) -> Result<String> {
    render(
        ArtifactKind::Lowering,
        table,
        vec![
            section(TrivialLoweringEmitter { paths }),
            section(TrivialTableEmitter { paths }),
            section(LowerDispatchEmitter { paths }),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmitError;

    fn table() -> OpcodeTable {
        OpcodeTable::from_json_str(
            r#"[
            {"name": "NOP", "trivial_lowering": true},
            {"name": "PUSH", "trivial_lowering": false, "ast_args": ["Constant"],
             "builder_operands": ["i64"], "runtime_operands": ["u8"], "operand_writers": ["arg0 as u8"]},
            {"name": "LEAVE", "trivial_lowering": false}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lowering() {
        let out = generate(&table(), &CodePaths::default()).unwrap();
        let body: Vec<&str> = out.lines().skip(2).collect();
        assert_eq!(
            body,
            vec![
                "mod push;",
                "mod leave;",
                "use crate::ast::instructions::Instruction;",
                "use crate::ast::module::Module;",
                "use runtime::instruction_def::InstructionDef;",
                "use runtime::module_definition::ModuleDef;",
                "const TRIVIAL_LOWERING: &[(Instruction, InstructionDef)] = &[",
                "    (Instruction::NOP, InstructionDef::NOP),",
                "];",
                "pub(crate) fn lower_instruction(ast: &Module, mdef: &mut ModuleDef, input: &Instruction, b: &mut runtime::builder::Builder) -> Vec<InstructionDef> {",
                "    let tag = std::mem::discriminant(input);",
                "    if let Some((_, def)) = TRIVIAL_LOWERING.iter().find(|(candidate, _)| std::mem::discriminant(candidate) == tag) {",
                "        return vec![def.clone()];",
                "    }",
                "    match input {",
                "        Instruction::PUSH(..) => push::lower_instruction(ast, mdef, input, b),",
                "        Instruction::LEAVE => leave::lower_instruction(ast, mdef, input, b),",
                "        _ => panic!(\"instruction {:?} should have been handled but is not\", input),",
                "    }",
                "}",
            ]
        );
    }

    #[test]
    fn test_trivial_lowering_needs_empty_payloads() {
        let table = OpcodeTable::from_json_str(
            r#"[{"name": "JUMP", "trivial_lowering": true, "runtime_operands": ["u16"], "operand_writers": ["arg0"]}]"#,
        )
        .unwrap();
        let err = generate(&table, &CodePaths::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lowering dispatch: opcode JUMP has trivial_lowering set but carries builder operands"
        );
    }

    #[test]
    fn test_missing_trivial_lowering() {
        let table = OpcodeTable::from_json_str(r#"[{"name": "NOP"}]"#).unwrap();
        let err = generate(&table, &CodePaths::default()).unwrap_err();
        assert!(matches!(err, EmitError::Validation { artifact: ArtifactKind::Lowering, .. }));
    }
}
