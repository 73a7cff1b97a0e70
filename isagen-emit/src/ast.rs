//! AST artifacts: the `Instruction` enum and its parse-tree dispatch
//!
//! Trivial opcodes map a grammar rule straight to a payload-free variant
//! through a lookup table. The rest delegate to a hand-written
//! `super::<opcode>::from_parse_tree` living next to the enum.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{last_segment, render, section, EnumEmitter, Emitter};
use crate::ArtifactKind;
use isagen_spec::{CodePaths, Field, OpcodeDescriptor, OpcodeTable, Requirement};

/// Module holding the generated dispatch, declared by the enum artifact
pub const DISPATCH_MODULE: &str = "imp";

const ENUM_REQUIREMENTS: &[Requirement] = &[
    Requirement::defaulted(Field::AstArgs),
    Requirement::required(Field::TrivialAst),
];

const DISPATCH_REQUIREMENTS: &[Requirement] = &[
    Requirement::required(Field::TrivialAst),
    Requirement::defaulted(Field::AstArgs),
];

fn ast_payload(descriptor: &OpcodeDescriptor) -> Vec<String> {
    descriptor.ast_args().to_vec()
}

/// Trivial AST construction has no constructor to build a payload
fn validate_trivial(descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
    if descriptor.trivial_ast() && !descriptor.ast_args().is_empty() {
        return Err("has trivial_ast set but carries ast_args".to_string());
    }
    Ok(())
}

// ============================================================================
// Enum artifact
// ============================================================================

/// Module declarations and imports ahead of the enum
struct AstModulesEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for AstModulesEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        ENUM_REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![Fragment::line(format!("mod {};", DISPATCH_MODULE))]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if descriptor.trivial_ast() {
            return Vec::new();
        }
        vec![Fragment::line(format!("mod {};", descriptor.module_name()))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        self.paths
            .ast_imports
            .iter()
            .map(|import| Fragment::line(format!("use {};", import)))
            .collect()
    }
}

pub fn generate_enum(table: &OpcodeTable, paths: &CodePaths) -> Result<String> {
    render(
        ArtifactKind::AstEnum,
        table,
        vec![
            section(AstModulesEmitter { paths }),
            section(EnumEmitter::new(
                "Debug, Clone",
                "Instruction",
                ast_payload,
                ENUM_REQUIREMENTS,
            )),
        ],
    )
}

// ============================================================================
// Dispatch artifact
// ============================================================================

/// `TRIVIAL_RULES`: grammar rule to payload-free variant
struct TrivialRulesEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for TrivialRulesEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        DISPATCH_REQUIREMENTS
    }

    fn validate(&self, descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
        validate_trivial(descriptor)
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        let rule = last_segment(&self.paths.rule);
        vec![
            Fragment::line(format!("use {};", self.paths.rule)),
            Fragment::line(format!("use {};", self.paths.ast_error)),
            Fragment::line(format!("use {};", self.paths.ast_result)),
            Fragment::open(format!(
                "const TRIVIAL_RULES: &[({}, super::Instruction)] = &[",
                rule
            )),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if !descriptor.trivial_ast() {
            return Vec::new();
        }
        vec![Fragment::line(format!(
            "({}::{}, super::Instruction::{}),",
            last_segment(&self.paths.rule),
            descriptor.rule_name(),
            descriptor.name
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![Fragment::close("];")]
    }
}

/// `from_parse_tree`: lookup table first, then hand-written constructors
struct ParseDispatchEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for ParseDispatchEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        DISPATCH_REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        let rule = last_segment(&self.paths.rule);
        let result = last_segment(&self.paths.ast_result);
        vec![
            Fragment::open("impl super::Instruction {"),
            Fragment::open(format!(
                "pub(crate) fn from_parse_tree(p: pest::iterators::Pair<'_, {}>) -> {}<Self> {{",
                rule, result
            )),
            Fragment::line("let rule = p.as_rule();"),
            Fragment::open(
                "if let Some((_, instruction)) = TRIVIAL_RULES.iter().find(|(candidate, _)| *candidate == rule) {",
            ),
            Fragment::line("return Ok(instruction.clone());"),
            Fragment::close("}"),
            Fragment::open("match rule {"),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        if descriptor.trivial_ast() {
            return Vec::new();
        }
        vec![Fragment::line(format!(
            "{}::{} => super::{}::from_parse_tree(p),",
            last_segment(&self.paths.rule),
            descriptor.rule_name(),
            descriptor.module_name()
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        let error = last_segment(&self.paths.ast_error);
        vec![
            Fragment::line(format!(
                "_ => Err({}::AstGenerationError(format!(\"invalid rule does not match an instruction {{:?}}\", rule))),",
                error
            )),
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::close("}"),
        ]
    }
}

pub fn generate_dispatch(table: &OpcodeTable, paths: &CodePaths) -> Result<String> {
    render(
        ArtifactKind::AstDispatch,
        table,
        vec![
            section(TrivialRulesEmitter { paths }),
            section(ParseDispatchEmitter { paths }),
        ],
    )
}
