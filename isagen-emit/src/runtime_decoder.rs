//! Runtime decoder artifact
//!
//! `RuntimeInstruction` carries wire-typed operands. `from_bytecode` reads
//! one instruction at an offset and returns it with the offset just past it,
//! or `None` for an unknown opcode or a truncated stream.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{last_segment, render, section, tuple, EnumEmitter, Emitter};
use crate::ArtifactKind;
use isagen_spec::{CodePaths, Field, OpcodeDescriptor, OpcodeTable, Requirement, OPCODE_BYTES};

const REQUIREMENTS: &[Requirement] = &[Requirement::defaulted(Field::RuntimeOperands)];

const ENUM_NAME: &str = "RuntimeInstruction";

fn wire_payload(descriptor: &OpcodeDescriptor) -> Vec<String> {
    descriptor
        .runtime_operands()
        .iter()
        .map(|width| width.rust_type().to_string())
        .collect()
}

struct DecodeEmitter<'a> {
    paths: &'a CodePaths,
}

impl DecodeEmitter<'_> {
    fn opcode_type(&self) -> &str {
        last_segment(&self.paths.opcode)
    }
}

impl Emitter for DecodeEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::open(format!("impl {} {{", ENUM_NAME)),
            Fragment::line("/// Decode the instruction at `i`, with the offset just past it"),
            Fragment::open(format!(
                "pub fn from_bytecode(bc: &{}, i: usize) -> Option<({}, usize)> {{",
                last_segment(&self.paths.bytecode),
                ENUM_NAME
            )),
            Fragment::open("if i >= bc.len() {"),
            Fragment::line("return None;"),
            Fragment::close("}"),
            Fragment::line("let mut idx = i;"),
            Fragment::line(format!(
                "let opcode = {}::from_u8(bc.read_u8(idx))?;",
                self.opcode_type()
            )),
            Fragment::line(format!("idx += {};", OPCODE_BYTES)),
            Fragment::open("match opcode {"),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        let operands = descriptor.runtime_operands();
        let arm = format!("{}::{} =>", self.opcode_type(), descriptor.name);
        if operands.is_empty() {
            return vec![Fragment::line(format!(
                "{} Some(({}::{}, idx)),",
                arm, ENUM_NAME, descriptor.name
            ))];
        }

        let operand_bytes = descriptor.wire_size() - OPCODE_BYTES;
        let mut fragments = vec![
            Fragment::open(format!("{} {{", arm)),
            Fragment::open(format!("if bc.len() < idx + {} {{", operand_bytes)),
            Fragment::line("return None;"),
            Fragment::close("}"),
        ];
        let mut args = Vec::with_capacity(operands.len());
        for (index, width) in operands.iter().enumerate() {
            fragments.push(Fragment::line(format!(
                "let arg{} = bc.{}(idx);",
                index,
                width.reader()
            )));
            fragments.push(Fragment::line(format!("idx += {};", width.size())));
            args.push(format!("arg{}", index));
        }
        fragments.push(Fragment::line(format!(
            "Some(({}::{}{}, idx))",
            ENUM_NAME,
            descriptor.name,
            tuple(&args)
        )));
        fragments.push(Fragment::close("}"));
        fragments
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line(format!("{}::MAX => None,", self.opcode_type())),
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::close("}"),
        ]
    }
}

struct ImportEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for ImportEmitter<'_> {
    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line(format!("use {};", self.paths.bytecode)),
            Fragment::line(format!("use {};", self.paths.opcode)),
        ]
    }

    fn opcode(&mut self, _descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        Vec::new()
    }
}

pub fn generate(table: &OpcodeTable, paths: &CodePaths) -> Result<String> {
    render(
        ArtifactKind::RuntimeDecoder,
        table,
        vec![
            section(ImportEmitter { paths }),
            section(EnumEmitter::new(
                "Debug, Clone, PartialEq, Eq",
                ENUM_NAME,
                wire_payload,
                REQUIREMENTS,
            )),
            section(DecodeEmitter { paths }),
        ],
    )
}
