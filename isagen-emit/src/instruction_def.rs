//! Build-time instruction definition artifact
//!
//! `InstructionDef` carries builder operands and knows its opcode, its encoded
//! size, whether it ends a basic block, and how to write itself. Size and
//! terminal flags are table lookups indexed by ordinal.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{any_payload, last_segment, render, section, EnumEmitter, Emitter};
use crate::ArtifactKind;
use isagen_spec::{
    CodePaths, Field, OpcodeDescriptor, OpcodeTable, OperandWriter, Requirement, SpecError,
};

const REQUIREMENTS: &[Requirement] = &[
    Requirement::defaulted(Field::RuntimeOperands),
    Requirement::required(Field::OperandWriters),
    Requirement::defaulted(Field::BuilderOperands),
    Requirement::defaulted(Field::IsTerminal),
];

const ENUM_NAME: &str = "InstructionDef";

fn builder_payload(descriptor: &OpcodeDescriptor) -> Vec<String> {
    descriptor
        .builder_operands()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Whether `source` mentions `argN` as a whole identifier
fn mentions_arg(source: &str, index: usize) -> bool {
    let name = format!("arg{}", index);
    source.match_indices(&name).any(|(at, _)| {
        let before = source[..at].chars().next_back();
        let after = source[at + name.len()..].chars().next();
        let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Pattern binding the builder operands a writer reads, `_` for the rest
fn write_pattern(descriptor: &OpcodeDescriptor) -> String {
    let operands = descriptor.builder_operands();
    if operands.is_empty() {
        return String::new();
    }
    let writers = descriptor.operand_writers();
    let bindings: Vec<String> = (0..operands.len())
        .map(|index| {
            let used = writers.iter().any(|writer| match writer {
                OperandWriter::Opaque(source) => mentions_arg(source, index),
                typed => typed.arg_index() == Some(index),
            });
            if used {
                format!("arg{}", index)
            } else {
                "_".to_string()
            }
        })
        .collect();
    format!("({})", bindings.join(", "))
}

/// Opcode, size and terminal lookups
struct LookupEmitter<'a> {
    paths: &'a CodePaths,
    sizes: Vec<String>,
    terminals: Vec<String>,
}

impl Emitter for LookupEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn validate(&self, descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
        match descriptor.check_passthrough() {
            Err(SpecError::WriterNeedsCast {
                position,
                index,
                ty,
                width,
                ..
            }) => Err(format!(
                "writes {} operand {} from builder operand {} of type {} and needs a cast",
                width, position, index, ty
            )),
            Err(err) => Err(err.to_string()),
            Ok(()) => Ok(()),
        }
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::open(format!("impl {} {{", ENUM_NAME)),
            Fragment::open(format!(
                "pub fn opcode(&self) -> {} {{",
                last_segment(&self.paths.opcode)
            )),
            Fragment::open("match self {"),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        self.sizes.push(descriptor.wire_size().to_string());
        self.terminals.push(descriptor.is_terminal().to_string());
        vec![Fragment::line(format!(
            "{}::{}{} => {}::{},",
            ENUM_NAME,
            descriptor.name,
            any_payload(!descriptor.builder_operands().is_empty()),
            last_segment(&self.paths.opcode),
            descriptor.name
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::line(format!(
                "const RUNTIME_SIZE: &'static [usize] = &[{}];",
                self.sizes.join(", ")
            )),
            Fragment::line(format!(
                "const IS_TERMINAL: &'static [bool] = &[{}];",
                self.terminals.join(", ")
            )),
            Fragment::line("/// Encoded size in bytes, opcode included"),
            Fragment::open("pub fn runtime_size(&self) -> usize {"),
            Fragment::line("Self::RUNTIME_SIZE[self.opcode().to_u8() as usize]"),
            Fragment::close("}"),
            Fragment::line("/// Whether this instruction ends a basic block"),
            Fragment::open("pub fn is_terminal(&self) -> bool {"),
            Fragment::line("Self::IS_TERMINAL[self.opcode().to_u8() as usize]"),
            Fragment::close("}"),
        ]
    }
}

/// `write`: opcode byte, then each runtime operand from its writer
struct WriteEmitter<'a> {
    paths: &'a CodePaths,
}

impl Emitter for WriteEmitter<'_> {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::open(format!(
                "pub fn write(&self, bc: &mut {}) {{",
                last_segment(&self.paths.bytecode)
            )),
            Fragment::line("bc.write_u8(self.opcode().to_u8());"),
            Fragment::open("match self {"),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        let arm = format!("{}::{}{} =>", ENUM_NAME, descriptor.name, write_pattern(descriptor));
        let writes: Vec<Fragment> = descriptor
            .operand_writers()
            .iter()
            .zip(descriptor.runtime_operands())
            .map(|(writer, width)| Fragment::line(format!("bc.{}({});", width.writer(), writer)))
            .collect();
        if writes.is_empty() {
            return vec![Fragment::line(format!("{} {{}}", arm))];
        }
        let mut fragments = vec![Fragment::open(format!("{} {{", arm))];
        fragments.extend(writes);
        fragments.push(Fragment::close("}"));
        fragments
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::close("}"),
        ]
    }
}

/// Imports ahead of the enum
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
        ArtifactKind::InstructionDef,
        table,
        vec![
            section(ImportEmitter { paths }),
            section(EnumEmitter::new(
                "Debug, Clone",
                ENUM_NAME,
                builder_payload,
                REQUIREMENTS,
            )),
            section(LookupEmitter {
                paths,
                sizes: Vec::new(),
                terminals: Vec::new(),
            }),
            section(WriteEmitter { paths }),
        ],
    )
}
