//! Opcode ordinal artifact
//!
//! A `#[repr(u8)]` enum with explicit discriminants equal to table position,
//! plus a trailing `MAX` sentinel one past the last real opcode. The enum is
//! named after the last segment of the configured opcode path.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{last_segment, render, section, Emitter};
use crate::ArtifactKind;
use isagen_spec::{CodePaths, OpcodeDescriptor, OpcodeTable};

/// Sentinel variant name
pub const SENTINEL: &str = "MAX";

/// Associated items of the generated enum; opcodes may not shadow them
const RESERVED: &[&str] = &[SENTINEL, "ALL"];

struct OpcodeEnumEmitter<'a> {
    name: &'a str,
    next: usize,
    names: Vec<String>,
}

impl Emitter for OpcodeEnumEmitter<'_> {
    fn validate(&self, descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
        if RESERVED.contains(&descriptor.name.as_str()) {
            return Err(format!("uses the reserved name {}", descriptor.name));
        }
        Ok(())
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line("#[repr(u8)]"),
            Fragment::line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]"),
            Fragment::open(format!("pub enum {} {{", self.name)),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        self.next = descriptor.ordinal as usize + 1;
        self.names.push(format!("{}::{}", self.name, descriptor.name));
        vec![Fragment::line(format!(
            "{} = {},",
            descriptor.name, descriptor.ordinal
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line(format!("{} = {},", SENTINEL, self.next)),
            Fragment::close("}"),
            Fragment::open(format!("impl {} {{", self.name)),
            Fragment::line("/// Every real opcode, indexed by ordinal"),
            Fragment::line(format!(
                "pub const ALL: &'static [{}] = &[{}];",
                self.name,
                self.names.join(", ")
            )),
            Fragment::line("/// Checked conversion; `None` at or past `MAX`"),
            Fragment::open("pub fn from_u8(value: u8) -> Option<Self> {"),
            Fragment::line("Self::ALL.get(value as usize).copied()"),
            Fragment::close("}"),
            Fragment::open("pub const fn to_u8(self) -> u8 {"),
            Fragment::line("self as u8"),
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::open(format!("impl From<u8> for {} {{", self.name)),
            Fragment::line(format!(
                "/// Panics on a value at or past `MAX`; use `{}::from_u8` for untrusted input",
                self.name
            )),
            Fragment::open("fn from(value: u8) -> Self {"),
            Fragment::open("match Self::from_u8(value) {"),
            Fragment::line("Some(opcode) => opcode,"),
            Fragment::line("None => panic!(\"invalid opcode {}\", value),"),
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::close("}"),
            Fragment::open(format!("impl From<{}> for u8 {{", self.name)),
            Fragment::open(format!("fn from(opcode: {}) -> u8 {{", self.name)),
            Fragment::line("opcode.to_u8()"),
            Fragment::close("}"),
            Fragment::close("}"),
        ]
    }
}

pub fn generate(table: &OpcodeTable, paths: &CodePaths) -> Result<String> {
    render(
        ArtifactKind::Opcodes,
        table,
        vec![section(OpcodeEnumEmitter {
            name: last_segment(&paths.opcode),
            next: 0,
            names: Vec::with_capacity(table.len()),
        })],
    )
}
