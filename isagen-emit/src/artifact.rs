//! The seven generated artifacts

use crate::error::{EmitError, Result};
use crate::{ast, grammar, instruction_def, lowering, opcodes, runtime_decoder};
use isagen_spec::{GenConfig, OpcodeTable, OutputPaths};
use std::fmt;
use std::path::{Path, PathBuf};

/// Artifact identity, in fixed emission order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Grammar,
    AstEnum,
    AstDispatch,
    Lowering,
    InstructionDef,
    RuntimeDecoder,
    Opcodes,
}

impl ArtifactKind {
    /// Total number of artifacts
    pub const COUNT: usize = 7;

    pub const ALL: [ArtifactKind; Self::COUNT] = [
        ArtifactKind::Grammar,
        ArtifactKind::AstEnum,
        ArtifactKind::AstDispatch,
        ArtifactKind::Lowering,
        ArtifactKind::InstructionDef,
        ArtifactKind::RuntimeDecoder,
        ArtifactKind::Opcodes,
    ];

    /// Configured destination of this artifact
    pub fn output_path(self, outputs: &OutputPaths) -> &Path {
        match self {
            ArtifactKind::Grammar => &outputs.grammar,
            ArtifactKind::AstEnum => &outputs.ast_enum,
            ArtifactKind::AstDispatch => &outputs.ast_dispatch,
            ArtifactKind::Lowering => &outputs.lowering,
            ArtifactKind::InstructionDef => &outputs.instruction_def,
            ArtifactKind::RuntimeDecoder => &outputs.runtime_decoder,
            ArtifactKind::Opcodes => &outputs.opcodes,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Grammar => "grammar",
            ArtifactKind::AstEnum => "ast enum",
            ArtifactKind::AstDispatch => "ast dispatch",
            ArtifactKind::Lowering => "lowering dispatch",
            ArtifactKind::InstructionDef => "instruction definition",
            ArtifactKind::RuntimeDecoder => "runtime decoder",
            ArtifactKind::Opcodes => "opcode ordinals",
        };
        write!(f, "{}", name)
    }
}

/// One rendered artifact and where it belongs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub text: String,
}

/// Render one artifact
pub fn generate(kind: ArtifactKind, table: &OpcodeTable, config: &GenConfig) -> Result<String> {
    if table.is_empty() {
        return Err(EmitError::EmptyTable);
    }
    let paths = &config.paths;
    match kind {
        ArtifactKind::Grammar => grammar::generate(table),
        ArtifactKind::AstEnum => ast::generate_enum(table, paths),
        ArtifactKind::AstDispatch => ast::generate_dispatch(table, paths),
        ArtifactKind::Lowering => lowering::generate(table, paths),
        ArtifactKind::InstructionDef => instruction_def::generate(table, paths),
        ArtifactKind::RuntimeDecoder => runtime_decoder::generate(table, paths),
        ArtifactKind::Opcodes => opcodes::generate(table, paths),
    }
}

/// Render every artifact in memory; nothing is returned unless all succeed
pub fn generate_all(table: &OpcodeTable, config: &GenConfig) -> Result<Vec<Artifact>> {
    config.validate()?;
    ArtifactKind::ALL
        .iter()
        .map(|&kind| {
            Ok(Artifact {
                kind,
                path: kind.output_path(&config.outputs).to_path_buf(),
                text: generate(kind, table, config)?,
            })
        })
        .collect()
}
