//! Render every artifact for `ops.json`
//!
//! Rust artifacts land in OUT_DIR under the directory their `mod` lines
//! expect, next to copies of the hand-written per-opcode modules. The grammar
//! is refreshed in `src/grammar/ops.pest`, where `pest_derive` reads it.
//!
//! A second lowering dispatch is rendered from the table without its last
//! opcode: the dispatch as it stood before that opcode was appended.

use anyhow::{Context, Result};
use isagen_emit::{generate, ArtifactKind};
use isagen_spec::{CodePaths, GenConfig, OpcodeTable};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const TABLE: &str = "ops.json";
const GRAMMAR: &str = "src/grammar/ops.pest";

const GENERATED: [(ArtifactKind, &str); 6] = [
    (ArtifactKind::AstEnum, "ast/instructions/mod.rs"),
    (ArtifactKind::AstDispatch, "ast/instructions/imp.rs"),
    (ArtifactKind::Lowering, "lowering/instructions/mod.rs"),
    (ArtifactKind::InstructionDef, "instruction_def.rs"),
    (ArtifactKind::RuntimeDecoder, "instruction_runtime.rs"),
    (ArtifactKind::Opcodes, "opcodes.rs"),
];

const LAGGING_LOWERING: &str = "lagging/lowering/instructions";

/// Hand-written module directory, and every OUT_DIR directory it is copied to
const HANDWRITTEN: [(&str, &[&str]); 2] = [
    ("handwritten/ast", &["ast/instructions"]),
    ("handwritten/lowering", &["lowering/instructions", LAGGING_LOWERING]),
];

fn config() -> GenConfig {
    GenConfig {
        paths: CodePaths {
            instruction_def: "crate::instruction_def::InstructionDef".to_string(),
            module: "crate::ast::Module".to_string(),
            module_def: "crate::lowering::ModuleDef".to_string(),
            builder: "crate::lowering::Builder".to_string(),
            ast_imports: vec!["crate::ast::Constant".to_string()],
            ..CodePaths::default()
        },
        ..GenConfig::default()
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// The table as it stood before its last opcode was appended
fn lagging_table(json: &str) -> Result<OpcodeTable> {
    let mut records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    records.pop();
    Ok(OpcodeTable::from_json_str(&serde_json::to_string(&records)?)?)
}

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let table_path = manifest_dir.join(TABLE);
    println!("cargo:rerun-if-changed={}", table_path.display());

    let json = fs::read_to_string(&table_path)
        .with_context(|| format!("failed to read {}", table_path.display()))?;
    let table = OpcodeTable::from_json_str(&json)
        .with_context(|| format!("failed to load {}", table_path.display()))?;
    let config = config();

    for (kind, file_name) in GENERATED {
        let text = generate(kind, &table, &config)
            .with_context(|| format!("failed to generate {}", kind))?;
        write_file(&out_dir.join(file_name), &text)?;
    }

    let lagging = lagging_table(&json).context("failed to trim the table")?;
    let text = generate(ArtifactKind::Lowering, &lagging, &config)
        .context("failed to generate the lagging lowering dispatch")?;
    write_file(&out_dir.join(LAGGING_LOWERING).join("mod.rs"), &text)?;

    for (source, targets) in HANDWRITTEN {
        let source = manifest_dir.join(source);
        println!("cargo:rerun-if-changed={}", source.display());
        for entry in fs::read_dir(&source)
            .with_context(|| format!("failed to list {}", source.display()))?
        {
            let path = entry?.path();
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            for target in targets {
                write_file(&out_dir.join(target).join(file_name), &text)?;
            }
        }
    }

    // Only touch the checked-in grammar when it drifted from the table.
    let grammar = generate(ArtifactKind::Grammar, &table, &config)
        .context("failed to generate the grammar")?;
    let grammar_path = manifest_dir.join(GRAMMAR);
    if fs::read_to_string(&grammar_path).ok().as_deref() != Some(grammar.as_str()) {
        println!("cargo:warning=refreshing {}", grammar_path.display());
        write_file(&grammar_path, &grammar)?;
    }
    Ok(())
}
