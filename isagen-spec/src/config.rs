//! # Generator Configuration
//!
//! Where the table lives, where each artifact is written, and which Rust
//! paths the generated code refers to. Every field has a default, so an
//! empty (or absent) config file reproduces the fixed layout.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Opcode table (JSON array of descriptors)
    pub table: PathBuf,
    /// Published ordinal manifest
    pub manifest: PathBuf,
    pub outputs: OutputPaths,
    pub paths: CodePaths,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            table: PathBuf::from("ops.json"),
            manifest: PathBuf::from("ops.lock.json"),
            outputs: OutputPaths::default(),
            paths: CodePaths::default(),
        }
    }
}

/// Destination of each of the seven artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub grammar: PathBuf,
    pub ast_enum: PathBuf,
    pub ast_dispatch: PathBuf,
    pub lowering: PathBuf,
    pub instruction_def: PathBuf,
    pub runtime_decoder: PathBuf,
    pub opcodes: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            grammar: PathBuf::from("assembler/src/ops.pest"),
            ast_enum: PathBuf::from("assembler/src/ast/instructions/mod.rs"),
            ast_dispatch: PathBuf::from("assembler/src/ast/instructions/imp.rs"),
            lowering: PathBuf::from("assembler/src/lowering/instructions/mod.rs"),
            instruction_def: PathBuf::from("runtime/src/instruction_def.rs"),
            runtime_decoder: PathBuf::from("runtime/src/instruction_runtime.rs"),
            opcodes: PathBuf::from("runtime/src/opcodes.rs"),
        }
    }
}

impl OutputPaths {
    /// All destinations, in emission order
    pub fn all(&self) -> [&Path; 7] {
        [
            &self.grammar,
            &self.ast_enum,
            &self.ast_dispatch,
            &self.lowering,
            &self.instruction_def,
            &self.runtime_decoder,
            &self.opcodes,
        ]
    }
}

/// Rust paths referenced by generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodePaths {
    /// Byte buffer with `write_u8`/`write_u16`/`read_u8`/`read_u16`/`len`
    pub bytecode: String,
    /// The generated ordinal enum
    pub opcode: String,
    /// Grammar rule enum produced by the parser derive
    pub rule: String,
    /// Result alias returned by AST construction
    pub ast_result: String,
    /// Error enum carrying `AstGenerationError(String)`
    pub ast_error: String,
    /// AST instruction enum, as seen from the lowering module
    pub instruction: String,
    /// Build-time instruction enum, as seen from the lowering module
    pub instruction_def: String,
    /// Lowering context: parsed module
    pub module: String,
    /// Lowering context: module definition under construction
    pub module_def: String,
    /// Lowering context: bytecode builder
    pub builder: String,
    /// Extra `use` lines placed in the AST enum artifact
    pub ast_imports: Vec<String>,
}

impl Default for CodePaths {
    fn default() -> Self {
        Self {
            bytecode: "crate::bytecode::Bytecode".to_string(),
            opcode: "crate::opcodes::Opcode".to_string(),
            rule: "crate::parser::Rule".to_string(),
            ast_result: "crate::result::AssemblerResult".to_string(),
            ast_error: "crate::result::AssemblerError".to_string(),
            instruction: "crate::ast::instructions::Instruction".to_string(),
            instruction_def: "runtime::instruction_def::InstructionDef".to_string(),
            module: "crate::ast::module::Module".to_string(),
            module_def: "runtime::module_definition::ModuleDef".to_string(),
            builder: "runtime::builder::Builder".to_string(),
            ast_imports: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Two artifacts would be written to the same file
    DuplicateOutput,
    /// An artifact would overwrite the table or the manifest
    OutputShadowsInput,
    /// A code path is empty
    EmptyCodePath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateOutput => write!(f, "two artifacts share one output path"),
            ConfigError::OutputShadowsInput => {
                write!(f, "an artifact output path equals the table or manifest path")
            }
            ConfigError::EmptyCodePath => write!(f, "a generated code path is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GenConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for output in self.outputs.all() {
            if !seen.insert(output) {
                return Err(ConfigError::DuplicateOutput);
            }
            if output == self.table.as_path() || output == self.manifest.as_path() {
                return Err(ConfigError::OutputShadowsInput);
            }
        }

        let p = &self.paths;
        let required = [
            &p.bytecode,
            &p.opcode,
            &p.rule,
            &p.ast_result,
            &p.ast_error,
            &p.instruction,
            &p.instruction_def,
            &p.module,
            &p.module_def,
            &p.builder,
        ];
        if required.iter().any(|path| path.trim().is_empty()) {
            return Err(ConfigError::EmptyCodePath);
        }
        Ok(())
    }

    /// Resolve every relative file path against `root`
    pub fn resolved(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| root.join(p);
        Self {
            table: join(&self.table),
            manifest: join(&self.manifest),
            outputs: OutputPaths {
                grammar: join(&self.outputs.grammar),
                ast_enum: join(&self.outputs.ast_enum),
                ast_dispatch: join(&self.outputs.ast_dispatch),
                lowering: join(&self.outputs.lowering),
                instruction_def: join(&self.outputs.instruction_def),
                runtime_decoder: join(&self.outputs.runtime_decoder),
                opcodes: join(&self.outputs.opcodes),
            },
            paths: self.paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GenConfig =
            serde_json::from_str(r#"{"table": "isa/ops.json", "paths": {"bytecode": "crate::bc::Bc"}}"#)
                .unwrap();
        assert_eq!(config.table, PathBuf::from("isa/ops.json"));
        assert_eq!(config.manifest, PathBuf::from("ops.lock.json"));
        assert_eq!(config.paths.bytecode, "crate::bc::Bc");
        assert_eq!(config.paths.opcode, "crate::opcodes::Opcode");
        assert_eq!(config.outputs, OutputPaths::default());
    }

    #[test]
    fn test_duplicate_output() {
        let mut config = GenConfig::default();
        config.outputs.opcodes = config.outputs.grammar.clone();
        assert_eq!(config.validate(), Err(ConfigError::DuplicateOutput));
    }

    #[test]
    fn test_output_shadows_table() {
        let mut config = GenConfig::default();
        config.outputs.grammar = config.table.clone();
        assert_eq!(config.validate(), Err(ConfigError::OutputShadowsInput));
    }

    #[test]
    fn test_empty_code_path() {
        let mut config = GenConfig::default();
        config.paths.builder = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCodePath));
    }

    #[test]
    fn test_resolved() {
        let config = GenConfig::default().resolved(Path::new("/work"));
        assert_eq!(config.table, PathBuf::from("/work/ops.json"));
        assert_eq!(
            config.outputs.opcodes,
            PathBuf::from("/work/runtime/src/opcodes.rs")
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::DuplicateOutput.to_string(),
            "two artifacts share one output path"
        );
    }
}
