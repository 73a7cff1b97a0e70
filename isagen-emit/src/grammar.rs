//! Grammar artifact
//!
//! One pest production per opcode matching its keyword case-insensitively,
//! then a `statement` alternation over all of them. pest alternation is
//! ordered (first match wins), so the alternation keeps table order.

use crate::error::Result;
use crate::formatter::Fragment;
use crate::pipeline::{render, section, Emitter};
use isagen_spec::{Field, OpcodeDescriptor, OpcodeTable, Requirement};

/// Name of the top-level alternation rule
pub const STATEMENT_RULE: &str = "statement";

const REQUIREMENTS: &[Requirement] = &[Requirement::defaulted(Field::PestArgs)];

#[derive(Debug, Default)]
pub struct GrammarEmitter {
    rules: Vec<String>,
}

impl GrammarEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Emitter for GrammarEmitter {
    fn requirements(&self) -> &'static [Requirement] {
        REQUIREMENTS
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        let rule = descriptor.rule_name();
        let operands = descriptor
            .pest_args()
            .map(|args| format!(" ~ {}", args))
            .unwrap_or_default();
        let production = format!("{} = {{^\"{}\"{}}}", rule, descriptor.keyword(), operands);
        self.rules.push(rule);
        vec![Fragment::line(production)]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![Fragment::line(format!(
            "{} = {{{}}}",
            STATEMENT_RULE,
            self.rules.join(" | ")
        ))]
    }
}

pub fn generate(table: &OpcodeTable) -> Result<String> {
    render(
        crate::ArtifactKind::Grammar,
        table,
        vec![section(GrammarEmitter::new())],
    )
}
