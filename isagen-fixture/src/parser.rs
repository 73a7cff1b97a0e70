//! Parser for the fixture assembly language

use crate::ast::{Instruction, Module};
use crate::result::{AssemblerError, AssemblerResult};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "src/grammar/common.pest"]
#[grammar = "src/grammar/ops.pest"]
pub struct FixtureGrammar;

/// Parse a program, one statement per line, into a [`Module`]
pub fn assemble(source: &str) -> AssemblerResult<Module> {
    let program = FixtureGrammar::parse(Rule::program, source)
        .map_err(|err| AssemblerError::ParseError(err.to_string()))?;

    let mut instructions = Vec::new();
    for statement in program.flatten().filter(|pair| pair.as_rule() == Rule::statement) {
        let stmt = statement
            .into_inner()
            .next()
            .ok_or_else(|| AssemblerError::ParseError("empty statement".to_string()))?;
        instructions.push(Instruction::from_parse_tree(stmt)?);
    }
    Ok(Module { instructions })
}
