//! Table-wide properties across emitters and the reference codec

use isagen_emit::{generate, ArtifactKind};
use isagen_runtime::{Bytecode, InstructionDef, RuntimeInstruction};
use isagen_spec::{GenConfig, OpcodeTable};
use proptest::prelude::*;

/// One generated opcode: widths of its runtime operands and its terminal flag
#[derive(Clone, Debug)]
struct Op {
    wide: Vec<bool>,
    terminal: bool,
}

fn arb_op() -> impl Strategy<Value = Op> {
    (prop::collection::vec(any::<bool>(), 0..4), any::<bool>())
        .prop_map(|(wide, terminal)| Op { wide, terminal })
}

fn table_json(ops: &[Op]) -> String {
    let records: Vec<String> = ops
        .iter()
        .enumerate()
        .map(|(index, op)| {
            let widths: Vec<&str> = op
                .wide
                .iter()
                .map(|w| if *w { "\"u16\"" } else { "\"u8\"" })
                .collect();
            let writers: Vec<String> = (0..op.wide.len()).map(|i| format!("\"arg{}\"", i)).collect();
            format!(
                r#"{{"name": "Op{}", "trivial_ast": true, "trivial_lowering": false,
                    "runtime_operands": [{}], "operand_writers": [{}], "is_terminal": {}}}"#,
                index,
                widths.join(", "),
                writers.join(", "),
                op.terminal
            )
        })
        .collect();
    format!("[{}]", records.join(", "))
}

fn arb_table() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 1..24)
}

proptest! {
    #[test]
    fn test_grammar_totality(ops in arb_table()) {
        let table = OpcodeTable::from_json_str(&table_json(&ops)).unwrap();
        let grammar = generate(ArtifactKind::Grammar, &table, &GenConfig::default()).unwrap();

        let statement = grammar
            .lines()
            .find(|line| line.starts_with("statement = {"))
            .unwrap();
        let inner = statement
            .trim_start_matches("statement = {")
            .trim_end_matches('}');
        let rules: Vec<&str> = inner.split(" | ").collect();
        let expected: Vec<String> = (0..ops.len()).map(|i| format!("stmt_OP{}", i)).collect();
        prop_assert_eq!(rules, expected.iter().map(String::as_str).collect::<Vec<_>>());

        for (index, _) in ops.iter().enumerate() {
            let production = format!("stmt_OP{} = {{^\"op{}\"}}", index, index);
            prop_assert!(grammar.contains(&production));
        }
    }

    #[test]
    fn test_terminal_correctness(ops in arb_table()) {
        let table = OpcodeTable::from_json_str(&table_json(&ops)).unwrap();

        let def = generate(ArtifactKind::InstructionDef, &table, &GenConfig::default()).unwrap();
        let flags: Vec<String> = ops.iter().map(|op| op.terminal.to_string()).collect();
        let expected = format!("const IS_TERMINAL: &'static [bool] = &[{}];", flags.join(", "));
        prop_assert!(def.contains(&expected));

        for (index, op) in ops.iter().enumerate() {
            let operands = vec![1; op.wide.len()];
            let instr = InstructionDef::new(&table, &format!("Op{}", index), operands).unwrap();
            prop_assert_eq!(instr.is_terminal(), op.terminal);
        }
    }

    #[test]
    fn test_size_consistency(ops in arb_table(), values in prop::collection::vec(any::<u8>(), 4)) {
        let table = OpcodeTable::from_json_str(&table_json(&ops)).unwrap();
        let def = generate(ArtifactKind::InstructionDef, &table, &GenConfig::default()).unwrap();
        let sizes: Vec<String> = ops.iter().map(|op| {
            (1 + op.wide.iter().map(|w| if *w { 2 } else { 1 }).sum::<usize>()).to_string()
        }).collect();
        let expected = format!("const RUNTIME_SIZE: &'static [usize] = &[{}];", sizes.join(", "));
        prop_assert!(def.contains(&expected));

        for (index, op) in ops.iter().enumerate() {
            let operands: Vec<i64> = values[..op.wide.len()].iter().map(|v| *v as i64).collect();
            let instr = InstructionDef::new(&table, &format!("Op{}", index), operands).unwrap();
            let mut bc = Bytecode::new();
            instr.write(&mut bc).unwrap();
            prop_assert_eq!(bc.len(), instr.runtime_size());

            let (decoded, end) = RuntimeInstruction::from_bytecode(&table, &bc, 0).unwrap();
            prop_assert_eq!(end, bc.len());
            prop_assert_eq!(decoded.opcode() as usize, index);
        }
    }

    #[test]
    fn test_append_keeps_generated_ordinals(ops in arb_table(), extra in arb_table()) {
        let before = OpcodeTable::from_json_str(&table_json(&ops)).unwrap();
        let mut grown = ops.clone();
        grown.extend(extra);
        let after = OpcodeTable::from_json_str(&table_json(&grown)).unwrap();

        let config = GenConfig::default();
        let old = generate(ArtifactKind::Opcodes, &before, &config).unwrap();
        let new = generate(ArtifactKind::Opcodes, &after, &config).unwrap();
        for index in 0..ops.len() {
            let line = format!("    Op{} = {},\n", index, index);
            prop_assert!(old.contains(&line));
            prop_assert!(new.contains(&line));
        }
        let sentinel = format!("    MAX = {},\n", grown.len());
        prop_assert!(new.contains(&sentinel));
    }
}
