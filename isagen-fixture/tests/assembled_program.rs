//! Source text through every generated artifact, checked against the reference codec

use isagen_fixture::{assemble, lower, Bytecode, InstructionDef, RuntimeInstruction};
use isagen_spec::OpcodeTable;

const TABLE: &str = include_str!("../ops.json");

const PROGRAM: &str = "\
push 5
call 300, 2 ; two arguments
NOP
jump 9
ret
";

fn reference(program: &[(&str, Vec<i64>)]) -> Vec<u8> {
    let table = OpcodeTable::from_json_str(TABLE).unwrap();
    let defs: Vec<_> = program
        .iter()
        .map(|(name, operands)| {
            isagen_runtime::InstructionDef::new(&table, name, operands.clone()).unwrap()
        })
        .collect();
    isagen_runtime::encode(&defs).unwrap().into_bytes()
}

#[test]
fn test_assemble_lower_encode() {
    let module = assemble(PROGRAM).unwrap();
    let lowered = lower(&module);
    assert_eq!(lowered.defs.len(), 5);
    assert_eq!(lowered.module_def.call_sites, 1);
    assert_eq!(lowered.builder.jump_targets, vec![9]);

    let mut bc = Bytecode::new();
    for def in &lowered.defs {
        def.write(&mut bc);
    }
    let expected = reference(&[
        ("Push", vec![5]),
        ("Call", vec![300, 2]),
        ("Nop", vec![]),
        ("Jump", vec![9]),
        ("Ret", vec![]),
    ]);
    assert_eq!(bc.as_bytes(), expected.as_slice());

    let sizes: Vec<usize> = lowered.defs.iter().map(InstructionDef::runtime_size).collect();
    assert_eq!(sizes, vec![2, 4, 1, 3, 1]);
    let terminal: Vec<bool> = lowered.defs.iter().map(InstructionDef::is_terminal).collect();
    assert_eq!(terminal, vec![false, false, false, true, true]);
}

#[test]
fn test_assembled_program_decodes() {
    let lowered = lower(&assemble(PROGRAM).unwrap());
    let mut bc = Bytecode::new();
    for def in &lowered.defs {
        def.write(&mut bc);
    }

    let mut decoded = Vec::new();
    let mut offset = 0;
    while let Some((instruction, next)) = RuntimeInstruction::from_bytecode(&bc, offset) {
        decoded.push(instruction);
        offset = next;
    }
    assert_eq!(offset, bc.len());
    assert_eq!(
        decoded,
        vec![
            RuntimeInstruction::Push(5),
            RuntimeInstruction::Call(2, 300),
            RuntimeInstruction::Nop,
            RuntimeInstruction::Jump(9),
            RuntimeInstruction::Ret,
        ]
    );
}
