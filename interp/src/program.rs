use std::ops::Index;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::instructions::{Instruction, Opcode, Register};

pub const DEFAULT_SEED: u64 = 1337;
pub const DEFAULT_LENGTH: usize = 100_000;

/// Immediates are drawn from `0..IMM_RANGE`
pub const IMM_RANGE: u8 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("program is empty")]
    Empty,
    #[error("program of {0} instructions does not fit in the PC register")]
    TooLong(usize),
    #[error("instruction {index}: invalid opcode {raw:#04x}")]
    InvalidOpcode { index: usize, raw: u8 },
    #[error("instruction {index}: invalid {operand} register {raw:#04x}")]
    InvalidRegister { index: usize, operand: &'static str, raw: u8 },
    #[error("program does not end in OP_HALT (last instruction: {0})")]
    MissingHalt(String),
    #[error("instruction {index}: {op} writes PC, which only the dispatch loop may change")]
    WritesPc { index: usize, op: &'static str },
}

/// A validated, immutable instruction buffer.
///
/// The only way to build one is `Program::new`, so engines can fetch and decode
/// without re-checking anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    insns: Box<[Instruction]>,
}

impl Program {
    pub fn new(insns: Vec<Instruction>) -> Result<Program, ProgramError> {
        validate(&insns)?;
        Ok(Program { insns: insns.into_boxed_slice() })
    }

    /// Deterministic synthetic program of `length` instructions, the last being HALT.
    pub fn generate(seed: u64, length: usize) -> Result<Program, ProgramError> {
        let program = Program::new(generate(seed, length)?)?;
        tracing::debug!(seed, length, "generated program");
        Ok(program)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.insns
    }

    /// Raw bytes, four per instruction
    pub fn to_bytes(&self) -> Vec<u8> {
        self.insns.iter().flat_map(|insn| insn.into_bytes()).collect()
    }

    pub fn disassemble(&self) -> impl Iterator<Item = String> + '_ {
        self.insns
            .iter()
            .enumerate()
            .map(|(i, insn)| format!("@{:06} {}", i, insn.disassemble()))
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    #[inline(always)]
    fn index(&self, pc: usize) -> &Instruction {
        &self.insns[pc]
    }
}

/// Fill a buffer with `length - 1` random non-halt instructions followed by HALT.
///
/// Every random instruction reads and writes ACC. A DIV that draws a zero
/// immediate gets 1 instead.
pub fn generate(seed: u64, length: usize) -> Result<Vec<Instruction>, ProgramError> {
    if length == 0 {
        return Err(ProgramError::Empty);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut insns = Vec::with_capacity(length);

    for _ in 0..length - 1 {
        let op = Opcode::ALL[rng.gen_range(0..Opcode::COUNT - 1)];
        let mut imm = rng.gen_range(0..IMM_RANGE);
        if op == Opcode::Div && imm == 0 {
            imm = 1;
        }
        insns.push(Instruction::arith(op, Register::Acc, Register::Acc, imm));
    }
    insns.push(Instruction::halt());

    Ok(insns)
}

pub fn validate_insn(index: usize, insn: &Instruction) -> Result<(), ProgramError> {
    let raw = insn.into_bytes();

    let op = insn.op_or_err()
        .map_err(|_| ProgramError::InvalidOpcode { index, raw: raw[0] })?;
    let dest = insn.dest_or_err()
        .map_err(|_| ProgramError::InvalidRegister { index, operand: "destination", raw: raw[1] })?;
    insn.src_or_err()
        .map_err(|_| ProgramError::InvalidRegister { index, operand: "source", raw: raw[2] })?;

    // No jumps: a PC write would send the fetch off the end of the buffer or
    // into a loop. HALT ignores its operands.
    if op != Opcode::Halt && dest == Register::Pc {
        return Err(ProgramError::WritesPc { index, op: op.name() });
    }

    Ok(())
}

pub fn validate(insns: &[Instruction]) -> Result<(), ProgramError> {
    let last = insns.last().ok_or(ProgramError::Empty)?;
    if insns.len() > i32::MAX as usize {
        return Err(ProgramError::TooLong(insns.len()));
    }

    for (index, insn) in insns.iter().enumerate() {
        validate_insn(index, insn)?;
    }

    if last.op() != Opcode::Halt {
        return Err(ProgramError::MissingHalt(last.disassemble()));
    }
    Ok(())
}
