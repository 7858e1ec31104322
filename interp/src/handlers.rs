//! One state transition per opcode.
//!
//! Every handler advances PC by exactly one, HALT included, so the dispatch loops
//! never need to special-case control flow. Arithmetic wraps at 32 bits.

use crate::instructions::{Instruction, Opcode, Register};
use crate::state::{MachineState, FLAG_HALTED};

pub type Handler = fn(state: &mut MachineState, insn: Instruction);

macro_rules! arith_op {
    ($name:ident, |$a:ident, $b:ident| $body:expr) => {
        #[inline(always)]
        pub fn $name(state: &mut MachineState, insn: Instruction) {
            let $a = state.read(insn.src());
            let $b = i32::from(insn.imm());
            state.write(insn.dest(), $body);
            state.advance_pc();
        }
    };
}

arith_op!(op_add, |a, b| a.wrapping_add(b));
arith_op!(op_sub, |a, b| a.wrapping_sub(b));
arith_op!(op_mul, |a, b| a.wrapping_mul(b));

/// # Panics
///
/// A zero immediate is a broken precondition and panics. The generator never emits one.
#[inline(always)]
pub fn op_div(state: &mut MachineState, insn: Instruction) {
    let a = state.read(insn.src());
    let b = i32::from(insn.imm());
    assert!(b != 0, "OP_DIV with zero immediate at pc {}", state.pc());
    state.write(insn.dest(), a / b);
    state.advance_pc();
}

#[inline(always)]
pub fn op_halt(state: &mut MachineState, _insn: Instruction) {
    let flags = state.read(Register::Flags);
    state.write(Register::Flags, flags | FLAG_HALTED);
    state.advance_pc();
}

/// Indexed by `Opcode::index()`
pub const HANDLERS: [Handler; Opcode::COUNT] = [
    op_add,
    op_sub,
    op_mul,
    op_div,
    op_halt,
];
