use super::Interpreter;
use crate::handlers::{op_add, op_div, op_halt, op_mul, op_sub};
use crate::instructions::Opcode;
use crate::program::Program;
use crate::state::MachineState;

/// Loop plus a `match` on the opcode, re-evaluated for every instruction.
pub struct SwitchInterp;

#[inline(never)]
pub fn exec_switch(state: &mut MachineState, program: &Program) {
    while state.should_run() {
        let insn = program[state.pc()];

        match insn.op() {
            Opcode::Add => op_add(state, insn),
            Opcode::Sub => op_sub(state, insn),
            Opcode::Mul => op_mul(state, insn),
            Opcode::Div => op_div(state, insn),
            Opcode::Halt => op_halt(state, insn),
        }
    }
}

impl Interpreter for SwitchInterp {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn exec(&self, state: &mut MachineState, program: &Program) {
        exec_switch(state, program)
    }
}
