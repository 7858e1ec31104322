// Stable Rust has no address-of-label, so the "computed goto" is a static table of
// handler pointers indexed by opcode. Each cycle is one indirect call rather than a
// jump between labels, which changes what the branch predictor sees but not the result.

use super::Interpreter;
use crate::handlers::{Handler, HANDLERS};
use crate::instructions::Opcode;
use crate::program::Program;
use crate::state::MachineState;

static GOTO_DISPATCH_TBL: [Handler; Opcode::COUNT] = HANDLERS;

pub struct GotoInterp;

#[inline(never)]
pub fn exec_goto(state: &mut MachineState, program: &Program) {
    loop {
        if !state.should_run() {
            break;
        }
        let insn = program[state.pc()];
        GOTO_DISPATCH_TBL[insn.op().index()](state, insn);
    }
}

impl Interpreter for GotoInterp {
    fn name(&self) -> &'static str {
        "goto"
    }

    fn exec(&self, state: &mut MachineState, program: &Program) {
        exec_goto(state, program)
    }
}
