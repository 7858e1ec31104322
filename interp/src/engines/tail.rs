//! Tail-call dispatch.
//!
//! Each opcode gets a handler that performs its transition and then finishes with
//! the shared fetch-and-dispatch step. Guaranteed tail calls (`become`) are still
//! nightly only, so instead of calling the next handler the dispatch step returns
//! it, and `exec_tail` bounces between them. Stack depth stays constant no matter
//! how long the program is.

use super::Interpreter;
use crate::handlers::{op_add, op_div, op_halt, op_mul, op_sub};
use crate::instructions::{Instruction, Opcode};
use crate::program::Program;
use crate::state::MachineState;

/// The next handler to run and the instruction it runs on, or `None` once halted
pub type Continuation = Option<(TailHandler, Instruction)>;

// Wrapped in a struct so the function type can name itself in its return type.
#[derive(Copy, Clone)]
pub struct TailHandler(pub fn(state: &mut MachineState, program: &Program, insn: Instruction) -> Continuation);

macro_rules! tail_handler {
    ($name:ident => $op:ident) => {
        fn $name(state: &mut MachineState, program: &Program, insn: Instruction) -> Continuation {
            $op(state, insn);
            exec_tail_dispatch(state, program)
        }
    };
}

tail_handler!(exec_tail_add => op_add);
tail_handler!(exec_tail_sub => op_sub);
tail_handler!(exec_tail_mul => op_mul);
tail_handler!(exec_tail_div => op_div);
tail_handler!(exec_tail_halt => op_halt);

static TAIL_DISPATCH_TBL: [TailHandler; Opcode::COUNT] = [
    TailHandler(exec_tail_add),
    TailHandler(exec_tail_sub),
    TailHandler(exec_tail_mul),
    TailHandler(exec_tail_div),
    TailHandler(exec_tail_halt),
];

#[inline(always)]
fn exec_tail_dispatch(state: &MachineState, program: &Program) -> Continuation {
    if !state.should_run() {
        return None;
    }
    let insn = program[state.pc()];
    Some((TAIL_DISPATCH_TBL[insn.op().index()], insn))
}

pub struct TailInterp;

#[inline(never)]
pub fn exec_tail(state: &mut MachineState, program: &Program) {
    let mut next = exec_tail_dispatch(state, program);
    while let Some((TailHandler(handler), insn)) = next {
        next = handler(state, program, insn);
    }
}

impl Interpreter for TailInterp {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn exec(&self, state: &mut MachineState, program: &Program) {
        exec_tail(state, program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::switch::exec_switch;
    use crate::handlers::HANDLERS;
    use crate::instructions::Register;
    use crate::program::DEFAULT_SEED;

    #[test]
    fn halted_state_dispatches_nothing() {
        let program = Program::generate(DEFAULT_SEED, 10).unwrap();
        let mut state = MachineState::new();
        exec_tail(&mut state, &program);

        assert!(exec_tail_dispatch(&state, &program).is_none());
    }

    #[test]
    fn handlers_chain_into_the_next_instruction() {
        for op in Opcode::ALL {
            let insn = Instruction::arith(op, Register::Acc, Register::Acc, 2);
            let program = Program::new(vec![insn, Instruction::halt()]).unwrap();

            let mut expected = MachineState::new();
            HANDLERS[op.index()](&mut expected, insn);

            let mut state = MachineState::new();
            let TailHandler(handler) = TAIL_DISPATCH_TBL[op.index()];
            let next = handler(&mut state, &program, insn);
            assert_eq!(state, expected, "{}", op.name());

            if op == Opcode::Halt {
                assert!(next.is_none());
            } else {
                let (TailHandler(halt), next_insn) = next.unwrap();
                assert_eq!(next_insn, Instruction::halt());
                assert!(halt(&mut state, &program, next_insn).is_none());
                assert_eq!(state.pc(), 2);
            }
        }
    }

    /// A million nested calls would need tens of megabytes of stack. Running on a
    /// 128 KiB thread proves the trampoline keeps depth constant.
    #[test]
    fn long_program_on_small_stack() {
        const LENGTH: usize = 1_000_000;
        let program = Program::generate(DEFAULT_SEED, LENGTH).unwrap();

        let mut expected = MachineState::new();
        exec_switch(&mut expected, &program);

        let state = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(move || {
                let mut state = MachineState::new();
                exec_tail(&mut state, &program);
                state
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(state.pc(), LENGTH);
        assert!(state.halted());
        assert_eq!(state, expected);
    }
}
