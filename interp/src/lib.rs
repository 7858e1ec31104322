//! A deliberately tiny bytecode machine used to compare dispatch strategies.
//!
//! Five opcodes, three registers and no control flow besides HALT. The interesting
//! part is not what the instructions do but how each engine in [`engines`] gets
//! from one handler to the next.

pub mod engines;
pub mod handlers;
pub mod instructions;
pub mod program;
pub mod state;

pub use engines::{Interpreter, Method};
pub use instructions::{Instruction, Opcode, Register};
pub use program::{Program, ProgramError};
pub use state::{MachineState, FLAG_HALTED};
