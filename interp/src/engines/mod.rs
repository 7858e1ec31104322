//! The three dispatch strategies under test.
//!
//! All of them execute the same `Program` against a caller-supplied `MachineState`
//! and stop right after the instruction that sets HALTED. None of them check the
//! terminal state; that is the harness's job.

use crate::program::Program;
use crate::state::MachineState;

pub mod goto;
pub mod switch;
pub mod tail;

pub trait Interpreter {
    /// Short name used on the command line and in the report
    fn name(&self) -> &'static str;

    fn exec(&self, state: &mut MachineState, program: &Program);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Switch,
    Goto,
    Tail,
}

impl Method {
    /// Report order
    pub const ALL: [Method; 3] = [Method::Switch, Method::Goto, Method::Tail];

    pub fn interpreter(self) -> &'static dyn Interpreter {
        match self {
            Method::Switch => &switch::SwitchInterp,
            Method::Goto => &goto::GotoInterp,
            Method::Tail => &tail::TailInterp,
        }
    }

    pub fn name(self) -> &'static str {
        self.interpreter().name()
    }
}
