use std::fmt;
use std::hint::black_box;
use std::time::Instant;

use common::Summary;
use interp::{Interpreter, MachineState, Program};
use thiserror::Error;
use tracing::{debug, info, trace};

/// A dispatch engine finished in a state it should never reach.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("[{engine}] iteration {iteration}: pc is {pc}, expected {expected}")]
    ProgramCounter { engine: &'static str, iteration: usize, pc: usize, expected: usize },
    #[error("[{engine}] iteration {iteration}: returned without setting HALTED")]
    NotHalted { engine: &'static str, iteration: usize },
    #[error("[{engine}] iteration {iteration}: ACC is {actual}, earlier runs produced {expected}")]
    Inconsistent { engine: &'static str, iteration: usize, actual: i32, expected: i32 },
    #[error("[{engine}] ACC is {actual}, but [{reference}] produced {expected}")]
    EngineMismatch { engine: &'static str, reference: &'static str, actual: i32, expected: i32 },
    #[error("[{0}] no timed iterations")]
    NoSamples(&'static str),
}

#[derive(Debug, Clone)]
pub struct EngineReport {
    pub engine: &'static str,
    pub acc: i32,
    pub summary: Summary,
}

impl fmt::Display for EngineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}] {}", self.engine, self.summary)
    }
}

/// Runs engines one after another over a shared program and cross-checks their results.
pub struct Harness<'a> {
    program: &'a Program,
    iterations: usize,
    warmup: usize,
    // First engine to finish and the ACC it produced
    reference: Option<(&'static str, i32)>,
}

impl<'a> Harness<'a> {
    pub fn new(program: &'a Program, iterations: usize, warmup: usize) -> Harness<'a> {
        Harness {
            program,
            iterations,
            warmup,
            reference: None,
        }
    }

    /// Time `iterations` runs of `interp`, each from a zeroed state.
    pub fn run(&mut self, interp: &dyn Interpreter) -> Result<EngineReport, CheckError> {
        let engine = interp.name();
        debug!(engine, iterations = self.iterations, warmup = self.warmup, "starting engine");

        let mut result = None;
        for iteration in 0..self.warmup {
            let (state, _) = self.exec_timed(interp);
            self.check(engine, iteration, &state, &mut result)?;
        }

        let mut samples = Vec::with_capacity(self.iterations);
        for iteration in 0..self.iterations {
            let (state, elapsed) = self.exec_timed(interp);
            trace!(engine, iteration, elapsed, "sample");

            self.check(engine, self.warmup + iteration, &state, &mut result)?;
            samples.push(elapsed);
        }

        let summary = Summary::from_samples(&mut samples).ok_or(CheckError::NoSamples(engine))?;
        // Only reachable with at least one sample, so result is set
        let acc = result.unwrap_or_default();

        match self.reference {
            Some((reference, expected)) if expected != acc => {
                return Err(CheckError::EngineMismatch { engine, reference, actual: acc, expected });
            }
            Some(_) => {}
            None => self.reference = Some((engine, acc)),
        }

        info!(engine, acc, min = summary.min, max = summary.max, avg = summary.avg, med = summary.med, "engine done");
        Ok(EngineReport { engine, acc, summary })
    }

    /// One run from a zeroed state. Returns the terminal state and the elapsed microseconds.
    fn exec_timed(&self, interp: &dyn Interpreter) -> (MachineState, u64) {
        let mut state = MachineState::new();

        let start = Instant::now();
        interp.exec(&mut state, black_box(self.program));
        let end = Instant::now();

        (black_box(state), end.duration_since(start).as_micros() as u64)
    }

    fn check(&self, engine: &'static str, iteration: usize, state: &MachineState, result: &mut Option<i32>) -> Result<(), CheckError> {
        let expected = self.program.len();
        if state.pc() != expected {
            return Err(CheckError::ProgramCounter { engine, iteration, pc: state.pc(), expected });
        }
        if !state.halted() {
            return Err(CheckError::NotHalted { engine, iteration });
        }

        let actual = state.acc();
        match *result {
            None => *result = Some(actual),
            Some(expected) if expected != actual => {
                return Err(CheckError::Inconsistent { engine, iteration, actual, expected });
            }
            Some(_) => {}
        }
        Ok(())
    }
}
