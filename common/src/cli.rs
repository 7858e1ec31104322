use clap::{builder::PossibleValue, Parser, ValueEnum};
use interp::program::{DEFAULT_LENGTH, DEFAULT_SEED};
use interp::Method;

pub const DEFAULT_ITERATIONS: u32 = 1000;

#[derive(Debug, Parser)]
#[clap(name = "dispatch-bench", version)]
#[clap(about = "Compare switch, computed-goto and tail-call dispatch on a synthetic bytecode program")]
pub struct BenchOpts {
    /// Timed runs per engine
    #[arg(long, short = 'n', default_value_t = DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Program length, including the final HALT
    #[arg(long, short, default_value_t = DEFAULT_LENGTH, value_parser = parse_length)]
    pub length: usize,

    /// Seed for the program generator
    #[arg(long, short, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Engine to run (repeatable). Defaults to all of them
    #[arg(long = "method", short, value_enum)]
    pub methods: Vec<MethodArg>,

    /// Untimed runs per engine before sampling starts
    #[arg(long, short, default_value_t = 0)]
    pub warmup: u32,

    /// Print the program disassembly instead of benchmarking
    #[arg(long)]
    pub dump: bool,
}

impl BenchOpts {
    /// Selected engines in report order, without duplicates
    pub fn methods(&self) -> Vec<Method> {
        if self.methods.is_empty() {
            return Method::ALL.to_vec();
        }
        let mut methods: Vec<Method> = self.methods.iter().map(|m| m.0).collect();
        methods.sort();
        methods.dedup();
        methods
    }
}

fn parse_length(s: &str) -> Result<usize, String> {
    let length: usize = s.parse().map_err(|e| format!("{e}"))?;
    if length == 0 {
        return Err("program needs at least the HALT instruction".to_owned());
    }
    if length > i32::MAX as usize {
        return Err(format!("program length must be at most {}", i32::MAX));
    }
    Ok(length)
}

/// Command line spelling of an engine; the names come from the engines themselves
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MethodArg(pub Method);

static METHOD_VARIANTS: [MethodArg; 3] = [
    MethodArg(Method::Switch),
    MethodArg(Method::Goto),
    MethodArg(Method::Tail),
];

impl ValueEnum for MethodArg {
    fn value_variants<'a>() -> &'a [Self] {
        &METHOD_VARIANTS
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.0.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<BenchOpts, clap::Error> {
        BenchOpts::try_parse_from(std::iter::once("dispatch-bench").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.iterations, 1000);
        assert_eq!(opts.length, 100_000);
        assert_eq!(opts.seed, 1337);
        assert_eq!(opts.warmup, 0);
        assert!(!opts.dump);
        assert_eq!(opts.methods(), Method::ALL.to_vec());
    }

    #[test]
    fn methods_keep_report_order() {
        let opts = parse(&["-m", "tail", "--method", "switch", "-m", "tail"]).unwrap();
        assert_eq!(opts.methods(), vec![Method::Switch, Method::Tail]);
    }

    #[test]
    fn every_engine_is_selectable() {
        assert_eq!(METHOD_VARIANTS.len(), Method::ALL.len());
        for method in Method::ALL {
            let opts = parse(&["-m", method.name()]).unwrap();
            assert_eq!(opts.methods(), vec![method]);
        }
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["-n", "0"]).is_err());
        assert!(parse(&["-l", "0"]).is_err());
        assert!(parse(&["-l", "ten"]).is_err());
        assert!(parse(&["-m", "jit"]).is_err());
    }

    #[test]
    fn overrides() {
        let opts = parse(&["-n", "5", "-l", "64", "-s", "7", "-w", "2", "--dump"]).unwrap();
        assert_eq!((opts.iterations, opts.length, opts.seed, opts.warmup), (5, 64, 7, 2));
        assert!(opts.dump);
    }
}
