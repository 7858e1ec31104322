mod harness;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use common::BenchOpts;
use interp::Program;
use tracing::info;
use tracing_subscriber::EnvFilter;

use harness::Harness;

fn main() -> anyhow::Result<()> {
    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dispatch_bench=info,interp=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = BenchOpts::parse();

    let program = Program::generate(opts.seed, opts.length)
        .with_context(|| format!("generating program (seed {}, length {})", opts.seed, opts.length))?;
    info!(seed = opts.seed, length = program.len(), "program validated");

    if opts.dump {
        let mut out = std::io::stdout().lock();
        for line in program.disassemble() {
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    let mut harness = Harness::new(&program, opts.iterations as usize, opts.warmup as usize);
    for method in opts.methods() {
        let report = harness.run(method.interpreter())
            .context("dispatch engine produced an inconsistent result")?;
        println!("{}", report);
    }

    Ok(())
}
