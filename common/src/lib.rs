pub mod cli;
pub mod util;

pub use cli::BenchOpts;
pub use util::Summary;
