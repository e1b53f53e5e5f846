//! Library interface for the `keymerge` command.
//!
//! The binary is a thin wrapper: it parses [`cli::Args`], installs a
//! `tracing` subscriber, and calls [`run::run`]. Keeping the pipeline here
//! lets it be driven from tests without spawning a process.

pub mod cli;
pub mod error;
mod fs_helpers;
pub mod run;

pub use cli::{Args, OutputFormat, RuleArg};
pub use error::CliError;
pub use run::{build_options, run};
