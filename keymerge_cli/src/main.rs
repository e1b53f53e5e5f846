//! CLI entrypoint for `keymerge`.

use std::process::ExitCode;

use clap::Parser;
use keymerge_cli::{Args, CliError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let mut stdout = std::io::stdout().lock();
    match keymerge_cli::run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .init();
}

#[expect(clippy::print_stderr, reason = "errors are reported to the user on stderr")]
fn report(err: &CliError) {
    eprintln!("keymerge: {err}");
    eprintln!("usage: keymerge [OPTIONS] FILE...");
}
