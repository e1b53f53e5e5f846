//! Command-line interface definitions for `keymerge`.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use keymerge::{DupeMode, Format, ScalarMode};

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
    /// TOML; the merged document must be a table.
    Toml,
}

impl OutputFormat {
    /// The codec writing this format.
    #[must_use]
    pub const fn format(self) -> Format {
        match self {
            Self::Json => Format::Json,
            Self::Yaml => Format::Yaml,
            Self::Toml => Format::Toml,
        }
    }
}

/// A `--rule PATH=DIRECTIVES` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArg {
    /// Dotted field path; empty for the document root.
    pub path: String,
    /// Comma-separated directives such as `key=name,dupe=consolidate`.
    pub directives: String,
}

fn parse_rule(raw: &str) -> Result<RuleArg, String> {
    let (path, directives) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=DIRECTIVES, got '{raw}'"))?;
    Ok(RuleArg {
        path: path.trim().to_owned(),
        directives: directives.to_owned(),
    })
}

/// Parsed CLI arguments for `keymerge`.
#[derive(Debug, Parser)]
#[command(name = "keymerge")]
#[command(about = "Merge JSON, YAML, and TOML documents, matching list items by primary key")]
#[command(
    after_help = "Files merge left to right; later files take precedence.\n\nExample:\n  keymerge --out config.yaml base.yaml prod.yaml env.yaml"
)]
#[command(version)]
pub struct Args {
    /// Documents to merge, lowest precedence first.
    #[arg(value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,
    /// Candidate primary key fields, tried in order (repeatable).
    #[arg(long, value_name = "NAMES", value_delimiter = ',', default_value = "name,id")]
    pub keys: Vec<String>,
    /// How lists without primary keys combine.
    #[arg(long, value_name = "MODE", default_value_t = ScalarMode::Concat)]
    pub scalar: ScalarMode,
    /// How repeated primary keys within one list are treated.
    #[arg(long, value_name = "MODE", default_value_t = DupeMode::Unique)]
    pub dupe: DupeMode,
    /// Field marking an object or list item for deletion; empty disables.
    #[arg(long, value_name = "KEY", default_value = "_delete")]
    pub delete_marker: String,
    /// Per-field override such as `services=key=region+name` (repeatable).
    #[arg(long = "rule", value_name = "PATH=DIRECTIVES", value_parser = parse_rule)]
    pub rules: Vec<RuleArg>,
    /// Output format; defaults to the format of the first file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Output file path; defaults to stdout.
    #[arg(long, short, value_name = "PATH")]
    pub out: Option<Utf8PathBuf>,
    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
