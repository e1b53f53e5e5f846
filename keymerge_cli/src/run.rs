//! The merge pipeline behind the `keymerge` command.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use keymerge::{Format, KeymergeError, MergeOptions, Merger};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::{Args, OutputFormat};
use crate::error::CliError;
use crate::fs_helpers::{read_file, write_file};

/// Build merge options from the command line.
///
/// # Errors
///
/// Returns [`CliError::Merge`] when a `--rule` does not parse.
pub fn build_options(args: &Args) -> Result<MergeOptions, CliError> {
    let mut options = MergeOptions::new()
        .with_primary_keys(args.keys.iter().map(|key| key.trim().to_owned()))
        .with_scalar_mode(args.scalar)
        .with_dupe_mode(args.dupe)
        .with_delete_marker(args.delete_marker.as_str());
    for rule in &args.rules {
        options
            .rules_mut()
            .insert_directives(&rule.path, &rule.directives)?;
    }
    Ok(options)
}

fn input_format(path: &Utf8Path) -> Result<Format, CliError> {
    Format::from_path(path).ok_or_else(|| CliError::UnsupportedExtension {
        path: path.to_path_buf(),
        extension: path.extension().unwrap_or_default().to_owned(),
    })
}

fn load(path: &Utf8Path, format: Format) -> Result<Value, CliError> {
    let bytes = read_file(path)?;
    let doc = format.decode(&bytes).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        format,
        source,
    })?;
    debug!(%path, %format, "decoded document");
    Ok(doc)
}

/// Attach the file name to errors raised while merging a known document.
fn locate(files: &[Utf8PathBuf], source: KeymergeError) -> CliError {
    if let Some(path) = source.doc_index().and_then(|index| files.get(index)) {
        return CliError::Document {
            path: path.clone(),
            source,
        };
    }
    CliError::Merge(source)
}

/// Merge the files named in `args` and write the result.
///
/// Each file is decoded according to its own extension, so formats may be
/// mixed. The output goes to `--out` when given and to `stdout` otherwise,
/// in the `--format` format or else the format of the first file.
///
/// # Errors
///
/// Returns [`CliError::NoFiles`] for an empty file list and the matching
/// [`CliError`] variant for any I/O, codec, or merge failure. Nothing is
/// written when an error is returned.
pub fn run<W: Write>(args: &Args, stdout: &mut W) -> Result<(), CliError> {
    let formats = args
        .files
        .iter()
        .map(|path| input_format(path))
        .collect::<Result<Vec<_>, _>>()?;
    let output = args
        .format
        .map(OutputFormat::format)
        .or_else(|| formats.first().copied())
        .ok_or(CliError::NoFiles)?;
    let merger = Merger::new(build_options(args)?)?;

    let docs = args
        .files
        .iter()
        .zip(formats)
        .map(|(path, format)| load(path, format))
        .collect::<Result<Vec<_>, _>>()?;
    info!(documents = docs.len(), %output, "merging");
    let merged = merger.merge(docs).map_err(|source| locate(&args.files, source))?;
    let bytes = output.encode(&merged).map_err(|source| CliError::Encode {
        format: output,
        source,
    })?;

    if let Some(path) = &args.out {
        debug!(%path, "writing result");
        return write_file(path, &bytes);
    }
    stdout.write_all(&bytes).map_err(CliError::Stdout)?;
    stdout.flush().map_err(CliError::Stdout)
}
