//! Error types for the `keymerge` command.

use camino::Utf8PathBuf;
use keymerge::{BoxError, Format, KeymergeError};
use thiserror::Error;

/// Errors surfaced by the `keymerge` command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No input files were given.
    #[error("no files to merge")]
    NoFiles,

    /// An input file's extension names no known format.
    #[error("unsupported file extension '{extension}' for {path}; expected json, toml, yaml, or yml")]
    UnsupportedExtension {
        /// The offending file.
        path: Utf8PathBuf,
        /// Its extension, empty when it has none.
        extension: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file being accessed.
        path: Utf8PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// An input file could not be decoded.
    #[error("failed to read {path} as {format}: {source}")]
    Decode {
        /// The file being decoded.
        path: Utf8PathBuf,
        /// The format chosen from its extension.
        format: Format,
        /// The codec error.
        #[source]
        source: BoxError,
    },

    /// Merging failed while a specific file was being applied.
    #[error("merge failed at {path}: {source}")]
    Document {
        /// The file whose document triggered the failure.
        path: Utf8PathBuf,
        /// The merge error.
        #[source]
        source: KeymergeError,
    },

    /// The merged document could not be written in the output format.
    #[error("failed to write result as {format}: {source}")]
    Encode {
        /// The requested output format.
        format: Format,
        /// The codec error.
        #[source]
        source: BoxError,
    },

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Stdout(#[source] std::io::Error),

    /// Options, rules, or the merge itself were rejected.
    #[error(transparent)]
    Merge(#[from] KeymergeError),
}
