//! Filesystem helpers for reading inputs and writing the merged result.

use std::io::Write;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};

use crate::error::CliError;

/// Split `path` into its parent directory handle and file name.
fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path does not name a file",
        ))
    })?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    Ok((dir, file_name))
}

/// Read the whole of `path`.
pub(crate) fn read_file(path: &Utf8Path) -> Result<Vec<u8>, CliError> {
    let (dir, file_name) = open_parent(path)?;
    dir.read(file_name).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create or truncate `path` and write `contents` to it.
pub(crate) fn write_file(path: &Utf8Path, contents: &[u8]) -> Result<(), CliError> {
    let (dir, file_name) = open_parent(path)?;
    let mut file = dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(contents).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
