use std::{fs::File, io::Cursor, path::{Path, PathBuf}};

use polars::{frame::DataFrame, io::SerReader, prelude::CsvReader};

use crate::error::LoadError;

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
    let file = File::open(path)
        .map_err(|source| LoadError::Open { path: path.to_path_buf(), source })?;
    CsvReader::new(file)
        .finish()
        .map_err(|source| LoadError::Read { path: path.to_path_buf(), source })
}

/// Reads a CSV held in memory.
pub(crate) fn read_csv_string(csv: &str) -> Result<DataFrame, LoadError> {
    CsvReader::new(Cursor::new(csv.as_bytes()))
        .finish()
        .map_err(|source| LoadError::Read { path: PathBuf::from("<memory>"), source })
}
