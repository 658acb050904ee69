use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};

/// Read every record of a CSV file into memory.
///
/// Ragged rows are kept as-is and stray quotes inside fields are taken
/// literally. Bytes that are not valid UTF-8 are replaced with U+FFFD
/// instead of failing the file. The header row is returned like any other
/// record.
pub fn read_records(path: &Path) -> Result<Vec<StringRecord>> {
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(file);

    reader
        .byte_records()
        .map(|record| record.map(StringRecord::from_byte_record_lossy))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
}
