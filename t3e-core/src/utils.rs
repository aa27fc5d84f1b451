use std::ffi::OsStr;
use std::fs::{File, create_dir_all};
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{Result, T3eError};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|source| T3eError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Create (or truncate) an output file behind a buffered writer, creating any
/// missing parent directories first.
///
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

///
/// Reject a zero read length, which leaves every locus without a footprint.
///
pub fn check_read_len(read_len: u32) -> Result<u32> {
    match read_len {
        0 => Err(T3eError::ReadLengthError(read_len)),
        _ => Ok(read_len),
    }
}
