//! Parsing of the ZFIN input data and of previously generated ontologies

use std::fs::File;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::{ZpError, ZpResult};

/// Module to parse OWL functional syntax documents written by [`crate::Ontology::write`]
pub mod functional;
/// Module to parse the ZFIN phenotype file
pub mod zfin;

/// Opens a file that may or may not be gzip compressed
///
/// The file is first opened through a gzip decoder and one byte is read.
/// If that fails, the file is treated as uncompressed.
///
/// # Errors
///
/// - [`ZpError::InputNotFound`]: the file does not exist or is a directory
/// - [`ZpError::IoFailure`]: the file cannot be opened
pub fn open_transparent<P: AsRef<Path>>(path: P) -> ZpResult<Box<dyn BufRead>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ZpError::InputNotFound(path.display().to_string()));
    }

    let mut decoder = GzDecoder::new(File::open(path)?);
    let mut first = [0u8; 1];
    match decoder.read(&mut first) {
        Ok(n) => {
            debug!("Reading {} as gzip compressed file", path.display());
            let reader: Chain<Cursor<Vec<u8>>, GzDecoder<File>> =
                Cursor::new(first[..n].to_vec()).chain(decoder);
            Ok(Box::new(BufReader::new(reader)))
        }
        Err(_) => {
            debug!("Reading {} as plain text file", path.display());
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
    }
}
