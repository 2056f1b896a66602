//! The ZFIN phenotype file
//!
//! Each line holds one decomposed phenotype annotation of a gene.
//! Columns are tab separated:
//!
//! | Column | Content |
//! | --- | --- |
//! | 0 | Gene ZFIN ID |
//! | 1, 2 | Numerical gene IDs (not used) |
//! | 3 | Gene symbol |
//! | 4, 5 | Affected structure or process 1 subterm ID and name |
//! | 6, 7 | Post-composed relationship ID and name |
//! | 8, 9 | Affected structure or process 1 superterm ID and name |
//! | 10, 11 | Phenotype keyword (quality) ID and name |
//! | 12 | Phenotype tag (`abnormal`, `normal`, ...) |
//! | 13, 14 | Affected structure or process 2 subterm ID and name |
//! | 15, 16 | Post-composed relationship ID and name |
//! | 17, 18 | Affected structure or process 2 superterm ID and name |
//!
//! Columns after the phenotype tag may be missing.
//!
//! ```text
//! ZDB-GENE-030131-6223  100001615  51684  sufu  ...
//!     ZFA:0001086  muscle pioneer  PATO:0002050  normal amount  normal  ...
//! ```
use std::io::BufRead;
use std::path::Path;

use smallvec::SmallVec;

use crate::parser::open_transparent;
use crate::record::{Entity, NamedTerm, RawRecord};
use crate::{ZpError, ZpResult, DEFAULT_NUM_COLUMNS};

/// Phenotype tag of abnormal annotations
pub const ABNORMAL_TAG: &str = "abnormal";

/// Number of columns that must be present in every line
const MIN_COLUMNS: usize = 13;

type Columns<'a> = SmallVec<[&'a str; DEFAULT_NUM_COLUMNS]>;

/// Parses a single line of the ZFIN phenotype file
///
/// Returns `None` for empty lines and comments (`#`).
///
/// # Errors
///
/// [`ZpError::InvalidInput`] if the line has less than 13 columns
pub fn parse_line(line: &str) -> ZpResult<Option<RawRecord>> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let cols: Columns = line.split('\t').collect();
    if cols.len() < MIN_COLUMNS {
        return Err(ZpError::InvalidInput(format!(
            "expected at least {} columns, found {}: {}",
            MIN_COLUMNS,
            cols.len(),
            line
        )));
    }
    let col = |idx: usize| cols.get(idx).copied().unwrap_or_default();
    let term = |idx: usize| NamedTerm::from_columns(col(idx), col(idx + 1));

    let entity1 = Entity::new(term(8), term(4));
    let entity2 = Entity::new(term(17), term(13));
    let quality = NamedTerm::new(col(10).trim(), col(11).trim());
    let is_abnormal = col(12).trim() == ABNORMAL_TAG;

    Ok(Some(RawRecord::new(
        col(0).trim(),
        entity1,
        entity2,
        quality,
        is_abnormal,
    )))
}

/// Iterator of all [`RawRecord`]s of a ZFIN phenotype file
///
/// Records are returned in the order of the file. Each malformed line
/// produces an `Err` that names the line number.
pub struct ZfinRecords<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl ZfinRecords<Box<dyn BufRead>> {
    /// Opens a ZFIN file, which may be gzip compressed
    ///
    /// # Errors
    ///
    /// - [`ZpError::InputNotFound`]: the file does not exist or is a directory
    /// - [`ZpError::IoFailure`]: the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> ZpResult<Self> {
        Ok(Self::new(open_transparent(path)?))
    }
}

impl<R: BufRead> ZfinRecords<R> {
    /// Reads records from any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(256),
            line_number: 0,
        }
    }

    /// The number of the line that was read last (1-based)
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for ZfinRecords<R> {
    type Item = ZpResult<RawRecord>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    match parse_line(&self.line) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => continue,
                        Err(ZpError::InvalidInput(msg)) => {
                            return Some(Err(ZpError::InvalidInput(format!(
                                "line {}: {}",
                                self.line_number, msg
                            ))))
                        }
                        Err(err) => return Some(Err(err)),
                    }
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}
