//! Hard coded corrections of the quality of `normal` annotations
//!
//! Annotators sometimes use a quality that already carries the "normal"
//! meaning, e.g. `normal amount`. Since the phenotype tag states that the
//! phenotype is normal, the quality is replaced by its neutral parent
//! (`amount`). Abnormal counterparts of normal annotations can only be
//! built from the neutral quality.
use tracing::trace;

use super::RawRecord;

/// Quality replacements as `(from, (to id, to name))`
pub const QUALITY_CORRECTIONS: [(&str, (&str, &str)); 3] = [
    // normal amount
    ("PATO:0002050", ("PATO:0000070", "amount")),
    // has normal numbers of parts of type
    ("PATO:0001905", ("PATO:0001555", "has number of")),
    // normal
    ("PATO:0000461", ("PATO:0000001", "quality")),
];

/// Returns the record with a normalized quality
///
/// Only records that are **not** abnormal are changed, and only if
/// their quality is listed in [`QUALITY_CORRECTIONS`]. All other records
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use zpgen::record::correct;
/// use zpgen::RawRecord;
///
/// let record = RawRecord::builder("ZDB-GENE-030131-6223")
///     .entity1("ZFA:0001086", "muscle")
///     .quality("PATO:0002050", "normal amount")
///     .abnormal(false)
///     .build();
///
/// let corrected = correct(record);
/// assert_eq!(corrected.quality().id(), "PATO:0000070");
/// assert_eq!(corrected.quality().name(), "amount");
/// ```
pub fn correct(mut record: RawRecord) -> RawRecord {
    if record.is_abnormal() {
        return record;
    }
    let replacement = QUALITY_CORRECTIONS
        .iter()
        .find(|(from, _)| *from == record.quality().id())
        .copied();

    if let Some((from, (id, name))) = replacement {
        trace!("Correcting quality {} to {} for {}", from, id, record.gene_id());
        *record.quality_mut() = super::NamedTerm::new(id, name);
    }
    record
}
