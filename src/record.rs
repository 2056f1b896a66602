//! Decomposed phenotype annotations as they come from ZFIN
//!
//! Every line of the ZFIN phenotype file describes one phenotype of a gene
//! as separate fields:
//!
//! - the affected structure or process (entity 1), given as superterm and
//!   an optional, more specific subterm
//! - the quality (phenotype keyword), a PATO term
//! - an optional second entity that the quality is directed towards
//! - the phenotype tag (`abnormal`, `normal`, ...)
//!
//! A line is represented by [`RawRecord`].
use std::fmt::Display;

use crate::{ABNORMAL, QUALITY};

mod corrector;
pub use corrector::{correct, QUALITY_CORRECTIONS};

/// Gene id of the synthetic root record
pub const ROOT_GENE_ID: &str = "DUMMY";

/// `ZFA:0100000` - zebrafish anatomical entity
pub const ROOT_ENTITY: (&str, &str) = ("ZFA:0100000", "zebrafish anatomical entity");

/// A term reference together with its human readable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedTerm {
    id: String,
    name: String,
}

impl NamedTerm {
    /// Constructs a new `NamedTerm`
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Constructs a `NamedTerm` from a pair of id and name columns
    ///
    /// Returns `None` if the id column is empty
    pub fn from_columns(id: &str, name: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self::new(id, name.trim()))
        }
    }

    /// The OBO id, e.g. `ZFA:0001086`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The name of the term, e.g. `muscle`
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An affected structure or process
///
/// The subterm is the more specific part, e.g. `epithelium` (subterm)
/// of the `swim bladder` (superterm).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    superterm: Option<NamedTerm>,
    subterm: Option<NamedTerm>,
}

impl Entity {
    /// Constructs a new `Entity`
    pub fn new(superterm: Option<NamedTerm>, subterm: Option<NamedTerm>) -> Self {
        Self { superterm, subterm }
    }

    /// The superterm, if present
    pub fn superterm(&self) -> Option<&NamedTerm> {
        self.superterm.as_ref()
    }

    /// The subterm, if present
    pub fn subterm(&self) -> Option<&NamedTerm> {
        self.subterm.as_ref()
    }

    /// Returns `true` if neither superterm nor subterm are given
    pub fn is_empty(&self) -> bool {
        self.superterm.is_none() && self.subterm.is_none()
    }

    fn superterm_id(&self) -> &str {
        self.superterm.as_ref().map_or("", NamedTerm::id)
    }

    fn subterm_id(&self) -> &str {
        self.subterm.as_ref().map_or("", NamedTerm::id)
    }
}

/// One decomposed phenotype annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    gene_id: String,
    entity1: Entity,
    entity2: Entity,
    quality: NamedTerm,
    is_abnormal: bool,
}

impl RawRecord {
    /// Starts building a record for the given gene
    pub fn builder(gene_id: &str) -> RawRecordBuilder {
        RawRecordBuilder {
            record: RawRecord {
                gene_id: gene_id.to_string(),
                ..Default::default()
            },
        }
    }

    /// The synthetic record that defines the root of the ontology
    ///
    /// `abnormal(ly) quality zebrafish anatomical entity`
    pub fn root() -> Self {
        RawRecord::builder(ROOT_GENE_ID)
            .entity1(ROOT_ENTITY.0, ROOT_ENTITY.1)
            .quality(QUALITY, "quality")
            .abnormal(true)
            .build()
    }

    /// Constructs a record from its parts
    pub fn new(
        gene_id: &str,
        entity1: Entity,
        entity2: Entity,
        quality: NamedTerm,
        is_abnormal: bool,
    ) -> Self {
        Self {
            gene_id: gene_id.to_string(),
            entity1,
            entity2,
            quality,
            is_abnormal,
        }
    }

    /// The ZFIN id of the gene
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// The primary affected entity
    pub fn entity1(&self) -> &Entity {
        &self.entity1
    }

    /// The entity the quality is directed towards
    pub fn entity2(&self) -> &Entity {
        &self.entity2
    }

    /// The quality (phenotype keyword)
    pub fn quality(&self) -> &NamedTerm {
        &self.quality
    }

    pub(crate) fn quality_mut(&mut self) -> &mut NamedTerm {
        &mut self.quality
    }

    /// Returns `true` if the phenotype is tagged `abnormal`
    pub fn is_abnormal(&self) -> bool {
        self.is_abnormal
    }

    /// Returns the record with normalized quality, see [`correct`]
    #[must_use]
    pub fn corrected(self) -> Self {
        correct(self)
    }

    /// The provenance of a term built from this record
    pub fn source_information(&self) -> SourceInformation {
        SourceInformation {
            entity1_superterm: self.entity1.superterm_id().to_string(),
            entity1_subterm: self.entity1.subterm_id().to_string(),
            quality: self.quality.id().to_string(),
            entity2_superterm: self.entity2.superterm_id().to_string(),
            entity2_subterm: self.entity2.subterm_id().to_string(),
        }
    }
}

/// Builder for [`RawRecord`], mostly used for tests and synthetic records
#[derive(Debug, Clone)]
pub struct RawRecordBuilder {
    record: RawRecord,
}

impl RawRecordBuilder {
    /// Sets the superterm of entity 1
    #[must_use]
    pub fn entity1(mut self, id: &str, name: &str) -> Self {
        self.record.entity1.superterm = Some(NamedTerm::new(id, name));
        self
    }

    /// Sets the subterm of entity 1
    #[must_use]
    pub fn entity1_subterm(mut self, id: &str, name: &str) -> Self {
        self.record.entity1.subterm = Some(NamedTerm::new(id, name));
        self
    }

    /// Sets the superterm of entity 2
    #[must_use]
    pub fn entity2(mut self, id: &str, name: &str) -> Self {
        self.record.entity2.superterm = Some(NamedTerm::new(id, name));
        self
    }

    /// Sets the subterm of entity 2
    #[must_use]
    pub fn entity2_subterm(mut self, id: &str, name: &str) -> Self {
        self.record.entity2.subterm = Some(NamedTerm::new(id, name));
        self
    }

    /// Sets the quality
    #[must_use]
    pub fn quality(mut self, id: &str, name: &str) -> Self {
        self.record.quality = NamedTerm::new(id, name);
        self
    }

    /// Sets the phenotype tag
    #[must_use]
    pub fn abnormal(mut self, is_abnormal: bool) -> Self {
        self.record.is_abnormal = is_abnormal;
        self
    }

    /// Returns the finished record
    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// The source fields a ZP term was defined from
///
/// Written as one tab separated string:
///
/// ```text
/// e1 superterm  e1 subterm  quality  PATO:0000460  e2 superterm  e2 subterm
/// ```
///
/// Absent terms are written as empty fields. The phenotype modifier is
/// always `abnormal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInformation {
    entity1_superterm: String,
    entity1_subterm: String,
    quality: String,
    entity2_superterm: String,
    entity2_subterm: String,
}

impl Display for SourceInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.entity1_superterm,
            self.entity1_subterm,
            self.quality,
            ABNORMAL,
            self.entity2_superterm,
            self.entity2_subterm
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn named_term_from_empty_columns() {
        assert!(NamedTerm::from_columns("", "").is_none());
        assert!(NamedTerm::from_columns("  ", "muscle").is_none());
        let term = NamedTerm::from_columns("ZFA:0001086", "muscle").unwrap();
        assert_eq!(term.id(), "ZFA:0001086");
        assert_eq!(term.name(), "muscle");
    }

    #[test]
    fn root_record() {
        let root = RawRecord::root();
        assert_eq!(root.gene_id(), "DUMMY");
        assert!(root.is_abnormal());
        assert_eq!(root.entity1().superterm().unwrap().id(), "ZFA:0100000");
        assert!(root.entity1().subterm().is_none());
        assert!(root.entity2().is_empty());
        assert_eq!(root.quality().id(), "PATO:0000001");
    }

    #[test]
    fn source_information_all_fields() {
        let record = RawRecord::builder("ZDB-GENE-1")
            .entity1("ZFA:0001161", "fin")
            .entity1_subterm("ZFA:0001514", "bone")
            .entity2("ZFA:0000037", "body")
            .entity2_subterm("ZFA:0000107", "eye")
            .quality("PATO:0000117", "size")
            .abnormal(true)
            .build();
        assert_eq!(
            record.source_information().to_string(),
            "ZFA:0001161\tZFA:0001514\tPATO:0000117\tPATO:0000460\tZFA:0000037\tZFA:0000107"
        );
    }

    #[test]
    fn source_information_missing_fields() {
        let record = RawRecord::builder("ZDB-GENE-1")
            .entity1("ZFA:0001086", "muscle")
            .quality("PATO:0000070", "amount")
            .build();
        assert_eq!(
            record.source_information().to_string(),
            "ZFA:0001086\t\tPATO:0000070\tPATO:0000460\t\t"
        );
    }
}
