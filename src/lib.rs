//! `zpgen` builds the Zebrafish Phenotype Ontology (ZP) from decomposed
//! ZFIN phenotype annotations.
//!
//! Each abnormal annotation (entity, quality and optional second entity)
//! is composed into an OWL class expression and receives a stable
//! [`ZpTermId`]. Identical expressions share one id, and ids survive
//! between runs when the previous ontology is loaded ("keep ids").
//!
//! # Examples
//!
//! ```
//! use zpgen::{CompositionBuilder, IdentityRegistry, RawRecord};
//!
//! let record = RawRecord::builder("ZDB-GENE-000001-1")
//!     .entity1("ZFA:0001086", "muscle")
//!     .quality("PATO:0000070", "amount")
//!     .abnormal(true)
//!     .build();
//!
//! let builder = CompositionBuilder::default();
//! let mut registry = IdentityRegistry::default();
//!
//! let mut term = builder.compose(&record).unwrap().expect("not suppressed");
//! assert_eq!(term.label(), "abnormal(ly) amount muscle");
//!
//! let id = term.resolve_id(&mut registry);
//! assert_eq!(id.to_string(), "ZP:0000001");
//! ```
use std::num::ParseIntError;
use thiserror::Error;

pub mod composition;
pub mod config;
pub mod emitter;
pub mod expression;
pub mod ontology;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod term;

pub use composition::{CompositeTerm, CompositionBuilder};
pub use config::Config;
pub use emitter::Emitter;
pub use expression::{LogicalExpression, RelationKind, Signature};
pub use ontology::Ontology;
pub use pipeline::{run, Generator, Summary};
pub use record::{NamedTerm, RawRecord};
pub use registry::IdentityRegistry;
pub use term::{TermRole, ZpTermId};

/// Base IRI of all OBO library terms
pub const OBO_IRI: &str = "http://purl.obolibrary.org/obo/";

/// IRI of the generated ontology
pub const ZP_ONTOLOGY_IRI: &str = "http://purl.obolibrary.org/obo/zp.owl";

/// `PATO:0000460` - abnormal
pub const ABNORMAL: &str = "PATO:0000460";

/// `PATO:0000001` - quality
pub const QUALITY: &str = "PATO:0000001";

const DEFAULT_NUM_COLUMNS: usize = 19;
const DEFAULT_NUM_TERMS: usize = 4096;

/// Main Error type for this crate
#[derive(Error, Debug)]
pub enum ZpError {
    /// A term id does not belong to an ontology that is allowed for its role
    #[error("unrecognized vocabulary for {role} `{id}`")]
    UnrecognizedVocabulary {
        /// The offending term id
        id: String,
        /// Where the term was used
        role: TermRole,
    },
    /// The input file does not exist or is not a regular file
    #[error("input file not found: {0}")]
    InputNotFound(String),
    /// Reading or writing a file failed
    #[error("i/o failure: {0}")]
    IoFailure(#[from] std::io::Error),
    /// Input data or a persisted document is malformed
    #[error("invalid data: {0}")]
    InvalidInput(String),
    /// Failed to parse an integer, e.g. the numerical part of a term id
    #[error("unable to parse Integer")]
    ParseIntError,
}

impl From<ParseIntError> for ZpError {
    fn from(_: ParseIntError) -> Self {
        ZpError::ParseIntError
    }
}

/// Shortcut for `Result<T, ZpError>`
pub type ZpResult<T> = Result<T, ZpError>;
