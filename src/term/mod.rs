//! Term identifiers and vocabulary checks
//!
//! Generated terms are identified by a [`ZpTermId`]. All other terms
//! are referenced by their OBO id (`ZFA:0001086`) and must stem from
//! an ontology that is allowed for the [`TermRole`] they are used in.
use std::fmt::Display;

use crate::{ZpError, ZpResult, OBO_IRI};

mod zptermid;
pub use zptermid::ZpTermId;

/// Ontologies that may be used for the entities of a phenotype
pub const ENTITY_PREFIXES: [&str; 4] = ["GO", "ZFA", "BSPO", "MPATH"];

/// Ontologies that may be used for the quality of a phenotype
pub const QUALITY_PREFIXES: [&str; 1] = ["PATO"];

/// The position a term reference is used in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermRole {
    /// Affected structure or process (superterm or subterm)
    Entity,
    /// The phenotype keyword, a PATO quality
    Quality,
}

impl TermRole {
    /// The ontology prefixes that are accepted for the role
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            TermRole::Entity => &ENTITY_PREFIXES,
            TermRole::Quality => &QUALITY_PREFIXES,
        }
    }

    /// Checks that `id` belongs to one of the ontologies of the role
    ///
    /// # Errors
    ///
    /// [`ZpError::UnrecognizedVocabulary`] if the prefix is not allowed,
    /// including ids without any prefix, or if the local part is empty or
    /// contains anything but letters, digits, `_`, `-` and `.`
    ///
    /// # Examples
    ///
    /// ```
    /// use zpgen::TermRole;
    ///
    /// assert!(TermRole::Entity.check("ZFA:0001086").is_ok());
    /// assert!(TermRole::Entity.check("PATO:0000001").is_err());
    /// assert!(TermRole::Quality.check("PATO:0000001").is_ok());
    /// ```
    pub fn check(&self, id: &str) -> ZpResult<()> {
        match id.split_once(':') {
            Some((prefix, local)) if self.prefixes().contains(&prefix) && is_local_id(local) => {
                Ok(())
            }
            _ => Err(ZpError::UnrecognizedVocabulary {
                id: id.to_string(),
                role: *self,
            }),
        }
    }
}

fn is_local_id(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Display for TermRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermRole::Entity => write!(f, "entity"),
            TermRole::Quality => write!(f, "quality"),
        }
    }
}

/// Converts an OBO id (`PATO:0000001`) into its OBO IRI
///
/// ```
/// use zpgen::term::obo_id_to_iri;
///
/// assert_eq!(
///     obo_id_to_iri("PATO:0000001"),
///     "http://purl.obolibrary.org/obo/PATO_0000001"
/// );
/// ```
pub fn obo_id_to_iri(id: &str) -> String {
    format!("{}{}", OBO_IRI, id.replacen(':', "_", 1))
}

/// Converts the local part of an OBO IRI (`PATO_0000001`) into an OBO id
///
/// Accepts the full IRI as well. Returns `None` if the IRI does not
/// look like an OBO term IRI.
pub fn obo_iri_to_id(iri: &str) -> Option<String> {
    let local = iri.strip_prefix(OBO_IRI).unwrap_or(iri);
    let (prefix, number) = local.split_once('_')?;
    if prefix.is_empty() || number.is_empty() || local.contains('/') {
        return None;
    }
    Some(format!("{prefix}:{number}"))
}
