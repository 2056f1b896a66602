use core::fmt::Debug;
use std::fmt::Display;

use crate::{ZpError, ZpResult, OBO_IRI};

/// The unique identifier of a generated ZP term
///
/// Rendered as `ZP:` followed by a 7-digit zero padded number,
/// e.g. `ZP:0000001`.
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ZpTermId {
    inner: u32,
}

impl ZpTermId {
    /// The OBO prefix of all generated terms
    pub const PREFIX: &'static str = "ZP";

    /// Returns the integer representation of the id
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    /// Returns the id that follows `self`
    #[must_use]
    pub fn next(&self) -> ZpTermId {
        ZpTermId {
            inner: self.inner + 1,
        }
    }

    /// Returns the OBO IRI of the term
    ///
    /// ```
    /// use zpgen::ZpTermId;
    ///
    /// let id = ZpTermId::from(12u32);
    /// assert_eq!(id.iri(), "http://purl.obolibrary.org/obo/ZP_0000012");
    /// ```
    pub fn iri(&self) -> String {
        format!("{}{}_{:07}", OBO_IRI, Self::PREFIX, self.inner)
    }
}

impl TryFrom<&str> for ZpTermId {
    type Error = ZpError;
    /// Parses `ZP:0000001`, `ZP_0000001` or the full OBO IRI
    fn try_from(s: &str) -> ZpResult<Self> {
        let local = s.strip_prefix(OBO_IRI).unwrap_or(s);
        let Some(number) = local
            .strip_prefix("ZP:")
            .or_else(|| local.strip_prefix("ZP_"))
        else {
            return Err(ZpError::InvalidInput(format!("not a ZP term id: {s}")));
        };
        Ok(ZpTermId {
            inner: number.parse::<u32>()?,
        })
    }
}

impl From<u32> for ZpTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for ZpTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZpTermId({self})")
    }
}

impl Display for ZpTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:07}", Self::PREFIX, self.inner)
    }
}

impl PartialEq<str> for ZpTermId {
    fn eq(&self, other: &str) -> bool {
        ZpTermId::try_from(other).map_or(false, |other| *self == other)
    }
}
