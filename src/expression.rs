//! Class expressions that define ZP terms
//!
//! A ZP term is defined by a (small) OWL class expression built from
//! three constructs:
//!
//! - a reference to a named class ([`LogicalExpression::TermRef`])
//! - the intersection of other expressions ([`LogicalExpression::Intersection`])
//! - an existential restriction over one of the known relations
//!   ([`LogicalExpression::Restriction`])
//!
//! The operands of an intersection form a set: their order is irrelevant
//! for equality. Every expression has a [`Signature`], a canonical string
//! form that is identical for equal expressions and is used to look up
//! the id of a term.
use std::fmt::Display;
use std::hash::Hash;

/// The relations used in ZP class expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// `BFO:0000070` - towards
    Towards,
    /// `BFO:0000050` - part of
    PartOf,
    /// `BFO:0000052` - inheres in
    InheresIn,
    /// `BFO:0000051` - has part
    HasPart,
    /// `RO:0002573` - has modifier
    HasModifier,
}

impl RelationKind {
    /// All relations
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Towards,
        RelationKind::PartOf,
        RelationKind::InheresIn,
        RelationKind::HasPart,
        RelationKind::HasModifier,
    ];

    /// The OBO id of the object property
    pub fn obo_id(&self) -> &'static str {
        match self {
            RelationKind::Towards => "BFO:0000070",
            RelationKind::PartOf => "BFO:0000050",
            RelationKind::InheresIn => "BFO:0000052",
            RelationKind::HasPart => "BFO:0000051",
            RelationKind::HasModifier => "RO:0002573",
        }
    }

    /// Returns the relation for an object property id
    ///
    /// ```
    /// use zpgen::RelationKind;
    ///
    /// assert_eq!(RelationKind::from_obo_id("BFO:0000051"), Some(RelationKind::HasPart));
    /// assert_eq!(RelationKind::from_obo_id("RO:0002180"), None);
    /// ```
    pub fn from_obo_id(id: &str) -> Option<RelationKind> {
        Self::ALL.into_iter().find(|rel| rel.obo_id() == id)
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RelationKind::Towards => "towards",
            RelationKind::PartOf => "part_of",
            RelationKind::InheresIn => "inheres_in",
            RelationKind::HasPart => "has_part",
            RelationKind::HasModifier => "has_modifier",
        };
        write!(f, "{name}")
    }
}

/// Canonical string form of a [`LogicalExpression`]
///
/// Two expressions have the same signature if and only if they are equal,
/// regardless of the order of intersection operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    /// The signature as `str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable OWL class expression
///
/// Equality and hashing are based on the [`Signature`], so the operand
/// order of intersections does not matter.
///
/// # Examples
///
/// ```
/// use zpgen::{LogicalExpression, RelationKind};
///
/// let a = LogicalExpression::intersection([
///     LogicalExpression::term("PATO:0000070"),
///     LogicalExpression::some(RelationKind::InheresIn, LogicalExpression::term("ZFA:0001086")),
/// ]);
/// let b = LogicalExpression::intersection([
///     LogicalExpression::some(RelationKind::InheresIn, LogicalExpression::term("ZFA:0001086")),
///     LogicalExpression::term("PATO:0000070"),
/// ]);
///
/// assert_eq!(a, b);
/// assert_eq!(a.signature(), b.signature());
/// ```
#[derive(Debug, Clone)]
pub enum LogicalExpression {
    /// A named class, referenced by its OBO id
    TermRef(String),
    /// The intersection of all operands
    Intersection(Vec<LogicalExpression>),
    /// Existential restriction: `relation some filler`
    Restriction(RelationKind, Box<LogicalExpression>),
}

impl LogicalExpression {
    /// Reference to a named class
    pub fn term(id: &str) -> Self {
        LogicalExpression::TermRef(id.to_string())
    }

    /// Intersection of the given operands
    pub fn intersection<I: IntoIterator<Item = LogicalExpression>>(operands: I) -> Self {
        LogicalExpression::Intersection(operands.into_iter().collect())
    }

    /// Existential restriction `relation some filler`
    pub fn some(relation: RelationKind, filler: LogicalExpression) -> Self {
        LogicalExpression::Restriction(relation, Box::new(filler))
    }

    /// Returns the canonical [`Signature`] of the expression
    ///
    /// - A named class is its OBO id
    /// - A restriction is `some(<relation id> <filler signature>)`
    /// - An intersection is `and(<operand signatures>)`, with the operand
    ///   signatures sorted and duplicates removed
    pub fn signature(&self) -> Signature {
        let mut out = String::with_capacity(128);
        self.write_signature(&mut out);
        Signature(out)
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            LogicalExpression::TermRef(id) => out.push_str(id),
            LogicalExpression::Restriction(relation, filler) => {
                out.push_str("some(");
                out.push_str(relation.obo_id());
                out.push(' ');
                filler.write_signature(out);
                out.push(')');
            }
            LogicalExpression::Intersection(operands) => {
                let mut signatures: Vec<Signature> =
                    operands.iter().map(LogicalExpression::signature).collect();
                signatures.sort_unstable();
                signatures.dedup();
                out.push_str("and(");
                for (idx, sig) in signatures.iter().enumerate() {
                    if idx > 0 {
                        out.push(' ');
                    }
                    out.push_str(sig.as_str());
                }
                out.push(')');
            }
        }
    }

    /// Returns an equal expression with all intersection operands
    /// sorted by their signature and without duplicates
    #[must_use]
    pub fn canonical(&self) -> LogicalExpression {
        match self {
            LogicalExpression::TermRef(id) => LogicalExpression::TermRef(id.clone()),
            LogicalExpression::Restriction(relation, filler) => {
                LogicalExpression::some(*relation, filler.canonical())
            }
            LogicalExpression::Intersection(operands) => {
                let mut operands: Vec<(Signature, LogicalExpression)> = operands
                    .iter()
                    .map(|op| {
                        let op = op.canonical();
                        (op.signature(), op)
                    })
                    .collect();
                operands.sort_by(|a, b| a.0.cmp(&b.0));
                operands.dedup_by(|a, b| a.0 == b.0);
                LogicalExpression::Intersection(operands.into_iter().map(|(_, op)| op).collect())
            }
        }
    }

    /// Returns the OBO ids of all named classes in the expression
    pub fn term_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_term_ids(&mut ids);
        ids
    }

    fn collect_term_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            LogicalExpression::TermRef(id) => ids.push(id),
            LogicalExpression::Restriction(_, filler) => filler.collect_term_ids(ids),
            LogicalExpression::Intersection(operands) => {
                for op in operands {
                    op.collect_term_ids(ids);
                }
            }
        }
    }
}

impl PartialEq for LogicalExpression {
    fn eq(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }
}

impl Eq for LogicalExpression {}

impl Hash for LogicalExpression {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature().hash(state);
    }
}

/// Renders the expression in OWL functional syntax, using the `obo:` prefix
impl Display for LogicalExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalExpression::TermRef(id) => write!(f, "obo:{}", id.replacen(':', "_", 1)),
            LogicalExpression::Restriction(relation, filler) => write!(
                f,
                "ObjectSomeValuesFrom(obo:{} {})",
                relation.obo_id().replacen(':', "_", 1),
                filler
            ),
            LogicalExpression::Intersection(operands) => {
                write!(f, "ObjectIntersectionOf(")?;
                for (idx, op) in operands.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{op}")?;
                }
                write!(f, ")")
            }
        }
    }
}
