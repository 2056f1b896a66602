//! Stable identifiers for class expressions
//!
//! The [`IdentityRegistry`] hands out one [`ZpTermId`] per distinct
//! class expression. Identifiers that were assigned in a previous run can
//! be loaded into the registry, so that the same expression keeps its id
//! and new expressions never reuse an id of the previous release.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::expression::{LogicalExpression, Signature};
use crate::ontology::Ontology;
use crate::term::ZpTermId;
use crate::DEFAULT_NUM_TERMS;

/// Maps class expressions to stable [`ZpTermId`]s
///
/// The registry is owned by a single run. It behaves like a memoizing
/// function: the same expression (compared by its [`Signature`]) always
/// resolves to the same id.
///
/// # Examples
///
/// ```
/// use zpgen::{IdentityRegistry, LogicalExpression, ZpTermId};
///
/// let previous = LogicalExpression::term("ZFA:0001086");
/// let mut registry = IdentityRegistry::initialize([
///     (previous.signature(), ZpTermId::from(1u32)),
/// ]);
///
/// // known expressions keep their id
/// assert_eq!(registry.resolve(&previous), ZpTermId::from(1u32));
///
/// // new expressions get the next free id
/// let new = LogicalExpression::term("ZFA:0000107");
/// assert_eq!(registry.resolve(&new), ZpTermId::from(2u32));
/// ```
#[derive(Debug)]
pub struct IdentityRegistry {
    ids: HashMap<Signature, ZpTermId>,
    in_use: HashSet<ZpTermId>,
    next: ZpTermId,
    allocated: usize,
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self {
            ids: HashMap::with_capacity(DEFAULT_NUM_TERMS),
            in_use: HashSet::with_capacity(DEFAULT_NUM_TERMS),
            next: ZpTermId::from(1u32),
            allocated: 0,
        }
    }
}

impl IdentityRegistry {
    /// Constructs a registry that already knows the given assignments
    ///
    /// All pre-seeded ids are reserved. If one signature is listed with
    /// several ids, the lowest id is used and the others stay reserved.
    pub fn initialize<I: IntoIterator<Item = (Signature, ZpTermId)>>(preseeded: I) -> Self {
        let mut registry = Self::default();
        for (signature, id) in preseeded {
            registry.in_use.insert(id);
            match registry.ids.entry(signature) {
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
                Entry::Occupied(mut entry) => {
                    warn!(
                        "{} and {} share the same definition {}",
                        entry.get(),
                        id,
                        entry.key()
                    );
                    if id < *entry.get() {
                        entry.insert(id);
                    }
                }
            }
        }
        debug!("Registry initialized with {} definitions", registry.ids.len());
        registry
    }

    /// Constructs a registry from all ZP classes of the ontology
    ///
    /// Every equivalence axiom is pre-seeded, and the ids of all classes are
    /// reserved, even if they have no definition.
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut registry = Self::initialize(ontology.preseed());
        for class in ontology {
            registry.reserve(*class.id());
        }
        registry
    }

    /// Marks `id` as used, so it will never be allocated
    pub fn reserve(&mut self, id: ZpTermId) -> bool {
        self.in_use.insert(id)
    }

    /// Returns the stable id of the expression
    ///
    /// Known expressions return their existing id. Unknown expressions
    /// are assigned the lowest id above the previously allocated one that
    /// is not in use.
    pub fn resolve(&mut self, expression: &LogicalExpression) -> ZpTermId {
        self.resolve_signature(expression.signature())
    }

    /// Same as [`IdentityRegistry::resolve`] for an already computed [`Signature`]
    pub fn resolve_signature(&mut self, signature: Signature) -> ZpTermId {
        if let Some(id) = self.ids.get(&signature) {
            return *id;
        }
        let id = self.allocate();
        debug!("Assigned {} to {}", id, signature);
        self.ids.insert(signature, id);
        id
    }

    fn allocate(&mut self) -> ZpTermId {
        while self.in_use.contains(&self.next) {
            self.next = self.next.next();
        }
        let id = self.next;
        self.in_use.insert(id);
        self.next = id.next();
        self.allocated += 1;
        id
    }

    /// Returns the id of the signature without allocating a new one
    pub fn get(&self, signature: &Signature) -> Option<ZpTermId> {
        self.ids.get(signature).copied()
    }

    /// Number of known definitions
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the registry does not know any definition
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of ids that were newly allocated in this run
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expression::RelationKind;

    fn term(id: &str) -> LogicalExpression {
        LogicalExpression::term(id)
    }

    fn phenotype(quality: &str, entity: &str) -> LogicalExpression {
        LogicalExpression::some(
            RelationKind::HasPart,
            LogicalExpression::intersection([
                term(quality),
                LogicalExpression::some(RelationKind::HasModifier, term("PATO:0000460")),
                LogicalExpression::some(RelationKind::InheresIn, term(entity)),
            ]),
        )
    }

    #[test]
    fn fresh_registry_starts_at_one() {
        let mut registry = IdentityRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(&term("A:1")), ZpTermId::from(1u32));
        assert_eq!(registry.resolve(&term("A:2")), ZpTermId::from(2u32));
        assert_eq!(registry.resolve(&term("A:3")), ZpTermId::from(3u32));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.allocated(), 3);
    }

    #[test]
    fn resolve_is_deterministic() {
        let mut registry = IdentityRegistry::default();
        let expr = phenotype("PATO:0000070", "ZFA:0001086");
        let first = registry.resolve(&expr);
        let second = registry.resolve(&expr);
        assert_eq!(first, second);
        assert_eq!(registry.allocated(), 1);
    }

    #[test]
    fn operand_order_does_not_change_id() {
        let mut registry = IdentityRegistry::default();
        let a = LogicalExpression::intersection([
            term("PATO:0000117"),
            LogicalExpression::some(RelationKind::InheresIn, term("ZFA:0001161")),
            LogicalExpression::some(RelationKind::Towards, term("ZFA:0000037")),
        ]);
        let b = LogicalExpression::intersection([
            LogicalExpression::some(RelationKind::Towards, term("ZFA:0000037")),
            term("PATO:0000117"),
            LogicalExpression::some(RelationKind::InheresIn, term("ZFA:0001161")),
        ]);
        let c = LogicalExpression::intersection([
            LogicalExpression::some(RelationKind::InheresIn, term("ZFA:0001161")),
            LogicalExpression::some(RelationKind::Towards, term("ZFA:0000037")),
            term("PATO:0000117"),
        ]);
        let id = registry.resolve(&a);
        assert_eq!(registry.resolve(&b), id);
        assert_eq!(registry.resolve(&c), id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn preseeded_ids_are_kept() {
        let muscle = phenotype("PATO:0000070", "ZFA:0001086");
        let fin = phenotype("PATO:0000117", "ZFA:0001161");
        let mut registry = IdentityRegistry::initialize([
            (muscle.signature(), ZpTermId::from(5u32)),
            (fin.signature(), ZpTermId::from(2u32)),
        ]);
        assert_eq!(registry.resolve(&fin), ZpTermId::from(2u32));
        assert_eq!(registry.resolve(&muscle), ZpTermId::from(5u32));
        assert_eq!(registry.allocated(), 0);
    }

    #[test]
    fn new_ids_skip_preseeded_ids() {
        let mut registry = IdentityRegistry::initialize([
            (term("A:1").signature(), ZpTermId::from(1u32)),
            (term("A:2").signature(), ZpTermId::from(2u32)),
            (term("A:4").signature(), ZpTermId::from(4u32)),
        ]);
        assert_eq!(registry.resolve(&term("B:1")), ZpTermId::from(3u32));
        assert_eq!(registry.resolve(&term("B:2")), ZpTermId::from(5u32));
        assert_eq!(registry.resolve(&term("B:3")), ZpTermId::from(6u32));
    }

    #[test]
    fn reserved_ids_are_skipped() {
        let mut registry = IdentityRegistry::default();
        assert!(registry.reserve(ZpTermId::from(1u32)));
        assert!(!registry.reserve(ZpTermId::from(1u32)));
        assert_eq!(registry.resolve(&term("A:1")), ZpTermId::from(2u32));
    }

    #[test]
    fn duplicate_preseed_prefers_lowest_id() {
        let sig = term("A:1").signature();
        let mut registry = IdentityRegistry::initialize([
            (sig.clone(), ZpTermId::from(7u32)),
            (sig.clone(), ZpTermId::from(3u32)),
        ]);
        assert_eq!(registry.get(&sig), Some(ZpTermId::from(3u32)));
        // both ids remain reserved
        assert_eq!(registry.resolve(&term("A:2")), ZpTermId::from(1u32));
        assert_eq!(registry.resolve(&term("A:3")), ZpTermId::from(2u32));
        assert_eq!(registry.resolve(&term("A:4")), ZpTermId::from(4u32));
        assert_eq!(registry.resolve(&term("A:5")), ZpTermId::from(5u32));
        assert_eq!(registry.resolve(&term("A:6")), ZpTermId::from(6u32));
        assert_eq!(registry.resolve(&term("A:7")), ZpTermId::from(8u32));
    }

    #[test]
    fn get_does_not_allocate() {
        let registry = IdentityRegistry::default();
        assert!(registry.get(&term("A:1").signature()).is_none());
        assert_eq!(registry.allocated(), 0);
    }
}
