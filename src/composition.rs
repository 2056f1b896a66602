//! Composition of ZP class expressions from decomposed annotations
//!
//! Every abnormal annotation is turned into the class expression
//!
//! ```text
//! has_part some (
//!     <quality>
//!     and (has_modifier some abnormal)
//!     and (inheres_in some <entity 1>)
//!     and (towards some <entity 2>)
//! )
//! ```
//!
//! where an entity with a subterm is rendered as
//! `<subterm> and (part_of some <superterm>)`. The `towards` operand
//! is only present if the annotation has a second entity.
use tracing::trace;

use crate::expression::{LogicalExpression, RelationKind};
use crate::record::{Entity, RawRecord};
use crate::registry::IdentityRegistry;
use crate::term::{TermRole, ZpTermId};
use crate::{ZpResult, ABNORMAL, QUALITY};

/// `ZFA:0001439` - anatomical system
pub const ANATOMICAL_SYSTEM: &str = "ZFA:0001439";

/// A generated phenotype term
///
/// The id is only known once the term was resolved against an
/// [`IdentityRegistry`].
#[derive(Debug, Clone)]
pub struct CompositeTerm {
    expression: LogicalExpression,
    label: String,
    id: Option<ZpTermId>,
}

impl CompositeTerm {
    /// The class expression that defines the term
    pub fn expression(&self) -> &LogicalExpression {
        &self.expression
    }

    /// The human readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The id of the term, if already resolved
    pub fn id(&self) -> Option<ZpTermId> {
        self.id
    }

    /// Resolves and stores the stable id of the term
    pub fn resolve_id(&mut self, registry: &mut IdentityRegistry) -> ZpTermId {
        match self.id {
            Some(id) => id,
            None => {
                let id = registry.resolve(&self.expression);
                self.id = Some(id);
                id
            }
        }
    }
}

/// Builds [`CompositeTerm`]s from abnormal [`RawRecord`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct CompositionBuilder;

impl CompositionBuilder {
    /// Returns `true` for the uninformative annotation
    /// `anatomical system` + `quality` without any other entity
    pub fn is_suppressed(record: &RawRecord) -> bool {
        record
            .entity1()
            .superterm()
            .map_or(false, |term| term.id() == ANATOMICAL_SYSTEM)
            && record.quality().id() == QUALITY
            && record.entity1().subterm().is_none()
            && record.entity2().is_empty()
    }

    /// Builds the term for an abnormal record
    ///
    /// Returns `None` for records that are not abnormal and for the
    /// suppressed `anatomical system` annotation.
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::UnrecognizedVocabulary`] if an entity is not from
    /// GO, ZFA, BSPO or MPATH or if the quality is not from PATO. A record
    /// without entity 1 superterm is rejected the same way.
    ///
    /// # Examples
    ///
    /// ```
    /// use zpgen::{CompositionBuilder, RawRecord};
    ///
    /// let record = RawRecord::builder("ZDB-GENE-000001-1")
    ///     .entity1("ZFA:0001161", "fin")
    ///     .entity1_subterm("ZFA:0001514", "bone")
    ///     .entity2("ZFA:0000037", "body")
    ///     .quality("PATO:0000117", "size")
    ///     .abnormal(true)
    ///     .build();
    ///
    /// let term = CompositionBuilder.compose(&record).unwrap().unwrap();
    /// assert_eq!(term.label(), "abnormal(ly) size fin bone towards body");
    /// ```
    pub fn compose(&self, record: &RawRecord) -> ZpResult<Option<CompositeTerm>> {
        if !record.is_abnormal() {
            return Ok(None);
        }
        if Self::is_suppressed(record) {
            trace!("Suppressing anatomical system annotation of {}", record.gene_id());
            return Ok(None);
        }

        let quality = record.quality();
        TermRole::Quality.check(quality.id())?;

        let mut operands = Vec::with_capacity(4);
        operands.push(LogicalExpression::term(quality.id()));
        operands.push(LogicalExpression::some(
            RelationKind::HasModifier,
            LogicalExpression::term(ABNORMAL),
        ));

        let (entity1, entity1_label) = entity_expression(record.entity1())?;
        operands.push(LogicalExpression::some(RelationKind::InheresIn, entity1));
        let mut label = format!("abnormal(ly) {} {}", quality.name(), entity1_label);

        if record.entity2().superterm().is_some() {
            let (entity2, entity2_label) = entity_expression(record.entity2())?;
            operands.push(LogicalExpression::some(RelationKind::Towards, entity2));
            label.push_str(" towards ");
            label.push_str(&entity2_label);
        }

        let expression = LogicalExpression::some(
            RelationKind::HasPart,
            LogicalExpression::Intersection(operands),
        );

        Ok(Some(CompositeTerm {
            expression,
            label,
            id: None,
        }))
    }
}

/// Returns the expression and the label fragment of an entity
///
/// The label names the more general superterm first, e.g.
/// `swim bladder epithelium` for the epithelium of the swim bladder.
fn entity_expression(entity: &Entity) -> ZpResult<(LogicalExpression, String)> {
    let superterm_id = entity.superterm().map_or("", |term| term.id());
    TermRole::Entity.check(superterm_id)?;
    let superterm = LogicalExpression::term(superterm_id);
    let superterm_name = entity.superterm().map_or("", |term| term.name());

    match entity.subterm() {
        Some(subterm) => {
            TermRole::Entity.check(subterm.id())?;
            let expression = LogicalExpression::intersection([
                LogicalExpression::term(subterm.id()),
                LogicalExpression::some(RelationKind::PartOf, superterm),
            ]);
            Ok((expression, format!("{} {}", superterm_name, subterm.name())))
        }
        None => Ok((superterm, superterm_name.to_string())),
    }
}
