//! Writes resolved terms to the ontology and the annotation file
use std::io::Write;

use tracing::error;

use crate::composition::CompositeTerm;
use crate::ontology::{Annotation, AnnotationProperty, AnnotationValue, Ontology};
use crate::record::RawRecord;
use crate::term::ZpTermId;

/// Hands generated terms over to the [`Ontology`] and the annotation file
///
/// For every term the `Emitter`
///
/// - asserts the equivalence of the ZP class and its class expression
/// - sets the label of the class
/// - writes `gene id <TAB> ZP id <TAB> label` to the annotation file
/// - optionally adds the source information, unless the class already has one
///
/// Failing writes to the annotation file are logged and counted, but do
/// not stop the run.
#[derive(Debug)]
pub struct Emitter<W> {
    annotations: W,
    add_source_information: bool,
    failed_writes: usize,
}

impl<W: Write> Emitter<W> {
    /// Constructs a new `Emitter` that writes annotations to `annotations`
    pub fn new(annotations: W, add_source_information: bool) -> Self {
        Self {
            annotations,
            add_source_information,
            failed_writes: 0,
        }
    }

    /// Emits one term that was built from `record`
    pub fn emit(
        &mut self,
        ontology: &mut Ontology,
        record: &RawRecord,
        term: &CompositeTerm,
        id: ZpTermId,
    ) {
        ontology.add_equivalence(id, term.expression().clone());
        ontology.set_label(id, term.label());

        if self.add_source_information {
            ontology.add_annotation_if_absent(
                id,
                Annotation::new(
                    AnnotationProperty::SourceInformation,
                    AnnotationValue::Literal(record.source_information().to_string()),
                ),
            );
        }

        if let Err(err) = writeln!(
            self.annotations,
            "{}\t{}\t{}",
            record.gene_id(),
            id,
            term.label()
        ) {
            error!("Unable to write annotation for {}: {}", id, err);
            self.failed_writes += 1;
        }
    }

    /// Number of annotation lines that could not be written
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Returns the annotation writer
    pub fn into_inner(self) -> W {
        self.annotations
    }

    /// Flushes the annotation writer
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::IoFailure`] if flushing fails
    pub fn flush(&mut self) -> crate::ZpResult<()> {
        self.annotations.flush()?;
        Ok(())
    }
}
