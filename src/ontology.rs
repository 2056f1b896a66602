use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::expression::{LogicalExpression, Signature};
use crate::parser::functional;
use crate::term::ZpTermId;
use crate::{ZpResult, ZP_ONTOLOGY_IRI};

/// IRI of `rdfs:label`
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// IRI of the annotation property that holds the source information
pub const SOURCE_INFORMATION: &str = "http://zfin/definition/source_information";

/// The property of an [`Annotation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationProperty {
    /// `rdfs:label`
    Label,
    /// The ZFIN fields the class was defined from
    SourceInformation,
    /// Any other annotation property, identified by its IRI
    Other(String),
}

impl AnnotationProperty {
    /// Returns the property for the given IRI
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            RDFS_LABEL => AnnotationProperty::Label,
            SOURCE_INFORMATION => AnnotationProperty::SourceInformation,
            other => AnnotationProperty::Other(other.to_string()),
        }
    }

    /// The full IRI of the property
    pub fn iri(&self) -> &str {
        match self {
            AnnotationProperty::Label => RDFS_LABEL,
            AnnotationProperty::SourceInformation => SOURCE_INFORMATION,
            AnnotationProperty::Other(iri) => iri.as_str(),
        }
    }

    fn functional_name(&self) -> String {
        match self {
            AnnotationProperty::Label => "rdfs:label".to_string(),
            _ => format!("<{}>", self.iri()),
        }
    }
}

/// The value of an [`Annotation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// A plain string literal
    Literal(String),
    /// A reference to another resource
    Iri(String),
}

impl AnnotationValue {
    /// Returns the text of a literal value
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AnnotationValue::Literal(text) => Some(text),
            AnnotationValue::Iri(_) => None,
        }
    }

    fn functional_value(&self) -> String {
        match self {
            AnnotationValue::Literal(text) => {
                format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
            }
            AnnotationValue::Iri(iri) => format!("<{iri}>"),
        }
    }
}

/// An annotation assertion on a ZP class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    property: AnnotationProperty,
    value: AnnotationValue,
}

impl Annotation {
    /// Constructs a new `Annotation`
    pub fn new(property: AnnotationProperty, value: AnnotationValue) -> Self {
        Self { property, value }
    }

    /// The annotation property
    pub fn property(&self) -> &AnnotationProperty {
        &self.property
    }

    /// The annotation value
    pub fn value(&self) -> &AnnotationValue {
        &self.value
    }
}

/// A single ZP class with its definitions and annotations
#[derive(Debug, Clone)]
pub struct ZpClass {
    id: ZpTermId,
    equivalents: Vec<LogicalExpression>,
    annotations: Vec<Annotation>,
}

impl ZpClass {
    fn new(id: ZpTermId) -> Self {
        Self {
            id,
            equivalents: Vec::with_capacity(1),
            annotations: Vec::with_capacity(2),
        }
    }

    /// The [`ZpTermId`] of the class
    pub fn id(&self) -> &ZpTermId {
        &self.id
    }

    /// All class expressions the class is equivalent to
    pub fn equivalents(&self) -> &[LogicalExpression] {
        &self.equivalents
    }

    /// All annotations of the class
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The first literal value of the given property
    pub fn annotation(&self, property: &AnnotationProperty) -> Option<&str> {
        self.annotations
            .iter()
            .filter(|anno| anno.property() == property)
            .find_map(|anno| anno.value().as_literal())
    }

    /// The label (`rdfs:label`) of the class
    pub fn label(&self) -> Option<&str> {
        self.annotation(&AnnotationProperty::Label)
    }

    /// The tab separated source information of the class
    pub fn source_information(&self) -> Option<&str> {
        self.annotation(&AnnotationProperty::SourceInformation)
    }

    fn has_property(&self, property: &AnnotationProperty) -> bool {
        self.annotations
            .iter()
            .any(|anno| anno.property() == property)
    }
}

/// The generated ontology
///
/// The `Ontology` holds all ZP classes with their equivalence axioms
/// and annotations. It is written as an OWL document in functional syntax
/// and can be read back from such a document, which allows to keep the
/// ids of an earlier release.
///
/// Classes are always kept (and written) in the order of their id.
///
/// # Examples
///
/// ```
/// use zpgen::{LogicalExpression, Ontology, ZpTermId};
///
/// let mut ontology = Ontology::default();
/// let id = ZpTermId::from(1u32);
/// ontology.add_equivalence(id, LogicalExpression::term("ZFA:0100000"));
/// ontology.set_label(id, "foobar");
///
/// let mut document = Vec::new();
/// ontology.write(&mut document).unwrap();
///
/// let reloaded = Ontology::parse(std::str::from_utf8(&document).unwrap()).unwrap();
/// assert_eq!(reloaded.len(), 1);
/// assert_eq!(reloaded.get(&id).unwrap().label(), Some("foobar"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    classes: BTreeMap<ZpTermId, ZpClass>,
}

impl Ontology {
    /// Reads an ontology from an OWL functional syntax file
    ///
    /// # Errors
    ///
    /// - [`crate::ZpError::IoFailure`]: the file cannot be read
    /// - [`crate::ZpError::InvalidInput`]: the document is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> ZpResult<Self> {
        let ontology = functional::read_file(path.as_ref())?;
        info!(
            "Loaded {} ZP classes from {}",
            ontology.len(),
            path.as_ref().display()
        );
        Ok(ontology)
    }

    /// Parses an ontology from an OWL functional syntax document
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::InvalidInput`] if the document is malformed
    pub fn parse(document: &str) -> ZpResult<Self> {
        functional::parse(document)
    }

    /// Number of ZP classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the ontology has no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the class with the given id
    pub fn get(&self, id: &ZpTermId) -> Option<&ZpClass> {
        self.classes.get(id)
    }

    /// Iterates all classes in the order of their id
    pub fn iter(&self) -> Iter<'_> {
        self.classes.values()
    }

    /// Adds a class without any axioms
    ///
    /// Returns `true` if the class was not present before.
    pub fn declare(&mut self, id: ZpTermId) -> bool {
        match self.classes.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(ZpClass::new(id));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn class_mut(&mut self, id: ZpTermId) -> &mut ZpClass {
        self.classes.entry(id).or_insert_with(|| ZpClass::new(id))
    }

    /// Asserts that the class `id` is equivalent to `expression`
    ///
    /// Returns `false` if the same axiom was already present.
    pub fn add_equivalence(&mut self, id: ZpTermId, expression: LogicalExpression) -> bool {
        let class = self.class_mut(id);
        if class.equivalents.contains(&expression) {
            false
        } else {
            class.equivalents.push(expression);
            true
        }
    }

    /// Sets the label of the class, replacing any previous label
    pub fn set_label(&mut self, id: ZpTermId, label: &str) {
        let class = self.class_mut(id);
        class
            .annotations
            .retain(|anno| anno.property() != &AnnotationProperty::Label);
        class.annotations.push(Annotation::new(
            AnnotationProperty::Label,
            AnnotationValue::Literal(label.to_string()),
        ));
    }

    /// Adds an annotation to the class
    ///
    /// Returns `false` if the identical annotation was already present.
    pub fn add_annotation(&mut self, id: ZpTermId, annotation: Annotation) -> bool {
        let class = self.class_mut(id);
        if class.annotations.contains(&annotation) {
            false
        } else {
            class.annotations.push(annotation);
            true
        }
    }

    /// Adds the annotation only if the class has no value for the property yet
    ///
    /// Returns `true` if the annotation was added.
    pub fn add_annotation_if_absent(&mut self, id: ZpTermId, annotation: Annotation) -> bool {
        let class = self.class_mut(id);
        if class.has_property(annotation.property()) {
            false
        } else {
            class.annotations.push(annotation);
            true
        }
    }

    /// Returns the [`Signature`] of every equivalence axiom with its class id
    ///
    /// This is used to initialize an [`crate::IdentityRegistry`] with the
    /// assignments of a previous run.
    pub fn preseed(&self) -> impl Iterator<Item = (Signature, ZpTermId)> + '_ {
        self.iter().flat_map(|class| {
            class
                .equivalents()
                .iter()
                .map(move |expr| (expr.signature(), *class.id()))
        })
    }

    /// Writes the ontology as OWL functional syntax
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::IoFailure`] if writing fails
    pub fn write<W: Write>(&self, writer: &mut W) -> ZpResult<()> {
        writeln!(writer, "Prefix(:=<{ZP_ONTOLOGY_IRI}#>)")?;
        writeln!(writer, "Prefix(obo:=<{}>)", crate::OBO_IRI)?;
        writeln!(writer, "Prefix(owl:=<http://www.w3.org/2002/07/owl#>)")?;
        writeln!(writer, "Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)")?;
        writeln!(writer)?;
        writeln!(writer)?;
        writeln!(writer, "Ontology(<{ZP_ONTOLOGY_IRI}>")?;
        writeln!(writer)?;
        for class in self {
            let name = functional_name(class.id());
            let label = class
                .label()
                .unwrap_or_default()
                .replace(|c: char| c == '\n' || c == '\r', " ");
            writeln!(writer, "# Class: {name} ({label})")?;
            writeln!(writer)?;
            for annotation in class.annotations() {
                writeln!(
                    writer,
                    "AnnotationAssertion({} {} {})",
                    annotation.property().functional_name(),
                    name,
                    annotation.value().functional_value()
                )?;
            }
            writeln!(writer, "Declaration(Class({name}))")?;
            for expr in class.equivalents() {
                writeln!(writer, "EquivalentClasses({name} {expr})")?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, ")")?;
        Ok(())
    }

    /// Saves the ontology to `path`
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::IoFailure`] if the file cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ZpResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut writer)?;
        writer.flush()?;
        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Writes the source information of all classes
    ///
    /// One line per class that has both, a label and source information:
    ///
    /// ```text
    /// ZP:0000001  <label>  <source information>
    /// ```
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::IoFailure`] if writing fails
    pub fn write_source_information<W: Write>(&self, writer: &mut W) -> ZpResult<()> {
        let mut count = 0usize;
        for class in self {
            if let (Some(label), Some(source)) = (class.label(), class.source_information()) {
                writeln!(writer, "{}\t{}\t{}", class.id(), label, source)?;
                count += 1;
            }
        }
        debug!("Wrote source information of {} classes", count);
        Ok(())
    }

    /// Saves the source information of all classes to `path`
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::IoFailure`] if the file cannot be written
    pub fn save_source_information<P: AsRef<Path>>(&self, path: P) -> ZpResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_source_information(&mut writer)?;
        writer.flush()?;
        info!("Wrote source information to {}", path.as_ref().display());
        Ok(())
    }
}

fn functional_name(id: &ZpTermId) -> String {
    format!("obo:{}_{:07}", ZpTermId::PREFIX, id.as_u32())
}

/// Iterator of [`ZpClass`]es, ordered by id
pub type Iter<'a> = std::collections::btree_map::Values<'a, ZpTermId, ZpClass>;

impl<'a> IntoIterator for &'a Ontology {
    type Item = &'a ZpClass;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
