//! Options of a single generator run
use std::path::{Path, PathBuf};

/// Options of a single generator run
///
/// # Examples
///
/// ```
/// use zpgen::Config;
///
/// let config = Config::new("phenotype.txt.gz", "zp.owl", "zp.annot")
///     .keep_ids(true)
///     .source_information_file("zp.source");
///
/// assert!(config.is_keep_ids());
/// // a source information file implies adding the source information
/// assert!(config.is_add_source_information());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    input: PathBuf,
    ontology: PathBuf,
    annotations: PathBuf,
    keep_ids: bool,
    add_source_information: bool,
    source_information_file: Option<PathBuf>,
}

impl Config {
    /// Constructs a new `Config` with the required file paths
    ///
    /// - `input`: the ZFIN phenotype file, optionally gzip compressed
    /// - `ontology`: where the ontology is written to (and read from, if ids are kept)
    /// - `annotations`: where the gene to ZP annotations are written to
    pub fn new<I, O, A>(input: I, ontology: O, annotations: A) -> Self
    where
        I: Into<PathBuf>,
        O: Into<PathBuf>,
        A: Into<PathBuf>,
    {
        Self {
            input: input.into(),
            ontology: ontology.into(),
            annotations: annotations.into(),
            keep_ids: false,
            add_source_information: false,
            source_information_file: None,
        }
    }

    /// Reuse the ids of the existing ontology file
    #[must_use]
    pub fn keep_ids(mut self, keep_ids: bool) -> Self {
        self.keep_ids = keep_ids;
        self
    }

    /// Annotate every class with the ZFIN fields it was built from
    #[must_use]
    pub fn add_source_information(mut self, add: bool) -> Self {
        self.add_source_information = add;
        self
    }

    /// Also write the source information of all classes to `path`
    #[must_use]
    pub fn source_information_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source_information_file = Some(path.into());
        self
    }

    /// The ZFIN input file
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The ontology file
    pub fn ontology(&self) -> &Path {
        &self.ontology
    }

    /// The annotation file
    pub fn annotations(&self) -> &Path {
        &self.annotations
    }

    /// Returns `true` if ids of the existing ontology are kept
    pub fn is_keep_ids(&self) -> bool {
        self.keep_ids
    }

    /// Returns `true` if source information is added to the classes
    pub fn is_add_source_information(&self) -> bool {
        self.add_source_information || self.source_information_file.is_some()
    }

    /// The source information file, if requested
    pub fn source_information(&self) -> Option<&Path> {
        self.source_information_file.as_deref()
    }
}
