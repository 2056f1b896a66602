use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::{debug, info};

use crate::composition::CompositionBuilder;
use crate::config::Config;
use crate::emitter::Emitter;
use crate::ontology::Ontology;
use crate::parser::zfin::ZfinRecords;
use crate::record::RawRecord;
use crate::registry::IdentityRegistry;
use crate::{ZpError, ZpResult};

/// Statistics of a generator run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Records read from the input, excluding the root record
    pub records: usize,
    /// Abnormal records, excluding the root record
    pub abnormal: usize,
    /// Normal records whose quality was corrected
    pub corrected: usize,
    /// Abnormal records that did not produce a term
    pub suppressed: usize,
    /// Emitted terms, including the root term
    pub emitted: usize,
    /// Ids that were allocated in this run
    pub new_ids: usize,
    /// Annotation lines that could not be written
    pub failed_writes: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records ({} abnormal, {} corrected, {} suppressed), {} terms emitted, {} new ids",
            self.records,
            self.abnormal,
            self.corrected,
            self.suppressed,
            self.emitted,
            self.new_ids
        )
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// The engine that turns ZFIN records into ZP terms
///
/// The `Generator` owns everything that changes during a run: the
/// [`IdentityRegistry`], the [`Ontology`] and the [`Emitter`].
/// Records must be processed strictly in order, since the order in which
/// new expressions are seen decides about their ids.
///
/// ```mermaid
/// flowchart LR
///     source[ZfinRecords] --> abnormal{abnormal?}
///     abnormal -- no --> corrector[correct]
///     abnormal -- yes --> builder[CompositionBuilder]
///     builder --> registry[IdentityRegistry]
///     registry --> emitter[Emitter]
///     emitter --> ontology[(Ontology)]
///     emitter --> annotations[(annotation file)]
/// ```
///
/// # Examples
///
/// ```
/// use zpgen::{Generator, IdentityRegistry, Ontology, RawRecord};
///
/// let mut generator = Generator::new(
///     Ontology::default(),
///     IdentityRegistry::default(),
///     Vec::new(),
///     false,
/// );
/// generator.process_root().unwrap();
///
/// let record = RawRecord::builder("ZDB-GENE-000001-1")
///     .entity1("ZFA:0001086", "muscle")
///     .quality("PATO:0000070", "amount")
///     .abnormal(true)
///     .build();
/// generator.process_all([Ok(record)]).unwrap();
///
/// let (ontology, annotations, summary) = generator.finish().unwrap();
/// assert_eq!(ontology.len(), 2);
/// assert_eq!(summary.emitted, 2);
/// assert_eq!(
///     String::from_utf8(annotations).unwrap().lines().last(),
///     Some("ZDB-GENE-000001-1\tZP:0000002\tabnormal(ly) amount muscle")
/// );
/// ```
#[derive(Debug)]
pub struct Generator<W> {
    builder: CompositionBuilder,
    registry: IdentityRegistry,
    ontology: Ontology,
    emitter: Emitter<W>,
    summary: Summary,
}

impl<W: Write> Generator<W> {
    /// Constructs a new `Generator`
    ///
    /// The `registry` should be initialized from `ontology` when the ids
    /// of a previous run are kept, see [`IdentityRegistry::from_ontology`].
    pub fn new(
        ontology: Ontology,
        registry: IdentityRegistry,
        annotations: W,
        add_source_information: bool,
    ) -> Self {
        Self {
            builder: CompositionBuilder,
            registry,
            ontology,
            emitter: Emitter::new(annotations, add_source_information),
            summary: Summary::default(),
        }
    }

    /// Emits the root term of the ontology
    ///
    /// This must be called before any other record, so that the root
    /// term receives the lowest id in a fresh ontology.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in root record, but returns the same errors
    /// as [`CompositionBuilder::compose`]
    pub fn process_root(&mut self) -> ZpResult<()> {
        self.emit(&RawRecord::root())?;
        Ok(())
    }

    /// Processes a single record from the input
    ///
    /// # Errors
    ///
    /// [`ZpError::UnrecognizedVocabulary`] if the record uses a term of an
    /// unsupported ontology
    pub fn process(&mut self, record: RawRecord) -> ZpResult<()> {
        self.summary.records += 1;
        if !record.is_abnormal() {
            let quality = record.quality().id().to_string();
            let corrected = record.corrected();
            if corrected.quality().id() != quality {
                self.summary.corrected += 1;
            }
            return Ok(());
        }
        self.summary.abnormal += 1;
        if !self.emit(&record)? {
            self.summary.suppressed += 1;
        }
        Ok(())
    }

    /// Processes all records in order, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns the first error of the record source or of [`Generator::process`]
    pub fn process_all<I>(&mut self, records: I) -> ZpResult<()>
    where
        I: IntoIterator<Item = ZpResult<RawRecord>>,
    {
        for record in records {
            self.process(record?)?;
        }
        Ok(())
    }

    fn emit(&mut self, record: &RawRecord) -> ZpResult<bool> {
        let Some(mut term) = self.builder.compose(record)? else {
            return Ok(false);
        };
        let id = term.resolve_id(&mut self.registry);
        self.emitter.emit(&mut self.ontology, record, &term, id);
        self.summary.emitted += 1;
        Ok(true)
    }

    /// The statistics so far
    pub fn summary(&self) -> Summary {
        Summary {
            new_ids: self.registry.allocated(),
            failed_writes: self.emitter.failed_writes(),
            ..self.summary
        }
    }

    /// The ontology as generated so far
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// Flushes the annotations and returns the ontology, the annotation
    /// writer and the statistics of the run
    ///
    /// # Errors
    ///
    /// [`ZpError::IoFailure`] if the annotation writer cannot be flushed
    pub fn finish(mut self) -> ZpResult<(Ontology, W, Summary)> {
        self.emitter.flush()?;
        let summary = self.summary();
        Ok((self.ontology, self.emitter.into_inner(), summary))
    }
}

/// Runs the generator with the given [`Config`]
///
/// 1. Loads the existing ontology, if ids should be kept
/// 2. Emits the root term and all terms of the ZFIN file
/// 3. Saves the ontology, the annotations and, if requested,
///    the source information
///
/// # Errors
///
/// - [`ZpError::InputNotFound`]: the ZFIN file does not exist; no output is written
/// - [`ZpError::UnrecognizedVocabulary`]: a record uses an unsupported ontology
/// - [`ZpError::InvalidInput`]: a malformed line or a malformed ontology file
/// - [`ZpError::IoFailure`]: an output file cannot be written
pub fn run(config: &Config) -> ZpResult<Summary> {
    if !config.input().is_file() {
        return Err(ZpError::InputNotFound(config.input().display().to_string()));
    }
    let records = ZfinRecords::open(config.input())?;

    let ontology = if config.is_keep_ids() && config.ontology().is_file() {
        Ontology::from_file(config.ontology())?
    } else {
        if config.is_keep_ids() {
            info!(
                "Ignoring non-existent file {} for keeping the ids",
                config.ontology().display()
            );
        }
        Ontology::default()
    };
    let registry = IdentityRegistry::from_ontology(&ontology);
    debug!("Starting with {} known definitions", registry.len());

    let annotations = BufWriter::new(File::create(config.annotations())?);
    let mut generator = Generator::new(
        ontology,
        registry,
        annotations,
        config.is_add_source_information(),
    );
    generator.process_root()?;
    generator.process_all(records)?;
    let (ontology, _, summary) = generator.finish()?;

    ontology.save(config.ontology())?;
    if let Some(path) = config.source_information() {
        ontology.save_source_information(path)?;
    }
    info!("{}", summary);
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "#gene\tid\tid\tsymbol\te1sub\te1subname\trel\trelname\t\
        e1sup\te1supname\tpato\tpatoname\ttag\n";

    /// A line as published by ZFIN, tagged `abnormal`
    const SUFU: &str = "ZDB-GENE-030131-6223\t100001615\t51684\tsufu\t\t\t\t\t\
        ZFA:0001086\tmuscle pioneer\tPATO:0000070\tamount\tabnormal\t\t\t\t\t\t\n";

    /// One ZFIN line; every term is given as `"<id> <name>"`
    fn line(gene: &str, e1: &str, e1_sub: &str, quality: &str, tag: &str) -> String {
        fn split(term: &str) -> (&str, &str) {
            term.split_once(' ').unwrap_or((term, ""))
        }
        let (e1_id, e1_name) = split(e1);
        let (sub_id, sub_name) = split(e1_sub);
        let (quality_id, quality_name) = split(quality);

        let mut cols = vec![gene, "1", "1", "sym"];
        cols.extend([sub_id, sub_name, "", ""]);
        cols.extend([e1_id, e1_name, quality_id, quality_name, tag]);
        cols.join("\t") + "\n"
    }

    fn input() -> String {
        let lines = [
            line("ZDB-GENE-1", "ZFA:0001086 muscle", "", "PATO:0000070 amount", "abnormal"),
            line(
                "ZDB-GENE-2",
                "ZFA:0001161 fin",
                "ZFA:0001514 bone",
                "PATO:0000117 size",
                "abnormal",
            ),
            line("ZDB-GENE-3", "ZFA:0001086 muscle", "", "PATO:0002050 normal amount", "normal"),
            line(
                "ZDB-GENE-4",
                "ZFA:0001439 anatomical system",
                "",
                "PATO:0000001 quality",
                "abnormal",
            ),
            line("ZDB-GENE-5", "ZFA:0001086 muscle", "", "PATO:0000070 amount", "abnormal"),
        ];
        format!("{HEADER}{}", lines.concat())
    }

    fn eye() -> String {
        line("ZDB-GENE-9", "ZFA:0000107 eye", "", "PATO:0000117 size", "abnormal")
    }

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    fn config(dir: &Path) -> Config {
        Config::new(
            dir.join("phenotype.txt"),
            dir.join("zp.owl"),
            dir.join("zp.annot"),
        )
    }

    fn annotation_ids(path: &Path) -> Vec<(String, String)> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| {
                let cols: Vec<&str> = l.split('\t').collect();
                (cols[0].to_string(), cols[1].to_string())
            })
            .collect()
    }

    #[test]
    fn fresh_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        write(config.input(), &input());

        let summary = run(&config).unwrap();
        assert_eq!(summary.records, 5);
        assert_eq!(summary.abnormal, 4);
        assert_eq!(summary.corrected, 1);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.emitted, 4);
        assert_eq!(summary.new_ids, 3);

        let annotations = fs::read_to_string(config.annotations()).unwrap();
        let lines: Vec<&str> = annotations.lines().collect();
        assert_eq!(
            lines,
            vec![
                "DUMMY\tZP:0000001\tabnormal(ly) quality zebrafish anatomical entity",
                "ZDB-GENE-1\tZP:0000002\tabnormal(ly) amount muscle",
                "ZDB-GENE-2\tZP:0000003\tabnormal(ly) size fin bone",
                "ZDB-GENE-5\tZP:0000002\tabnormal(ly) amount muscle",
            ]
        );

        let ontology = Ontology::from_file(config.ontology()).unwrap();
        assert_eq!(ontology.len(), 3);
    }

    #[test]
    fn published_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        write(config.input(), SUFU);

        let summary = run(&config).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.abnormal, 1);
        assert_eq!(summary.emitted, 2);

        let annotations = fs::read_to_string(config.annotations()).unwrap();
        assert_eq!(
            annotations.lines().last(),
            Some("ZDB-GENE-030131-6223\tZP:0000002\tabnormal(ly) amount muscle pioneer")
        );
        let ontology = Ontology::from_file(config.ontology()).unwrap();
        assert_eq!(ontology.len(), 2);
    }

    #[test]
    fn ids_are_stable_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).keep_ids(true);
        write(config.input(), &input());

        run(&config).unwrap();
        let first = annotation_ids(config.annotations());
        let summary = run(&config).unwrap();
        let second = annotation_ids(config.annotations());

        assert_eq!(first, second);
        assert_eq!(summary.new_ids, 0);
    }

    #[test]
    fn new_record_gets_exactly_one_new_id() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).keep_ids(true);

        write(config.input(), &input());
        run(&config).unwrap();
        let before = annotation_ids(config.annotations());

        // a new record at the very beginning of the file
        write(config.input(), &format!("{}{}", eye(), input()));
        let summary = run(&config).unwrap();
        assert_eq!(summary.new_ids, 1);

        let after = annotation_ids(config.annotations());
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(
            after[1],
            ("ZDB-GENE-9".to_string(), "ZP:0000004".to_string())
        );
        assert_eq!(after[0], before[0]);
        assert_eq!(&after[2..], &before[1..]);
    }

    #[test]
    fn fresh_ids_without_keep_ids() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        write(config.input(), &input());
        run(&config).unwrap();

        write(config.input(), &format!("{}{}", eye(), input()));
        run(&config).unwrap();

        let after = annotation_ids(config.annotations());
        assert_eq!(
            after[1],
            ("ZDB-GENE-9".to_string(), "ZP:0000002".to_string())
        );
    }

    #[test]
    fn source_information_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("zp.source");
        let config = config(dir.path()).source_information_file(&source);
        write(config.input(), &input());

        run(&config).unwrap();
        let content = fs::read_to_string(&source).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[2],
            "ZP:0000003\tabnormal(ly) size fin bone\t\
             ZFA:0001161\tZFA:0001514\tPATO:0000117\tPATO:0000460\t\t"
        );
    }

    #[test]
    fn gzip_input() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("phenotype.txt");
        write(&plain, &input());
        let gzipped = dir.path().join("phenotype.txt.gz");
        let file = File::create(&gzipped).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(input().as_bytes()).unwrap();
        encoder.finish().unwrap();

        let a = Config::new(&plain, dir.path().join("a.owl"), dir.path().join("a.annot"));
        let b = Config::new(&gzipped, dir.path().join("b.owl"), dir.path().join("b.annot"));
        assert_eq!(run(&a).unwrap(), run(&b).unwrap());
        assert_eq!(
            fs::read_to_string(a.annotations()).unwrap(),
            fs::read_to_string(b.annotations()).unwrap()
        );
        assert_eq!(
            fs::read_to_string(a.ontology()).unwrap(),
            fs::read_to_string(b.ontology()).unwrap()
        );
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        assert!(matches!(run(&config), Err(ZpError::InputNotFound(_))));
        assert!(!config.annotations().exists());
        assert!(!config.ontology().exists());
    }

    #[test]
    fn unknown_vocabulary_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let neuron = line("ZDB-GENE-6", "CL:0000540 neuron", "", "PATO:0000070 amount", "abnormal");
        write(config.input(), &format!("{}{}", input(), neuron));

        assert!(matches!(
            run(&config),
            Err(ZpError::UnrecognizedVocabulary { .. })
        ));
        assert!(!config.ontology().exists());
    }

    #[test]
    fn generator_summary() {
        let mut generator = Generator::new(
            Ontology::default(),
            IdentityRegistry::default(),
            Vec::new(),
            false,
        );
        generator.process_root().unwrap();
        let content = input();
        generator
            .process_all(ZfinRecords::new(content.as_bytes()))
            .unwrap();
        let summary = generator.summary();
        assert_eq!(summary.emitted, 4);
        assert_eq!(generator.ontology().len(), 3);
        assert_eq!(
            summary.to_string(),
            "5 records (4 abnormal, 1 corrected, 1 suppressed), 4 terms emitted, 3 new ids"
        );
    }
}
