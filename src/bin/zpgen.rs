//! Command line interface of the ZP generator
//!
//! ```bash
//! zpgen -z phenotype_fish.txt.gz -o zp.owl -a zp.annot --keep-ids
//! ```
//!
//! The log level is controlled via `RUST_LOG` and defaults to `info`.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use zpgen::{run, Config};

/// Generates the Zebrafish Phenotype Ontology from ZFIN annotations
#[derive(Parser, Debug)]
#[clap(name = "zpgen", version)]
struct Args {
    /// ZFIN phenotype file, plain or gzip compressed
    #[clap(short = 'z', long = "zfin", value_name = "FILE")]
    zfin: PathBuf,

    /// Output ontology file in OWL functional syntax
    #[clap(short = 'o', long, value_name = "FILE")]
    ontology: PathBuf,

    /// Output file for the gene to ZP annotations
    #[clap(short = 'a', long, value_name = "FILE")]
    annotations: PathBuf,

    /// Reuse the ids of the existing ontology file
    #[clap(short = 'k', long)]
    keep_ids: bool,

    /// Annotate every class with the ZFIN fields it was built from
    #[clap(short = 's', long)]
    add_source_information: bool,

    /// Also write the source information of all classes to a separate file
    #[clap(long, value_name = "FILE")]
    source_information_file: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let config = Config::new(args.zfin, args.ontology, args.annotations)
            .keep_ids(args.keep_ids)
            .add_source_information(args.add_source_information);
        match args.source_information_file {
            Some(path) => config.source_information_file(path),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from(Args::parse());
    info!("Reading ZFIN annotations from {}", config.input().display());

    match run(&config) {
        Ok(summary) => {
            if summary.failed_writes > 0 {
                warn!(
                    "{} annotation lines could not be written to {}",
                    summary.failed_writes,
                    config.annotations().display()
                );
            }
            info!("Ontology written to {}", config.ontology().display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
