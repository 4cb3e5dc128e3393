//! hashcorpus binary: build the corpus index from a bulk source, then
//! either reconcile a candidate file against it or serve lookups over
//! HTTP. The two modes are mutually exclusive subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use hashcorpus::import::ImportConfig;
use hashcorpus::report::ReportFormat;
use hashcorpus::{api, import, logging, reconcile, Config};

#[derive(Parser)]
#[command(name = "hashcorpus", version, about = "Reference corpus hash membership service")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "./hashcorpus.config")]
    config: PathBuf,

    /// Bulk data file the corpus is imported from
    #[arg(short, long)]
    data: PathBuf,

    /// Zero-based field to extract from delimited bulk records;
    /// omit to treat each whole line as a hash
    #[arg(long)]
    csv_field: Option<usize>,

    /// Field delimiter for the bulk source
    #[arg(long, default_value = ",")]
    csv_delimiter: String,

    /// Strip one outer character pair (quotes) from extracted tokens
    #[arg(short = 'r', long)]
    strip_quotes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile an input hash list against the corpus and write a report
    File {
        /// Input file, one candidate hash per line
        #[arg(short, long)]
        input: PathBuf,

        /// Output report file
        #[arg(short, long)]
        output: PathBuf,

        /// Which verdicts the report includes
        #[arg(short, long, value_enum, default_value = "all")]
        format: FormatArg,
    },
    /// Serve single and bulk lookups over HTTP
    Server,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Hashes present in the corpus
    Identified,
    /// Hashes absent from the corpus
    Unidentified,
    /// Every hash with its status
    All,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Identified => ReportFormat::Identified,
            FormatArg::Unidentified => ReportFormat::Unidentified,
            FormatArg::All => ReportFormat::All,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so pre-flight failures go to stderr.
    logging::check_log_dir(Path::new(logging::LOG_DIR))?;
    logging::init(Path::new(logging::LOG_DIR))?;

    if let Err(e) = run(cli) {
        error!("fatal: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    info!("hashcorpus {} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config)?;

    let import_config = ImportConfig {
        field_index: cli.csv_field,
        delimiter: cli.csv_delimiter.clone(),
        strip_quotes: cli.strip_quotes,
    };

    match cli.command {
        Command::File {
            input,
            output,
            format,
        } => {
            let index = import::import_data_file(&cli.data, &import_config)?;
            reconcile::reconcile_files(&input, &output, &index, format.into())?;
        }
        Command::Server => {
            // Validate the bind address before spending time on the import.
            config.bind_addr()?;

            let index = import::import_data_file(&cli.data, &import_config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(&config, Arc::new(index)))?;
        }
    }

    Ok(())
}
