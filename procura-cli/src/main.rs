use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use procura_core::{Extraction, Extractor, ExtractorConfig, Session};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "procura")]
#[command(about = "Extract material request tables from Excel/ODS workbooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract records from one or more workbooks
    Extract {
        /// Paths to the Excel/ODS files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Only show this sheet
        #[arg(short, long, value_name = "SHEET")]
        sheet: Option<String>,
    },

    /// Send every extracted sheet of a workbook to the backend
    #[cfg(feature = "submission")]
    Submit {
        /// Path to the Excel/ODS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Id of the requesting user
        #[arg(long)]
        user_id: i64,

        /// Name of the request
        #[arg(long)]
        nombre: String,

        /// Description of the request
        #[arg(long, default_value = "")]
        descripcion: String,

        /// Backend endpoint (overrides the configuration)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Show what would be sent without contacting the backend
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for other tools
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Extract {
            files,
            format,
            sheet,
        } => run_extract(config, &files, format, sheet.as_deref()),
        #[cfg(feature = "submission")]
        Command::Submit {
            file,
            user_id,
            nombre,
            descripcion,
            endpoint,
            dry_run,
        } => run_submit(
            config,
            &file,
            procura_core::Solicitud {
                nombre,
                descripcion,
            },
            user_id,
            endpoint,
            dry_run,
        ),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    if let Some(config_path) = path {
        return ExtractorConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from("procura.toml");
    if default_config_path.exists() {
        ExtractorConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(ExtractorConfig::default())
    }
}

fn process_path(extractor: &Extractor, path: &Path) -> Result<Extraction> {
    tracing::debug!(path = %path.display(), "processing file");
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut session = Session::new(extractor.clone());
    let extraction = session
        .process_file(&bytes)
        .with_context(|| format!("Failed to process file: {}", path.display()))?;
    Ok(extraction.clone())
}

fn run_extract(
    config: ExtractorConfig,
    files: &[PathBuf],
    format: OutputFormat,
    sheet: Option<&str>,
) -> Result<()> {
    let extractor = Extractor::new(config).context("Invalid configuration")?;

    // Files are independent: one session per file
    let results: Vec<(PathBuf, Result<Extraction>)> = files
        .par_iter()
        .map(|path| (path.clone(), process_path(&extractor, path)))
        .collect();

    let mut failures = 0;
    let mut reports = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(extraction) => reports.push((path, extraction)),
            Err(e) => {
                failures += 1;
                eprintln!("{:#}", e);
            }
        }
    }

    match format {
        OutputFormat::Human => {
            for (path, extraction) in &reports {
                formatter::print_human(path, extraction, sheet);
            }
        }
        OutputFormat::Json => formatter::print_json(&reports, sheet)?,
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "submission")]
fn run_submit(
    config: ExtractorConfig,
    file: &Path,
    solicitud: procura_core::Solicitud,
    user_id: i64,
    endpoint: Option<String>,
    dry_run: bool,
) -> Result<()> {
    use procura_core::SubmissionPlan;
    use procura_core::submission::SubmissionClient;

    let extractor = Extractor::new(config).context("Invalid configuration")?;
    let mut submission = extractor.config().submission.clone();
    if endpoint.is_some() {
        submission.endpoint = endpoint;
    }

    let extraction = process_path(&extractor, file)?;
    extraction
        .ensure_not_empty()
        .with_context(|| format!("Nothing to submit from {}", file.display()))?;

    let plan = SubmissionPlan::new(user_id, solicitud, &extraction);

    if dry_run {
        println!("[DRY RUN] Submission of '{}':", file.display());
        for index in 0..plan.total_sheets() {
            if let Some(request) = plan.request(index, None) {
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        }
        return Ok(());
    }

    let client = SubmissionClient::new(&submission).context("Cannot create submission client")?;
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "solicitud.xlsx".to_string());

    let receipt = client
        .submit(&plan, &file_name, bytes)
        .context("Submission failed")?;

    println!(
        "✓ Submitted {} sheet(s), archivoId {}",
        receipt.sheets_submitted, receipt.archivo_id
    );
    Ok(())
}
