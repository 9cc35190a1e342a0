//! CLI application for medication label scanning.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{barcode, batch, config, lookup, models, parse, scan};

/// Medication label scanner - Read medication details from barcodes and labels
#[derive(Parser)]
#[command(name = "medscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a medication label image with OCR
    Scan(scan::ScanArgs),

    /// Decode a package barcode and look it up in the FDA database
    Barcode(barcode::BarcodeArgs),

    /// Look up a raw barcode or NDC code in the FDA database
    Lookup(lookup::LookupArgs),

    /// Print the product NDC candidates of a raw code
    Ndc(lookup::NdcArgs),

    /// Extract medication fields from label text
    Parse(parse::ParseArgs),

    /// Read many label images
    Batch(batch::BatchArgs),

    /// Manage OCR models
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scan(args) => scan::run(args, config_path).await,
        Commands::Barcode(args) => barcode::run(args, config_path).await,
        Commands::Lookup(args) => lookup::run(args, config_path).await,
        Commands::Ndc(args) => lookup::run_ndc(args),
        Commands::Parse(args) => parse::run(args).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Models(args) => models::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
