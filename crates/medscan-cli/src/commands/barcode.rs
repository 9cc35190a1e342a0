//! Barcode command - decode a package barcode and look it up.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use medscan_core::barcode::RxingDecoder;
use medscan_core::lookup::OpenFdaSource;
use medscan_core::pipeline::BarcodePipeline;
use medscan_core::source::ImageSource;

use super::{format_medications, load_config, OutputFormat};

/// Arguments for the barcode command.
#[derive(Args)]
pub struct BarcodeArgs {
    /// Barcode image
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the full FDA record instead of the medication
    #[arg(long)]
    raw: bool,
}

pub async fn run(args: BarcodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning barcode: {}", args.input.display());

    let source = OpenFdaSource::new(&config.lookup)?;
    let pipeline = BarcodePipeline::new(RxingDecoder::new(), source, config.lookup.clone());

    let outcome = pipeline.scan(&ImageSource::File(args.input.clone())).await?;

    eprintln!("{} {}", style("✓").green(), outcome.status);

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&outcome.record)?);
    } else {
        println!("{}", format_medications(&outcome.medications, args.format)?);
    }

    Ok(())
}
