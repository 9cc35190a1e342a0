//! Lookup and ndc commands - resolve raw codes without an image.

use clap::Args;
use console::style;

use medscan_core::barcode::{ndc_candidates, DecodedBarcode, RxingDecoder};
use medscan_core::lookup::OpenFdaSource;
use medscan_core::pipeline::BarcodePipeline;

use super::{format_medications, load_config, OutputFormat};

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    /// Raw barcode payload or NDC, e.g. 300480278912
    #[arg(required = true)]
    code: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the full FDA record instead of the medication
    #[arg(long)]
    raw: bool,
}

/// Arguments for the ndc command.
#[derive(Args)]
pub struct NdcArgs {
    /// Raw barcode payload or NDC
    #[arg(required = true)]
    code: String,
}

pub async fn run(args: LookupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let source = OpenFdaSource::new(&config.lookup)?;
    let pipeline = BarcodePipeline::new(RxingDecoder::new(), source, config.lookup.clone());

    let outcome = pipeline
        .resolve(DecodedBarcode {
            text: args.code.clone(),
            format: "manual entry".to_string(),
        })
        .await?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&outcome.record)?);
    } else {
        println!("{}", format_medications(&outcome.medications, args.format)?);
    }

    Ok(())
}

pub fn run_ndc(args: NdcArgs) -> anyhow::Result<()> {
    let candidates = ndc_candidates(&args.code);

    if candidates.is_empty() {
        eprintln!(
            "{} No NDC candidates: expected 11 or 12 digits",
            style("ℹ").blue()
        );
        return Ok(());
    }

    for candidate in candidates {
        println!("{}", candidate);
    }

    Ok(())
}
