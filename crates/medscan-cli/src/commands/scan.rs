//! Scan command - read a medication label image with OCR.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use medscan_core::medication::RuleBasedParser;
use medscan_core::models::config::MedscanConfig;
use medscan_core::ocr::{OcrRunner, PureOcrFactory};
use medscan_core::pipeline::{OcrPipeline, ScanOutcome};
use medscan_core::source::ImageSource;

use super::{format_medications, load_config, resolve_model_dir, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Label image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include OCR text and word boxes in JSON output
    #[arg(long)]
    words: bool,

    /// Show OCR confidence and low-confidence words
    #[arg(long)]
    show_confidence: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    config.models.model_dir = resolve_model_dir(args.model_dir.clone(), &config);
    ensure_models(&config)?;

    info!("Scanning label: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Running OCR...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let pipeline = build_pipeline(&config);
    let outcome = pipeline.scan(&ImageSource::File(args.input.clone()));

    pb.finish_and_clear();
    let outcome = outcome?;

    let output = render(&outcome, args.format, args.words)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        if let Some(ocr) = &outcome.ocr {
            print_ocr_summary(ocr, config.ocr.low_confidence_threshold);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// OCR pipeline over the native worker.
pub fn build_pipeline(config: &MedscanConfig) -> OcrPipeline<PureOcrFactory, RuleBasedParser> {
    let factory = PureOcrFactory::new(config.models.clone()).with_row_tolerance(config.ocr.row_tolerance);
    OcrPipeline::new(OcrRunner::from_config(factory, &config.ocr), RuleBasedParser::new())
}

/// Fail early with a hint when model files are missing.
pub fn ensure_models(config: &MedscanConfig) -> anyhow::Result<()> {
    if !config.models.is_complete() {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Run 'medscan models download --from <base-url>' to download them.",
            config.models.model_dir.display()
        );
    }
    Ok(())
}

/// Render a scan outcome. JSON carries the OCR payload only when asked.
pub fn render(outcome: &ScanOutcome, format: OutputFormat, words: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if words => Ok(serde_json::to_string_pretty(outcome)?),
        _ => format_medications(&outcome.medications, format),
    }
}

fn print_ocr_summary(ocr: &medscan_core::ocr::OcrResult, threshold: f32) {
    println!();
    println!("{} OCR confidence: {}%", style("ℹ").blue(), ocr.confidence);
    println!("{} Processing time: {}ms", style("ℹ").blue(), ocr.processing_time_ms);

    let flagged = ocr.low_confidence_words(threshold);
    if !flagged.is_empty() {
        println!(
            "{} {} word(s) below {}%:",
            style("⚠").yellow(),
            flagged.len(),
            threshold
        );
        for word in flagged {
            println!("    {:<20} {:>5.1}%", word.text, word.confidence);
        }
    }
}
