//! Batch command - read many label images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use medscan_core::models::medication::MedicationInfo;
use medscan_core::source::ImageSource;

use super::scan::{build_pipeline, ensure_models, render};
use super::{load_config, resolve_model_dir, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of label images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of scanning a single file.
struct ScanResult {
    path: PathBuf,
    medication: Option<MedicationInfo>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One row of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'a str,
    name: &'a str,
    dosage: &'a str,
    frequency: &'a str,
    route: &'a str,
    confidence: Option<u8>,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| ImageFormat::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    config.models.model_dir = resolve_model_dir(args.model_dir.clone(), &config);
    ensure_models(&config)?;

    println!(
        "{} Found {} images to scan",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let pipeline = build_pipeline(&config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = pipeline.scan(&ImageSource::File(path.clone()));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) => {
                if let Some(output_dir) = &args.output_dir {
                    let output_path = output_path(output_dir, &path, args.format);
                    fs::write(&output_path, render(&outcome, args.format, false)?)?;
                    debug!("Wrote output to {}", output_path.display());
                }
                results.push(ScanResult {
                    path,
                    medication: outcome.medications.into_iter().next(),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), error_msg);
                    results.push(ScanResult {
                        path,
                        medication: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), error_msg);
                    anyhow::bail!("Scan failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Scanned {} images in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed images:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("label");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

fn write_summary(path: &Path, results: &[ScanResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let medication = result.medication.clone().unwrap_or_default();

        wtr.serialize(SummaryRow {
            filename,
            status: if result.error.is_some() { "error" } else { "success" },
            name: medication.name.as_deref().unwrap_or_default(),
            dosage: medication.dosage.as_deref().unwrap_or_default(),
            frequency: medication.frequency.as_deref().unwrap_or_default(),
            route: medication.route.as_deref().unwrap_or_default(),
            confidence: medication.confidence,
            processing_time_ms: result.processing_time_ms,
            error: result.error.as_deref().unwrap_or_default(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_uses_stem_and_format() {
        let path = output_path(Path::new("out"), Path::new("labels/bottle 1.jpg"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("out/bottle 1.csv"));
    }

    #[test]
    fn test_summary_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![
            ScanResult {
                path: PathBuf::from("a.png"),
                medication: Some(MedicationInfo {
                    name: Some("Lisinopril".to_string()),
                    dosage: Some("10 mg".to_string()),
                    confidence: Some(100),
                    ..Default::default()
                }),
                error: None,
                processing_time_ms: 12,
            },
            ScanResult {
                path: PathBuf::from("b.png"),
                medication: None,
                error: Some("Failed to extract text from image".to_string()),
                processing_time_ms: 3,
            },
        ];

        write_summary(&path, &results).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "filename,status,name,dosage,frequency,route,confidence,processing_time_ms,error"
        );
        assert_eq!(lines[1], "a.png,success,Lisinopril,10 mg,,,100,12,");
        assert_eq!(lines[2], "b.png,error,,,,,,3,Failed to extract text from image");
    }
}
