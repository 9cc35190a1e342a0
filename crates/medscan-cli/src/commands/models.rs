//! Models command - download and manage OCR model files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use medscan_core::models::config::MedscanConfig;

use super::{load_config, resolve_model_dir};

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// Download model files
    Download(DownloadArgs),

    /// Check model status
    Status(DirArgs),

    /// Remove downloaded models
    Clean(DirArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Base URL the model files are served from
    #[arg(long = "from", required = true)]
    base_url: String,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct DirArgs {
    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ModelsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        ModelsCommand::Download(download_args) => download_models(download_args, &config).await,
        ModelsCommand::Status(dir_args) => {
            check_status(&resolve_model_dir(dir_args.model_dir, &config), &config)
        }
        ModelsCommand::Clean(dir_args) => {
            clean_models(&resolve_model_dir(dir_args.model_dir, &config), &config)
        }
    }
}

/// Configured model file names: detection, recognition, dictionary.
fn model_files(config: &MedscanConfig) -> [&str; 3] {
    [
        config.models.detection_model.as_str(),
        config.models.recognition_model.as_str(),
        config.models.dictionary.as_str(),
    ]
}

fn file_url(base_url: &str, filename: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), filename)
}

async fn download_models(args: DownloadArgs, config: &MedscanConfig) -> anyhow::Result<()> {
    let output_dir = args.output.unwrap_or_else(|| resolve_model_dir(None, config));
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Downloading models to {}",
        style("ℹ").blue(),
        output_dir.display()
    );
    println!();

    let client = reqwest::Client::builder()
        .user_agent(config.lookup.user_agent.clone())
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let multi_progress = MultiProgress::new();
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut error_count = 0;

    for filename in model_files(config) {
        let path = output_dir.join(filename);

        if path.exists() && !args.force {
            println!(
                "  {} {} (already exists, {})",
                style("✓").green(),
                filename,
                format_size(fs::metadata(&path)?.len())
            );
            skip_count += 1;
            continue;
        }

        let pb = multi_progress.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")?
                .progress_chars("=>-"),
        );
        pb.set_message(filename.to_string());

        match download_file(&client, &file_url(&args.base_url, filename), &path, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), filename));
                success_count += 1;
            }
            Err(e) => {
                pb.finish_with_message(format!("{} {} - {}", style("✗").red(), filename, e));
                error_count += 1;
            }
        }
    }

    println!();

    if error_count == 0 {
        println!("{} Models downloaded successfully!", style("✓").green().bold());
        if skip_count > 0 {
            println!(
                "   {} downloaded, {} already present",
                success_count, skip_count
            );
        }
    } else {
        println!(
            "{} Download completed with errors",
            style("⚠").yellow().bold()
        );
        println!(
            "   {} downloaded, {} skipped, {} failed",
            success_count, skip_count, error_count
        );
        println!();
        println!("Retry with: medscan models download --from {} --force", args.base_url);
    }

    println!();
    check_status(&output_dir, config)?;

    Ok(())
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    // Write to a temp file and rename once complete
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

fn check_status(model_dir: &Path, config: &MedscanConfig) -> anyhow::Result<()> {
    println!("{}", style("Model Status").bold());
    println!("{}", model_dir.display());

    let mut all_present = true;
    let mut total_size: u64 = 0;

    for filename in model_files(config) {
        let path = model_dir.join(filename);
        let (status, size_str) = match fs::metadata(&path) {
            Ok(metadata) if metadata.len() > 0 => {
                total_size += metadata.len();
                (style("✓").green(), format_size(metadata.len()))
            }
            Ok(_) => {
                all_present = false;
                (style("⚠").yellow(), "empty".to_string())
            }
            Err(_) => {
                all_present = false;
                (style("✗").red(), "missing".to_string())
            }
        };

        println!("    {} {:<25} {:>10}", status, filename, size_str);
    }

    if all_present {
        println!(
            "    {} Ready ({} total)",
            style("✓").green(),
            format_size(total_size)
        );
    } else {
        println!(
            "    {} Run 'medscan models download --from <base-url>' to download",
            style("⚠").yellow()
        );
    }

    Ok(())
}

fn clean_models(model_dir: &Path, config: &MedscanConfig) -> anyhow::Result<()> {
    let mut total_removed = 0;
    let mut total_freed: u64 = 0;

    for filename in model_files(config) {
        let path = model_dir.join(filename);
        if path.exists() {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            fs::remove_file(&path)?;
            total_removed += 1;
            total_freed += size;
            println!("  {} Removed {}", style("✓").green(), filename);
        }
    }

    // Leftovers from interrupted downloads
    if let Ok(entries) = fs::read_dir(model_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "tmp") {
                let _ = fs::remove_file(&path);
            }
        }
    }

    if total_removed > 0 {
        println!(
            "{} Removed {} files, freed {}",
            style("✓").green(),
            total_removed,
            format_size(total_freed)
        );
    } else {
        println!("{} No model files to remove.", style("ℹ").blue());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}
