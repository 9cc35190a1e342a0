//! Subcommands and the helpers they share.

pub mod barcode;
pub mod batch;
pub mod config;
pub mod lookup;
pub mod models;
pub mod parse;
pub mod scan;

use std::path::{Path, PathBuf};

use medscan_core::models::config::MedscanConfig;
use medscan_core::models::medication::MedicationInfo;

/// Output format for medication records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medscan")
        .join("config.json")
}

/// Load the given config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MedscanConfig> {
    if let Some(path) = config_path {
        return Ok(MedscanConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(MedscanConfig::from_file(&default_path)?)
    } else {
        Ok(MedscanConfig::default())
    }
}

/// Model directory: explicit argument, then the configured directory if it
/// exists, then the per-user data directory.
pub fn resolve_model_dir(arg: Option<PathBuf>, config: &MedscanConfig) -> PathBuf {
    if let Some(dir) = arg {
        return dir;
    }
    if config.models.model_dir.exists() {
        return config.models.model_dir.clone();
    }
    default_model_dir()
}

/// Per-user model directory.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medscan")
        .join("models")
}

/// Render medication records.
pub fn format_medications(medications: &[MedicationInfo], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(medications)?),
        OutputFormat::Csv => format_csv(medications),
        OutputFormat::Text => Ok(format_text(medications)),
    }
}

fn format_csv(medications: &[MedicationInfo]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "name",
        "dosage",
        "frequency",
        "route",
        "instructions",
        "confidence",
    ])?;

    for medication in medications {
        wtr.write_record([
            medication.name.clone().unwrap_or_default(),
            medication.dosage.clone().unwrap_or_default(),
            medication.frequency.clone().unwrap_or_default(),
            medication.route.clone().unwrap_or_default(),
            medication.instructions.clone().unwrap_or_default(),
            medication.confidence.map(|c| c.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(medications: &[MedicationInfo]) -> String {
    let mut output = String::new();

    if medications.is_empty() {
        output.push_str("No data detected.\n");
        return output;
    }

    for (i, medication) in medications.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let fields = [
            ("Name", &medication.name),
            ("Dosage", &medication.dosage),
            ("Frequency", &medication.frequency),
            ("Route", &medication.route),
            ("Instructions", &medication.instructions),
        ];
        for (label, value) in fields {
            if MedicationInfo::has(value) {
                output.push_str(&format!("{}: {}\n", label, value.as_deref().unwrap_or_default()));
            }
        }
        if let Some(confidence) = medication.confidence {
            output.push_str(&format!("Confidence: {}%\n", confidence));
        }
    }

    output
}
