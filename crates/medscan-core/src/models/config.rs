//! Configuration structures for the scanning pipelines.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the medscan pipelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Drug database lookup configuration.
    pub lookup: LookupConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language model selector passed to the recognition engine.
    pub language: String,

    /// Vertical band (pixels) within which regions count as the same row.
    pub row_tolerance: f32,

    /// Word confidence (0 - 100) below which a word is flagged for review.
    pub low_confidence_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            row_tolerance: 20.0,
            low_confidence_threshold: 60.0,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Paths of the detection model, recognition model and dictionary.
    pub fn paths(&self) -> [PathBuf; 3] {
        [
            self.model_dir.join(&self.detection_model),
            self.model_dir.join(&self.recognition_model),
            self.model_dir.join(&self.dictionary),
        ]
    }

    /// Whether every model file is present.
    pub fn is_complete(&self) -> bool {
        self.paths().iter().all(|p| p.exists())
    }
}

/// Drug database lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Product NDC query endpoint.
    pub endpoint: String,

    /// User agent sent with each query.
    pub user_agent: String,

    /// Frequency assigned to looked-up products; the database does not
    /// encode administration frequency.
    pub default_frequency: String,

    /// Route assigned when the product lists none.
    pub default_route: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.fda.gov/drug/ndc.json".to_string(),
            user_agent: concat!("medscan/", env!("CARGO_PKG_VERSION")).to_string(),
            default_frequency: "Once daily".to_string(),
            default_route: "Oral".to_string(),
        }
    }
}

impl MedscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
