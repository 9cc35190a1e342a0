//! OCR invocation and word extraction.
//!
//! Recognition engines are modeled as workers: created fresh for each
//! invocation by a [`WorkerFactory`], used once, and torn down on every exit
//! path by the [`OcrRunner`].

mod runner;

#[cfg(feature = "native")]
mod pure_engine;

pub use runner::OcrRunner;

#[cfg(feature = "native")]
pub use pure_engine::{PureOcrFactory, PureOcrWorker};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Axis-aligned bounding box in image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// A single recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWordBox {
    /// Recognized text.
    pub text: String,

    /// Word bounds.
    pub bbox: BoundingBox,

    /// Recognition confidence (0 - 100).
    pub confidence: f32,
}

/// Aggregate OCR output for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Whole-document text.
    pub text: String,

    /// Overall engine confidence, rounded (0 - 100).
    pub confidence: u8,

    /// Reference to the image that was recognized (path or data URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,

    /// Preview image dimensions (width, height).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(u32, u32)>,

    /// Recognized words in reading order.
    #[serde(default)]
    pub words: Vec<OcrWordBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrResult {
    /// Words whose engine confidence is below `threshold`, for highlighting.
    pub fn low_confidence_words(&self, threshold: f32) -> Vec<&OcrWordBox> {
        self.words.iter().filter(|w| w.confidence < threshold).collect()
    }
}

/// Raw engine output: whole text plus a line/word hierarchy.
#[derive(Debug, Clone, Default)]
pub struct Recognition {
    /// Whole-document text.
    pub text: String,

    /// Overall confidence (0 - 100).
    pub confidence: f32,

    /// Recognized lines in reading order.
    pub lines: Vec<RecognizedLine>,
}

/// A recognized text line.
#[derive(Debug, Clone, Default)]
pub struct RecognizedLine {
    /// Words in reading order.
    pub words: Vec<RecognizedWord>,
}

/// A word as reported by the engine.
#[derive(Debug, Clone)]
pub struct RecognizedWord {
    pub text: String,
    pub bbox: BoundingBox,
    /// Confidence (0 - 100), when the engine reports one.
    pub confidence: Option<f32>,
}

impl Recognition {
    /// Flatten the line/word hierarchy, line-major then word order.
    pub fn into_words(self) -> Vec<OcrWordBox> {
        self.lines
            .into_iter()
            .flat_map(|line| line.words)
            .map(|w| OcrWordBox {
                text: w.text,
                bbox: w.bbox,
                confidence: w.confidence.unwrap_or(0.0),
            })
            .collect()
    }
}

/// A text recognition engine instance.
pub trait OcrWorker {
    /// Recognize text in an image.
    fn recognize(&mut self, image: &DynamicImage) -> Result<Recognition, OcrError>;

    /// Release the engine. Called exactly once, after which the worker is
    /// dropped.
    fn terminate(&mut self) -> Result<(), OcrError>;
}

/// Creates recognition workers for a language model.
pub trait WorkerFactory {
    type Worker: OcrWorker;

    /// Create a fresh worker for `language`.
    fn create(&self, language: &str) -> Result<Self::Worker, OcrError>;
}
