//! Native OCR worker using `pure-onnx-ocr`.

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::ModelConfig;

use super::{BoundingBox, OcrWorker, Recognition, RecognizedLine, RecognizedWord, WorkerFactory};

/// Languages served by the latin recognition model.
const LATIN_LANGUAGES: &[&str] = &["eng", "en", "latin", "deu", "fra", "spa", "ita", "pol", "por", "nld"];

/// Creates [`PureOcrWorker`]s from model files on disk.
pub struct PureOcrFactory {
    models: ModelConfig,
    row_tolerance: f32,
}

impl PureOcrFactory {
    /// Create a factory for the given model files.
    pub fn new(models: ModelConfig) -> Self {
        Self {
            models,
            row_tolerance: 20.0,
        }
    }

    /// Set the vertical band within which regions share a row.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance.max(1.0);
        self
    }
}

impl WorkerFactory for PureOcrFactory {
    type Worker = PureOcrWorker;

    fn create(&self, language: &str) -> Result<PureOcrWorker, OcrError> {
        if !LATIN_LANGUAGES.contains(&language.to_lowercase().as_str()) {
            return Err(OcrError::UnsupportedLanguage(language.to_string()));
        }

        let [det_path, rec_path, dict_path] = self.models.paths();
        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Started OCR worker ({}) from {}", language, self.models.model_dir.display());

        Ok(PureOcrWorker {
            engine: Some(engine),
            row_tolerance: self.row_tolerance,
        })
    }
}

/// A single-use recognition worker.
pub struct PureOcrWorker {
    engine: Option<pure_onnx_ocr::engine::OcrEngine>,
    row_tolerance: f32,
}

/// A detected text region before word splitting.
struct Region {
    rect: BoundingBox,
    text: String,
    confidence: f32,
}

impl OcrWorker for PureOcrWorker {
    fn recognize(&mut self, image: &DynamicImage) -> Result<Recognition, OcrError> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| OcrError::Recognition("worker already terminated".to_string()))?;

        let results = engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<Region> = results
            .iter()
            .map(|r| Region {
                rect: polygon_rect(&r.bounding_box),
                text: r.text.replace("[UNK]", " ").trim().to_string(),
                confidence: (r.confidence as f32 * 100.0).clamp(0.0, 100.0),
            })
            .filter(|r| !r.text.is_empty())
            .collect();

        sort_reading_order(&mut regions, self.row_tolerance);

        Ok(build_recognition(&regions))
    }

    fn terminate(&mut self) -> Result<(), OcrError> {
        match self.engine.take() {
            Some(engine) => {
                drop(engine);
                Ok(())
            }
            None => Err(OcrError::Teardown("worker already terminated".to_string())),
        }
    }
}

/// Sort regions top-to-bottom in row bands, then left-to-right.
fn sort_reading_order(regions: &mut [Region], row_tolerance: f32) {
    regions.sort_by(|a, b| {
        let row_a = (a.rect.y0 / row_tolerance) as i32;
        let row_b = (b.rect.y0 / row_tolerance) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.rect
                .x0
                .partial_cmp(&b.rect.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

/// Turn ordered regions into lines of words.
///
/// Each region is one line. Word boxes are interpolated along the region
/// by character offset, and carry the region's confidence. The overall
/// confidence is the character-weighted mean of region confidences.
fn build_recognition(regions: &[Region]) -> Recognition {
    let mut lines = Vec::with_capacity(regions.len());
    let mut weighted = 0.0f32;
    let mut total_chars = 0usize;

    for region in regions {
        let chars: Vec<char> = region.text.chars().collect();
        let len = chars.len().max(1) as f32;
        let mut words = Vec::new();
        let mut start: Option<usize> = None;

        for (i, c) in chars.iter().chain(std::iter::once(&' ')).enumerate() {
            match (c.is_whitespace(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    let x0 = region.rect.x0 + region.rect.width() * s as f32 / len;
                    let x1 = region.rect.x0 + region.rect.width() * i as f32 / len;
                    words.push(RecognizedWord {
                        text: chars[s..i].iter().collect(),
                        bbox: BoundingBox::new(x0, region.rect.y0, x1, region.rect.y1),
                        confidence: Some(region.confidence),
                    });
                    start = None;
                }
                _ => {}
            }
        }

        weighted += region.confidence * chars.len() as f32;
        total_chars += chars.len();
        lines.push(RecognizedLine { words });
    }

    let confidence = if total_chars == 0 {
        0.0
    } else {
        weighted / total_chars as f32
    };

    Recognition {
        text: regions
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        confidence,
        lines,
    }
}

/// Axis-aligned bounds of a detection polygon.
fn polygon_rect(polygon: &pure_onnx_ocr::Polygon<f64>) -> BoundingBox {
    let mut rect = BoundingBox::new(f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    for coord in polygon.exterior().coords() {
        rect.x0 = rect.x0.min(coord.x as f32);
        rect.y0 = rect.y0.min(coord.y as f32);
        rect.x1 = rect.x1.max(coord.x as f32);
        rect.y1 = rect.y1.max(coord.y as f32);
    }
    if rect.x0.is_finite() { rect } else { BoundingBox::default() }
}
