//! Scoped OCR invocation.

use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::source::ImageSource;

use super::{OcrResult, OcrWorker, WorkerFactory};

/// Runs one recognition per call on a freshly created worker.
pub struct OcrRunner<F: WorkerFactory> {
    factory: F,
    language: String,
}

impl<F: WorkerFactory> OcrRunner<F> {
    /// Create a runner for a language model.
    pub fn new(factory: F, language: impl Into<String>) -> Self {
        Self {
            factory,
            language: language.into(),
        }
    }

    /// Create a runner using the configured language.
    pub fn from_config(factory: F, config: &OcrConfig) -> Self {
        Self::new(factory, config.language.clone())
    }

    /// Recognize text in an image.
    ///
    /// The worker is terminated whether recognition succeeds or fails. Any
    /// failure is reported as [`OcrError::ExtractionFailed`]; the cause is
    /// only logged.
    pub fn run(&self, source: &ImageSource) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let worker = self.factory.create(&self.language).map_err(|e| {
            warn!("Failed to start OCR worker ({}): {}", self.language, e);
            OcrError::ExtractionFailed
        })?;
        let mut worker = ScopedWorker::new(worker);

        let loaded = source.load().map_err(|e| {
            warn!("Failed to load image for OCR: {}", e);
            OcrError::ExtractionFailed
        })?;

        let (width, height) = loaded.image.dimensions();
        info!("Running OCR on {}x{} image", width, height);

        let recognition = worker.recognize(&loaded.image).map_err(|e| {
            warn!("OCR recognition failed: {}", e);
            OcrError::ExtractionFailed
        })?;
        drop(worker);

        let text = recognition.text.clone();
        let confidence = recognition.confidence.clamp(0.0, 100.0).round() as u8;
        let words = recognition.into_words();
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "OCR complete: {} words, confidence {} in {}ms",
            words.len(),
            confidence,
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            confidence,
            preview_image: Some(loaded.preview),
            image_size: Some((width, height)),
            words,
            processing_time_ms,
        })
    }
}

/// Owns a worker and terminates it when dropped.
struct ScopedWorker<W: OcrWorker> {
    worker: W,
}

impl<W: OcrWorker> ScopedWorker<W> {
    fn new(worker: W) -> Self {
        Self { worker }
    }

    fn recognize(&mut self, image: &image::DynamicImage) -> Result<super::Recognition, OcrError> {
        self.worker.recognize(image)
    }
}

impl<W: OcrWorker> Drop for ScopedWorker<W> {
    fn drop(&mut self) {
        match self.worker.terminate() {
            Ok(()) => debug!("OCR worker terminated"),
            Err(e) => warn!("OCR worker teardown failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{BoundingBox, Recognition, RecognizedLine, RecognizedWord};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        FailRecognition,
        FailTeardown,
    }

    #[derive(Default)]
    struct Counters {
        created: AtomicUsize,
        terminated: AtomicUsize,
        recognized: AtomicUsize,
    }

    struct FakeWorker {
        behavior: Behavior,
        counters: Arc<Counters>,
    }

    impl OcrWorker for FakeWorker {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<Recognition, OcrError> {
            self.counters.recognized.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::FailRecognition => Err(OcrError::Recognition("model exploded".to_string())),
                _ => Ok(Recognition {
                    text: "AMOXICILLIN\n250 mg".to_string(),
                    confidence: 87.6,
                    lines: vec![
                        RecognizedLine {
                            words: vec![RecognizedWord {
                                text: "AMOXICILLIN".to_string(),
                                bbox: BoundingBox::new(0.0, 0.0, 50.0, 10.0),
                                confidence: Some(91.0),
                            }],
                        },
                        RecognizedLine {
                            words: vec![
                                RecognizedWord {
                                    text: "250".to_string(),
                                    bbox: BoundingBox::new(0.0, 20.0, 15.0, 30.0),
                                    confidence: Some(84.0),
                                },
                                RecognizedWord {
                                    text: "mg".to_string(),
                                    bbox: BoundingBox::new(18.0, 20.0, 28.0, 30.0),
                                    confidence: Some(80.0),
                                },
                            ],
                        },
                    ],
                }),
            }
        }

        fn terminate(&mut self) -> Result<(), OcrError> {
            self.counters.terminated.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::FailTeardown => Err(OcrError::Teardown("already gone".to_string())),
                _ => Ok(()),
            }
        }
    }

    struct FakeFactory {
        behavior: Behavior,
        fail_create: bool,
        counters: Arc<Counters>,
    }

    impl FakeFactory {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                fail_create: false,
                counters: Arc::new(Counters::default()),
            }
        }
    }

    impl WorkerFactory for FakeFactory {
        type Worker = FakeWorker;

        fn create(&self, language: &str) -> Result<FakeWorker, OcrError> {
            if self.fail_create {
                return Err(OcrError::UnsupportedLanguage(language.to_string()));
            }
            self.counters.created.fetch_add(1, Ordering::SeqCst);
            Ok(FakeWorker {
                behavior: self.behavior,
                counters: Arc::clone(&self.counters),
            })
        }
    }

    fn png_source() -> ImageSource {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([255, 255, 255])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        ImageSource::Bytes(buf.into_inner())
    }

    #[test]
    fn test_success_flattens_and_terminates() {
        let factory = FakeFactory::new(Behavior::Succeed);
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "eng");

        let result = runner.run(&png_source()).unwrap();

        assert_eq!(result.text, "AMOXICILLIN\n250 mg");
        assert_eq!(result.confidence, 88);
        assert_eq!(result.image_size, Some((8, 6)));
        assert!(result.preview_image.unwrap().starts_with("data:image/png;base64,"));
        let words: Vec<&str> = result.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, vec!["AMOXICILLIN", "250", "mg"]);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recognition_failure_is_generic_and_terminates() {
        let factory = FakeFactory::new(Behavior::FailRecognition);
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "eng");

        let err = runner.run(&png_source()).unwrap_err();

        assert!(matches!(err, OcrError::ExtractionFailed));
        assert_eq!(err.to_string(), "failed to extract text from image");
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_corrupt_image_terminates_worker() {
        let factory = FakeFactory::new(Behavior::Succeed);
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "eng");

        let err = runner.run(&ImageSource::Bytes(b"\x89PNG garbage".to_vec())).unwrap_err();

        assert!(matches!(err, OcrError::ExtractionFailed));
        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.recognized.load(Ordering::SeqCst), 0);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_worker_start_failure_is_generic() {
        let mut factory = FakeFactory::new(Behavior::Succeed);
        factory.fail_create = true;
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "klingon");

        let err = runner.run(&png_source()).unwrap_err();

        assert!(matches!(err, OcrError::ExtractionFailed));
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_teardown_failure_does_not_fail_run() {
        let factory = FakeFactory::new(Behavior::FailTeardown);
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "eng");

        assert!(runner.run(&png_source()).is_ok());
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fresh_worker_per_run() {
        let factory = FakeFactory::new(Behavior::Succeed);
        let counters = Arc::clone(&factory.counters);
        let runner = OcrRunner::new(factory, "eng");

        runner.run(&png_source()).unwrap();
        runner.run(&png_source()).unwrap();

        assert_eq!(counters.created.load(Ordering::SeqCst), 2);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 2);
    }
}
