//! Barcode and OCR scan pipelines.
//!
//! Each pipeline validates its input, runs its stages and reports either a
//! scan outcome or one user-facing [`ScanError`].

use serde::Serialize;
use tracing::{info, warn};

use crate::barcode::{BarcodeDecoder, DecodedBarcode};
use crate::error::ScanError;
use crate::lookup::{medication_from_record, DrugLookup, ProductSource};
use crate::medication::{with_confidence, MedicationParser};
use crate::models::config::LookupConfig;
use crate::models::medication::{DrugRecord, MedicationInfo};
use crate::ocr::{OcrResult, OcrRunner, WorkerFactory};
use crate::source::ImageSource;

/// Result of a successful scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Extracted medications, one per scan today.
    pub medications: Vec<MedicationInfo>,

    /// Human-readable status, e.g. "Detected UPC_A".
    pub status: String,

    /// Raw OCR output, for OCR scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrResult>,

    /// The decoded barcode, for barcode scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<DecodedBarcode>,

    /// The matched database record, for barcode scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DrugRecord>,
}

/// Reject missing and non-image inputs before any work is done.
pub fn validate_input(source: &ImageSource) -> Result<(), ScanError> {
    if source.is_empty() {
        return Err(ScanError::NoInput);
    }
    if !source.is_image() {
        return Err(ScanError::NotAnImage);
    }
    Ok(())
}

/// Barcode image to medication via the drug database.
pub struct BarcodePipeline<D: BarcodeDecoder, S: ProductSource> {
    decoder: D,
    lookup: DrugLookup<S>,
    defaults: LookupConfig,
}

impl<D: BarcodeDecoder, S: ProductSource> BarcodePipeline<D, S> {
    pub fn new(decoder: D, source: S, defaults: LookupConfig) -> Self {
        Self {
            decoder,
            lookup: DrugLookup::new(source),
            defaults,
        }
    }

    /// Resolve an already decoded barcode payload.
    pub async fn resolve(&self, barcode: DecodedBarcode) -> Result<ScanOutcome, ScanError> {
        let record = match self.lookup.find(&barcode.text).await {
            Some(record) => record,
            None => {
                info!("No product for barcode {}", barcode.text);
                return Err(ScanError::NotFound { code: barcode.text });
            }
        };

        let medication = medication_from_record(&record, &self.defaults);

        Ok(ScanOutcome {
            medications: vec![medication],
            status: format!("Detected {}", barcode.format),
            ocr: None,
            barcode: Some(barcode),
            record: Some(record),
        })
    }

    /// Decode the barcode in an image and look it up.
    pub async fn scan(&self, source: &ImageSource) -> Result<ScanOutcome, ScanError> {
        validate_input(source)?;

        let loaded = source.load().map_err(|e| {
            warn!("Failed to load barcode image: {}", e);
            ScanError::DecodeFailed
        })?;

        let barcode = self.decoder.decode(&loaded.image).map_err(|e| {
            warn!("Barcode decoding failed: {}", e);
            ScanError::DecodeFailed
        })?;

        self.resolve(barcode).await
    }
}

/// Label image to medication via OCR and the field rules.
pub struct OcrPipeline<F: WorkerFactory, P: MedicationParser> {
    runner: OcrRunner<F>,
    parser: P,
}

impl<F: WorkerFactory, P: MedicationParser> OcrPipeline<F, P> {
    pub fn new(runner: OcrRunner<F>, parser: P) -> Self {
        Self { runner, parser }
    }

    /// Recognize, parse and score a label image.
    pub fn scan(&self, source: &ImageSource) -> Result<ScanOutcome, ScanError> {
        validate_input(source)?;

        let result = self.runner.run(source).map_err(|_| ScanError::OcrFailed)?;
        let medications = self.parse(&result.text);

        Ok(ScanOutcome {
            status: format!("Extracted {} medication(s)", medications.len()),
            medications,
            ocr: Some(result),
            barcode: None,
            record: None,
        })
    }

    /// Parse and score text that was recognized elsewhere.
    pub fn parse(&self, text: &str) -> Vec<MedicationInfo> {
        self.parser
            .parse_multiple(text)
            .into_iter()
            .map(with_confidence)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{render_upc_a, RxingDecoder};
    use crate::error::{BarcodeError, LookupError, OcrError};
    use crate::medication::RuleBasedParser;
    use crate::models::medication::ActiveIngredient;
    use crate::ocr::{OcrWorker, Recognition};
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::path::PathBuf;

    struct FixedDecoder(Option<&'static str>);

    impl BarcodeDecoder for FixedDecoder {
        fn decode(&self, _image: &DynamicImage) -> Result<DecodedBarcode, BarcodeError> {
            match self.0 {
                Some(text) => Ok(DecodedBarcode {
                    text: text.to_string(),
                    format: "UPC_A".to_string(),
                }),
                None => Err(BarcodeError::NotDetected("no finder pattern".to_string())),
            }
        }
    }

    /// First candidate fails with HTTP 404, second returns Glucophage.
    struct GlucophageSource;

    #[async_trait]
    impl ProductSource for GlucophageSource {
        async fn query(&self, product_ndc: &str) -> Result<Option<DrugRecord>, LookupError> {
            match product_ndc {
                "00480-278" => Ok(Some(DrugRecord {
                    product_ndc: Some(product_ndc.to_string()),
                    brand_name: Some("Glucophage".to_string()),
                    route: vec!["ORAL".to_string()],
                    active_ingredients: vec![ActiveIngredient {
                        name: "METFORMIN HYDROCHLORIDE".to_string(),
                        strength: "500 mg".to_string(),
                    }],
                    ..Default::default()
                })),
                _ => Err(LookupError::Status(404)),
            }
        }
    }

    struct TextWorker(Option<&'static str>);

    impl OcrWorker for TextWorker {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<Recognition, OcrError> {
            match self.0 {
                Some(text) => Ok(Recognition {
                    text: text.to_string(),
                    confidence: 91.2,
                    lines: Vec::new(),
                }),
                None => Err(OcrError::Recognition("engine crashed".to_string())),
            }
        }

        fn terminate(&mut self) -> Result<(), OcrError> {
            Ok(())
        }
    }

    struct TextFactory(Option<&'static str>);

    impl WorkerFactory for TextFactory {
        type Worker = TextWorker;

        fn create(&self, _language: &str) -> Result<TextWorker, OcrError> {
            Ok(TextWorker(self.0))
        }
    }

    fn png_source() -> ImageSource {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        ImageSource::Bytes(buf.into_inner())
    }

    fn barcode_pipeline(code: Option<&'static str>) -> BarcodePipeline<FixedDecoder, GlucophageSource> {
        BarcodePipeline::new(FixedDecoder(code), GlucophageSource, LookupConfig::default())
    }

    fn ocr_pipeline(text: Option<&'static str>) -> OcrPipeline<TextFactory, RuleBasedParser> {
        OcrPipeline::new(OcrRunner::new(TextFactory(text), "eng"), RuleBasedParser::new())
    }

    #[tokio::test]
    async fn test_barcode_scan_end_to_end() {
        let outcome = barcode_pipeline(Some("300480278912"))
            .scan(&png_source())
            .await
            .unwrap();

        assert_eq!(outcome.status, "Detected UPC_A");
        assert_eq!(
            outcome.medications,
            vec![MedicationInfo {
                name: Some("Glucophage".to_string()),
                dosage: Some("500 mg".to_string()),
                frequency: Some("Once daily".to_string()),
                route: Some("Oral".to_string()),
                ..Default::default()
            }]
        );
        assert_eq!(outcome.barcode.unwrap().text, "300480278912");
        assert!(outcome.ocr.is_none());
    }

    #[tokio::test]
    async fn test_barcode_scan_decodes_rendered_label() {
        let mut buf = Cursor::new(Vec::new());
        render_upc_a("30048027891", 340, 160)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        let pipeline = BarcodePipeline::new(RxingDecoder::new(), GlucophageSource, LookupConfig::default());

        let outcome = pipeline.scan(&ImageSource::Bytes(buf.into_inner())).await.unwrap();

        assert_eq!(outcome.status, "Detected UPC_A");
        assert_eq!(outcome.barcode.unwrap().text, "300480278914");
        assert_eq!(outcome.medications[0].name.as_deref(), Some("Glucophage"));
        assert_eq!(outcome.medications[0].route.as_deref(), Some("Oral"));
    }

    #[tokio::test]
    async fn test_barcode_not_found() {
        let err = barcode_pipeline(Some("00300480278912"))
            .scan(&png_source())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ScanError::NotFound {
                code: "00300480278912".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_barcode_decode_failure() {
        let err = barcode_pipeline(None).scan(&png_source()).await.unwrap_err();
        assert_eq!(err, ScanError::DecodeFailed);

        let corrupt = ImageSource::Bytes(b"\x89PNG\r\n\x1a\n broken".to_vec());
        let err = barcode_pipeline(Some("300480278912")).scan(&corrupt).await.unwrap_err();
        assert_eq!(err, ScanError::DecodeFailed);
    }

    #[tokio::test]
    async fn test_barcode_input_validation() {
        let pipeline = barcode_pipeline(Some("300480278912"));

        assert_eq!(
            pipeline.scan(&ImageSource::Bytes(Vec::new())).await.unwrap_err(),
            ScanError::NoInput
        );
        assert_eq!(
            pipeline
                .scan(&ImageSource::File(PathBuf::from("label.pdf")))
                .await
                .unwrap_err(),
            ScanError::NotAnImage
        );
    }

    #[test]
    fn test_ocr_scan_end_to_end() {
        let outcome = ocr_pipeline(Some(
            "METFORMIN HCL\nTake 1 tablet by mouth twice daily.\n500 mg tablets",
        ))
        .scan(&png_source())
        .unwrap();

        assert_eq!(outcome.medications.len(), 1);
        let medication = &outcome.medications[0];
        assert_eq!(medication.name.as_deref(), Some("METFORMIN HCL"));
        assert_eq!(medication.route.as_deref(), Some("by mouth"));
        assert_eq!(medication.confidence, Some(100));
        assert_eq!(outcome.status, "Extracted 1 medication(s)");

        let ocr = outcome.ocr.unwrap();
        assert_eq!(ocr.confidence, 91);
        assert!(ocr.words.is_empty());
    }

    #[test]
    fn test_ocr_scan_code_only_label() {
        let outcome = ocr_pipeline(Some("123456789012")).scan(&png_source()).unwrap();

        assert_eq!(
            outcome.medications,
            vec![MedicationInfo {
                name: Some("Unknown".to_string()),
                confidence: Some(100),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_ocr_failure_is_generic() {
        let err = ocr_pipeline(None).scan(&png_source()).unwrap_err();
        assert_eq!(err, ScanError::OcrFailed);
        assert_eq!(err.to_string(), "Failed to extract text from image");
    }

    #[test]
    fn test_ocr_input_validation() {
        let pipeline = ocr_pipeline(Some("text"));
        assert_eq!(
            pipeline.scan(&ImageSource::Reference(String::new())).unwrap_err(),
            ScanError::NoInput
        );
        assert_eq!(
            pipeline
                .scan(&ImageSource::Bytes(b"%PDF-1.7".to_vec()))
                .unwrap_err(),
            ScanError::NotAnImage
        );
    }
}
