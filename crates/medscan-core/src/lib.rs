//! Core library for medication label scanning.
//!
//! This crate provides:
//! - Barcode decoding and NDC candidate normalization
//! - Drug database lookup by product NDC (openFDA)
//! - OCR invocation with scoped worker teardown
//! - Rule-based medication field extraction and structural confidence

pub mod error;
pub mod models;
pub mod source;
pub mod barcode;
pub mod lookup;
pub mod ocr;
pub mod medication;
pub mod pipeline;

pub use error::{MedscanError, Result, ScanError};
pub use models::config::MedscanConfig;
pub use models::medication::{ActiveIngredient, DrugRecord, MedicationInfo};
pub use source::ImageSource;
pub use barcode::{ndc_candidates, BarcodeDecoder, DecodedBarcode, RxingDecoder};
pub use lookup::{medication_from_record, DrugLookup, OpenFdaSource, ProductSource};
pub use ocr::{OcrResult, OcrRunner, OcrWordBox, OcrWorker, WorkerFactory};
#[cfg(feature = "native")]
pub use ocr::{PureOcrFactory, PureOcrWorker};
pub use medication::{medication_confidence, MedicationParser, RuleBasedParser};
pub use pipeline::{BarcodePipeline, OcrPipeline, ScanOutcome};
