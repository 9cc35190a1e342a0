//! Error types for the medscan-core library.

use thiserror::Error;

/// Main error type for the medscan library.
#[derive(Error, Debug)]
pub enum MedscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Barcode decoding error.
    #[error("barcode error: {0}")]
    Barcode(#[from] BarcodeError),

    /// Drug database lookup error.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Image source could not be materialized.
    #[error("image source error: {0}")]
    Source(#[from] SourceError),

    /// Pipeline-level scan failure.
    #[error("{0}")]
    Scan(#[from] ScanError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
///
/// Only [`OcrError::ExtractionFailed`] leaves the OCR runner; the other
/// variants describe worker and image-loading failures and are logged, not
/// returned to callers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Generic recognition failure reported to callers.
    #[error("failed to extract text from image")]
    ExtractionFailed,

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// No recognition model exists for the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Releasing the worker failed.
    #[error("worker teardown failed: {0}")]
    Teardown(String),
}

/// Errors materializing an image source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading the file failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A data URL payload was not valid base64.
    #[error("invalid data URL: {0}")]
    DataUrl(String),

    /// The reference cannot be resolved locally.
    #[error("unsupported image reference: {0}")]
    Unsupported(String),
}

/// Errors related to barcode decoding.
#[derive(Error, Debug)]
pub enum BarcodeError {
    /// No barcode could be found or read in the image.
    #[error("no barcode detected: {0}")]
    NotDetected(String),

    /// The image could not be read or decoded.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors from a single drug database query.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Non-success HTTP status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// User-facing failures of a scan pipeline.
///
/// The display strings are meant to be shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Nothing was supplied.
    #[error("No file provided")]
    NoInput,

    /// The input is not an image.
    #[error("Please provide an image")]
    NotAnImage,

    /// No barcode could be read from the image.
    #[error("Failed to detect barcode")]
    DecodeFailed,

    /// A barcode was read but no NDC candidate matched a product.
    #[error("Medication not found in FDA database")]
    NotFound {
        /// Raw decoded barcode text.
        code: String,
    },

    /// OCR failed for any reason.
    #[error("Failed to extract text from image")]
    OcrFailed,
}

/// Result type for the medscan library.
pub type Result<T> = std::result::Result<T, MedscanError>;
