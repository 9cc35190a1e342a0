//! Barcode decoding for medication packaging.

pub mod ndc;

pub use ndc::ndc_candidates;

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BarcodeError;

/// A barcode read from an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    /// Raw decoded payload; may contain non-digit characters.
    pub text: String,

    /// Symbology name, e.g. "UPC_A".
    pub format: String,
}

/// Trait for barcode decoders.
pub trait BarcodeDecoder {
    /// Decode the first barcode found in the image.
    fn decode(&self, image: &DynamicImage) -> Result<DecodedBarcode, BarcodeError>;
}

/// Multi-format decoder backed by `rxing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RxingDecoder;

impl RxingDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDecoder for RxingDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<DecodedBarcode, BarcodeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(BarcodeError::InvalidImage("empty image".to_string()));
        }

        debug!("Decoding barcode in {}x{} image", width, height);

        let luma = image.to_luma8().into_raw();
        let mut hints = rxing::DecodingHintDictionary::new();
        let result = rxing::helpers::detect_in_luma_with_hints(luma, width, height, None, &mut hints)
            .map_err(|e| BarcodeError::NotDetected(e.to_string()))?;

        let decoded = DecodedBarcode {
            text: result.getText().to_string(),
            format: format!("{:?}", result.getBarcodeFormat()),
        };

        info!("Detected {} barcode: {}", decoded.format, decoded.text);

        Ok(decoded)
    }
}

/// Render a UPC-A symbol centered on a white canvas.
#[cfg(test)]
pub(crate) fn render_upc_a(digits: &str, width: u32, height: u32) -> DynamicImage {
    use image::{GrayImage, Luma};
    use rxing::Writer;

    let matrix = rxing::MultiFormatWriter
        .encode(digits, &rxing::BarcodeFormat::UPC_A, 300, 120)
        .unwrap();
    let (code_w, code_h) = (matrix.getWidth(), matrix.getHeight());
    let (left, top) = ((width - code_w) / 2, (height - code_h) / 2);

    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= left && x < left + code_w && y >= top && y < top + code_h;
        if inside && matrix.get(x - left, y - top) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    }))
}
