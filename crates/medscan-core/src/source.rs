//! Image inputs accepted by the scanning pipelines.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};

use crate::error::SourceError;

/// An image supplied by the caller.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk.
    File(PathBuf),
    /// Raw encoded image bytes, e.g. a camera capture.
    Bytes(Vec<u8>),
    /// A locally resolvable reference: a `data:` URL, a `file://` URL or a path.
    Reference(String),
}

/// A decoded image with the reference it can be previewed from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    /// Path or data URL of the image.
    pub preview: String,
}

impl ImageSource {
    /// Whether nothing was supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::File(path) => path.as_os_str().is_empty(),
            ImageSource::Bytes(bytes) => bytes.is_empty(),
            ImageSource::Reference(reference) => reference.trim().is_empty(),
        }
    }

    /// Whether the input looks like an image, without decoding it.
    ///
    /// Files are judged by extension, bytes by their magic number and
    /// data URLs by their media type.
    pub fn is_image(&self) -> bool {
        match self {
            ImageSource::File(path) => ImageFormat::from_path(path).is_ok(),
            ImageSource::Bytes(bytes) => image::guess_format(bytes).is_ok(),
            ImageSource::Reference(reference) => match parse_data_url(reference) {
                Some((mime, _)) => mime.starts_with("image/"),
                None => ImageFormat::from_path(strip_file_scheme(reference)).is_ok(),
            },
        }
    }

    /// Decode the image and materialize a preview reference.
    ///
    /// Raw bytes become a base64 `data:` URL; files and references keep
    /// their original form.
    pub fn load(&self) -> Result<LoadedImage, SourceError> {
        match self {
            ImageSource::File(path) => Ok(LoadedImage {
                image: image::open(path)?,
                preview: path.display().to_string(),
            }),
            ImageSource::Bytes(bytes) => Ok(LoadedImage {
                image: image::load_from_memory(bytes)?,
                preview: to_data_url(bytes),
            }),
            ImageSource::Reference(reference) => {
                if let Some((_, payload)) = parse_data_url(reference) {
                    let bytes = STANDARD
                        .decode(payload.trim())
                        .map_err(|e| SourceError::DataUrl(e.to_string()))?;
                    return Ok(LoadedImage {
                        image: image::load_from_memory(&bytes)?,
                        preview: reference.clone(),
                    });
                }

                if reference.starts_with("http://") || reference.starts_with("https://") {
                    return Err(SourceError::Unsupported(reference.clone()));
                }

                Ok(LoadedImage {
                    image: image::open(strip_file_scheme(reference))?,
                    preview: reference.clone(),
                })
            }
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Encode image bytes as a `data:` URL.
pub fn to_data_url(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 `data:` URL into (media type, payload).
fn parse_data_url(reference: &str) -> Option<(&str, &str)> {
    let rest = reference.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, payload))
}

fn strip_file_scheme(reference: &str) -> &str {
    reference.strip_prefix("file://").unwrap_or(reference)
}
