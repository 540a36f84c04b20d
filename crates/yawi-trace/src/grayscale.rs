//! Decoding raw image bytes into a trace-ready grayscale image.
//!
//! Callers that already hold pixels skip this module and build a
//! [`GrayView`](crate::GrayView) directly.

use image::GrayImage;

/// Failure to turn raw bytes into a grayscale image.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input byte slice was empty.
    #[error("empty input")]
    EmptyInput,

    /// The image format is unrecognized or the data is corrupt.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Decode raw image bytes and convert to 8-bit grayscale.
///
/// Any format the `image` crate was built with is accepted (PNG, JPEG,
/// BMP, WebP). Color images are reduced with the `image` crate's
/// luminance weighting, so green contributes most and blue least.
///
/// # Errors
///
/// Returns [`LoadError::EmptyInput`] if `bytes` is empty and
/// [`LoadError::ImageDecode`] if decoding fails.
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    let gray = img.to_luma8();
    tracing::debug!(
        width = gray.width(),
        height = gray.height(),
        "decoded grayscale image"
    );
    Ok(gray)
}
