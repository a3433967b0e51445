//! PNG decode/encode, grayscale conversion, and the `PixelBuffer` boundary
//! that `stego-core`'s block driver reads and writes.

use crate::error::StegoIoError;
use image::{GrayImage, ImageBuffer, Luma};
use stego_core::PixelBuffer;
use std::path::Path;

fn io_path(path: &Path) -> String {
    path.display().to_string()
}

/// Decode a PNG, converting to 8-bit grayscale via luma averaging if it
/// isn't already, and reject any image whose dimensions aren't square and a
/// multiple of 8.
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<PixelBuffer, StegoIoError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StegoIoError::InputMissing { path: io_path(path) });
    }
    let dynamic = image::open(path).map_err(|source| StegoIoError::Image {
        path: io_path(path),
        source,
    })?;
    let gray: GrayImage = dynamic.to_luma8();
    let (width, height) = gray.dimensions();
    if width != height || !width.is_multiple_of(8) || width == 0 {
        return Err(StegoIoError::DimensionInvalid { width, height });
    }
    Ok(PixelBuffer::new(
        width as usize,
        height as usize,
        gray.into_raw(),
    ))
}

/// Encode `buffer` as an 8-bit grayscale PNG.
pub fn save_grayscale(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<(), StegoIoError> {
    let path = path.as_ref();
    let image: GrayImage =
        ImageBuffer::<Luma<u8>, _>::from_raw(buffer.width() as u32, buffer.height() as u32, buffer.data().to_vec())
            .expect("PixelBuffer length always matches width*height");
    image.save(path).map_err(|source| StegoIoError::Image {
        path: io_path(path),
        source,
    })
}
