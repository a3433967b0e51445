//! Block-level data model: the 8x8 pixel/coefficient grids the rest of the
//! crate operates on, and the whole-image buffer they're sliced from.

use crate::error::StegoError;

pub const BLOCK_SIDE: usize = 8;
pub const BLOCK_LEN: usize = BLOCK_SIDE * BLOCK_SIDE;

/// An 8x8 grid of pixel samples in `[0, 255]`. Immutable ground truth for a
/// single block's optimization.
pub type PixelBlock = [[u8; BLOCK_SIDE]; BLOCK_SIDE];

/// An 8x8 grid of real-valued DCT coefficients.
pub type CoefBlock = [[f64; BLOCK_SIDE]; BLOCK_SIDE];

/// An 8x8 grid of signed integer samples, as produced by the inverse DCT
/// before any clamping. Unlike [`PixelBlock`], entries are **not** bounded to
/// `[0, 255]` — an embed can legitimately push a sample outside that range
/// before the fitness metric (C4) clamps it back.
pub type RawBlock = [[i32; BLOCK_SIDE]; BLOCK_SIDE];

/// A whole grayscale image as a flat buffer of 8-bit samples, row-major.
///
/// This is the thing `stego-io` decodes a PNG into and the block driver reads
/// blocks from / writes committed change-matrices back into. Square and a
/// multiple of 8 in each dimension, enforced at construction time.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Construct a buffer, rejecting images that aren't square or aren't an
    /// exact multiple of [`BLOCK_SIDE`] on a side.
    pub fn validated(width: usize, height: usize, data: Vec<u8>) -> Result<Self, StegoError> {
        if width != height || !width.is_multiple_of(BLOCK_SIDE) || width == 0 {
            return Err(StegoError::DimensionInvalid { width, height });
        }
        Ok(Self::new(width, height, data))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of 8x8 blocks this image is divided into, assuming a square
    /// image whose side is a multiple of 8 (checked elsewhere).
    pub fn block_count(&self) -> usize {
        (self.width / BLOCK_SIDE) * (self.height / BLOCK_SIDE)
    }

    /// Top-left pixel coordinate of block `index`, using the spec's
    /// `block_w = index % (width/8)`, `block_h = index / (width/8)` scheme.
    pub fn block_origin(&self, index: usize) -> (usize, usize) {
        let blocks_per_row = self.width / BLOCK_SIDE;
        let block_w = index % blocks_per_row;
        let block_h = index / blocks_per_row;
        (block_w * BLOCK_SIDE, block_h * BLOCK_SIDE)
    }

    /// Extract the 8x8 block at `index` as a standalone `PixelBlock`.
    pub fn read_block(&self, index: usize) -> PixelBlock {
        let (x0, y0) = self.block_origin(index);
        let mut block = [[0u8; BLOCK_SIDE]; BLOCK_SIDE];
        for (i, row) in block.iter_mut().enumerate() {
            let src_row = (y0 + i) * self.width + x0;
            row.copy_from_slice(&self.data[src_row..src_row + BLOCK_SIDE]);
        }
        block
    }

    /// Add `delta[i][j]` to the pixel at block `index`, position `(i, j)`,
    /// clamping to `[0, 255]`. The caller is expected to have already
    /// clamped via `Candidate::normalize`, so this is a plain write-back.
    pub fn write_block(&mut self, index: usize, block: &PixelBlock) {
        let (x0, y0) = self.block_origin(index);
        for (i, row) in block.iter().enumerate() {
            let dst_row = (y0 + i) * self.width + x0;
            self.data[dst_row..dst_row + BLOCK_SIDE].copy_from_slice(row);
        }
    }
}
