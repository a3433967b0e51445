//! Fitness metric (C4): scores a candidate change-matrix by how well it
//! preserves bit-exact QIM decoding while minimizing block PSNR loss.

use crate::block::{PixelBlock, BLOCK_SIDE};
use crate::candidate::Candidate;
use crate::dct::dct;
use crate::qim::{decode_bit, EmbedMode, PATTERN};
use rand::Rng;

/// Sentinel PSNR assigned when a candidate reproduces the original block
/// exactly (MSE = 0), chosen larger than any attainable finite-MSE PSNR for
/// an 8x8 block at 8-bit depth (see DESIGN.md).
pub const PSNR_SENTINEL: f64 = 100.0;

/// A bound fitness function for one block: holds the ground-truth pixels
/// and the bit string a candidate is being judged against.
pub struct Metric {
    original: PixelBlock,
    bits: Vec<bool>,
    search_space: i32,
    mode: EmbedMode,
}

impl Metric {
    pub fn new(original: PixelBlock, bits: Vec<bool>, search_space: i32, mode: EmbedMode) -> Self {
        Self {
            original,
            bits,
            search_space,
            mode,
        }
    }

    /// Number of coefficient positions this metric's mode decodes.
    fn decode_len(&self) -> usize {
        match self.mode {
            EmbedMode::MultiBit => PATTERN.len(),
            EmbedMode::SingleBit => 1,
        }
    }

    /// Evaluate `candidate` in place (it is normalized and clamp-corrected
    /// as a side effect, per the spec's explicit mutation contract) and
    /// return its fitness score.
    pub fn evaluate(&self, candidate: &mut Candidate, rng: &mut impl Rng) -> f64 {
        candidate.floor_and_bound(self.search_space, rng);
        let block = candidate.apply_and_clamp(&self.original);

        let mut sum_sq = 0i64;
        for i in 0..BLOCK_SIDE {
            for j in 0..BLOCK_SIDE {
                let diff = self.original[i][j] as i64 - block[i][j] as i64;
                sum_sq += diff * diff;
            }
        }
        let psnr = if sum_sq == 0 {
            PSNR_SENTINEL
        } else {
            10.0 * (64.0 * 255.0 * 255.0 / sum_sq as f64).log10()
        };

        let coef = dct(&block);
        let decode_len = self.decode_len();
        let mut matches = 0usize;
        for (k, &(i, j)) in PATTERN.iter().enumerate().take(decode_len) {
            let bit = decode_bit(coef[i][j]);
            if k == 0 && bit != self.bits[0] {
                return 0.0;
            }
            if bit == self.bits[k] {
                matches += 1;
            }
        }

        psnr / 10_000.0 + matches as f64 / decode_len as f64
    }
}
