//! Change-matrix candidates (C3/C4): a length-64 additive correction over a
//! pixel block, plus the normalization and clamping rules the fitness
//! metric applies to it.

use crate::block::{PixelBlock, BLOCK_LEN, BLOCK_SIDE};
use rand::Rng;

/// A length-64 additive integer correction, reshaped row-major into the
/// 8x8 block grid. Kept as `f64` throughout (per the source), even though
/// every entry is integral after [`Candidate::normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate(pub [f64; BLOCK_LEN]);

impl Candidate {
    pub fn from_diff(original: &PixelBlock, modified: &crate::block::RawBlock) -> Self {
        let mut values = [0.0; BLOCK_LEN];
        for i in 0..BLOCK_SIDE {
            for j in 0..BLOCK_SIDE {
                values[i * BLOCK_SIDE + j] = (original[i][j] as i32 - modified[i][j]) as f64;
            }
        }
        Candidate(values)
    }

    /// Step 1 of the metric: floor every entry toward `-inf`; any entry that
    /// ends up outside `[-search_space, search_space]` is resampled
    /// uniformly from that range. Mutates `self`.
    pub fn floor_and_bound(&mut self, search_space: i32, rng: &mut impl Rng) {
        let bound = search_space as f64;
        for v in self.0.iter_mut() {
            *v = v.floor();
            if *v < -bound || *v > bound {
                *v = rng.gen_range(-search_space..=search_space) as f64;
            }
        }
    }

    /// Steps 2-3 of the metric: add `self` to `original`, then clamp each
    /// resulting pixel to `[0, 255]`, feeding the clamp excess back into the
    /// corresponding entry of `self` so the candidate stays consistent with
    /// the pixels it actually produced.
    pub fn apply_and_clamp(&mut self, original: &PixelBlock) -> PixelBlock {
        let mut out = [[0u8; BLOCK_SIDE]; BLOCK_SIDE];
        for i in 0..BLOCK_SIDE {
            for j in 0..BLOCK_SIDE {
                let idx = i * BLOCK_SIDE + j;
                let mut pixel = original[i][j] as i32 + self.0[idx] as i32;
                if pixel > 255 {
                    let excess = pixel - 255;
                    self.0[idx] -= excess as f64;
                    pixel = 255;
                } else if pixel < 0 {
                    let deficit = -pixel;
                    self.0[idx] += deficit as f64;
                    pixel = 0;
                }
                out[i][j] = pixel as u8;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn bounds_after_floor_and_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut c = Candidate([12.7, -13.2, 0.4, 9.99, -9.99, 10.0, -10.0, 0.0].iter().cycle().take(BLOCK_LEN).copied().collect::<Vec<_>>().try_into().unwrap());
        c.floor_and_bound(10, &mut rng);
        for v in c.0.iter() {
            assert!(*v >= -10.0 && *v <= 10.0);
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn clamp_drives_saturated_block_to_nonpositive() {
        let original: PixelBlock = [[255u8; BLOCK_SIDE]; BLOCK_SIDE];
        let mut c = Candidate([5.0; BLOCK_LEN]);
        let applied = c.apply_and_clamp(&original);
        assert!(applied.iter().all(|row| row.iter().all(|&p| p == 255)));
        assert!(c.0.iter().all(|&v| v <= 0.0));
    }
}
