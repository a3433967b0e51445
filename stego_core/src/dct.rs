//! Forward and inverse 2-D type-II DCT over an 8x8 block (C1).
//!
//! Uses the orthonormal scaling convention, so the inverse transform is
//! exactly the transpose operation (DCT-III) rather than a separately
//! normalized pass. Any convention works here as long as forward and
//! inverse agree; this one keeps `idct(dct(x)) == x` to float precision
//! without a second normalization pass.

use crate::block::{CoefBlock, PixelBlock, RawBlock, BLOCK_SIDE};
use std::f64::consts::PI;

fn cos_table() -> [[f64; BLOCK_SIDE]; BLOCK_SIDE] {
    let mut table = [[0.0; BLOCK_SIDE]; BLOCK_SIDE];
    for (x, row) in table.iter_mut().enumerate() {
        for (u, cell) in row.iter_mut().enumerate() {
            *cell = (PI * (2 * x + 1) as f64 * u as f64 / 16.0).cos();
        }
    }
    table
}

fn alpha(u: usize) -> f64 {
    if u == 0 {
        (1.0 / BLOCK_SIDE as f64).sqrt()
    } else {
        (2.0 / BLOCK_SIDE as f64).sqrt()
    }
}

fn dct_1d(input: &[f64; BLOCK_SIDE], cos: &[[f64; BLOCK_SIDE]; BLOCK_SIDE]) -> [f64; BLOCK_SIDE] {
    let mut out = [0.0; BLOCK_SIDE];
    for (u, slot) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for x in 0..BLOCK_SIDE {
            sum += input[x] * cos[x][u];
        }
        *slot = alpha(u) * sum;
    }
    out
}

fn idct_1d(input: &[f64; BLOCK_SIDE], cos: &[[f64; BLOCK_SIDE]; BLOCK_SIDE]) -> [f64; BLOCK_SIDE] {
    let mut out = [0.0; BLOCK_SIDE];
    for (x, slot) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for u in 0..BLOCK_SIDE {
            sum += alpha(u) * input[u] * cos[x][u];
        }
        *slot = sum;
    }
    out
}

/// Forward 2-D DCT-II of a pixel block, applied row-wise then column-wise.
pub fn dct(block: &PixelBlock) -> CoefBlock {
    let cos = cos_table();
    let mut rows = [[0.0; BLOCK_SIDE]; BLOCK_SIDE];
    for i in 0..BLOCK_SIDE {
        let row: [f64; BLOCK_SIDE] = std::array::from_fn(|j| block[i][j] as f64);
        rows[i] = dct_1d(&row, &cos);
    }

    let mut out = [[0.0; BLOCK_SIDE]; BLOCK_SIDE];
    for j in 0..BLOCK_SIDE {
        let col: [f64; BLOCK_SIDE] = std::array::from_fn(|i| rows[i][j]);
        let transformed = dct_1d(&col, &cos);
        for i in 0..BLOCK_SIDE {
            out[i][j] = transformed[i];
        }
    }
    out
}

/// Inverse 2-D DCT, rounded to the nearest integer. No clamping is
/// performed here: clamping to `[0, 255]` is the fitness metric's job (C4),
/// so the result may fall outside the valid pixel range.
pub fn idct(coef: &CoefBlock) -> RawBlock {
    let cos = cos_table();
    let mut cols = [[0.0; BLOCK_SIDE]; BLOCK_SIDE];
    for j in 0..BLOCK_SIDE {
        let col: [f64; BLOCK_SIDE] = std::array::from_fn(|i| coef[i][j]);
        let transformed = idct_1d(&col, &cos);
        for i in 0..BLOCK_SIDE {
            cols[i][j] = transformed[i];
        }
    }

    let mut out = [[0i32; BLOCK_SIDE]; BLOCK_SIDE];
    for i in 0..BLOCK_SIDE {
        let row = idct_1d(&cols[i], &cos);
        for j in 0..BLOCK_SIDE {
            out[i][j] = row[j].round() as i32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_constant_block() {
        let block: PixelBlock = [[128u8; BLOCK_SIDE]; BLOCK_SIDE];
        let coef = dct(&block);
        let back = idct(&coef);
        for i in 0..BLOCK_SIDE {
            for j in 0..BLOCK_SIDE {
                assert_eq!(block[i][j] as i32, back[i][j]);
            }
        }
    }

    #[test]
    fn round_trips_gradient_block() {
        let block: PixelBlock = std::array::from_fn(|i| std::array::from_fn(|j| (i * 8 + j) as u8));
        let coef = dct(&block);
        let back = idct(&coef);
        for i in 0..BLOCK_SIDE {
            for j in 0..BLOCK_SIDE {
                assert!(
                    (block[i][j] as i32 - back[i][j]).abs() <= 1,
                    "mismatch at ({i},{j}): {} vs {}",
                    block[i][j],
                    back[i][j]
                );
            }
        }
    }
}
