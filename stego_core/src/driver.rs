//! Block driver (C7): per-block orchestration tying the transform, QIM
//! codec, population seeder, and optimizer together, run in parallel across
//! independent 8x8 tiles of the image.

use crate::block::PixelBuffer;
use crate::candidate::Candidate;
use crate::dct::{dct, idct};
use crate::metric::Metric;
use crate::optimizer::Optimizer;
use crate::population::generate_population;
use crate::qim::{embed, extract, EmbedMode, Extracted};
use crate::sca::Sca;
use crate::tlbo::Tlbo;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

const MULTI_BIT_SEARCH_SPACE: i32 = 10;
const MARKER_SEARCH_SPACE: i32 = 5;
const POPULATION_SIZE: usize = 128;
const BETA: f64 = 0.9;
const ITERATIONS: usize = 128;
const WINDOW_BITS: usize = 31;

/// Which metaheuristic the driver should use for the multi-bit embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    Sca,
    Tlbo,
}

/// Tunables exposed at the CLI boundary; every field has a default matching
/// the values the rest of this module hard-codes when left unset.
#[derive(Debug, Clone)]
pub struct EmbedConfig {
    pub optimizer: OptimizerKind,
    pub population_size: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            optimizer: OptimizerKind::Sca,
            population_size: POPULATION_SIZE,
            iterations: ITERATIONS,
            seed: 0,
        }
    }
}

fn make_optimizer(kind: OptimizerKind, population: Vec<Candidate>, iterations: usize, early_exit: bool) -> Box<dyn Optimizer> {
    match kind {
        OptimizerKind::Sca => Box::new(Sca::new(population, iterations, early_exit)),
        OptimizerKind::Tlbo => Box::new(Tlbo::new(population, iterations)),
    }
}

/// A deterministic, seeded shuffle of `0..block_count`, persisted and
/// replayed as the `blocks.txt` sidecar.
pub fn generate_block_order(block_count: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..block_count).collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

fn window_bits(payload: &[bool], position: usize) -> Vec<bool> {
    let start = position * WINDOW_BITS;
    let mut bits = vec![false; WINDOW_BITS];
    for (i, slot) in bits.iter_mut().enumerate() {
        if let Some(&b) = payload.get(start + i) {
            *slot = b;
        }
    }
    bits
}

/// Per-block outcome of the embed driver: the committed additive change and
/// whether this block ended up carrying a payload window or an empty marker.
struct BlockResult {
    delta: crate::block::PixelBlock,
    committed_payload: bool,
}

fn process_embed_block(
    input: &PixelBuffer,
    block_index: usize,
    window: &[bool],
    config: &EmbedConfig,
) -> BlockResult {
    let original = input.read_block(block_index);
    let mut rng = SmallRng::seed_from_u64(config.seed ^ (block_index as u64).wrapping_mul(0x9E3779B97F4A7C15));

    let mut msg = Vec::with_capacity(WINDOW_BITS + 1);
    msg.push(true);
    msg.extend_from_slice(window);

    let coef = dct(&original);
    let embedded_coef = embed(&coef, &msg, EmbedMode::MultiBit);
    let naive_modified = idct(&embedded_coef);

    let population = generate_population(
        &original,
        &naive_modified,
        config.population_size,
        BETA,
        MULTI_BIT_SEARCH_SPACE,
        &mut rng,
    );
    let metric = Metric::new(original, msg, MULTI_BIT_SEARCH_SPACE, EmbedMode::MultiBit);
    let mut optimizer = make_optimizer(config.optimizer, population, config.iterations, false);
    let (score, mut best) = optimizer.optimize(&metric, &mut rng);

    if score > 1.0 {
        let delta = reshape_delta(&original, &mut best);
        return BlockResult {
            delta,
            committed_payload: true,
        };
    }

    // Fallback: single-bit empty marker, from a fresh DCT of the original.
    let marker_bits = [false];
    let marker_coef = embed(&dct(&original), &marker_bits, EmbedMode::SingleBit);
    let marker_modified = idct(&marker_coef);
    let population = generate_population(
        &original,
        &marker_modified,
        config.population_size,
        BETA,
        MARKER_SEARCH_SPACE,
        &mut rng,
    );
    let metric = Metric::new(original, marker_bits.to_vec(), MARKER_SEARCH_SPACE, EmbedMode::SingleBit);
    let mut optimizer = make_optimizer(config.optimizer, population, config.iterations, true);
    let (_score, mut best) = optimizer.optimize(&metric, &mut rng);
    let delta = reshape_delta(&original, &mut best);
    BlockResult {
        delta,
        committed_payload: false,
    }
}

/// Apply a candidate's final clamp-corrected pixel block, returning it as
/// the committed pixels for this block (the caller writes it back).
fn reshape_delta(original: &crate::block::PixelBlock, candidate: &mut Candidate) -> crate::block::PixelBlock {
    candidate.apply_and_clamp(original)
}

/// Embed `payload_bits` into `input`, returning the stego image and the
/// block permutation used (the `blocks.txt` sidecar contents, in order).
pub fn embed_image(input: &PixelBuffer, payload_bits: &[bool], config: &EmbedConfig) -> (PixelBuffer, Vec<usize>) {
    let block_count = input.block_count();
    let order = generate_block_order(block_count, config.seed);

    let results: Vec<BlockResult> = order
        .par_iter()
        .enumerate()
        .map(|(position, &block_index)| {
            let window = window_bits(payload_bits, position);
            process_embed_block(input, block_index, &window, config)
        })
        .collect();

    let mut output = input.clone();
    let mut committed = 0usize;
    for (&block_index, result) in order.iter().zip(results.iter()) {
        output.write_block(block_index, &result.delta);
        if result.committed_payload {
            committed += 1;
        }
    }
    log_summary(committed, order.len());
    (output, order)
}

#[cfg(not(test))]
fn log_summary(committed: usize, total: usize) {
    log::debug!("committed payload in {committed}/{total} blocks");
}

#[cfg(test)]
fn log_summary(_committed: usize, _total: usize) {}

/// Extract the payload from `stego` using the persisted block order. Returns
/// the concatenated recovered bits, one 31-bit window per committed block
/// that wasn't skipped as an empty marker.
pub fn extract_image(stego: &PixelBuffer, block_order: &[usize]) -> Vec<bool> {
    let recovered: Vec<Option<Vec<bool>>> = block_order
        .par_iter()
        .map(|&block_index| {
            let block = stego.read_block(block_index);
            let coef = dct(&block);
            match extract(&coef) {
                Extracted::Empty => None,
                Extracted::Payload(bits) => Some(bits[1..].to_vec()),
            }
        })
        .collect();

    recovered.into_iter().flatten().flatten().collect()
}

/// Whole-image PSNR between two equally-sized buffers, for the CLI's
/// post-embed summary log line. Not part of the per-block fitness metric.
pub fn whole_image_psnr(a: &PixelBuffer, b: &PixelBuffer) -> f64 {
    assert_eq!(a.width(), b.width());
    assert_eq!(a.height(), b.height());
    let sum_sq: i64 = a
        .data()
        .iter()
        .zip(b.data().iter())
        .map(|(&x, &y)| {
            let d = x as i64 - y as i64;
            d * d
        })
        .sum();
    if sum_sq == 0 {
        return crate::metric::PSNR_SENTINEL;
    }
    let n = a.data().len() as f64;
    10.0 * (255.0 * 255.0 / (sum_sq as f64 / n)).log10()
}
