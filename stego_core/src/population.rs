//! Population seeder (C3): builds an initial set of candidate
//! change-matrices by mixing the naive embed/original difference with
//! uniform random perturbations.

use crate::block::{PixelBlock, RawBlock};
use crate::candidate::Candidate;
use rand::Rng;

/// A population of candidates alongside their current fitness scores.
pub struct Population {
    pub candidates: Vec<Candidate>,
    pub fitness: Vec<f64>,
}

impl Population {
    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for i in 1..self.fitness.len() {
            if self.fitness[i] > self.fitness[best] {
                best = i;
            }
        }
        best
    }
}

/// Seed a population of `size` candidates from the difference between the
/// original block `original` and the naively re-embedded block `modified`
/// (i.e. `idct(embed(dct(original), bits))`).
///
/// Each candidate entry independently keeps the naive difference with
/// probability `beta`, otherwise draws a fresh uniform value in
/// `[-search_space, search_space]`. The last slot is always the raw
/// difference vector itself, unperturbed.
pub fn generate_population(
    original: &PixelBlock,
    modified: &RawBlock,
    size: usize,
    beta: f64,
    search_space: i32,
    rng: &mut impl Rng,
) -> Vec<Candidate> {
    let diff = Candidate::from_diff(original, modified);

    let mut population = Vec::with_capacity(size);
    for _ in 0..size {
        let mut values = diff.0;
        for v in values.iter_mut() {
            if rng.gen::<f64>() > beta {
                *v = rng.gen_range(-search_space..=search_space) as f64;
            }
        }
        population.push(Candidate(values));
    }
    if let Some(last) = population.last_mut() {
        *last = diff;
    }
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dct::{dct, idct};
    use crate::qim::{embed, EmbedMode};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn last_member_is_raw_difference() {
        let original: PixelBlock = std::array::from_fn(|i| std::array::from_fn(|j| (i * 8 + j) as u8));
        let bits = vec![true; 32];
        let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
        let modified = idct(&coef);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = generate_population(&original, &modified, 16, 0.9, 10, &mut rng);
        let expected = Candidate::from_diff(&original, &modified);
        assert_eq!(population.last().unwrap().0, expected.0);
        assert_eq!(population.len(), 16);
    }
}
