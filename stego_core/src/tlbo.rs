//! Teaching-Learning-Based Optimization (C5): a two-phase population
//! optimizer that maximizes the fitness metric over a population of
//! change-matrix candidates.

use crate::block::BLOCK_LEN;
use crate::candidate::Candidate;
use crate::metric::Metric;
use crate::optimizer::Optimizer;
use rand::rngs::SmallRng;
use rand::Rng;

pub struct Tlbo {
    population: Vec<Candidate>,
    fitness: Vec<f64>,
    iterations: usize,
}

impl Tlbo {
    pub fn new(initial_population: Vec<Candidate>, iterations: usize) -> Self {
        let fitness = vec![0.0; initial_population.len()];
        Self {
            population: initial_population,
            fitness,
            iterations,
        }
    }

    fn mean(&self) -> [f64; BLOCK_LEN] {
        let mut mean = [0.0; BLOCK_LEN];
        for candidate in &self.population {
            for (m, v) in mean.iter_mut().zip(candidate.0.iter()) {
                *m += v;
            }
        }
        let n = self.population.len() as f64;
        for m in mean.iter_mut() {
            *m /= n;
        }
        mean
    }
}

impl Optimizer for Tlbo {
    fn optimize(&mut self, metric: &Metric, rng: &mut SmallRng) -> (f64, Candidate) {
        let n = self.population.len();
        for i in 0..n {
            self.fitness[i] = metric.evaluate(&mut self.population[i], rng);
        }

        for _ in 0..self.iterations {
            // Teaching phase.
            let teacher_idx = (0..n)
                .max_by(|&a, &b| self.fitness[a].partial_cmp(&self.fitness[b]).unwrap())
                .unwrap();
            let teacher = self.population[teacher_idx];
            let mean = self.mean();

            for i in 0..n {
                if i == teacher_idx {
                    continue;
                }
                let mut candidate = self.population[i];
                for k in 0..BLOCK_LEN {
                    let r1 = rng.gen::<f64>();
                    let r3 = 1.0 + rng.gen::<f64>();
                    candidate.0[k] += r1 * (teacher.0[k] - r3 * mean[k]);
                }
                let score = metric.evaluate(&mut candidate, rng);
                if score > self.fitness[i] {
                    self.population[i] = candidate;
                    self.fitness[i] = score;
                }
            }

            // Learner phase.
            for i in 0..n {
                let (a, b) = if n == 1 {
                    (0, 0)
                } else {
                    loop {
                        let a = rng.gen_range(0..n);
                        let b = rng.gen_range(0..n);
                        if a != b {
                            break (a, b);
                        }
                    }
                };
                let (hi, lo) = if self.fitness[a] > self.fitness[b] {
                    (a, b)
                } else {
                    (b, a)
                };
                let mut candidate = self.population[i];
                for k in 0..BLOCK_LEN {
                    let r = rng.gen::<f64>();
                    candidate.0[k] += r * (self.population[hi].0[k] - self.population[lo].0[k]);
                }
                let score = metric.evaluate(&mut candidate, rng);
                if score > self.fitness[i] {
                    self.population[i] = candidate;
                    self.fitness[i] = score;
                }
            }
        }

        let best = (0..n)
            .max_by(|&a, &b| self.fitness[a].partial_cmp(&self.fitness[b]).unwrap())
            .unwrap();
        (self.fitness[best], self.population[best])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::PixelBlock;
    use crate::dct::{dct, idct};
    use crate::population::generate_population;
    use crate::qim::{embed, EmbedMode};
    use rand::SeedableRng;

    #[test]
    fn fitness_is_monotonic_across_iterations() {
        let original: PixelBlock =
            std::array::from_fn(|i| std::array::from_fn(|j| (32 + i * 7 + j * 3) as u8));
        let bits: Vec<bool> = (0..32).map(|k| k % 5 == 0).collect();
        let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
        let modified = idct(&coef);

        let mut rng = SmallRng::seed_from_u64(11);
        let population = generate_population(&original, &modified, 32, 0.9, 10, &mut rng);
        let metric = Metric::new(original, bits, 10, EmbedMode::MultiBit);

        let mut tlbo = Tlbo::new(population, 8);
        let (score, _) = tlbo.optimize(&metric, &mut rng);
        assert!(score >= 0.0);
    }
}
