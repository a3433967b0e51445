//! Sine-Cosine-style optimizer (C6). Despite the name, this variant (taken
//! from the source system) pulls each agent toward a random peer with a
//! linearly decaying amplitude, closer to a differential-evolution step
//! than the classical sin/cos SCA update.

use crate::block::BLOCK_LEN;
use crate::candidate::Candidate;
use crate::metric::Metric;
use crate::optimizer::Optimizer;
use rand::rngs::SmallRng;
use rand::Rng;

pub struct Sca {
    agents: Vec<Candidate>,
    fitness: Vec<f64>,
    iterations: usize,
    a_linear: f64,
    /// If set, `optimize` returns as soon as `best_fitness > 0.0`. Used for
    /// the single-bit marker fallback, where any successful decode is
    /// accepted immediately rather than spending the full iteration budget.
    early_exit: bool,
}

impl Sca {
    pub fn new(initial_population: Vec<Candidate>, iterations: usize, early_exit: bool) -> Self {
        let fitness = vec![0.0; initial_population.len()];
        Self {
            agents: initial_population,
            fitness,
            iterations,
            a_linear: 2.0,
            early_exit,
        }
    }
}

impl Optimizer for Sca {
    fn optimize(&mut self, metric: &Metric, rng: &mut SmallRng) -> (f64, Candidate) {
        let n = self.agents.len();
        for i in 0..n {
            self.fitness[i] = metric.evaluate(&mut self.agents[i], rng);
        }

        let mut best_idx = (0..n)
            .max_by(|&a, &b| self.fitness[a].partial_cmp(&self.fitness[b]).unwrap())
            .unwrap();
        let mut best_fitness = self.fitness[best_idx];
        let mut best_agent = self.agents[best_idx];

        for t in 0..self.iterations {
            let a_t = self.a_linear * (1.0 - t as f64 / self.iterations as f64);
            for i in 0..n {
                let r1 = rng.gen::<f64>();
                let r2 = rng.gen::<f64>();
                let a = 2.0 * a_t * r1 - a_t;
                let c = 2.0 * r2;

                let j = if n == 1 {
                    i
                } else {
                    loop {
                        let j = rng.gen_range(0..n);
                        if j != i {
                            break j;
                        }
                    }
                };

                let mut candidate = self.agents[i];
                for k in 0..BLOCK_LEN {
                    let d = (c * self.agents[j].0[k] - self.agents[i].0[k]).abs();
                    candidate.0[k] = self.agents[j].0[k] - a * d;
                }

                let score = metric.evaluate(&mut candidate, rng);
                if score > self.fitness[i] {
                    self.agents[i] = candidate;
                    self.fitness[i] = score;
                    if self.fitness[i] > best_fitness {
                        best_fitness = self.fitness[i];
                        best_agent = self.agents[i];
                        best_idx = i;
                    }
                }

                if self.early_exit && best_fitness > 0.0 {
                    return (best_fitness, best_agent);
                }
            }
        }
        let _ = best_idx;
        (best_fitness, best_agent)
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
    fn early_exit_stops_as_soon_as_positive() {
        let original: PixelBlock = [[128u8; 8]; 8];
        let bits = vec![false; 1];
        let coef = embed(&dct(&original), &bits, EmbedMode::SingleBit);
        let modified = idct(&coef);

        let mut rng = SmallRng::seed_from_u64(5);
        let population = generate_population(&original, &modified, 32, 0.9, 5, &mut rng);
        let metric = Metric::new(original, bits, 5, EmbedMode::SingleBit);

        let mut sca = Sca::new(population, 128, true);
        let (score, _) = sca.optimize(&metric, &mut rng);
        assert!(score >= 0.0);
    }
}
