//! End-to-end scenarios (S1-S6) tying block transform, QIM codec,
//! population seeder, optimizers, and the block driver together.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use stego_core::block::{PixelBlock, BLOCK_LEN, BLOCK_SIDE};
use stego_core::candidate::Candidate;
use stego_core::dct::{dct, idct};
use stego_core::driver::{embed_image, extract_image, EmbedConfig, OptimizerKind};
use stego_core::metric::Metric;
use stego_core::optimizer::Optimizer;
use stego_core::population::generate_population;
use stego_core::qim::{embed, extract, EmbedMode, Extracted};
use stego_core::sca::Sca;
use stego_core::tlbo::Tlbo;
use stego_core::PixelBuffer;

fn run_optimizer(kind: OptimizerKind, population: Vec<Candidate>, iterations: usize, metric: &Metric, rng: &mut SmallRng) -> (f64, Candidate) {
    let mut optimizer: Box<dyn Optimizer> = match kind {
        OptimizerKind::Sca => Box::new(Sca::new(population, iterations, false)),
        OptimizerKind::Tlbo => Box::new(Tlbo::new(population, iterations)),
    };
    optimizer.optimize(metric, rng)
}

#[test]
fn s1_identity_on_constant_block() {
    let original: PixelBlock = [[128u8; BLOCK_SIDE]; BLOCK_SIDE];
    let mut bits = vec![false; 32];
    bits[0] = true;

    let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
    let modified = idct(&coef);

    let mut rng = SmallRng::seed_from_u64(1);
    let population = generate_population(&original, &modified, 64, 0.9, 10, &mut rng);
    let metric = Metric::new(original, bits.clone(), 10, EmbedMode::MultiBit);
    let (score, mut best) = run_optimizer(OptimizerKind::Sca, population, 64, &metric, &mut rng);
    assert!(score > 1.0, "expected a committable candidate, got score {score}");

    let stego_block = best.apply_and_clamp(&original);
    for row in stego_block.iter() {
        for &p in row {
            assert!((0..=255).contains(&p));
        }
    }

    match extract(&dct(&stego_block)) {
        Extracted::Payload(out) => assert!(out[1..].iter().all(|&b| !b)),
        Extracted::Empty => panic!("expected a payload marker, got empty"),
    }
}

#[test]
fn s2_saturation_clamp_drives_candidate_nonpositive() {
    let original: PixelBlock = [[255u8; BLOCK_SIDE]; BLOCK_SIDE];
    let bits: Vec<bool> = (0..32).map(|k| k % 2 == 0).collect();
    let metric = Metric::new(original, bits, 10, EmbedMode::MultiBit);
    let mut rng = SmallRng::seed_from_u64(2);

    let mut candidate = Candidate([5.0; BLOCK_LEN]);
    let _ = metric.evaluate(&mut candidate, &mut rng);
    assert!(candidate.0.iter().all(|&v| v <= 0.0));
}

#[test]
fn s3_adversarial_block_falls_back_to_marker() {
    // A single-candidate, single-iteration search leaves no room for the
    // optimizer to find anything but the unperturbed seed, which the mostly
    // non-zero target bit pattern below won't match: the driver must fall
    // back to an empty marker rather than commit a wrong decode.
    let original: PixelBlock = std::array::from_fn(|i| {
        std::array::from_fn(|j| if (i + j) % 2 == 0 { 120u8 } else { 0u8 })
    });
    let bits = vec![true; 32];

    let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
    let modified = idct(&coef);

    let mut rng = SmallRng::seed_from_u64(3);
    let population = generate_population(&original, &modified, 1, 0.9, 10, &mut rng);
    let metric = Metric::new(original, bits, 10, EmbedMode::MultiBit);
    let (score, _best) = run_optimizer(OptimizerKind::Sca, population, 1, &metric, &mut rng);
    assert!(score <= 1.0, "expected this starved search to miss the commit threshold, got {score}");

    // The driver's own fallback path, exercised at the same starved budget:
    // it must still produce a block that decodes as an empty marker.
    let config = EmbedConfig {
        optimizer: OptimizerKind::Sca,
        population_size: 1,
        iterations: 1,
        seed: 3,
    };
    let payload = vec![true; 31];
    let cover_data: Vec<u8> = (0..8)
        .flat_map(|i| (0..8).map(move |j| if (i + j) % 2 == 0 { 120u8 } else { 0u8 }))
        .collect();
    let cover = PixelBuffer::new(8, 8, cover_data);
    let (stego, order) = embed_image(&cover, &payload, &config);
    let block = stego.read_block(order[0]);
    assert_eq!(extract(&dct(&block)), Extracted::Empty);
    assert!(extract_image(&stego, &order).is_empty());
}

#[test]
fn s4_permutation_replay_recovers_distinct_windows() {
    let width = 512;
    let height = 512;
    let data: Vec<u8> = (0..width * height).map(|i| (i % 256) as u8).collect();
    let cover = PixelBuffer::new(width, height, data);

    let mut rng = SmallRng::seed_from_u64(4);
    let payload: Vec<bool> = (0..128).map(|_| rng.gen_bool(0.5)).collect();

    let config = EmbedConfig {
        optimizer: OptimizerKind::Sca,
        population_size: 32,
        iterations: 24,
        seed: 4,
    };
    let (stego, order) = embed_image(&cover, &payload, &config);

    let recovered: Vec<Option<Vec<bool>>> = order
        .iter()
        .map(|&block_index| {
            let block = stego.read_block(block_index);
            match extract(&dct(&block)) {
                Extracted::Empty => None,
                Extracted::Payload(bits) => Some(bits[1..].to_vec()),
            }
        })
        .collect();

    for (position, fragment) in recovered.iter().enumerate() {
        if let Some(bits) = fragment {
            let start = position * 31;
            let expected: Vec<bool> = (0..31)
                .map(|i| payload.get(start + i).copied().unwrap_or(false))
                .collect();
            assert_eq!(bits, &expected, "window mismatch at position {position}");
        }
    }

    let via_driver = extract_image(&stego, &order);
    assert!(!via_driver.is_empty() || recovered.iter().all(Option::is_none));
}

#[test]
fn s5_same_seed_same_deltas() {
    let original: PixelBlock = std::array::from_fn(|i| std::array::from_fn(|j| (i * 11 + j * 5) as u8));
    let bits: Vec<bool> = (0..32).map(|k| k % 4 == 0).collect();
    let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
    let modified = idct(&coef);

    let run = || {
        let mut rng = SmallRng::seed_from_u64(9);
        let population = generate_population(&original, &modified, 32, 0.9, 10, &mut rng);
        let metric = Metric::new(original, bits.clone(), 10, EmbedMode::MultiBit);
        let (_, mut best) = run_optimizer(OptimizerKind::Tlbo, population, 16, &metric, &mut rng);
        best.apply_and_clamp(&original)
    };

    assert_eq!(run(), run());
}

#[test]
fn s6_both_optimizers_honor_the_commit_threshold() {
    let original: PixelBlock = std::array::from_fn(|i| std::array::from_fn(|j| (64 + i * 3 + j * 2) as u8));
    let mut bits: Vec<bool> = (0..32).map(|k| k % 3 != 0).collect();
    bits[0] = true;
    let coef = embed(&dct(&original), &bits, EmbedMode::MultiBit);
    let modified = idct(&coef);

    for kind in [OptimizerKind::Sca, OptimizerKind::Tlbo] {
        let mut rng = SmallRng::seed_from_u64(6);
        let population = generate_population(&original, &modified, 64, 0.9, 10, &mut rng);
        let metric = Metric::new(original, bits.clone(), 10, EmbedMode::MultiBit);
        let (score, mut best) = run_optimizer(kind, population, 64, &metric, &mut rng);

        if score > 1.0 {
            let block = best.apply_and_clamp(&original);
            match extract(&dct(&block)) {
                Extracted::Payload(out) => assert_eq!(&out[1..], &bits[1..]),
                Extracted::Empty => panic!("{kind:?}: committed candidate decoded as empty"),
            }
        }
    }
}
