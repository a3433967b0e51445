//! Command-line driver: reads the embed/extract mode switch from stdin (the
//! original interface), with `clap` flags overriding every tunable the rest
//! of the system otherwise defaults.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use stego_core::{EmbedConfig, OptimizerKind};

#[derive(Parser, Debug)]
#[command(about = "DCT/QIM image steganography with a metaheuristic distortion optimizer")]
struct Args {
    /// Cover image to embed into (embed mode) or compare against for the PSNR summary (extract mode).
    #[arg(long, default_value = "lena512.png")]
    cover: String,

    /// Payload file, first line interpreted as a '0'/'1' bit string (embed mode only).
    #[arg(long, default_value = "to_embed.txt")]
    payload: String,

    /// Stego image path: write target (embed mode) or read source (extract mode).
    #[arg(long, default_value = "saved.png")]
    stego: String,

    /// Block-permutation sidecar: write target (embed mode) or read source (extract mode).
    #[arg(long, default_value = "blocks.txt")]
    blocks: String,

    /// Recovered-payload output path (extract mode only).
    #[arg(long, default_value = "saved.txt")]
    output: String,

    /// Which metaheuristic drives the per-block distortion search.
    #[arg(long, value_enum, default_value = "sca")]
    optimizer: OptimizerArg,

    /// Population size per block.
    #[arg(long, default_value_t = 128)]
    population_size: usize,

    /// Iteration budget per block.
    #[arg(long, default_value_t = 128)]
    iterations: usize,

    /// Master RNG seed; each block derives its own seed from this plus its index.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of rayon worker threads; 0 uses rayon's default.
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OptimizerArg {
    Sca,
    Tlbo,
}

impl From<OptimizerArg> for OptimizerKind {
    fn from(value: OptimizerArg) -> Self {
        match value {
            OptimizerArg::Sca => OptimizerKind::Sca,
            OptimizerArg::Tlbo => OptimizerKind::Tlbo,
        }
    }
}

fn read_mode() -> Result<bool> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read mode selector from stdin")?;
    Ok(line.trim() == "1")
}

fn run() -> Result<()> {
    let args = Args::parse();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to configure rayon thread pool")?;
    }

    let embed_mode = read_mode()?;
    let config = EmbedConfig {
        optimizer: args.optimizer.into(),
        population_size: args.population_size,
        iterations: args.iterations,
        seed: args.seed,
    };

    if embed_mode {
        log::info!("embedding {} into {}", args.payload, args.cover);
        let cover = stego_io::load_grayscale(&args.cover).context("loading cover image")?;
        let payload = stego_io::read_payload_bits(&args.payload).context("reading payload")?;

        let (stego, order) = stego_core::embed_image(&cover, &payload, &config);
        stego_io::save_grayscale(&args.stego, &stego).context("writing stego image")?;
        stego_io::write_block_order(&args.blocks, &order).context("writing block order")?;

        let psnr = stego_core::whole_image_psnr(&cover, &stego);
        log::info!("embed complete, whole-image PSNR = {psnr:.2} dB");
    } else {
        log::info!("extracting from {} using {}", args.stego, args.blocks);
        let stego = stego_io::load_grayscale(&args.stego).context("loading stego image")?;
        let order = stego_io::read_block_order(&args.blocks).context("reading block order")?;

        let recovered = stego_core::extract_image(&stego, &order);
        stego_io::write_payload_bits(&args.output, &recovered).context("writing recovered payload")?;

        if let Ok(cover) = stego_io::load_grayscale(&args.cover) {
            let psnr = stego_core::whole_image_psnr(&cover, &stego);
            log::info!("extract complete, whole-image PSNR vs. cover = {psnr:.2} dB");
        } else {
            log::info!("extract complete, {} 31-bit fragments recovered", recovered.len() / 31);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}
