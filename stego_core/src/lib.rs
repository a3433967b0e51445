//! DCT/QIM image steganography core: block transform, QIM bit codec,
//! population-metaheuristic distortion optimizer, and the block driver that
//! ties them together over a whole image in parallel.

pub mod block;
pub mod candidate;
pub mod dct;
pub mod driver;
pub mod error;
pub mod metric;
pub mod optimizer;
pub mod population;
pub mod qim;
pub mod sca;
pub mod tlbo;

pub use block::{CoefBlock, PixelBlock, PixelBuffer, RawBlock, BLOCK_LEN, BLOCK_SIDE};
pub use driver::{embed_image, extract_image, generate_block_order, whole_image_psnr, EmbedConfig, OptimizerKind};
pub use error::StegoError;
pub use qim::{EmbedMode, PAYLOAD_BITS, Q};
