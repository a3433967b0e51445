//! Grayscale PNG decode/encode and plain-text sidecar I/O for the
//! `stego-core` block driver, analogous to the reference crate's decoders
//! crate sitting alongside its metrics core.

#![deny(missing_docs)]

mod error;
mod image_io;
mod sidecar;

pub use error::StegoIoError;
pub use image_io::{load_grayscale, save_grayscale};
pub use sidecar::{read_block_order, read_payload_bits, write_block_order, write_payload_bits};
