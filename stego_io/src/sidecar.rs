//! Plain-text sidecar files: the payload bit string and the block
//! permutation that must be replayed verbatim at extraction time.

use crate::error::StegoIoError;
use std::fs;
use std::path::Path;

const WINDOW_BITS: usize = 31;

fn io_path(path: &Path) -> String {
    path.display().to_string()
}

fn read_to_string(path: &Path) -> Result<String, StegoIoError> {
    if !path.exists() {
        return Err(StegoIoError::InputMissing { path: io_path(path) });
    }
    fs::read_to_string(path).map_err(|source| StegoIoError::Io {
        path: io_path(path),
        source,
    })
}

/// Read the first line of a `to_embed.txt`-style file, interpreting each
/// `'0'`/`'1'` character as a bit and padding with `false` on the right to a
/// multiple of 31 bits.
pub fn read_payload_bits(path: impl AsRef<Path>) -> Result<Vec<bool>, StegoIoError> {
    let contents = read_to_string(path.as_ref())?;
    let first_line = contents.lines().next().unwrap_or("");
    let mut bits: Vec<bool> = first_line.chars().filter_map(|c| match c {
        '0' => Some(false),
        '1' => Some(true),
        _ => None,
    }).collect();

    let remainder = bits.len() % WINDOW_BITS;
    if remainder != 0 {
        let padded = WINDOW_BITS - remainder;
        log::warn!("payload is {padded} bit(s) short of a {WINDOW_BITS}-bit window; padding with zeros");
        bits.resize(bits.len() + padded, false);
    }
    Ok(bits)
}

/// Write the recovered payload, one 31-bit fragment per line.
pub fn write_payload_bits(path: impl AsRef<Path>, bits: &[bool]) -> Result<(), StegoIoError> {
    let path = path.as_ref();
    let mut out = String::new();
    for chunk in bits.chunks(WINDOW_BITS) {
        for &bit in chunk {
            out.push(if bit { '1' } else { '0' });
        }
        out.push('\n');
    }
    fs::write(path, out).map_err(|source| StegoIoError::Io {
        path: io_path(path),
        source,
    })
}

/// Read the whitespace-separated decimal block-index sidecar.
pub fn read_block_order(path: impl AsRef<Path>) -> Result<Vec<usize>, StegoIoError> {
    let contents = read_to_string(path.as_ref())?;
    Ok(contents
        .split_whitespace()
        .filter_map(|tok| tok.parse::<usize>().ok())
        .collect())
}

/// Write the block permutation used during embedding, space-separated.
pub fn write_block_order(path: impl AsRef<Path>, order: &[usize]) -> Result<(), StegoIoError> {
    let path = path.as_ref();
    let out = order
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    fs::write(path, out).map_err(|source| StegoIoError::Io {
        path: io_path(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("stego-io-sidecar-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn payload_bits_pad_to_window_multiple() {
        let path = temp_path("to_embed.txt");
        std::fs::write(&path, "101").unwrap();
        let bits = read_payload_bits(&path).unwrap();
        assert_eq!(bits.len(), 31);
        assert_eq!(&bits[0..3], &[true, false, true]);
        assert!(bits[3..].iter().all(|&b| !b));
    }

    #[test]
    fn block_order_round_trips() {
        let path = temp_path("blocks.txt");
        let order = vec![3, 1, 4, 1, 5, 9];
        write_block_order(&path, &order).unwrap();
        let read_back = read_block_order(&path).unwrap();
        assert_eq!(read_back, order);
    }
}
