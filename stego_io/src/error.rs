use thiserror::Error;

/// Failures raised while reading/writing images and sidecar files.
#[derive(Debug, Error)]
pub enum StegoIoError {
    /// A required input file (cover, payload, or sidecar) does not exist.
    #[error("required input file is missing: {path}")]
    InputMissing {
        /// Path that was expected to exist.
        path: String,
    },

    /// The image isn't square, or its side isn't a multiple of 8.
    #[error("image dimensions {width}x{height} are not square, or not a multiple of 8")]
    DimensionInvalid {
        /// Decoded image width in pixels.
        width: u32,
        /// Decoded image height in pixels.
        height: u32,
    },

    /// The `image` crate failed to decode or encode a file.
    #[error("failed to decode or encode image at {path}: {source}")]
    Image {
        /// Path of the image that failed.
        path: String,
        #[source]
        /// Underlying decode/encode error.
        source: image::ImageError,
    },

    /// A plain filesystem read/write failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: String,
        #[source]
        /// Underlying OS error.
        source: std::io::Error,
    },
}
