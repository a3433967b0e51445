use thiserror::Error;

/// Failures raised at the block-driver boundary. The optimizer and metric
/// themselves are total and never produce one of these.
#[derive(Debug, Error)]
pub enum StegoError {
    #[error("image dimensions {width}x{height} are not square, or not a multiple of 8")]
    DimensionInvalid { width: usize, height: usize },
}
