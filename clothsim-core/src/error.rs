use thiserror::Error;

/// Errors reported by cloth construction, accessors and configuration loading.
///
/// A running simulation never produces one of these: `Cloth::update` guards
/// its degenerate numeric cases instead of failing.
#[derive(Debug, Error)]
pub enum ClothError {
    #[error("invalid topology: grid dimension must be at least 2, got {dim}")]
    InvalidTopology { dim: usize },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("topology covers {expected} particles but the state holds {actual}")]
    TopologyMismatch { expected: usize, actual: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
