//! Error types for renderer and style wire messages.

/// Errors raised while encoding or decoding wire messages.
///
/// Styled AI responses never produce these; malformed style documents fall
/// back to literal text instead.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to encode renderer message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode renderer message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Point {index} of stroke {stroke} is not finite")]
    NonFinitePoint { stroke: usize, index: usize },
}
