//! Error types for stream generation and seed material handling.

use std::path::PathBuf;

use crate::seed::SeedFormat;

/// Errors raised while building or generating a sample stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Stream width is not byte-aligned or exceeds 64 bits.
    #[error("invalid stream width {width}: must be a multiple of 8 in 8..=64")]
    InvalidWidth { width: u32 },

    /// A value does not fit in the declared width.
    #[error("value {value:#x} at index {index} does not fit in {width} bits")]
    ValueOutOfRange { index: usize, value: u64, width: u32 },

    /// Source name did not match any known generator.
    #[error("unknown stream source '{0}' (expected one of: rdt-v2, rdt-v1, drbg, std)")]
    UnknownSource(String),
}

/// Errors surfaced by a [`SeedSource`](crate::seed::SeedSource).
///
/// Every failure mode has its own variant so callers branch on the kind
/// instead of inspecting message text.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The extractor binary was not found in any searched location.
    #[error("seed extractor binary not found (searched: {searched:?})")]
    BinaryNotFound { searched: Vec<PathBuf> },

    /// An input file does not exist.
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// No input files were supplied.
    #[error("no input files given")]
    NoInputs,

    /// The extractor exited unsuccessfully; carries its stderr text.
    #[error("seed extraction failed (exit status {status:?}): {stderr}")]
    ExtractorFailed { status: Option<i32>, stderr: String },

    /// Output had the wrong number of values or bytes for its format.
    #[error("expected {expected} values for {format} seed output, got {got}")]
    FormatMismatch {
        format: SeedFormat,
        expected: usize,
        got: usize,
    },

    /// Output could not be decoded as the requested format.
    #[error("invalid {format} seed encoding: {reason}")]
    InvalidEncoding { format: SeedFormat, reason: String },

    /// The operating system could not supply fresh seed bytes.
    #[error("OS entropy unavailable: {0}")]
    Entropy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
