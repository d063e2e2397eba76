//! Error types for text statistics.
//!
//! Every fallible operation returns [`Result`], carrying a [`TextStatsError`].
//!
//! ```
//! use text_statistics::error::{Result, TextStatsError};
//!
//! fn check_n(n: usize) -> Result<()> {
//!     if n == 0 {
//!         return Err(TextStatsError::invalid_configuration("n must be at least 1"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_n(0).is_err());
//! ```

use thiserror::Error;

/// The error type for tokenization and statistics operations.
#[derive(Error, Debug)]
pub enum TextStatsError {
    /// Bad parameters (n-gram size, section size, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input for which the statistic is undefined
    /// (zero denominator, too few groups)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Snapshot encoding/decoding errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),
}

/// Result type alias for operations that may fail with TextStatsError.
pub type Result<T> = std::result::Result<T, TextStatsError>;

impl TextStatsError {
    /// Create a new invalid configuration error.
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        TextStatsError::InvalidConfiguration(msg.into())
    }

    /// Create a new degenerate input error.
    pub fn degenerate_input<S: Into<String>>(msg: S) -> Self {
        TextStatsError::DegenerateInput(msg.into())
    }
}
