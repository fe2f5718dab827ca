//! Error types for rangehammer.

use thiserror::Error;

/// Why a CIDR string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid CIDR range format: '{input}' ({reason})")]
    Format { input: String, reason: String },

    #[error("Misaligned CIDR range: '{input}' has host bits set below /{prefix_len}")]
    Alignment { input: String, prefix_len: u8 },
}

impl RangeError {
    pub(crate) fn format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// The offending input, as it was handed to the parser.
    pub fn input(&self) -> &str {
        match self {
            Self::Format { input, .. } | Self::Alignment { input, .. } => input,
        }
    }

    pub fn is_alignment(&self) -> bool {
        matches!(self, Self::Alignment { .. })
    }
}

/// A consolidation call was aborted because one of its inputs did not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Input #{index} rejected: {source}")]
pub struct ConsolidateError {
    /// Zero-based position of the rejected entry in the input sequence.
    pub index: usize,
    #[source]
    pub source: RangeError,
}

impl ConsolidateError {
    pub fn input(&self) -> &str {
        self.source.input()
    }
}

/// Job scheduling refusals (only surfaced in strict mode).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Attempted to start a '{0}' job, but registering new job types is not permitted")]
    UnknownType(String),

    #[error("Attempted to queue a '{0}' job while one is already running")]
    Busy(String),

    #[error("Failed to spawn '{job_type}' job thread: {reason}")]
    Spawn { job_type: String, reason: String },
}
