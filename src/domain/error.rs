use serde::Serialize;
use thiserror::Error;

use crate::domain::value_objects::Side;

/// Failures that abort a comparison run.
///
/// None of them is recoverable inside the engine: there is no partial or
/// degraded comparison. The CLI maps each variant to its own exit code.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum DiffError {
    /// A raw record had no usable comparison key.
    #[error("projection failed on {side} record #{position}: {reason}")]
    Projection {
        side: Side,
        position: usize,
        reason: String,
    },

    /// The record source could not be reached or queried.
    #[error("retrieval failed for source '{source_name}': {message}")]
    Retrieval {
        source_name: String,
        message: String,
    },

    /// The sequence differencer produced an inconsistent edit script.
    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}

impl DiffError {
    pub fn projection(side: Side, position: usize, reason: impl Into<String>) -> Self {
        Self::Projection {
            side,
            position,
            reason: reason.into(),
        }
    }

    /// Wrap any collaborator failure, keeping the full context chain.
    pub fn retrieval(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            source_name: source_name.into(),
            message: format!("{err:#}"),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }

    /// Process exit code reported by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DiffError::Projection { .. } => 2,
            DiffError::Retrieval { .. } => 3,
            DiffError::InternalInvariant { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to connect to cfgdb");
        let e = DiffError::retrieval("prod", err);
        let msg = e.to_string();
        assert!(msg.contains("prod"), "got: {msg}");
        assert!(msg.contains("Failed to connect to cfgdb"), "got: {msg}");
        assert!(msg.contains("connection refused"), "got: {msg}");
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let codes = [
            DiffError::projection(Side::Left, 0, "x").exit_code(),
            DiffError::retrieval("s", "x").exit_code(),
            DiffError::invariant("x").exit_code(),
        ];
        assert!(codes.iter().all(|c| *c != 0));
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
    }
}
