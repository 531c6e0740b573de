//! Optimistic-concurrency version token.

use serde::{Deserialize, Serialize};

use crate::error::{DomainResult, RejectedReason};

/// Optimistic concurrency expectation for a stock record.
///
/// A caller that read a record before requesting a transfer passes the
/// version it saw; the executor re-checks it against the freshest state
/// inside the atomic section, so a lost update is detected rather than
/// silently merged.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedVersion {
    /// Skip version checking (caller accepts last-writer-wins on its read).
    #[default]
    Any,
    /// Require the record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        match self {
            ExpectedVersion::Any => Ok(()),
            ExpectedVersion::Exact(expected) if expected == actual => Ok(()),
            ExpectedVersion::Exact(expected) => {
                Err(RejectedReason::ConcurrentModification { expected, actual })
            }
        }
    }
}
