//! Reply tokens sent from the coordinator back to workers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinator-to-worker reply
///
/// The first three acknowledge an operation the worker asked for. `Killed`
/// carries no acknowledgement semantics: it is the unilateral signal a
/// deadlock victim receives instead of a reply, and the worker must exit
/// on seeing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    RequestConfirmed,
    ReleaseConfirmed,
    TerminationConfirmed,
    Killed,
}

impl Reply {
    /// The wire token for this reply
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Reply::RequestConfirmed => "request confirmed",
            Reply::ReleaseConfirmed => "release confirmed",
            Reply::TerminationConfirmed => "termination confirmed",
            Reply::Killed => "killed",
        }
    }

    /// Whether this reply acknowledges an operation the worker requested
    #[must_use]
    pub fn is_acknowledgement(&self) -> bool {
        !matches!(self, Reply::Killed)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_match_wire_strings() {
        assert_eq!(Reply::RequestConfirmed.as_str(), "request confirmed");
        assert_eq!(Reply::ReleaseConfirmed.as_str(), "release confirmed");
        assert_eq!(
            Reply::TerminationConfirmed.as_str(),
            "termination confirmed"
        );
    }

    #[test]
    fn killed_is_not_an_acknowledgement() {
        assert!(!Reply::Killed.is_acknowledgement());
        assert!(Reply::RequestConfirmed.is_acknowledgement());
    }
}
