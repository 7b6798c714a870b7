//! Tagged outcome for computations that can legitimately produce nothing.

use serde::{Deserialize, Serialize};

/// Result of an analytics computation that may be unavailable or fail.
///
/// - `Ready`: the value was computed
/// - `Unavailable`: the inputs needed do not exist (no history, no returns)
/// - `Failed`: inputs existed but the computation did not succeed (solver
///   non-convergence, infeasible constraint)
///
/// Neither of the last two is an error in the `Result` sense; callers are
/// expected to branch on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The computed value.
    Ready {
        /// The value.
        value: T,
    },
    /// Required data was missing.
    Unavailable {
        /// What was missing.
        reason: String,
    },
    /// The computation ran and failed.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

impl<T> Outcome<T> {
    /// Wraps a computed value.
    pub fn ready(value: T) -> Self {
        Self::Ready { value }
    }

    /// Creates an unavailable outcome.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a failed outcome.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// True when a value is present.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Borrow the value, if any.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready { value } => Some(value),
            _ => None,
        }
    }

    /// Take the value, if any.
    pub fn into_ready(self) -> Option<T> {
        match self {
            Self::Ready { value } => Some(value),
            _ => None,
        }
    }

    /// Reason for a missing value.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready { .. } => None,
            Self::Unavailable { reason } | Self::Failed { reason } => Some(reason),
        }
    }

    /// Maps the value, keeping the tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ready { value } => Outcome::Ready { value: f(value) },
            Self::Unavailable { reason } => Outcome::Unavailable { reason },
            Self::Failed { reason } => Outcome::Failed { reason },
        }
    }

    /// Chains another fallible computation.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Ready { value } => f(value),
            Self::Unavailable { reason } => Outcome::Unavailable { reason },
            Self::Failed { reason } => Outcome::Failed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ready = Outcome::ready(3);
        assert!(ready.is_ready());
        assert_eq!(ready.as_ready(), Some(&3));
        assert_eq!(ready.map(|v| v * 2).into_ready(), Some(6));

        let missing: Outcome<i32> = Outcome::unavailable("no history");
        assert_eq!(missing.reason(), Some("no history"));
        assert!(missing.and_then(|v| Outcome::ready(v + 1)).as_ready().is_none());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(Outcome::ready(1.5)).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["value"], 1.5);

        let json = serde_json::to_value(Outcome::<f64>::failed("did not converge")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "did not converge");
    }
}
