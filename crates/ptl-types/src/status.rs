use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lifecycle status of a batch record.
///
/// Every batch enters the registry as `Pending`. A regulator decision
/// moves it to exactly one of the four decided states; no transition is
/// defined out of a decided state. The decision is one-shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Awaiting a regulator decision.
    Pending,
    /// Approved for distribution.
    Approved,
    /// Rejected by the regulator.
    Rejected,
    /// Recalled after approval review.
    Recalled,
    /// Blocked pending investigation.
    Blocked,
}

impl BatchStatus {
    /// All defined statuses, in display order.
    pub const ALL: [BatchStatus; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Recalled,
        Self::Blocked,
    ];

    /// Returns `true` once the batch has left `Pending`.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns `true` if moving from `self` to `next` is a legal
    /// transition: only `Pending` may move, and only to a decided state.
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        matches!(self, Self::Pending) && next.is_decided()
    }

    /// The lowercase wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Recalled => "recalled",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "recalled" => Ok(Self::Recalled),
            "blocked" => Ok(Self::Blocked),
            other => Err(TypeError::UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome of a quality test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertResult {
    Pass,
    Fail,
}

impl fmt::Display for CertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Kind of recipient in a distribution entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Hospital,
    Pharmacy,
    Distributor,
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hospital => write!(f, "hospital"),
            Self::Pharmacy => write!(f, "pharmacy"),
            Self::Distributor => write!(f, "distributor"),
        }
    }
}

/// Shipping status of a distribution entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionStatus {
    InTransit,
    Delivered,
    Returned,
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InTransit => write!(f, "in-transit"),
            Self::Delivered => write!(f, "delivered"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn pending_is_the_only_undecided_state() {
        assert!(!BatchStatus::Pending.is_decided());
        assert!(BatchStatus::Approved.is_decided());
        assert!(BatchStatus::Rejected.is_decided());
        assert!(BatchStatus::Recalled.is_decided());
        assert!(BatchStatus::Blocked.is_decided());
    }

    #[test]
    fn pending_transitions_to_every_decided_state() {
        for next in [
            BatchStatus::Approved,
            BatchStatus::Rejected,
            BatchStatus::Recalled,
            BatchStatus::Blocked,
        ] {
            assert!(BatchStatus::Pending.can_transition_to(next));
        }
    }

    #[test]
    fn pending_cannot_transition_to_itself() {
        assert!(!BatchStatus::Pending.can_transition_to(BatchStatus::Pending));
    }

    #[test]
    fn decided_states_are_terminal() {
        for from in BatchStatus::ALL {
            if !from.is_decided() {
                continue;
            }
            for to in BatchStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in BatchStatus::ALL {
            assert_eq!(status.as_str().parse::<BatchStatus>().unwrap(), status);
        }
        assert!(matches!(
            "shipped".parse::<BatchStatus>(),
            Err(TypeError::UnknownStatus(_))
        ));
    }

    #[test]
    fn serde_uses_lowercase_wire_values() {
        assert_eq!(
            serde_json::to_string(&BatchStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&DistributionStatus::InTransit).unwrap(),
            "\"in-transit\""
        );
        assert_eq!(
            serde_json::to_string(&RecipientType::Hospital).unwrap(),
            "\"hospital\""
        );
        assert_eq!(serde_json::to_string(&CertResult::Pass).unwrap(), "\"pass\"");
    }

    fn any_status() -> impl Strategy<Value = BatchStatus> {
        prop::sample::select(BatchStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn transitions_only_leave_pending(from in any_status(), to in any_status()) {
            let allowed = from.can_transition_to(to);
            prop_assert_eq!(
                allowed,
                from == BatchStatus::Pending && to != BatchStatus::Pending
            );
        }
    }
}
