//! SessionStatus enum for tracking lifecycle of negotiation sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StateMachine;

/// Lifecycle status of a negotiation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
    /// Terminal alternative; no in-scope command produces it.
    Cancelled,
}

impl SessionStatus {
    /// Returns true if offers may still be submitted and processed.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::Active => vec![SessionStatus::Completed, SessionStatus::Cancelled],
            SessionStatus::Completed | SessionStatus::Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn only_active_is_active() {
        assert!(SessionStatus::Active.is_active());
        assert!(!SessionStatus::Completed.is_active());
        assert!(!SessionStatus::Cancelled.is_active());
    }

    #[test]
    fn active_can_complete_or_cancel() {
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(&SessionStatus::Cancelled));
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
        assert!(!SessionStatus::Active.is_terminal());
    }

    #[test]
    fn terminal_states_do_not_transition() {
        for from in [SessionStatus::Completed, SessionStatus::Cancelled] {
            for to in [
                SessionStatus::Active,
                SessionStatus::Completed,
                SessionStatus::Cancelled,
            ] {
                assert!(!from.can_transition_to(&to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn round_trips_through_storage_string() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("archived".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
