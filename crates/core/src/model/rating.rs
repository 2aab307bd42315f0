use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when parsing a rating.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("invalid rating value: {0}")]
    Invalid(String),
}

//
// ─── RATING ───────────────────────────────────────────────────────────────────
//

/// Three-level self-assessment of recall for a reviewed card.
///
/// The backend uses the rating to reschedule the card; the client uses it to
/// decide whether the card is done for this session:
/// - `Again`: failed to recall, the card cycles back into the session queue
/// - `Good`: recalled correctly, the card is done for this session
/// - `Easy`: recalled instantly, the card is done for this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Good,
    Easy,
}

impl Rating {
    /// The wire name for this rating, as the answer endpoint expects it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    /// Returns true when this rating resolves the card for the session.
    ///
    /// `Again` keeps the card in play; `Good` and `Easy` retire it.
    #[must_use]
    pub fn resolves_card(self) -> bool {
        !matches!(self, Rating::Again)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Rating::Again),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            other => Err(RatingError::Invalid(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for rating in [Rating::Again, Rating::Good, Rating::Easy] {
            let parsed: Rating = rating.as_str().parse().unwrap();
            assert_eq!(parsed, rating);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "hard".parse::<Rating>().unwrap_err();
        assert!(matches!(err, RatingError::Invalid(v) if v == "hard"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rating::Again).unwrap(), r#""again""#);
        assert_eq!(serde_json::to_string(&Rating::Easy).unwrap(), r#""easy""#);
    }

    #[test]
    fn only_again_keeps_the_card() {
        assert!(!Rating::Again.resolves_card());
        assert!(Rating::Good.resolves_card());
        assert!(Rating::Easy.resolves_card());
    }
}
