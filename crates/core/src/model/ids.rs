use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// The backend serves ids as either JSON strings or integers, so
// deserialization accepts both and normalizes to a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Unique identifier for a Card
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Creates a new `CardId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Deck
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeckId(String);

impl DeckId {
    /// Creates a new `DeckId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
    }
}

impl<'de> Deserialize<'de> for DeckId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
    }
}

impl fmt::Debug for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardId({})", self.0)
    }
}

impl fmt::Debug for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an ID from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be empty", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for CardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseIdError { kind: "CardId" });
        }
        Ok(CardId::new(s))
    }
}

impl FromStr for DeckId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseIdError { kind: "DeckId" });
        }
        Ok(DeckId::new(s))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_display() {
        let id = CardId::new("abc-42");
        assert_eq!(id.to_string(), "abc-42");
    }

    #[test]
    fn card_id_from_str() {
        let id: CardId = "123".parse().unwrap();
        assert_eq!(id, CardId::new("123"));
    }

    #[test]
    fn card_id_from_str_empty_is_invalid() {
        let result = "   ".parse::<CardId>();
        assert!(result.is_err());
    }

    #[test]
    fn card_id_deserializes_from_string() {
        let id: CardId = serde_json::from_str(r#""a1b2""#).unwrap();
        assert_eq!(id, CardId::new("a1b2"));
    }

    #[test]
    fn card_id_deserializes_from_integer() {
        let id: CardId = serde_json::from_str("7").unwrap();
        assert_eq!(id, CardId::new("7"));
    }

    #[test]
    fn card_id_serializes_as_plain_string() {
        let id = CardId::new("x9");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""x9""#);
    }

    #[test]
    fn deck_id_display_and_parse() {
        let id: DeckId = "deck-1".parse().unwrap();
        assert_eq!(id.to_string(), "deck-1");
        assert_eq!(id.as_str(), "deck-1");
    }

    #[test]
    fn deck_id_deserializes_from_integer() {
        let id: DeckId = serde_json::from_str("99").unwrap();
        assert_eq!(id, DeckId::new("99"));
    }
}
