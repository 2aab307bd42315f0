use serde::{Deserialize, Serialize};

use crate::model::ids::CardId;

/// A single flashcard as served by the backend.
///
/// The client holds a transient copy for the duration of a learning session;
/// the backend remains the owner of record. Extra wire fields such as
/// `deck_id`, `interval` and `due_date` are scheduling details the client
/// never interprets and are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape_with_extra_fields() {
        let json = r#"{
            "id": "c-17",
            "question": "2+2",
            "answer": "4",
            "deck_id": "d-1",
            "interval": 3,
            "due_date": "2024-07-01T00:00:00"
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId::new("c-17"));
        assert_eq!(card.question, "2+2");
        assert_eq!(card.answer, "4");
    }

    #[test]
    fn deserializes_integer_id() {
        let json = r#"{"id": 5, "question": "q", "answer": "a"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId::new("5"));
    }
}
