use serde::Deserialize;

/// Per-deck statistics returned by the backend's stats endpoint.
///
/// Field names match the wire shape of `GET /api/deck/{id}/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeckStats {
    pub total_cards: u32,
    pub to_learn_count: u32,
    pub learning_count: u32,
    pub mastered_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stats_payload() {
        let json = r#"{
            "total_cards": 40,
            "to_learn_count": 10,
            "learning_count": 25,
            "mastered_count": 5
        }"#;

        let stats: DeckStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_cards, 40);
        assert_eq!(stats.to_learn_count, 10);
        assert_eq!(stats.learning_count, 25);
        assert_eq!(stats.mastered_count, 5);
    }
}
