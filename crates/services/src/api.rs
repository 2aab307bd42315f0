use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use flashdeck_core::model::{Card, CardId, DeckId, DeckStats, Rating};

use crate::error::ApiError;

//
// ─── BACKEND TRAIT ─────────────────────────────────────────────────────────────
//

/// The backend REST surface the learning workflow depends on.
///
/// The HTTP implementation talks to the flashcard server; tests swap in an
/// in-memory fake.
#[async_trait]
pub trait LearnBackend: Send + Sync {
    /// Cards currently due for the deck, in server order.
    async fn fetch_due_cards(&self, deck_id: &DeckId) -> Result<Vec<Card>, ApiError>;

    /// Persist one rating for a card. The response body is ignored.
    async fn submit_rating(&self, card_id: &CardId, rating: Rating) -> Result<(), ApiError>;

    /// Current statistics for the deck.
    async fn fetch_deck_stats(&self, deck_id: &DeckId) -> Result<DeckStats, ApiError>;
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct LearnDataResponse {
    learn_queue: Vec<Card>,
}

#[derive(Debug, Serialize)]
struct AnswerRequest {
    rating: Rating,
}

// Error payload the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

//
// ─── HTTP BACKEND ──────────────────────────────────────────────────────────────
//

/// Connection settings for the HTTP backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the base URL from `FLASHDECK_BASE_URL`, falling back to a local
    /// development server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("FLASHDECK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into());
        Self { base_url }
    }
}

/// `LearnBackend` over HTTP/1.1 + JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response to an error, decoding the server's
    /// `{ "error": msg }` payload when one is present.
    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match response.bytes().await {
            Ok(body) => match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(parsed) => ApiError::Backend {
                    status,
                    message: parsed.error,
                },
                Err(_) => ApiError::HttpStatus(status),
            },
            Err(_) => ApiError::HttpStatus(status),
        }
    }
}

#[async_trait]
impl LearnBackend for HttpBackend {
    async fn fetch_due_cards(&self, deck_id: &DeckId) -> Result<Vec<Card>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/learn/data"))
            .query(&[("deck_id", deck_id.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: LearnDataResponse = response.json().await?;
        Ok(body.learn_queue)
    }

    async fn submit_rating(&self, card_id: &CardId, rating: Rating) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/learn/cards/{card_id}/answer")))
            .json(&AnswerRequest { rating })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }

    async fn fetch_deck_stats(&self, deck_id: &DeckId) -> Result<DeckStats, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/deck/{deck_id}/stats")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(response.json().await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
