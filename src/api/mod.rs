pub mod client;

use crate::error::ApiError;
use crate::models::{ApiStatus, Deck, ExportSelection, GenerationRequest};
use async_trait::async_trait;

pub use client::HttpBackend;

/// What the backend said about a generation request that reached it.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    Generated { deck: Deck, message: Option<String> },
    Rejected { message: String },
}

/// Calls the shell makes against the flash-card backend.
#[async_trait]
pub trait FlashcardApi: Send + Sync {
    /// Banner served at the API root; used as a reachability check.
    async fn banner(&self) -> Result<String, ApiError>;

    async fn test_connectivity(&self, api_key: &str) -> Result<ApiStatus, ApiError>;

    async fn generate_cards(&self, request: &GenerationRequest)
    -> Result<GenerateOutcome, ApiError>;

    async fn list_decks(&self) -> Result<Vec<Deck>, ApiError>;

    async fn fetch_deck(&self, id: &str) -> Result<Deck, ApiError>;

    async fn delete_deck(&self, id: &str) -> Result<(), ApiError>;

    /// Raw export payload, encoded in the requested format.
    async fn export_decks(&self, selection: &ExportSelection) -> Result<Vec<u8>, ApiError>;
}
