use super::{FlashcardApi, GenerateOutcome};
use crate::error::ApiError;
use crate::models::{ApiStatus, Deck, ExportSelection, GenerationRequest};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const API_PREFIX: &str = "api";

#[derive(Debug, Serialize)]
struct TestConnectivityBody<'a> {
    api_key: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateCardsBody<'a> {
    topic: &'a str,
    language: &'a str,
    count: u32,
    sutra_api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateCardsResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    deck: Option<Deck>,
}

#[derive(Debug, Serialize)]
struct ExportBody<'a> {
    deck_ids: &'a [String],
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct BannerResponse {
    message: String,
}

/// `FlashcardApi` over HTTP. No retries and no timeout beyond reqwest's
/// defaults.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(backend_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(backend_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", backend_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(backend_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// `<backend>/api/<segments...>`, with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().push(API_PREFIX);
            if segments.is_empty() {
                path.push("");
            } else {
                path.extend(segments);
            }
        }
        Ok(url)
    }

    async fn checked(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let resp = Self::checked(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn network(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

#[async_trait]
impl FlashcardApi for HttpBackend {
    async fn banner(&self) -> Result<String, ApiError> {
        let url = self.endpoint(&[])?;
        let resp = self.client.get(url).send().await.map_err(network)?;
        let banner: BannerResponse = Self::read_json(resp).await?;
        Ok(banner.message)
    }

    async fn test_connectivity(&self, api_key: &str) -> Result<ApiStatus, ApiError> {
        let url = self.endpoint(&["test-sutra"])?;
        let resp = self
            .client
            .post(url)
            .json(&TestConnectivityBody { api_key })
            .send()
            .await
            .map_err(network)?;
        Self::read_json(resp).await
    }

    async fn generate_cards(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateOutcome, ApiError> {
        let url = self.endpoint(&["generate-cards"])?;
        let body = GenerateCardsBody {
            topic: &request.topic,
            language: request.language.code(),
            count: request.count,
            sutra_api_key: &request.credential,
        };
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(network)?;
        let parsed: GenerateCardsResponse = Self::read_json(resp).await?;
        Ok(interpret_generation(parsed))
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, ApiError> {
        let url = self.endpoint(&["decks"])?;
        let resp = self.client.get(url).send().await.map_err(network)?;
        Self::read_json(resp).await
    }

    async fn fetch_deck(&self, id: &str) -> Result<Deck, ApiError> {
        let url = self.endpoint(&["decks", id])?;
        let resp = self.client.get(url).send().await.map_err(network)?;
        Self::read_json(resp).await
    }

    async fn delete_deck(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["decks", id])?;
        let resp = self.client.delete(url).send().await.map_err(network)?;
        Self::checked(resp).await?;
        Ok(())
    }

    async fn export_decks(&self, selection: &ExportSelection) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["export"])?;
        let body = ExportBody {
            deck_ids: &selection.deck_ids,
            format: selection.format.as_str(),
        };
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(network)?;
        let resp = Self::checked(resp).await?;
        let bytes = resp.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }
}

fn interpret_generation(parsed: GenerateCardsResponse) -> GenerateOutcome {
    match (parsed.success, parsed.deck) {
        (true, Some(deck)) => GenerateOutcome::Generated {
            deck,
            message: parsed.message,
        },
        (true, None) => GenerateOutcome::Rejected {
            message: parsed
                .message
                .unwrap_or_else(|| "Backend returned no deck".to_string()),
        },
        (false, _) => GenerateOutcome::Rejected {
            message: parsed
                .message
                .unwrap_or_else(|| "Failed to generate flash cards".to_string()),
        },
    }
}
