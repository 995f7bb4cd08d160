use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use startpage_core::CardId;
use tracing::debug;

use crate::error::ClientError;

type Result<T> = std::result::Result<T, ClientError>;

/// Header the gateway checks on every mutating request.
pub const REQUEST_TOKEN_HEADER: &str = "x-request-token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where submitted orders go and where the authoritative order comes from.
#[async_trait]
pub trait ReorderTransport: Send + Sync {
    /// Persists `order`. Any error means the server did not accept it.
    async fn submit(&self, order: &[CardId]) -> Result<()>;

    /// The server's current order.
    async fn fetch_order(&self) -> Result<Vec<CardId>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    card_ids: &'a [CardId],
}

#[derive(Deserialize)]
struct ReorderReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ListedCard {
    id: CardId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardList {
    cards: Vec<ListedCard>,
    request_token: String,
}

/// [`ReorderTransport`] over the gateway's JSON API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
    request_token: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, request_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            request_token: request_token.into(),
        })
    }

    /// Builds a transport using the request token advertised by `GET /cards`.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self> {
        let mut transport = Self::new(base_url, String::new())?;
        let list = transport.list().await?;
        transport.request_token = list.request_token;
        Ok(transport)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list(&self) -> Result<CardList> {
        let response = self.http.get(self.url("/cards")).send().await?;
        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ReorderReply>(&body)
        .ok()
        .and_then(|reply| reply.error)
        .unwrap_or_else(|| body.chars().take(200).collect());
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ReorderTransport for HttpTransport {
    async fn submit(&self, order: &[CardId]) -> Result<()> {
        debug!(count = order.len(), "submitting card order");
        let response = self
            .http
            .post(self.url("/cards/reorder"))
            .header(REQUEST_TOKEN_HEADER, &self.request_token)
            .json(&ReorderBody { card_ids: order })
            .send()
            .await?;
        let reply: ReorderReply = error_for_status(response).await?.json().await?;

        if !reply.success {
            return Err(ClientError::Rejected(
                reply.error.unwrap_or_else(|| "success flag not set".to_string()),
            ));
        }
        Ok(())
    }

    async fn fetch_order(&self) -> Result<Vec<CardId>> {
        let list = self.list().await?;
        Ok(list.cards.into_iter().map(|card| card.id).collect())
    }
}
