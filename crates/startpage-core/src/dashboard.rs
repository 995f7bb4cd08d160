use crate::card::{Card, CardId};
use crate::error::DashboardError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, DashboardError>;

/// Raw, unvalidated title and URL as submitted by a form or JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl CardInput {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
pub trait Dashboard: Send + Sync + 'static {
    /// All cards in display order.
    async fn cards(&self) -> Result<Vec<Card>>;

    /// Validates the input and appends a new card.
    async fn create_card(&self, input: CardInput) -> Result<Card>;

    /// Validates the input and edits an existing card in place.
    async fn update_card(&self, id: CardId, input: CardInput) -> Result<Card>;

    /// Deletes a card. Returns `false` if it was already gone.
    async fn delete_card(&self, id: CardId) -> Result<bool>;

    /// Replaces the whole order. `card_ids` must list every card exactly once.
    async fn reorder(&self, card_ids: &[CardId]) -> Result<()>;
}
