use crate::card::{Card, CardId, NewCard};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence contract for cards; the sole source of truth for ordering.
///
/// `create`, `update` and `delete` only need single-row atomicity.
/// [`apply_order`](CardRepository::apply_order) must read the current
/// membership and write the new sort keys inside one transaction.
#[async_trait]
pub trait CardRepository: Send + Sync + 'static {
    /// Returns all cards ordered by `sort_key`, then `title`, then `id`.
    async fn list(&self) -> Result<Vec<Card>>;

    /// Retrieves a single card. Returns `None` if it does not exist.
    async fn get(&self, id: CardId) -> Result<Option<Card>>;

    /// Number of stored cards.
    async fn count(&self) -> Result<usize>;

    /// Inserts a card with the next sort key (`max + 1`, or 0 when empty).
    async fn create(&self, card: NewCard) -> Result<Card>;

    /// Replaces title and URL. Returns `Err(NotFound)` if the card is gone.
    async fn update(&self, id: CardId, card: NewCard) -> Result<Card>;

    /// Deletes a card without renumbering the rest.
    /// Returns `true` if the card existed and was removed.
    async fn delete(&self, id: CardId) -> Result<bool>;

    /// Rewrites sort keys so that `ordered_ids[i]` gets sort key `i`.
    ///
    /// Returns `Err(Reorder(_))` and leaves every row untouched unless
    /// `ordered_ids` is a permutation of the stored ids.
    async fn apply_order(&self, ordered_ids: &[CardId]) -> Result<()>;
}
