use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use startpage_core::error::{Result, StorageError};
use startpage_core::{validate_reorder, Card, CardId, CardRepository, NewCard};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, warn};

/// In-memory implementation of the card repository.
///
/// Ids come from a monotonically increasing counter and are never reused.
/// Multi-row operations run under a single write guard, which plays the role
/// of the storage engine's transaction. Nothing survives a restart; use
/// [`SqliteCardRepository`](crate::SqliteCardRepository) when durability matters.
#[derive(Debug)]
pub struct InMemoryCardRepository {
    cards: RwLock<BTreeMap<CardId, Card>>,
    next_id: AtomicI64,
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryCardRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn display_order(a: &Card, b: &Card) -> std::cmp::Ordering {
    a.sort_key
        .cmp(&b.sort_key)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn list(&self) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self.cards.read().values().cloned().collect();
        cards.sort_by(display_order);
        Ok(cards)
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>> {
        Ok(self.cards.read().get(&id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.cards.read().len())
    }

    async fn create(&self, card: NewCard) -> Result<Card> {
        let now = Timestamp::now();
        let mut cards = self.cards.write();

        let sort_key = cards
            .values()
            .map(|c| c.sort_key)
            .max()
            .map_or(0, |max| max + 1);
        let id = CardId::new(self.next_id.fetch_add(1, Ordering::SeqCst));

        let card = Card {
            id,
            title: card.title().to_owned(),
            url: card.url().to_owned(),
            sort_key,
            created_at: now,
            updated_at: now,
        };
        cards.insert(id, card.clone());

        debug!(id = %id, sort_key, "inserted card");
        Ok(card)
    }

    async fn update(&self, id: CardId, card: NewCard) -> Result<Card> {
        let mut cards = self.cards.write();
        let Some(existing) = cards.get_mut(&id) else {
            return Err(StorageError::NotFound(id));
        };

        existing.title = card.title().to_owned();
        existing.url = card.url().to_owned();
        existing.updated_at = Timestamp::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: CardId) -> Result<bool> {
        Ok(self.cards.write().remove(&id).is_some())
    }

    async fn apply_order(&self, ordered_ids: &[CardId]) -> Result<()> {
        let mut cards = self.cards.write();

        let current: BTreeSet<CardId> = cards.keys().copied().collect();
        if let Err(rejection) = validate_reorder(&current, ordered_ids) {
            warn!(%rejection, cards = current.len(), "rejected reorder");
            return Err(rejection.into());
        }

        let now = Timestamp::now();
        for (sort_key, id) in (0_i64..).zip(ordered_ids) {
            // validated above: every id is present
            if let Some(card) = cards.get_mut(id) {
                card.sort_key = sort_key;
                card.updated_at = now;
            }
        }

        Ok(())
    }
}
