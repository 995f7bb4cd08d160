use async_trait::async_trait;
use startpage_core::{
    Card, CardId, CardInput, CardRepository, Dashboard, DashboardError, NewCard, StorageError,
};
use std::sync::Arc;
use tracing::{debug, error, info};

type Result<T> = std::result::Result<T, DashboardError>;

/// A concrete implementation of the [`Dashboard`] trait.
///
/// This service wraps a [`CardRepository`] to handle:
/// - title/URL normalization and validation
/// - mapping storage failures onto the dashboard error taxonomy
///
/// It never retries. Reorder validation happens inside the repository's
/// transaction so that it sees the same membership the write commits against.
#[derive(Debug)]
pub struct DashboardService<R> {
    repository: Arc<R>,
}

impl<R> Clone for DashboardService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CardRepository> DashboardService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn parse_input(input: &CardInput) -> Result<NewCard> {
        NewCard::parse(&input.title, &input.url).map_err(|e| {
            debug!(error = %e, "card input rejected");
            DashboardError::from(e)
        })
    }
}

/// Converts a [`StorageError`] to a [`DashboardError`], logging faults.
fn storage_to_dashboard_error(e: StorageError) -> DashboardError {
    let mapped = DashboardError::from(e);
    if let DashboardError::Storage(message) = &mapped {
        error!(error = %message, "card storage failure");
    }
    mapped
}

#[async_trait]
impl<R: CardRepository> Dashboard for DashboardService<R> {
    async fn cards(&self) -> Result<Vec<Card>> {
        self.repository
            .list()
            .await
            .map_err(storage_to_dashboard_error)
    }

    async fn create_card(&self, input: CardInput) -> Result<Card> {
        let card = Self::parse_input(&input)?;

        let created = self
            .repository
            .create(card)
            .await
            .map_err(storage_to_dashboard_error)?;

        info!(id = %created.id, title = %created.title, "card created");
        Ok(created)
    }

    async fn update_card(&self, id: CardId, input: CardInput) -> Result<Card> {
        let card = Self::parse_input(&input)?;

        let updated = self
            .repository
            .update(id, card)
            .await
            .map_err(storage_to_dashboard_error)?;

        info!(id = %id, "card updated");
        Ok(updated)
    }

    async fn delete_card(&self, id: CardId) -> Result<bool> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(storage_to_dashboard_error)?;

        if deleted {
            info!(id = %id, "card deleted");
        } else {
            debug!(id = %id, "card already removed");
        }
        Ok(deleted)
    }

    async fn reorder(&self, card_ids: &[CardId]) -> Result<()> {
        self.repository
            .apply_order(card_ids)
            .await
            .map_err(storage_to_dashboard_error)
    }
}
