use crate::error::{map_io_error, map_migrate_error, map_sqlx_error};
use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use startpage_core::error::{Result, StorageError};
use startpage_core::{validate_reorder, Card, CardId, CardRepository, NewCard};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const CARD_COLUMNS: &str = "id, title, url, sort_key, created_at, updated_at";

/// SQLite implementation of the card repository.
///
/// Timestamps are stored as unix milliseconds. `apply_order` opens its
/// transaction with `BEGIN IMMEDIATE`, so the write lock is held from the
/// membership read until commit and no create or delete can land in between.
#[derive(Debug, Clone)]
pub struct SqliteCardRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: i64,
    title: String,
    url: String,
    sort_key: i64,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<CardRow> for Card {
    type Error = StorageError;

    fn try_from(row: CardRow) -> Result<Self> {
        Ok(Card {
            id: CardId::new(row.id),
            title: row.title,
            url: row.url,
            sort_key: row.sort_key,
            created_at: parse_timestamp(row.created_at)?,
            updated_at: parse_timestamp(row.updated_at)?,
        })
    }
}

fn parse_timestamp(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{}': {e}", millis))
    })
}

fn now_unix_millis() -> i64 {
    Timestamp::now().as_millisecond()
}

impl SqliteCardRepository {
    /// Creates a repository from an existing pool. The schema must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file at `path` and applies
    /// pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(map_io_error)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;

        info!(path = %path.display(), "opened sqlite card store");
        Ok(repository)
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(map_migrate_error)
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Waits for open connections to finish and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CardRepository for SqliteCardRepository {
    async fn list(&self) -> Result<Vec<Card>> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY sort_key ASC, title ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Card::try_from).collect()
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>> {
        let row = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = ? LIMIT 1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Card::try_from).transpose()
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        usize::try_from(count)
            .map_err(|e| StorageError::InvalidData(format!("invalid row count {count}: {e}")))
    }

    async fn create(&self, card: NewCard) -> Result<Card> {
        let now = now_unix_millis();

        // The next sort key is computed by the same statement that inserts,
        // so two concurrent creates cannot observe the same maximum.
        let row = sqlx::query_as::<_, CardRow>(&format!(
            r#"
            INSERT INTO cards (title, url, sort_key, created_at, updated_at)
            SELECT ?, ?, COALESCE(MAX(sort_key) + 1, 0), ?, ?
            FROM cards
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card.title())
        .bind(card.url())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let card = Card::try_from(row)?;
        debug!(id = %card.id, sort_key = card.sort_key, "inserted card");
        Ok(card)
    }

    async fn update(&self, id: CardId, card: NewCard) -> Result<Card> {
        let row = sqlx::query_as::<_, CardRow>(&format!(
            r#"
            UPDATE cards
            SET title = ?, url = ?, updated_at = ?
            WHERE id = ?
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card.title())
        .bind(card.url())
        .bind(now_unix_millis())
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Card::try_from(row),
            None => Err(StorageError::NotFound(id)),
        }
    }

    async fn delete(&self, id: CardId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_order(&self, ordered_ids: &[CardId]) -> Result<()> {
        // Dropping `tx` on any early return rolls the whole reorder back.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;

        let current: BTreeSet<CardId> = sqlx::query_scalar::<_, i64>("SELECT id FROM cards")
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(CardId::new)
            .collect();

        if let Err(rejection) = validate_reorder(&current, ordered_ids) {
            warn!(%rejection, cards = current.len(), "rejected reorder");
            return Err(rejection.into());
        }

        let now = now_unix_millis();
        for (index, id) in ordered_ids.iter().enumerate() {
            let sort_key = i64::try_from(index)
                .map_err(|e| StorageError::Operation(format!("sort key overflow: {e}")))?;

            let result = sqlx::query("UPDATE cards SET sort_key = ?, updated_at = ? WHERE id = ?")
                .bind(sort_key)
                .bind(now)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

            if result.rows_affected() != 1 {
                return Err(StorageError::Operation(format!(
                    "card {id} disappeared during reorder"
                )));
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        info!(cards = ordered_ids.len(), "applied card order");
        Ok(())
    }
}
