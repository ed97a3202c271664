//! Postgres-backed profile store.
//!
//! Self-hosted alternative to Firestore: one `profiles` row per uid holding
//! the profile document as JSONB. Writes are whole-document upserts, the
//! same last-write-wins contract as the hosted store.

use serde_json::Value;
use sqlx::{PgPool, Row};

use super::profile_store::{Profile, ProfileStore, StoreError};

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PgProfileStore {
    async fn read_document(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query("SELECT document FROM profiles WHERE uid = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let document: Value = row.try_get("document")?;
        Profile::from_document(document).map(Some)
    }

    async fn write_document(&self, id: &str, profile: &Profile) -> Result<(), StoreError> {
        let document = profile.to_document()?;
        sqlx::query(
            r"INSERT INTO profiles (uid, document)
              VALUES ($1, $2)
              ON CONFLICT (uid) DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
        )
        .bind(id)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "pg_store_test.rs"]
mod tests;
