use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{NewPlayerMetric, PlayerMetric};
use crate::query::{Assignments, Filter, Order, Page, columns};
use crate::repository::key_lock::KeyLocks;
use crate::store::MetricStore;

/// Gateway to the `top_papi_player` table.
///
/// Cheap to clone. Clones share the store and the per-key locks.
#[derive(Clone)]
pub struct PlayerMetricRepository {
    store: Arc<dyn MetricStore>,
    locks: KeyLocks,
}

impl PlayerMetricRepository {
    pub fn new(store: Arc<dyn MetricStore>) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
        }
    }

    /// One page of a leaderboard, ascending by rank
    pub async fn page(
        &self,
        papi: &str,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<PlayerMetric>> {
        let filter = Filter::new().eq(columns::Papi, papi);

        self.store
            .select_page(
                &filter,
                Some(Order::asc(columns::Rank)),
                Page::new(page_num, page_size),
            )
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PlayerMetric>> {
        let filter = Filter::new().eq(columns::Id, id);

        self.store.select_one(&filter).await
    }

    pub async fn find_by_player_and_metric(
        &self,
        player_uuid: &str,
        papi: &str,
    ) -> Result<Option<PlayerMetric>> {
        let filter = Filter::new()
            .eq(columns::PlayerUuid, player_uuid)
            .eq(columns::Papi, papi);

        self.store.select_one(&filter).await
    }

    pub async fn find_by_rank(&self, rank: i32, papi: &str) -> Result<Option<PlayerMetric>> {
        let filter = Filter::new()
            .eq(columns::Rank, rank)
            .eq(columns::Papi, papi);

        self.store.select_one(&filter).await
    }

    /// Insert the record, or update only its value if the player already
    /// has a row for this papi.
    ///
    /// A new row keeps the caller's `rank`. An existing row keeps its rank,
    /// name, and creation time.
    pub async fn set_vault(&self, record: &NewPlayerMetric) -> Result<()> {
        let _guard = self.locks.lock(&record.player_uuid, &record.papi).await;

        let existing = self
            .find_by_player_and_metric(&record.player_uuid, &record.papi)
            .await?;

        if existing.is_none() {
            match self.store.insert(record, Utc::now().naive_utc()).await {
                Ok(inserted) => {
                    tracing::debug!(
                        id = inserted.id,
                        player_uuid = %record.player_uuid,
                        papi = %record.papi,
                        "Inserted player metric"
                    );
                    return Ok(());
                }
                // Another process inserted the key between our read and write.
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(
                        player_uuid = %record.player_uuid,
                        papi = %record.papi,
                        "Insert lost a race, updating instead"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        self.update_vault(record).await
    }

    async fn update_vault(&self, record: &NewPlayerMetric) -> Result<()> {
        let assignments = Assignments::new()
            .set(columns::Vault, record.vault)
            .set(columns::UpdateTime, Utc::now().naive_utc());
        let filter = Filter::new()
            .eq(columns::Papi, record.papi.as_str())
            .eq(columns::PlayerUuid, record.player_uuid.as_str());

        let affected = self.store.update_where(&assignments, &filter).await?;
        tracing::debug!(
            affected,
            player_uuid = %record.player_uuid,
            papi = %record.papi,
            "Updated player metric value"
        );

        Ok(())
    }

    /// Set the rank of one row. Unknown ids are ignored.
    pub async fn update_rank(&self, id: i32, rank: i32) -> Result<()> {
        let assignments = Assignments::new()
            .set(columns::Rank, rank)
            .set(columns::UpdateTime, Utc::now().naive_utc());

        self.store.update_by_id(&assignments, id).await?;

        Ok(())
    }

    pub async fn find_all_by_metric(&self, papi: &str) -> Result<Vec<PlayerMetric>> {
        let filter = Filter::new().eq(columns::Papi, papi);

        self.store.select_list(&filter, None).await
    }

    /// Delete the named players from one leaderboard. An empty list deletes
    /// nothing and never reaches the store.
    pub async fn delete_by_names_and_metric(&self, names: &[String], papi: &str) -> Result<u64> {
        if names.is_empty() {
            return Ok(0);
        }

        let filter = Filter::new()
            .is_in(columns::PlayerName, names.iter().cloned())
            .eq(columns::Papi, papi);

        self.store.delete_where(&filter).await
    }

    pub async fn delete_by_values_and_metric(&self, values: &[i64], papi: &str) -> Result<u64> {
        if values.is_empty() {
            return Ok(0);
        }

        let filter = Filter::new()
            .is_in(columns::Vault, values.iter().copied())
            .eq(columns::Papi, papi);

        self.store.delete_where(&filter).await
    }

    /// Delete a whole leaderboard, returning how many rows went away
    pub async fn delete_by_metric(&self, papi: &str) -> Result<u64> {
        let filter = Filter::new().eq(columns::Papi, papi);

        self.store.delete_where(&filter).await
    }

    pub async fn count_by_metric(&self, papi: &str) -> Result<u64> {
        let filter = Filter::new().eq(columns::Papi, papi);

        self.store.count_where(&filter).await
    }
}
