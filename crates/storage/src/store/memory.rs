use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use super::MetricStore;
use crate::error::{Result, StorageError};
use crate::models::{NewPlayerMetric, PlayerMetric};
use crate::query::{Assignments, Direction, Filter, Order, Page};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<PlayerMetric>,
    next_id: i32,
}

/// In-process store holding rows in insertion order.
///
/// Ids are assigned sequentially starting at 1. Every primitive call is
/// counted, which lets tests assert that a guard skipped the store entirely.
#[derive(Debug, Default)]
pub struct MemoryMetricStore {
    table: Mutex<Table>,
    calls: AtomicUsize,
    unique_keys: bool,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject a second row for the same `(player_uuid, papi)`, the way the
    /// PostgreSQL unique index does.
    pub fn with_unique_keys() -> Self {
        Self {
            unique_keys: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn sort_rows(rows: &mut [PlayerMetric], order: Option<Order>) {
    let Some(order) = order else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = a
            .field_value(order.field)
            .partial_cmp(&b.field_value(order.field))
            .unwrap_or(CmpOrdering::Equal);
        match order.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    async fn select_one(&self, filter: &Filter) -> Result<Option<PlayerMetric>> {
        self.record_call();
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn select_list(
        &self,
        filter: &Filter,
        order: Option<Order>,
    ) -> Result<Vec<PlayerMetric>> {
        self.record_call();
        let table = self.table.lock().await;
        let mut rows: Vec<PlayerMetric> = table
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_rows(&mut rows, order);
        Ok(rows)
    }

    async fn select_page(
        &self,
        filter: &Filter,
        order: Option<Order>,
        page: Page,
    ) -> Result<Vec<PlayerMetric>> {
        self.record_call();
        let table = self.table.lock().await;
        let mut rows: Vec<PlayerMetric> = table
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_rows(&mut rows, order);

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(
        &self,
        record: &NewPlayerMetric,
        create_time: NaiveDateTime,
    ) -> Result<PlayerMetric> {
        self.record_call();
        let mut table = self.table.lock().await;

        if self.unique_keys
            && table
                .rows
                .iter()
                .any(|r| r.player_uuid == record.player_uuid && r.papi == record.papi)
        {
            return Err(StorageError::ConstraintViolation(format!(
                "duplicate key (player_uuid, papi) = ({}, {})",
                record.player_uuid, record.papi
            )));
        }

        table.next_id += 1;
        let row = PlayerMetric {
            id: table.next_id,
            player_uuid: record.player_uuid.clone(),
            player_name: record.player_name.clone(),
            papi: record.papi.clone(),
            vault: record.vault,
            rank: record.rank,
            create_time: Some(create_time),
            update_time: None,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn update_where(&self, assignments: &Assignments, filter: &Filter) -> Result<u64> {
        self.record_call();
        let mut table = self.table.lock().await;
        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|r| filter.matches(r)) {
            assignments.apply(row);
            affected += 1;
        }
        Ok(affected)
    }

    async fn update_by_id(&self, assignments: &Assignments, id: i32) -> Result<u64> {
        self.record_call();
        let mut table = self.table.lock().await;
        match table.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                assignments.apply(row);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_where(&self, filter: &Filter) -> Result<u64> {
        self.record_call();
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|r| !filter.matches(r));
        Ok((before - table.rows.len()) as u64)
    }

    async fn count_where(&self, filter: &Filter) -> Result<u64> {
        self.record_call();
        let table = self.table.lock().await;
        Ok(table.rows.iter().filter(|r| filter.matches(r)).count() as u64)
    }
}
