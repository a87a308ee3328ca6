//! Statement execution seam between the repository and a concrete backend.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::models::{NewPlayerMetric, PlayerMetric};
use crate::query::{Assignments, Filter, Order, Page};

mod memory;
mod postgres;

pub use memory::MemoryMetricStore;
pub use postgres::PgMetricStore;

/// The primitives a backend must offer for `top_papi_player`.
///
/// Every call is a single statement. Errors are passed through as-is.
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn select_one(&self, filter: &Filter) -> Result<Option<PlayerMetric>>;

    async fn select_list(
        &self,
        filter: &Filter,
        order: Option<Order>,
    ) -> Result<Vec<PlayerMetric>>;

    async fn select_page(
        &self,
        filter: &Filter,
        order: Option<Order>,
        page: Page,
    ) -> Result<Vec<PlayerMetric>>;

    /// Insert a row and return it with the id the store assigned
    async fn insert(
        &self,
        record: &NewPlayerMetric,
        create_time: NaiveDateTime,
    ) -> Result<PlayerMetric>;

    async fn update_where(&self, assignments: &Assignments, filter: &Filter) -> Result<u64>;

    async fn update_by_id(&self, assignments: &Assignments, id: i32) -> Result<u64>;

    async fn delete_where(&self, filter: &Filter) -> Result<u64>;

    async fn count_where(&self, filter: &Filter) -> Result<u64>;
}
