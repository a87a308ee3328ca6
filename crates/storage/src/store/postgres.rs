use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::MetricStore;
use crate::error::Result;
use crate::models::{NewPlayerMetric, PlayerMetric};
use crate::query::{Assignments, Condition, Filter, Order, Page, Value};

const TABLE: &str = "top_papi_player";
const COLUMNS: &str =
    "id, player_uuid, player_name, papi, vault, rank, create_time, update_time";

#[derive(Debug, Clone)]
pub struct PgMetricStore {
    pool: PgPool,
}

impl PgMetricStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_value(query: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Int(v) => {
            query.push_bind(*v);
        }
        Value::BigInt(v) => {
            query.push_bind(*v);
        }
        Value::Text(v) => {
            query.push_bind(v.clone());
        }
        Value::Timestamp(v) => {
            query.push_bind(*v);
        }
        Value::Null => {
            query.push("NULL");
        }
    }
}

fn push_where(query: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    query.push(" WHERE 1=1");

    for condition in filter.conditions() {
        match condition {
            Condition::Eq(field, Value::Null) => {
                query.push(" AND ");
                query.push(field.as_column());
                query.push(" IS NULL");
            }
            Condition::Eq(field, value) => {
                query.push(" AND ");
                query.push(field.as_column());
                query.push(" = ");
                push_value(query, value);
            }
            // `IN ()` is a syntax error in PostgreSQL; an empty set matches nothing.
            Condition::In(_, values) if values.is_empty() => {
                query.push(" AND FALSE");
            }
            Condition::In(field, values) => {
                query.push(" AND ");
                query.push(field.as_column());
                query.push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        query.push(", ");
                    }
                    push_value(query, value);
                }
                query.push(")");
            }
        }
    }
}

fn push_order(query: &mut QueryBuilder<'_, Postgres>, order: Option<Order>) {
    if let Some(order) = order {
        query.push(" ORDER BY ");
        query.push(order.field.as_column());
        query.push(" ");
        query.push(order.direction.as_sql());
        // Deterministic pages when the sort key ties.
        query.push(", id ASC");
    }
}

fn push_set(query: &mut QueryBuilder<'_, Postgres>, assignments: &Assignments) {
    query.push(" SET ");
    for (i, (field, value)) in assignments.values().iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        query.push(field.as_column());
        query.push(" = ");
        push_value(query, value);
    }
}

fn select_query(filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {TABLE}"));
    push_where(&mut query, filter);
    query
}

#[async_trait]
impl MetricStore for PgMetricStore {
    async fn select_one(&self, filter: &Filter) -> Result<Option<PlayerMetric>> {
        let mut query = select_query(filter);
        query.push(" LIMIT 1");

        let row = query
            .build_query_as::<PlayerMetric>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn select_list(
        &self,
        filter: &Filter,
        order: Option<Order>,
    ) -> Result<Vec<PlayerMetric>> {
        let mut query = select_query(filter);
        push_order(&mut query, order);

        let rows = query
            .build_query_as::<PlayerMetric>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn select_page(
        &self,
        filter: &Filter,
        order: Option<Order>,
        page: Page,
    ) -> Result<Vec<PlayerMetric>> {
        let mut query = select_query(filter);
        push_order(&mut query, order);
        query.push(" LIMIT ");
        query.push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX));
        query.push(" OFFSET ");
        query.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = query
            .build_query_as::<PlayerMetric>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn insert(
        &self,
        record: &NewPlayerMetric,
        create_time: NaiveDateTime,
    ) -> Result<PlayerMetric> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {TABLE} \
             (player_uuid, player_name, papi, vault, rank, create_time) VALUES ("
        ));
        {
            let mut values = query.separated(", ");
            values.push_bind(record.player_uuid.clone());
            values.push_bind(record.player_name.clone());
            values.push_bind(record.papi.clone());
            values.push_bind(record.vault);
            values.push_bind(record.rank);
            values.push_bind(create_time);
        }
        query.push(format!(") RETURNING {COLUMNS}"));

        let row = query
            .build_query_as::<PlayerMetric>()
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update_where(&self, assignments: &Assignments, filter: &Filter) -> Result<u64> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE {TABLE}"));
        push_set(&mut query, assignments);
        push_where(&mut query, filter);

        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn update_by_id(&self, assignments: &Assignments, id: i32) -> Result<u64> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE {TABLE}"));
        push_set(&mut query, assignments);
        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn delete_where(&self, filter: &Filter) -> Result<u64> {
        let mut query = QueryBuilder::<Postgres>::new(format!("DELETE FROM {TABLE}"));
        push_where(&mut query, filter);

        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn count_where(&self, filter: &Filter) -> Result<u64> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE}"));
        push_where(&mut query, filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
