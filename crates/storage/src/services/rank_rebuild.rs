use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::models::PlayerMetric;
use crate::repository::player_metric::PlayerMetricRepository;

#[derive(Debug, Clone, Default)]
pub struct RebuildOptions {
    /// Rank the lowest value first instead of the highest
    pub ascending: bool,
    /// Players that must not appear on the leaderboard
    pub excluded_names: Vec<String>,
    /// Values that must not appear on the leaderboard
    pub excluded_values: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RebuildSummary {
    pub removed: u64,
    pub ranked: u64,
    pub changed: u64,
}

/// Purge excluded rows for `papi`, then assign dense ranks from 1 by value.
///
/// Ties are broken by player name and then by id, so repeated runs over the
/// same data produce the same ranks. Rows whose rank is already correct are
/// not written.
pub async fn rebuild_ranks(
    repo: &PlayerMetricRepository,
    papi: &str,
    options: &RebuildOptions,
) -> Result<RebuildSummary> {
    let by_name = repo
        .delete_by_names_and_metric(&options.excluded_names, papi)
        .await?;
    let by_value = repo
        .delete_by_values_and_metric(&options.excluded_values, papi)
        .await?;

    let mut rows = repo.find_all_by_metric(papi).await?;
    sort_for_ranking(&mut rows, options.ascending);

    let mut changed = 0u64;
    for (position, row) in rows.iter().enumerate() {
        let rank = i32::try_from(position + 1).unwrap_or(i32::MAX);
        if row.rank != rank {
            repo.update_rank(row.id, rank).await?;
            changed += 1;
        }
    }

    let summary = RebuildSummary {
        removed: by_name + by_value,
        ranked: rows.len() as u64,
        changed,
    };

    tracing::info!(
        papi,
        removed = summary.removed,
        ranked = summary.ranked,
        changed = summary.changed,
        "Rebuilt leaderboard ranks"
    );

    Ok(summary)
}

fn sort_for_ranking(rows: &mut [PlayerMetric], ascending: bool) {
    rows.sort_by(|a, b| {
        let by_value = if ascending {
            a.vault.cmp(&b.vault)
        } else {
            b.vault.cmp(&a.vault)
        };
        by_value
            .then_with(|| a.player_name.cmp(&b.player_name))
            .then_with(|| a.id.cmp(&b.id))
    });
}
