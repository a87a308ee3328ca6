use papitop_storage::{
    dto::common::{PaginatedResponse, PaginationParams},
    dto::player_metric::{RebuildRequest, SetVaultRequest},
    error::Result,
    models::PlayerMetric,
    repository::player_metric::PlayerMetricRepository,
    services::rank_rebuild::{self, RebuildSummary},
};

use crate::error::{WebError, WebResult};

/// One leaderboard page with totals for the pagination block
pub async fn get_page(
    repo: &PlayerMetricRepository,
    papi: &str,
    params: &PaginationParams,
) -> Result<PaginatedResponse<PlayerMetric>> {
    let total_items = repo.count_by_metric(papi).await?;
    let entries = repo.page(papi, params.page, params.page_size).await?;

    Ok(PaginatedResponse::new(
        entries,
        params.page,
        params.page_size,
        total_items,
    ))
}

pub async fn get_player(
    repo: &PlayerMetricRepository,
    papi: &str,
    player_uuid: &str,
) -> Result<Option<PlayerMetric>> {
    repo.find_by_player_and_metric(player_uuid, papi).await
}

pub async fn get_by_rank(
    repo: &PlayerMetricRepository,
    papi: &str,
    rank: i32,
) -> Result<Option<PlayerMetric>> {
    repo.find_by_rank(rank, papi).await
}

pub async fn set_vault(
    repo: &PlayerMetricRepository,
    papi: &str,
    player_uuid: &str,
    request: SetVaultRequest,
) -> Result<()> {
    repo.set_vault(&request.into_record(player_uuid, papi)).await
}

/// Set the rank of record `id` on the `papi` leaderboard.
///
/// A record that belongs to another leaderboard is reported as not found.
/// Unknown ids are a no-op.
pub async fn update_rank(
    repo: &PlayerMetricRepository,
    papi: &str,
    id: i32,
    rank: i32,
) -> WebResult<()> {
    match repo.find_by_id(id).await? {
        Some(record) if record.papi != papi => Err(WebError::NotFound),
        Some(_) => Ok(repo.update_rank(id, rank).await?),
        None => Ok(()),
    }
}

pub async fn rebuild(
    repo: &PlayerMetricRepository,
    papi: &str,
    request: RebuildRequest,
) -> Result<RebuildSummary> {
    rank_rebuild::rebuild_ranks(repo, papi, &request.into()).await
}
