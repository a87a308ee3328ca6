use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use papitop_storage::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        player_metric::{
            DeleteByNamesRequest, DeleteByValuesRequest, DeletedResponse, RebuildRequest,
            SetVaultRequest, UpdateRankRequest,
        },
    },
    models::PlayerMetric,
    repository::player_metric::PlayerMetricRepository,
    services::rank_rebuild::RebuildSummary,
};
use validator::Validate;

use crate::error::{WebError, WebResult};

use super::services;

fn check_papi(papi: &str) -> WebResult<()> {
    if papi.is_empty() || papi.len() > 128 {
        return Err(WebError::BadRequest(
            "papi must be between 1 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_player_uuid(player_uuid: &str) -> WebResult<()> {
    if player_uuid.is_empty() || player_uuid.len() > 64 {
        return Err(WebError::BadRequest(
            "player_uuid must be between 1 and 64 characters".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/metrics/{papi}",
    params(
        ("papi" = String, Path, description = "Metric name"),
        PaginationParams
    ),
    responses(
        (
            status = 200,
            description = "Leaderboard page ordered by rank",
            body = PaginatedResponse<PlayerMetric>
        ),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "metrics"
)]
pub async fn get_page(
    State(repo): State<PlayerMetricRepository>,
    Path(papi): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;
    params.validate().map_err(WebError::BadRequest)?;

    let response = services::get_page(&repo, &papi, &params).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/metrics/{papi}/players/{player_uuid}",
    params(
        ("papi" = String, Path, description = "Metric name"),
        ("player_uuid" = String, Path, description = "Player UUID")
    ),
    responses(
        (status = 200, description = "Player entry found", body = PlayerMetric),
        (status = 400, description = "Invalid path parameters"),
        (status = 404, description = "Player has no entry for this metric")
    ),
    tag = "metrics"
)]
pub async fn get_player(
    State(repo): State<PlayerMetricRepository>,
    Path((papi, player_uuid)): Path<(String, String)>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;
    check_player_uuid(&player_uuid)?;

    let record = services::get_player(&repo, &papi, &player_uuid)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(record).into_response())
}

#[utoipa::path(
    get,
    path = "/api/metrics/{papi}/ranks/{rank}",
    params(
        ("papi" = String, Path, description = "Metric name"),
        ("rank" = i32, Path, description = "Leaderboard position")
    ),
    responses(
        (status = 200, description = "Entry at this rank", body = PlayerMetric),
        (status = 400, description = "Invalid metric name"),
        (status = 404, description = "No entry at this rank")
    ),
    tag = "metrics"
)]
pub async fn get_by_rank(
    State(repo): State<PlayerMetricRepository>,
    Path((papi, rank)): Path<(String, i32)>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;

    let record = services::get_by_rank(&repo, &papi, rank)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(record).into_response())
}

#[utoipa::path(
    put,
    path = "/api/metrics/{papi}/players/{player_uuid}",
    params(
        ("papi" = String, Path, description = "Metric name"),
        ("player_uuid" = String, Path, description = "Player UUID")
    ),
    request_body = SetVaultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Value stored"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "metrics"
)]
pub async fn set_vault(
    State(repo): State<PlayerMetricRepository>,
    Path((papi, player_uuid)): Path<(String, String)>,
    Json(req): Json<SetVaultRequest>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;
    check_player_uuid(&player_uuid)?;
    req.validate()?;

    services::set_vault(&repo, &papi, &player_uuid, req).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/metrics/{papi}/records/{id}/rank",
    params(
        ("papi" = String, Path, description = "Metric name"),
        ("id" = i32, Path, description = "Record id")
    ),
    request_body = UpdateRankRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Rank stored, or id unknown"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record belongs to another metric")
    ),
    tag = "metrics"
)]
pub async fn update_rank(
    State(repo): State<PlayerMetricRepository>,
    Path((papi, id)): Path<(String, i32)>,
    Json(req): Json<UpdateRankRequest>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;
    req.validate()?;

    services::update_rank(&repo, &papi, id, req.rank).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/metrics/{papi}/rebuild",
    params(
        ("papi" = String, Path, description = "Metric name")
    ),
    request_body = RebuildRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ranks recomputed", body = RebuildSummary),
        (status = 400, description = "Invalid metric name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "metrics"
)]
pub async fn rebuild(
    State(repo): State<PlayerMetricRepository>,
    Path(papi): Path<String>,
    Json(req): Json<RebuildRequest>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;

    let summary = services::rebuild(&repo, &papi, req).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    post,
    path = "/api/metrics/{papi}/delete-by-names",
    params(
        ("papi" = String, Path, description = "Metric name")
    ),
    request_body = DeleteByNamesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Matching entries removed"),
        (status = 400, description = "Invalid metric name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "metrics"
)]
pub async fn delete_by_names(
    State(repo): State<PlayerMetricRepository>,
    Path(papi): Path<String>,
    Json(req): Json<DeleteByNamesRequest>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;

    repo.delete_by_names_and_metric(&req.names, &papi).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/metrics/{papi}/delete-by-values",
    params(
        ("papi" = String, Path, description = "Metric name")
    ),
    request_body = DeleteByValuesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Matching entries removed"),
        (status = 400, description = "Invalid metric name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "metrics"
)]
pub async fn delete_by_values(
    State(repo): State<PlayerMetricRepository>,
    Path(papi): Path<String>,
    Json(req): Json<DeleteByValuesRequest>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;

    repo.delete_by_values_and_metric(&req.values, &papi).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/metrics/{papi}",
    params(
        ("papi" = String, Path, description = "Metric name")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Leaderboard removed", body = DeletedResponse),
        (status = 400, description = "Invalid metric name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "metrics"
)]
pub async fn delete_metric(
    State(repo): State<PlayerMetricRepository>,
    Path(papi): Path<String>,
) -> Result<Response, WebError> {
    check_papi(&papi)?;

    let deleted = repo.delete_by_metric(&papi).await?;

    Ok(Json(DeletedResponse { deleted }).into_response())
}
