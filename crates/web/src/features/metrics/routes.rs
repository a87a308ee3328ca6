use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use papitop_storage::repository::player_metric::PlayerMetricRepository;

use super::handlers::{
    delete_by_names, delete_by_values, delete_metric, get_by_rank, get_page, get_player, rebuild,
    set_vault, update_rank,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<PlayerMetricRepository> {
    let protected = Router::new()
        .route("/:papi", delete(delete_metric))
        .route("/:papi/players/:player_uuid", put(set_vault))
        .route("/:papi/records/:id/rank", put(update_rank))
        .route("/:papi/rebuild", post(rebuild))
        .route("/:papi/delete-by-names", post(delete_by_names))
        .route("/:papi/delete-by-values", post(delete_by_values))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:papi", get(get_page))
        .route("/:papi/players/:player_uuid", get(get_player))
        .route("/:papi/ranks/:rank", get(get_by_rank))
        .merge(protected)
}
