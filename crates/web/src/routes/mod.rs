use axum::Router;
use papitop_storage::repository::player_metric::PlayerMetricRepository;

use crate::features::metrics;
use crate::middleware::auth::ApiKeys;

pub fn router(repo: PlayerMetricRepository, api_keys: ApiKeys) -> Router {
    Router::new()
        .nest("/api/metrics", metrics::routes::routes(api_keys))
        .with_state(repo)
}
