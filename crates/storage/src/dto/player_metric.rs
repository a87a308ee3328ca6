use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::NewPlayerMetric;
use crate::services::rank_rebuild::RebuildOptions;

/// Body of a value write; the player and papi come from the path
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetVaultRequest {
    #[validate(length(min = 1, max = 64))]
    pub player_name: String,
    pub vault: i64,
    /// Initial rank for a new row, ignored when the row already exists
    #[serde(default)]
    pub rank: i32,
}

impl SetVaultRequest {
    pub fn into_record(self, player_uuid: &str, papi: &str) -> NewPlayerMetric {
        NewPlayerMetric::new(player_uuid, self.player_name, papi, self.vault).with_rank(self.rank)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRankRequest {
    #[validate(range(min = 1))]
    pub rank: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteByNamesRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteByValuesRequest {
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RebuildRequest {
    #[serde(default)]
    pub ascending: bool,
    #[serde(default)]
    pub excluded_names: Vec<String>,
    #[serde(default)]
    pub excluded_values: Vec<i64>,
}

impl From<RebuildRequest> for RebuildOptions {
    fn from(req: RebuildRequest) -> Self {
        Self {
            ascending: req.ascending,
            excluded_names: req.excluded_names,
            excluded_values: req.excluded_values,
        }
    }
}
