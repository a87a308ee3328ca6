use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A player's value and position within one papi leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerMetric {
    pub id: i32,
    pub player_uuid: String,
    pub player_name: String,
    pub papi: String,
    pub vault: i64,
    pub rank: i32,
    pub create_time: Option<NaiveDateTime>,
    pub update_time: Option<NaiveDateTime>,
}

/// Write shape for [`crate::repository::player_metric::PlayerMetricRepository::set_vault`].
///
/// `rank` is only used when the row is created; later value updates keep
/// whatever rank the rebuild pass assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewPlayerMetric {
    pub player_uuid: String,
    pub player_name: String,
    pub papi: String,
    pub vault: i64,
    pub rank: i32,
}

impl NewPlayerMetric {
    pub fn new(
        player_uuid: impl Into<String>,
        player_name: impl Into<String>,
        papi: impl Into<String>,
        vault: i64,
    ) -> Self {
        Self {
            player_uuid: player_uuid.into(),
            player_name: player_name.into(),
            papi: papi.into(),
            vault,
            rank: 0,
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }
}
