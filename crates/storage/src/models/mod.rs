mod player_metric;

pub use player_metric::{NewPlayerMetric, PlayerMetric};
