pub mod common;
pub mod player_metric;
