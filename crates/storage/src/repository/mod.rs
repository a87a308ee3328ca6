pub mod key_lock;
pub mod player_metric;
