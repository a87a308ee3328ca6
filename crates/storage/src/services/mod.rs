pub mod rank_rebuild;
