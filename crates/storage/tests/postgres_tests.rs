//! PostgreSQL integration tests.
//!
//! These run against the database in `DATABASE_URL` and are skipped when it
//! is unset. Each test works in its own papi so runs do not collide.

use papitop_storage::Database;
use papitop_storage::models::NewPlayerMetric;
use papitop_storage::repository::player_metric::PlayerMetricRepository;
use papitop_storage::services::rank_rebuild::{RebuildOptions, rebuild_ranks};

async fn postgres_or_skip(papi: &str) -> Option<PlayerMetricRepository> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("Skipping PostgreSQL test (DATABASE_URL not set)");
        return None;
    };

    let db = Database::new(&url, 2)
        .await
        .expect("PostgreSQL test setup failed: connect");
    db.run_migrations()
        .await
        .expect("PostgreSQL test setup failed: migrations");

    let repo = db.player_metrics();
    repo.delete_by_metric(papi).await.expect("cleanup failed");
    Some(repo)
}

#[tokio::test]
async fn test_postgres_set_vault_lifecycle() {
    let papi = "pg-test-lifecycle";
    let Some(repo) = postgres_or_skip(papi).await else {
        return;
    };

    repo.set_vault(&NewPlayerMetric::new("A", "Alice", papi, 100).with_rank(1))
        .await
        .unwrap();
    let created = repo.find_by_player_and_metric("A", papi).await.unwrap().unwrap();
    assert!(created.create_time.is_some());
    assert!(created.update_time.is_none());

    repo.set_vault(&NewPlayerMetric::new("A", "Other", papi, 150))
        .await
        .unwrap();
    let updated = repo.find_by_player_and_metric("A", papi).await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.vault, 150);
    assert_eq!(updated.rank, 1);
    assert_eq!(updated.player_name, "Alice");
    assert!(updated.update_time.is_some());
    assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(updated.clone()));

    repo.update_rank(-1, 3).await.unwrap();
    assert!(repo.find_by_rank(5, papi).await.unwrap().is_none());

    assert_eq!(repo.delete_by_metric(papi).await.unwrap(), 1);
    assert_eq!(repo.count_by_metric(papi).await.unwrap(), 0);
}

#[tokio::test]
async fn test_postgres_filters_pages_and_rebuild() {
    let papi = "pg-test-rebuild";
    let Some(repo) = postgres_or_skip(papi).await else {
        return;
    };

    let rows = [
        ("a", "Alice", 10),
        ("b", "Bot", 99),
        ("c", "Carol", 30),
        ("d", "Dave", 0),
    ];
    for (uuid, name, vault) in rows {
        repo.set_vault(&NewPlayerMetric::new(uuid, name, papi, vault))
            .await
            .unwrap();
    }

    assert_eq!(repo.delete_by_names_and_metric(&[], papi).await.unwrap(), 0);
    assert_eq!(repo.count_by_metric(papi).await.unwrap(), 4);

    let options = RebuildOptions {
        ascending: false,
        excluded_names: vec!["Bot".to_string()],
        excluded_values: vec![0],
    };
    let summary = rebuild_ranks(&repo, papi, &options).await.unwrap();
    assert_eq!(summary.removed, 2);
    assert_eq!(summary.ranked, 2);

    let first = repo.page(papi, 1, 1).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].player_name, "Carol");
    assert_eq!(first[0].rank, 1);
    assert!(repo.page(papi, 3, 1).await.unwrap().is_empty());

    repo.delete_by_metric(papi).await.unwrap();
}
