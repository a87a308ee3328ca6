use std::sync::Arc;

use papitop_storage::models::NewPlayerMetric;
use papitop_storage::repository::player_metric::PlayerMetricRepository;
use papitop_storage::store::MemoryMetricStore;

fn repository() -> (Arc<MemoryMetricStore>, PlayerMetricRepository) {
    let store = Arc::new(MemoryMetricStore::new());
    let repo = PlayerMetricRepository::new(store.clone());
    (store, repo)
}

#[tokio::test]
async fn test_first_write_inserts_and_second_updates_value_only() {
    let (_store, repo) = repository();

    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", 100).with_rank(1))
        .await
        .unwrap();

    let created = repo
        .find_by_player_and_metric("A", "money")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(created.vault, 100);
    assert_eq!(created.rank, 1);
    assert!(created.create_time.is_some());
    assert!(created.update_time.is_none());

    repo.set_vault(&NewPlayerMetric::new("A", "Renamed", "money", 150).with_rank(99))
        .await
        .unwrap();

    let updated = repo
        .find_by_player_and_metric("A", "money")
        .await
        .unwrap()
        .expect("record should still exist");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.vault, 150);
    assert!(updated.update_time.is_some());
    assert_eq!(updated.rank, 1);
    assert_eq!(updated.player_name, "Alice");
    assert_eq!(updated.create_time, created.create_time);
}

#[tokio::test]
async fn test_find_by_player_and_metric_matches_both_fields() {
    let (_store, repo) = repository();
    for (uuid, papi, vault) in [("A", "money", 1), ("A", "kills", 2), ("B", "money", 3)] {
        repo.set_vault(&NewPlayerMetric::new(uuid, uuid, papi, vault))
            .await
            .unwrap();
    }

    let found = repo.find_by_player_and_metric("A", "kills").await.unwrap().unwrap();
    assert_eq!(found.vault, 2);

    let missing = repo.find_by_player_and_metric("B", "kills").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_find_by_rank_absent_is_none() {
    let (_store, repo) = repository();
    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", 10).with_rank(1))
        .await
        .unwrap();

    assert!(repo.find_by_rank(5, "money").await.unwrap().is_none());
    assert!(repo.find_by_rank(1, "kills").await.unwrap().is_none());
    assert_eq!(
        repo.find_by_rank(1, "money").await.unwrap().unwrap().player_uuid,
        "A"
    );
}

#[tokio::test]
async fn test_update_rank_on_missing_id_is_silent() {
    let (store, repo) = repository();
    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", 10).with_rank(1))
        .await
        .unwrap();
    let before = repo.find_all_by_metric("money").await.unwrap();

    repo.update_rank(7, 3).await.unwrap();

    assert_eq!(repo.find_all_by_metric("money").await.unwrap(), before);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_update_rank_sets_rank_and_update_time() {
    let (_store, repo) = repository();
    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", 10))
        .await
        .unwrap();
    let row = repo.find_by_player_and_metric("A", "money").await.unwrap().unwrap();

    repo.update_rank(row.id, 4).await.unwrap();

    let row = repo.find_by_player_and_metric("A", "money").await.unwrap().unwrap();
    assert_eq!(row.rank, 4);
    assert_eq!(row.vault, 10);
    assert!(row.update_time.is_some());
}

#[tokio::test]
async fn test_pages_are_sorted_and_cover_the_metric() {
    let (_store, repo) = repository();
    let ranks = [4, 2, 7, 1, 5, 3, 6];
    for (i, rank) in ranks.iter().enumerate() {
        let uuid = format!("p{i}");
        repo.set_vault(&NewPlayerMetric::new(uuid.clone(), uuid, "money", 0).with_rank(*rank))
            .await
            .unwrap();
    }
    repo.set_vault(&NewPlayerMetric::new("other", "other", "kills", 0).with_rank(1))
        .await
        .unwrap();

    let mut collected = Vec::new();
    for page in 1..=3 {
        let rows = repo.page("money", page, 3).await.unwrap();
        assert!(rows.windows(2).all(|w| w[0].rank <= w[1].rank));
        collected.extend(rows);
    }
    assert!(repo.page("money", 4, 3).await.unwrap().is_empty());

    let mut all = repo.find_all_by_metric("money").await.unwrap();
    all.sort_by_key(|r| r.id);
    collected.sort_by_key(|r| r.id);
    assert_eq!(collected, all);
}

#[tokio::test]
async fn test_find_by_id_returns_row_with_its_metric() {
    let (_store, repo) = repository();
    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "kills", 3))
        .await
        .unwrap();
    let row = repo
        .find_by_player_and_metric("A", "kills")
        .await
        .unwrap()
        .unwrap();

    let found = repo.find_by_id(row.id).await.unwrap().unwrap();
    assert_eq!(found.papi, "kills");
    assert!(repo.find_by_id(row.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_delete_lists_touch_nothing() {
    let (store, repo) = repository();
    repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", 10))
        .await
        .unwrap();
    let calls = store.call_count();

    assert_eq!(repo.delete_by_names_and_metric(&[], "money").await.unwrap(), 0);
    assert_eq!(repo.delete_by_values_and_metric(&[], "money").await.unwrap(), 0);

    assert_eq!(store.call_count(), calls);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_delete_by_names_is_scoped_to_metric() {
    let (_store, repo) = repository();
    let rows = [
        ("a", "Alice", "money"),
        ("a", "Alice", "kills"),
        ("b", "Bob", "money"),
    ];
    for (uuid, name, papi) in rows {
        repo.set_vault(&NewPlayerMetric::new(uuid, name, papi, 1))
            .await
            .unwrap();
    }

    let deleted = repo
        .delete_by_names_and_metric(&["Alice".to_string()], "money")
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(repo.find_by_player_and_metric("a", "money").await.unwrap().is_none());
    assert!(repo.find_by_player_and_metric("a", "kills").await.unwrap().is_some());
    assert!(repo.find_by_player_and_metric("b", "money").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_by_values_is_scoped_to_metric() {
    let (_store, repo) = repository();
    for (uuid, papi, vault) in [("a", "money", 0), ("b", "money", 5), ("c", "kills", 0)] {
        repo.set_vault(&NewPlayerMetric::new(uuid, uuid, papi, vault))
            .await
            .unwrap();
    }

    let deleted = repo
        .delete_by_values_and_metric(&[0, 42], "money")
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let money: Vec<String> = repo
        .find_all_by_metric("money")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.player_uuid)
        .collect();
    assert_eq!(money, vec!["b".to_string()]);
    assert_eq!(repo.count_by_metric("kills").await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_by_metric_returns_prior_count() {
    let (_store, repo) = repository();
    for uuid in ["a", "b", "c"] {
        repo.set_vault(&NewPlayerMetric::new(uuid, uuid, "money", 1))
            .await
            .unwrap();
    }
    repo.set_vault(&NewPlayerMetric::new("a", "a", "kills", 1))
        .await
        .unwrap();

    let before = repo.count_by_metric("money").await.unwrap();
    assert_eq!(repo.delete_by_metric("money").await.unwrap(), before);
    assert_eq!(repo.count_by_metric("money").await.unwrap(), 0);
    assert_eq!(repo.delete_by_metric("money").await.unwrap(), 0);
    assert_eq!(repo.count_by_metric("kills").await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_for_one_key_keep_a_single_row() {
    let (store, repo) = repository();

    let mut handles = Vec::new();
    for vault in 0..32 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", vault))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_repositories_fall_back_to_update_on_conflict() {
    let store = Arc::new(MemoryMetricStore::with_unique_keys());

    let mut handles = Vec::new();
    for vault in 0..16 {
        // Separate repositories do not share locks, like separate processes.
        let repo = PlayerMetricRepository::new(store.clone());
        handles.push(tokio::spawn(async move {
            repo.set_vault(&NewPlayerMetric::new("A", "Alice", "money", vault))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len().await, 1);
}
