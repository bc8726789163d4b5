use super::*;

async fn check_empty_criteria_matches_everything<S: LogStore>(store: &S) {
    seed(store).await;
    assert_eq!(
        created_of(store, &MatchCriteria::default()).await,
        vec![1000, 2000, 3000, 4000]
    );
}

async fn check_label_intersection<S: LogStore>(store: &S) {
    seed(store).await;
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_label("storage")).await,
        vec![1000, 4000]
    );
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_label("network").with_label("auth")).await,
        vec![2000, 4000]
    );
    assert!(created_of(store, &MatchCriteria::new().with_label("auth")).await.is_empty());
}

async fn check_keywords<S: LogStore>(store: &S) {
    seed(store).await;
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_keyword("disk")).await,
        vec![1000]
    );
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_keyword("disk").with_keyword("reset")).await,
        vec![1000, 2000]
    );
    assert!(created_of(store, &MatchCriteria::new().with_keyword("timeout")).await.is_empty());
}

async fn check_time_bounds_are_exclusive<S: LogStore>(store: &S) {
    seed(store).await;
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_time_range(1000, 4000)).await,
        vec![2000, 3000]
    );
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_time_range(0, 2500)).await,
        vec![1000, 2000]
    );
    assert_eq!(
        created_of(store, &MatchCriteria::new().with_time_range(2500, 0)).await,
        vec![3000, 4000]
    );
}

async fn check_fields_combine_with_and<S: LogStore>(store: &S) {
    seed(store).await;
    assert_eq!(
        created_of(
            store,
            &MatchCriteria::new().with_log_level("ERROR").with_label("network")
        )
        .await,
        vec![4000]
    );
    assert_eq!(
        created_of(
            store,
            &MatchCriteria::new()
                .with_origin_service("svc-a")
                .with_log_level("ERROR")
                .with_log_level("INFO")
        )
        .await,
        vec![1000, 3000]
    );
    assert!(
        created_of(
            store,
            &MatchCriteria::new().with_origin_service("svc-a").with_keyword("replica")
        )
        .await
        .is_empty()
    );
}

async fn check_limit<S: LogStore>(store: &S) {
    seed(store).await;
    let found = store.find(&MatchCriteria::new().with_limit(2)).await.unwrap();
    assert_eq!(found.len(), 2);

    let found = store.find(&MatchCriteria::new().with_limit(10)).await.unwrap();
    assert_eq!(found.len(), 4);

    let found = store
        .find(&MatchCriteria::new().with_log_level("ERROR").with_limit(1))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].level, "ERROR");
}

async fn check_remove<S: LogStore>(store: &S) {
    seed(store).await;
    let removed = store
        .remove(&MatchCriteria::new().with_origin_service("svc-a"))
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(created_of(store, &MatchCriteria::default()).await, vec![2000, 4000]);

    let removed = store.remove(&MatchCriteria::default()).await.unwrap();
    assert_eq!(removed, 2);
    assert!(created_of(store, &MatchCriteria::default()).await.is_empty());

    let removed = store.remove(&MatchCriteria::default()).await.unwrap();
    assert_eq!(removed, 0);
}

async fn check_reset<S: LogStore>(store: &S) {
    seed(store).await;
    store.reset().await;
    assert!(created_of(store, &MatchCriteria::default()).await.is_empty());

    // the collection is still usable afterwards
    store.add(&LogEntry::new("INFO", "after reset")).await.unwrap();
    assert_eq!(store.find(&MatchCriteria::default()).await.unwrap().len(), 1);
}

async fn check_invalid_keyword_selects_nothing<S: LogStore>(store: &S) {
    seed(store).await;
    assert!(created_of(store, &MatchCriteria::new().with_keyword("(unclosed")).await.is_empty());
    assert_eq!(
        created_of(
            store,
            &MatchCriteria::new().with_keyword("(unclosed").with_keyword("disk")
        )
        .await,
        vec![1000]
    );

    let removed = store
        .remove(&MatchCriteria::new().with_keyword("(unclosed"))
        .await
        .unwrap();
    assert_eq!(removed, 0);
    assert_eq!(created_of(store, &MatchCriteria::default()).await.len(), 4);
}

async fn check_entry_fields_survive_storage<S: LogStore>(store: &S) {
    let entry = LogEntry::new("DEBUG", "cache miss for key 42")
        .with_origin_service("svc-cache")
        .with_label("cache")
        .with_arg(serde_json::json!({"key": 42}))
        .with_arg(serde_json::json!("hot"))
        .with_created(5000);
    store.add(&entry).await.unwrap();

    let found = store.find(&MatchCriteria::new().with_label("cache")).await.unwrap();
    assert_eq!(found, vec![entry]);
}

macro_rules! on_both_backends {
    ($($check:ident),* $(,)?) => {
        mod memory {
            use super::*;
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(&memory_store()).await;
                }
            )*
        }

        mod sqlite {
            use super::*;
            $(
                #[tokio::test]
                async fn $check() {
                    let dir = TempDir::new().unwrap();
                    let store = sqlite_store(&dir).await;
                    super::$check(&store).await;
                    store.close().await;
                }
            )*
        }
    };
}

on_both_backends!(
    check_empty_criteria_matches_everything,
    check_label_intersection,
    check_keywords,
    check_time_bounds_are_exclusive,
    check_fields_combine_with_and,
    check_limit,
    check_remove,
    check_reset,
    check_invalid_keyword_selects_nothing,
    check_entry_fields_survive_storage,
);
