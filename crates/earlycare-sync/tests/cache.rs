use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;

use earlycare_gateway::GatewayError;
use earlycare_sync::{MutationKey, QueryCache, QueryError, QueryKey, QueryState};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[tokio::test]
async fn concurrent_reads_of_same_key_fetch_once() {
    let cache = QueryCache::new();
    let calls = counter();
    let gate = Arc::new(Notify::new());

    let (first, second, ()) = tokio::join!(
        cache.read(QueryKey::HealthTips, {
            let calls = calls.clone();
            let gate = gate.clone();
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok::<_, GatewayError>(vec!["tip".to_string()])
            }
        }),
        cache.read(QueryKey::HealthTips, {
            let calls = calls.clone();
            let gate = gate.clone();
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok::<_, GatewayError>(vec!["tip".to_string()])
            }
        }),
        async {
            tokio::task::yield_now().await;
            gate.notify_one();
        },
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.unwrap(), vec!["tip".to_string()]);
    assert_eq!(second.unwrap(), vec!["tip".to_string()]);
}

#[tokio::test]
async fn fresh_value_is_served_from_cache() {
    let cache = QueryCache::new();
    let calls = counter();

    for _ in 0..3 {
        let calls = calls.clone();
        let value = cache
            .read(QueryKey::CurrentUserProfile, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, GatewayError>(Some("Asha".to_string()))
            })
            .await;
        assert_eq!(value, Ok(Some("Asha".to_string())));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_fetched(QueryKey::CurrentUserProfile).await);
}

#[tokio::test]
async fn invalidation_is_lazy_and_keeps_the_old_value_visible() {
    let cache = QueryCache::new();
    cache
        .read(QueryKey::MyLatestResult, || async { Ok::<_, GatewayError>(1u32) })
        .await
        .unwrap();

    cache.invalidate(QueryKey::MyLatestResult).await;
    assert_eq!(
        cache.snapshot::<u32>(QueryKey::MyLatestResult).await,
        QueryState::Loaded(1)
    );

    let next = cache
        .read(QueryKey::MyLatestResult, || async { Ok::<_, GatewayError>(2u32) })
        .await;
    assert_eq!(next, Ok(2));
}

#[tokio::test]
async fn failed_read_stays_errored_until_invalidated() {
    let cache = QueryCache::new();
    let calls = counter();

    let fail = {
        let calls = calls.clone();
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Vec<String>, _>(GatewayError::Status(503))
        }
    };
    let err = cache.read(QueryKey::HealthTips, fail).await.unwrap_err();
    assert!(matches!(err, QueryError::Remote(_)));

    let again = cache
        .read(QueryKey::HealthTips, || async {
            Ok::<_, GatewayError>(vec!["never".to_string()])
        })
        .await;
    assert_eq!(again, Err(err.clone()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        cache.snapshot::<Vec<String>>(QueryKey::HealthTips).await,
        QueryState::Errored(err)
    );

    let recovered = cache
        .refetch(QueryKey::HealthTips, || async {
            Ok::<_, GatewayError>(vec!["ok".to_string()])
        })
        .await;
    assert_eq!(recovered, Ok(vec!["ok".to_string()]));
}

#[tokio::test]
async fn successful_write_invalidates_only_its_dependents() {
    let cache = QueryCache::new();
    let result_calls = counter();
    let tip_calls = counter();

    let read_result = |calls: Arc<AtomicUsize>| {
        move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok::<_, GatewayError>(format!("R{n}"))
        }
    };
    let read_tips = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, GatewayError>(Vec::<String>::new())
        }
    };

    let before = cache
        .read(QueryKey::MyLatestResult, read_result(result_calls.clone()))
        .await;
    assert_eq!(before, Ok("R1".to_string()));
    cache
        .read(QueryKey::HealthTips, read_tips(tip_calls.clone()))
        .await
        .unwrap();

    cache
        .write(MutationKey::SubmitTest, || async { Ok::<_, GatewayError>(()) })
        .await
        .unwrap();

    let after = cache
        .read(QueryKey::MyLatestResult, read_result(result_calls.clone()))
        .await;
    assert_eq!(after, Ok("R2".to_string()));
    cache
        .read(QueryKey::HealthTips, read_tips(tip_calls.clone()))
        .await
        .unwrap();
    assert_eq!(tip_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_write_propagates_and_invalidates_nothing() {
    let cache = QueryCache::new();
    let calls = counter();
    let read = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, GatewayError>(Some("R1".to_string()))
        }
    };

    cache
        .read(QueryKey::MyLatestResult, read(calls.clone()))
        .await
        .unwrap();

    let err = cache
        .write(MutationKey::SubmitTest, || async {
            Err::<(), _>(GatewayError::Unauthorized)
        })
        .await;
    assert_eq!(err, Err(QueryError::Remote("caller is not authorized".to_string())));

    cache
        .read(QueryKey::MyLatestResult, read(calls.clone()))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn snapshot_reports_loading_while_first_fetch_is_in_flight() {
    let cache = QueryCache::new();
    let gate = Arc::new(Notify::new());

    assert_eq!(
        cache.snapshot::<u8>(QueryKey::CurrentUserProfile).await,
        QueryState::Unloaded
    );

    let (value, ()) = tokio::join!(
        cache.read(QueryKey::CurrentUserProfile, {
            let gate = gate.clone();
            move || async move {
                gate.notified().await;
                Ok::<_, GatewayError>(7u8)
            }
        }),
        async {
            tokio::task::yield_now().await;
            assert_eq!(
                cache.snapshot::<u8>(QueryKey::CurrentUserProfile).await,
                QueryState::Loading
            );
            gate.notify_one();
        },
    );

    assert_eq!(value, Ok(7));
    assert_eq!(
        cache.snapshot::<u8>(QueryKey::CurrentUserProfile).await,
        QueryState::Loaded(7)
    );
}

#[tokio::test]
async fn fetch_detached_by_invalidation_does_not_overwrite_newer_value() {
    let cache = QueryCache::new();
    let gate = Arc::new(Notify::new());

    let (old, ()) = tokio::join!(
        cache.read(QueryKey::MyLatestResult, {
            let gate = gate.clone();
            move || async move {
                gate.notified().await;
                Ok::<_, GatewayError>("old")
            }
        }),
        async {
            tokio::task::yield_now().await;
            cache.invalidate(QueryKey::MyLatestResult).await;
            let fresh = cache
                .read(QueryKey::MyLatestResult, || async {
                    Ok::<_, GatewayError>("new")
                })
                .await;
            assert_eq!(fresh, Ok("new"));
            gate.notify_one();
        },
    );

    assert_eq!(old, Ok("old"));
    assert_eq!(
        cache.snapshot::<&'static str>(QueryKey::MyLatestResult).await,
        QueryState::Loaded("new")
    );
}

#[tokio::test]
async fn fetch_from_before_a_clear_does_not_settle_into_the_new_entry() {
    let cache = QueryCache::new();
    let old_gate = Arc::new(Notify::new());
    let new_gate = Arc::new(Notify::new());
    let old_done = AtomicBool::new(false);

    let (old, new) = tokio::join!(
        async {
            let value = cache
                .read(QueryKey::CurrentUserProfile, {
                    let gate = old_gate.clone();
                    move || async move {
                        gate.notified().await;
                        Ok::<_, GatewayError>("old-user")
                    }
                })
                .await;
            old_done.store(true, Ordering::SeqCst);
            value
        },
        async {
            tokio::task::yield_now().await;
            cache.clear().await;
            let (new, ()) = tokio::join!(
                cache.read(QueryKey::CurrentUserProfile, {
                    let gate = new_gate.clone();
                    move || async move {
                        gate.notified().await;
                        Ok::<_, GatewayError>("new-user")
                    }
                }),
                async {
                    tokio::task::yield_now().await;
                    old_gate.notify_one();
                    while !old_done.load(Ordering::SeqCst) {
                        tokio::task::yield_now().await;
                    }
                    assert_eq!(
                        cache.snapshot::<&'static str>(QueryKey::CurrentUserProfile).await,
                        QueryState::Loading
                    );
                    new_gate.notify_one();
                },
            );
            new
        },
    );

    assert_eq!(old, Ok("old-user"));
    assert_eq!(new, Ok("new-user"));
    assert_eq!(
        cache.snapshot::<&'static str>(QueryKey::CurrentUserProfile).await,
        QueryState::Loaded("new-user")
    );
    let cached = cache
        .read(QueryKey::CurrentUserProfile, || async {
            Ok::<_, GatewayError>("refetched")
        })
        .await;
    assert_eq!(cached, Ok("new-user"));
}

#[tokio::test]
async fn mismatched_type_is_reported_not_panicked() {
    let cache = QueryCache::new();
    cache
        .read(QueryKey::HealthTips, || async { Ok::<_, GatewayError>(1u64) })
        .await
        .unwrap();

    let wrong = cache
        .read(QueryKey::HealthTips, || async { Ok::<_, GatewayError>(String::new()) })
        .await;
    assert_eq!(wrong, Err(QueryError::TypeMismatch(QueryKey::HealthTips)));
}
