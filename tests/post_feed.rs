use ensemble::application_impl::RealPostService;
use ensemble::application_port::{PostError, PostService};
use ensemble::domain_model::{PostId, UserId};
use ensemble::domain_port::{PostRepo, TxManager, UserRepo};
use ensemble::infra_memory::{
    MemoryDb, MemoryPostCache, MemoryPostRepo, MemoryTxManager, MemoryUserRepo,
};
use std::sync::Arc;
use std::time::Duration;

async fn seed_user(db: &Arc<MemoryDb>, username: &str) -> UserId {
    let repo = MemoryUserRepo::new(db.clone());
    let tx_manager = MemoryTxManager;
    let mut tx = tx_manager.begin().await.unwrap();
    let id = repo.create_in_tx(tx.as_mut(), username).await.unwrap();
    tx.commit().await.unwrap();
    id
}

fn service(db: &Arc<MemoryDb>, feed_ttl: Duration) -> RealPostService {
    RealPostService::new(
        Arc::new(MemoryPostRepo::new(db.clone())),
        Arc::new(MemoryPostCache::new()),
        feed_ttl,
    )
}

#[tokio::test]
async fn feed_lists_newest_first_with_author_identity() {
    let db = Arc::new(MemoryDb::new());
    let gabriella = seed_user(&db, "gabriella").await;
    let svc = service(&db, Duration::from_secs(600));

    let first = svc.create_post(gabriella, "first post", None).await.unwrap();
    let second = svc
        .create_post(gabriella, "second post", Some("https://img.test/2.png"))
        .await
        .unwrap();
    let third = svc.create_post(gabriella, "third post", None).await.unwrap();

    let feed = svc.feed().await.unwrap();
    let ids: Vec<PostId> = feed.iter().map(|p| p.post_id).collect();
    assert_eq!(ids, vec![third, second, first]);

    assert!(feed.iter().all(|p| p.username == "gabriella"));
    assert_eq!(
        feed[1].image_url.as_deref(),
        Some("https://img.test/2.png")
    );
}

#[tokio::test]
async fn feed_serves_the_cached_snapshot_until_invalidated() {
    let db = Arc::new(MemoryDb::new());
    let gabriella = seed_user(&db, "gabriella").await;
    let svc = service(&db, Duration::from_secs(600));

    let first = svc.create_post(gabriella, "first post", None).await.unwrap();
    assert_eq!(svc.feed().await.unwrap().len(), 1);

    // A write that sidesteps the service leaves the cached snapshot stale.
    let bypass = MemoryPostRepo::new(db.clone());
    bypass.insert(gabriella, "hidden post", None).await.unwrap();
    assert_eq!(svc.feed().await.unwrap().len(), 1);

    // A service-side write invalidates, so the next read rescans.
    let third = svc.create_post(gabriella, "third post", None).await.unwrap();
    let feed = svc.feed().await.unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0].post_id, third);
    assert_eq!(feed[2].post_id, first);
}

#[tokio::test]
async fn delete_is_owner_only_and_refreshes_the_feed() {
    let db = Arc::new(MemoryDb::new());
    let gabriella = seed_user(&db, "gabriella").await;
    let humberto = seed_user(&db, "humberto").await;
    let svc = service(&db, Duration::from_secs(600));

    let post = svc.create_post(gabriella, "only post", None).await.unwrap();
    assert_eq!(svc.feed().await.unwrap().len(), 1);

    assert!(matches!(
        svc.delete_post(humberto, post).await,
        Err(PostError::NotOwner)
    ));
    assert!(matches!(
        svc.delete_post(gabriella, PostId(999)).await,
        Err(PostError::PostNotFound)
    ));

    svc.delete_post(gabriella, post).await.unwrap();
    assert!(svc.feed().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn feed_cache_expires_after_its_ttl() {
    let db = Arc::new(MemoryDb::new());
    let gabriella = seed_user(&db, "gabriella").await;
    let svc = service(&db, Duration::from_secs(600));

    svc.create_post(gabriella, "first post", None).await.unwrap();
    assert_eq!(svc.feed().await.unwrap().len(), 1);

    let bypass = MemoryPostRepo::new(db.clone());
    bypass.insert(gabriella, "late arrival", None).await.unwrap();

    // Within the TTL the stale snapshot is still served.
    tokio::time::advance(Duration::from_secs(599)).await;
    assert_eq!(svc.feed().await.unwrap().len(), 1);

    // Past the TTL the cache misses and the scan picks up the new row.
    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(svc.feed().await.unwrap().len(), 2);
}
