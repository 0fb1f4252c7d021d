/// Gallery behaviour across tasks and over time
use artmint_gallery::*;
use std::sync::Arc;
use std::time::Duration;

fn live_submission(title: &str) -> NewArtwork {
    NewArtwork {
        title: title.to_string(),
        artist: "tester".to_string(),
        image_url: "https://cdn.example.com/live.png".to_string(),
        prompt: Some("aurora over mountains".to_string()),
        wallet_address: None,
        is_live: true,
    }
}

#[tokio::test(start_paused = true)]
async fn test_live_expiry_after_five_minutes() {
    let config = GalleryConfig::default();
    let store: Arc<dyn GalleryStore> = Arc::new(InMemoryGalleryStore::new(config.clone()));
    let art = store.append(live_submission("Aurora")).await.unwrap();

    let handle = schedule_live_expiry(store.clone(), art.id, config.live_duration);

    tokio::time::advance(Duration::from_secs(299)).await;
    tokio::task::yield_now().await;
    assert!(store.get(art.id).await.unwrap().is_live);

    handle.await.unwrap();
    assert!(!store.get(art.id).await.unwrap().is_live);
}

#[tokio::test(start_paused = true)]
async fn test_live_expiry_skips_evicted_entry() {
    let store: Arc<dyn GalleryStore> = Arc::new(InMemoryGalleryStore::default());
    let art = store.append(live_submission("Gone")).await.unwrap();

    let handle = schedule_live_expiry(store.clone(), art.id, Duration::from_secs(300));
    store.evict(art.id).await.unwrap();

    handle.await.unwrap();
    assert_eq!(store.len().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_are_not_lost() {
    let store: Arc<dyn GalleryStore> = Arc::new(InMemoryGalleryStore::default());
    let art = store.append(live_submission("Crowd")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..200 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let kind = if i % 2 == 0 { VoteKind::Like } else { VoteKind::Dislike };
            store
                .vote(art.id, VoterKey::new(format!("wallet:{}", i)), kind)
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let art = store.get(art.id).await.unwrap();
    assert_eq!(art.likes, 100);
    assert_eq!(art.dislikes, 100);
}
