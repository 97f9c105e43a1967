use futures::future::join_all;
use receipts::ports::{PointsStore, ResultCache};
use receipts::{Amount, LineItem, PurchaseRecord, ReceiptOperations, ReceiptProcessor, compute_score};
use shared::Error;
use shared::config::CacheBackend;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use storage_engine::{InMemoryPointsStore, TtlCache, UnifiedStorageFactory};
use tokio_util::sync::CancellationToken;

fn record(retailer: &str, total_cents: u64) -> PurchaseRecord {
    PurchaseRecord {
        retailer: retailer.to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "14:30".to_string(),
        items: vec![
            LineItem::new("Gatorade", Amount::from_cents(225)),
            LineItem::new("Emils Cheese Pizza", Amount::from_cents(1225)),
        ],
        total: Amount::from_cents(total_cents),
    }
}

fn processor_with(
    store: Arc<InMemoryPointsStore>,
    cache: Arc<TtlCache>,
    ttl: Duration,
) -> ReceiptProcessor {
    ReceiptProcessor::new(store, cache, ttl, 64)
}

#[tokio::test]
async fn test_get_points_right_after_processing() {
    for backend in [CacheBackend::Ttl, CacheBackend::Moka] {
        let processor = ReceiptProcessor::with_defaults(
            UnifiedStorageFactory::points_store(),
            UnifiedStorageFactory::result_cache(backend),
        );
        let ctx = CancellationToken::new();
        let receipt = record("Target", 3535);

        let id = processor.process_receipt(&ctx, &receipt).await.unwrap();
        let points = processor.get_points(&ctx, &id).await.unwrap();

        assert_eq!(points, compute_score(&receipt), "backend {:?}", backend);
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    for backend in [CacheBackend::Ttl, CacheBackend::Moka] {
        let processor = ReceiptProcessor::with_defaults(
            UnifiedStorageFactory::points_store(),
            UnifiedStorageFactory::result_cache(backend),
        );

        let result = processor
            .get_points(&CancellationToken::new(), "never-issued")
            .await;

        assert_eq!(result, Err(Error::NotFound), "backend {:?}", backend);
    }
}

#[tokio::test]
async fn test_write_warms_cache_with_same_value() {
    let store = Arc::new(InMemoryPointsStore::new());
    let cache = Arc::new(TtlCache::new());
    let processor = processor_with(store.clone(), cache.clone(), Duration::from_secs(300));
    let ctx = CancellationToken::new();
    let receipt = record("M&M Corner Market", 900);

    let id = processor.process_receipt(&ctx, &receipt).await.unwrap();
    processor.warmer().flush().await;

    let cached = cache.load(&ctx, &id).await.unwrap();
    let stored = store.retrieve(&ctx, &id).await.unwrap();
    assert_eq!(cached, Some(compute_score(&receipt)));
    assert_eq!(cached, stored);
}

#[tokio::test]
async fn test_read_after_cache_expiry_falls_back_and_refills() {
    let store = Arc::new(InMemoryPointsStore::new());
    let cache = Arc::new(TtlCache::new());
    let processor = processor_with(store.clone(), cache.clone(), Duration::from_millis(50));
    let ctx = CancellationToken::new();
    let receipt = record("Walgreens", 1000);

    let id = processor.process_receipt(&ctx, &receipt).await.unwrap();
    processor.warmer().flush().await;

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(cache.load(&ctx, &id).await.unwrap(), None);

    let points = processor.get_points(&ctx, &id).await.unwrap();
    assert_eq!(points, compute_score(&receipt));

    processor.warmer().flush().await;
    assert_eq!(cache.load(&ctx, &id).await.unwrap(), Some(points));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_processing_keeps_ids_and_scores_apart() {
    let store = Arc::new(InMemoryPointsStore::new());
    let cache = Arc::new(TtlCache::new());
    let processor = Arc::new(processor_with(store.clone(), cache, Duration::from_secs(300)));

    // Distinct retailers give distinct scores
    let receipts: Vec<PurchaseRecord> = (1..=50)
        .map(|n| record(&"A".repeat(n), 1234))
        .collect();

    let results = join_all(receipts.iter().cloned().map(|receipt| {
        let processor = processor.clone();
        tokio::spawn(async move {
            let id = processor
                .process_receipt(&CancellationToken::new(), &receipt)
                .await
                .unwrap();
            (id, compute_score(&receipt))
        })
    }))
    .await;

    let mut ids = HashSet::new();
    for result in results {
        let (id, expected) = result.unwrap();
        let points = processor
            .get_points(&CancellationToken::new(), &id)
            .await
            .unwrap();
        assert_eq!(points, expected);
        ids.insert(id);
    }

    assert_eq!(ids.len(), receipts.len());
    assert_eq!(store.len().await, receipts.len());
}

#[tokio::test]
async fn test_cancelled_write_leaves_no_state() {
    let store = Arc::new(InMemoryPointsStore::new());
    let cache = Arc::new(TtlCache::new());
    let processor = processor_with(store.clone(), cache.clone(), Duration::from_secs(300));
    let ctx = CancellationToken::new();
    ctx.cancel();

    let result = processor.process_receipt(&ctx, &record("Target", 100)).await;

    assert_eq!(result, Err(Error::Cancelled));
    processor.warmer().flush().await;
    assert!(store.is_empty().await);
    assert!(cache.is_empty());
}
