//! Tests for fetching, decoding and caching images

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use civicverify::adapters::{CachingImageSource, FetchingImageSource};
use civicverify::adapters::image::Fetcher;
use civicverify::config::Limits;
use civicverify::core::error::CheckExecutionError;
use civicverify::core::models::{PerceptualHash, THUMBNAIL_SIDE};
use civicverify::core::ports::ImageSource;

use super::common::fixtures::{self, AFTER, BEFORE};
use super::common::mocks::{CountingImageSource, StaticImageSource};

#[tokio::test]
async fn local_png_is_decoded() {
    let dir = TempDir::new().unwrap();
    let path = fixtures::write_png(dir.path(), "pothole.png", 160, 120);
    let source = FetchingImageSource::new(&Limits::default()).unwrap();

    let evidence = source.load(path.to_str().unwrap()).await.unwrap();
    assert_eq!((evidence.width, evidence.height), (160, 120));
    assert_eq!(evidence.thumbnail.len(), THUMBNAIL_SIDE * THUMBNAIL_SIDE);
    assert!(evidence.exif.gps.is_none());
}

#[tokio::test]
async fn file_url_matches_plain_path() {
    let dir = TempDir::new().unwrap();
    let path = fixtures::write_png(dir.path(), "drain.png", 64, 64);
    let source = FetchingImageSource::new(&Limits::default()).unwrap();

    let plain = source.load(path.to_str().unwrap()).await.unwrap();
    let url = source.load(&format!("file://{}", path.display())).await.unwrap();
    assert_eq!(plain.phash, url.phash);
    assert_eq!(plain.byte_len, url.byte_len);
}

#[tokio::test]
async fn oversized_file_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = fixtures::write_png(dir.path(), "big.png", 200, 200);
    let fetcher = Fetcher::new(64, Duration::from_secs(5)).unwrap();

    let err = fetcher.fetch(path.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, CheckExecutionError::TooLarge { limit: 64, .. }), "{err}");
}

#[tokio::test]
async fn missing_file_is_a_fetch_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.jpg");
    let source = FetchingImageSource::new(&Limits::default()).unwrap();

    let err = source.load(missing.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, CheckExecutionError::Fetch { .. }));
}

#[tokio::test]
async fn non_image_bytes_are_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.jpg");
    std::fs::write(&path, "meeting notes, not a photo").unwrap();
    let source = FetchingImageSource::new(&Limits::default()).unwrap();

    let err = source.load(path.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, CheckExecutionError::Decode { .. }));
}

#[tokio::test]
async fn load_all_keeps_order_and_stops_at_a_failure() {
    let dir = TempDir::new().unwrap();
    let first = fixtures::write_png(dir.path(), "a.png", 32, 32);
    let second = fixtures::write_png(dir.path(), "b.png", 48, 32);
    let source = FetchingImageSource::new(&Limits::default()).unwrap();

    let refs = vec![first.display().to_string(), second.display().to_string()];
    let loaded = source.load_all(&refs).await.unwrap();
    assert_eq!(loaded.iter().map(|e| e.width).collect::<Vec<_>>(), [32, 48]);

    let broken = vec![
        first.display().to_string(),
        dir.path().join("missing.png").display().to_string(),
    ];
    let err = source.load_all(&broken).await.unwrap_err();
    assert!(err.to_string().contains("missing.png"), "{err}");
}

fn counting(delay: Duration) -> Arc<CountingImageSource> {
    let images = StaticImageSource::new().with(fixtures::evidence(
        BEFORE,
        PerceptualHash::default(),
        fixtures::camera_exif(None),
    ));
    Arc::new(CountingImageSource::new(images, delay))
}

#[tokio::test]
async fn concurrent_loads_of_one_image_share_a_fetch() {
    let inner = counting(Duration::from_millis(20));
    let cache = CachingImageSource::new(inner.clone(), Duration::from_secs(30), 8);

    let (a, b, c) = tokio::join!(cache.load(BEFORE), cache.load(BEFORE), cache.load(BEFORE));
    assert_eq!(a.unwrap().reference, BEFORE);
    assert_eq!(b.unwrap(), c.unwrap());
    assert_eq!(inner.loads(), 1);

    cache.load(BEFORE).await.unwrap();
    assert_eq!(inner.loads(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn failures_are_shared_too() {
    let inner = counting(Duration::from_millis(5));
    let cache = CachingImageSource::new(inner.clone(), Duration::from_secs(30), 8);

    let (a, b) = tokio::join!(cache.load(AFTER), cache.load(AFTER));
    assert!(matches!(a, Err(CheckExecutionError::Fetch { .. })));
    assert_eq!(a, b);
    assert_eq!(inner.loads(), 1);
}

#[tokio::test]
async fn expired_entries_are_fetched_again() {
    let inner = counting(Duration::ZERO);
    let cache = CachingImageSource::new(inner.clone(), Duration::ZERO, 8);

    cache.load(BEFORE).await.unwrap();
    cache.load(BEFORE).await.unwrap();
    assert_eq!(inner.loads(), 2);
}

#[tokio::test]
async fn oldest_entry_is_dropped_at_capacity() {
    let inner = counting(Duration::ZERO);
    let cache = CachingImageSource::new(inner.clone(), Duration::from_secs(30), 1);

    cache.load(BEFORE).await.unwrap();
    let _ = cache.load(AFTER).await;
    assert_eq!(cache.len(), 1);

    cache.load(BEFORE).await.unwrap();
    assert_eq!(inner.loads(), 3);
}
