//! Tests for the in-process city store.

use chrono::{TimeDelta, Utc};

use citysuggest::store::{CityStore, MemoryStore, WriteBatch};
use citysuggest::types::CityRecord;
use citysuggest::CitySuggestError;

fn store() -> MemoryStore {
    MemoryStore::with_cities(vec![
        CityRecord::approved("Los Angeles", "United States"),
        CityRecord::approved("Los Alamos", "United States"),
        CityRecord::unapproved("Los Santos", "San Andreas"),
        CityRecord::approved("Lost Springs", "United States"),
        CityRecord::approved("Lyon", "France"),
    ])
}

fn names(cities: &[CityRecord]) -> Vec<&str> {
    cities.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn prefix_search_is_ordered_and_approved_only() {
    let cities = store().search_prefix("los", 10).await.unwrap();
    assert_eq!(names(&cities), vec!["Los Alamos", "Los Angeles", "Lost Springs"]);
}

#[tokio::test]
async fn prefix_search_honours_limit() {
    let cities = store().search_prefix("lo", 2).await.unwrap();
    assert_eq!(names(&cities), vec!["Los Alamos", "Los Angeles"]);
}

#[tokio::test]
async fn prefix_search_matches_whole_key() {
    let cities = store().search_prefix("los angeles", 10).await.unwrap();
    assert_eq!(names(&cities), vec!["Los Angeles"]);

    let cities = store().search_prefix("los angeless", 10).await.unwrap();
    assert!(cities.is_empty());
}

#[tokio::test]
async fn fresh_store_has_no_marker() {
    assert_eq!(MemoryStore::new().last_fetched().await.unwrap(), None);
}

#[tokio::test]
async fn commit_applies_cities_and_marker_together() {
    let store = MemoryStore::new();
    let before = Utc::now();

    let batch = WriteBatch::new()
        .set_city(CityRecord::approved("Berlin", "Germany"))
        .set_city(CityRecord::approved("Bern", "Switzerland"))
        .touch_last_fetched();
    store.commit(batch).await.unwrap();

    assert_eq!(store.len().await, 2);
    assert_eq!(store.commit_count(), 1);
    let marker = store.last_fetched().await.unwrap().unwrap();
    assert!(marker >= before);
    assert!(marker <= Utc::now());
}

#[tokio::test]
async fn commit_overwrites_same_key() {
    let store = MemoryStore::with_cities(vec![CityRecord::unapproved("Berlin", "Germany")]);

    store
        .commit(WriteBatch::new().set_city(CityRecord::approved("Berlin", "Germany")))
        .await
        .unwrap();

    assert_eq!(store.len().await, 1);
    assert!(store.get("berlin").await.unwrap().is_approved);
    // No marker write in this batch
    assert_eq!(store.last_fetched().await.unwrap(), None);
}

#[tokio::test]
async fn initial_marker_is_reported() {
    let at = Utc::now() - TimeDelta::minutes(10);
    let store = MemoryStore::new().with_last_fetched(at);
    assert_eq!(store.last_fetched().await.unwrap(), Some(at));
}

#[tokio::test]
async fn seed_from_file_loads_cities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cities.json");
    std::fs::write(
        &path,
        r#"[
            {"name": "Paris", "country": "France"},
            {"name": "Paradise", "country": "United States", "is_approved": false}
        ]"#,
    )
    .unwrap();

    let store = MemoryStore::seed_from_file(&path).await.unwrap();

    assert_eq!(store.len().await, 2);
    let cities = store.search_prefix("par", 5).await.unwrap();
    assert_eq!(names(&cities), vec!["Paris"]);
}

#[tokio::test]
async fn seed_from_missing_or_invalid_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let missing = MemoryStore::seed_from_file(&dir.path().join("nope.json")).await;
    assert!(matches!(missing, Err(CitySuggestError::Configuration(_))));

    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not a list").unwrap();
    let invalid = MemoryStore::seed_from_file(&path).await;
    assert!(matches!(invalid, Err(CitySuggestError::Configuration(_))));
}

#[test]
fn batch_builder_collects_writes() {
    let mut batch = WriteBatch::new().set_city(CityRecord::approved("Oslo", "Norway"));
    batch.extend(vec![CityRecord::approved("Osaka", "Japan")]);
    let batch = batch.touch_last_fetched();

    assert_eq!(batch.len(), 3);
    assert_eq!(
        batch.cities().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Oslo", "Osaka"]
    );
    assert!(WriteBatch::new().is_empty());
}
