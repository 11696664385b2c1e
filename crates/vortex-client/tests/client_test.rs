mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::CountingStore;
use serde_json::json;
use vortex_client::{CacheConfig, ConfigClient};
use vortex_core::RawValue;
use vortex_kv::KvStore;

fn client_over(store: &Arc<CountingStore>) -> ConfigClient {
    ConfigClient::new(store.clone(), CacheConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_feature_flag_scenario() {
    let store = CountingStore::new();
    let client = client_over(&store);

    client.set("feature.enabled", &true).await.unwrap();

    // Inmediatamente despues del set: sin llamada remota
    assert_eq!(client.get::<bool>("feature.enabled").await, Some(true));
    assert_eq!(store.gets(), 0);

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(client.get::<bool>("feature.enabled").await, Some(true));
    assert_eq!(store.gets(), 1);

    // La entrada fue refrescada: la siguiente lectura vuelve a ser un hit
    assert_eq!(client.get::<bool>("feature.enabled").await, Some(true));
    assert_eq!(store.gets(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_fetched_exactly_once_and_refreshed() {
    let store = CountingStore::with_entries([("db.pool", json!(10))]);
    let client = client_over(&store);

    assert_eq!(client.get::<u32>("db.pool").await, Some(10));
    assert_eq!(store.gets(), 1);

    tokio::time::advance(Duration::from_millis(2001)).await;
    store.inner.put_value("db.pool", &json!(20)).await.unwrap();

    assert_eq!(client.get::<u32>("db.pool").await, Some(20));
    assert_eq!(client.get::<u32>("db.pool").await, Some(20));
    assert_eq!(store.gets(), 2);

    // TTL no deslizante: lecturas frecuentes no extienden la vida de la entrada
    tokio::time::advance(Duration::from_millis(1500)).await;
    assert_eq!(client.get::<u32>("db.pool").await, Some(20));
    tokio::time::advance(Duration::from_millis(600)).await;
    assert_eq!(client.get::<u32>("db.pool").await, Some(20));
    assert_eq!(store.gets(), 3);
}

#[tokio::test]
async fn test_missing_key_is_never_negatively_cached() {
    let store = CountingStore::new();
    let client = client_over(&store);

    for attempt in 1..=3 {
        assert_eq!(client.get_or("missing.key", "fallback".to_string()).await, "fallback");
        assert_eq!(store.gets(), attempt);
    }
}

#[tokio::test]
async fn test_read_errors_resolve_to_default() {
    let store = CountingStore::with_entries([("timeout.ms", json!(250))]);
    let client = client_over(&store);
    store.fail_reads.store(true, Ordering::SeqCst);

    assert_eq!(client.get_or("timeout.ms", 1000).await, 1000);
    assert_eq!(client.get_all_keys().await, Vec::<String>::new());
    assert!(client.get_all().await.is_empty());
    assert!(!client.exists("timeout.ms").await);

    // Nada se cacheo durante la caida
    store.fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(client.get_or("timeout.ms", 1000).await, 250);
    assert_eq!(client.cache().metrics().fetch_errors(), 4);
}

#[tokio::test]
async fn test_decode_failure_is_not_cached() {
    let store = CountingStore::with_entries([("port", json!("eighty"))]);
    let client = client_over(&store);

    assert_eq!(client.get_or("port", 80_u16).await, 80);
    assert_eq!(client.get_or("port", 80_u16).await, 80);
    assert_eq!(store.gets(), 2);

    // El mismo valor leido con un tipo compatible si se cachea
    assert_eq!(client.get_string("port").await.as_deref(), Some("eighty"));
    assert_eq!(client.get_string("port").await.as_deref(), Some("eighty"));
    assert_eq!(store.gets(), 3);
}

#[tokio::test]
async fn test_set_invalidates_both_aggregates() {
    let store = CountingStore::with_entries([("a", json!(1))]);
    let client = client_over(&store);

    assert_eq!(client.get_all_keys().await, vec!["a"]);
    assert_eq!(client.get_all().await.len(), 1);
    let lists_before = store.lists();

    // Aggregados cacheados: no hay nuevas llamadas
    assert_eq!(client.get_all_keys().await, vec!["a"]);
    assert_eq!(client.get_all().await.len(), 1);
    assert_eq!(store.lists(), lists_before);

    client.set("b", &"two").await.unwrap();

    assert_eq!(client.get_all_keys().await, vec!["a", "b"]);
    let all = client.get_all().await;
    assert_eq!(all.get("b"), Some(&json!("two")));
    assert!(store.lists() > lists_before);
}

#[tokio::test]
async fn test_set_of_known_key_still_invalidates_aggregates() {
    let store = CountingStore::with_entries([("a", json!(1))]);
    let client = client_over(&store);

    assert_eq!(client.get_all().await.get("a"), Some(&json!(1)));

    client.set("a", &5).await.unwrap();

    assert_eq!(client.get_all().await.get("a"), Some(&json!(5)));
}

#[tokio::test]
async fn test_failed_write_is_reported_and_cache_untouched() {
    let store = CountingStore::with_entries([("mode", json!("blue"))]);
    let client = client_over(&store);

    assert_eq!(client.get_string("mode").await.as_deref(), Some("blue"));
    assert_eq!(client.get_all_keys().await, vec!["mode"]);
    let gets = store.gets();
    let lists = store.lists();

    store.reject_writes.store(true, Ordering::SeqCst);
    let err = client.set("mode", &"green").await.unwrap_err();
    assert!(err.is_write_failure());

    // Ni la entrada de la key ni los agregados cambiaron
    assert_eq!(client.get_string("mode").await.as_deref(), Some("blue"));
    assert_eq!(client.get_all_keys().await, vec!["mode"]);
    assert_eq!(store.gets(), gets);
    assert_eq!(store.lists(), lists);
}

#[tokio::test(start_paused = true)]
async fn test_exists_matches_get_across_writes_and_ttl() {
    let store = CountingStore::with_entries([("present", json!("x")), ("null", RawValue::Null)]);
    let client = client_over(&store);

    async fn check(client: &ConfigClient, key: &str) {
        let via_get = client
            .get::<RawValue>(key)
            .await
            .is_some_and(|v| !v.is_null());
        assert_eq!(client.exists(key).await, via_get, "key {key}");
    }

    for key in ["present", "null", "absent"] {
        check(&client, key).await;
    }

    client.set("absent", &1).await.unwrap();
    assert!(client.exists("absent").await);
    check(&client, "absent").await;

    // Borrado por otro cliente: exists sigue viendo el valor dentro del TTL
    store.inner.remove("present");
    assert!(client.exists("present").await);
    check(&client, "present").await;

    tokio::time::advance(Duration::from_millis(2100)).await;
    assert!(!client.exists("present").await);
    check(&client, "present").await;
}

#[tokio::test]
async fn test_uncached_client_reads_through_every_time() {
    let store = CountingStore::with_entries([("a", json!(1))]);
    let client = ConfigClient::uncached(store.clone());

    client.set("b", &2).await.unwrap();
    assert_eq!(client.get::<i32>("b").await, Some(2));
    assert_eq!(client.get::<i32>("a").await, Some(1));
    assert_eq!(client.get::<i32>("a").await, Some(1));
    assert_eq!(store.gets(), 3);
}
