//! Moka distributed-tier provider tests

use std::time::Duration;
use tgov_domain::ports::providers::{DistributedCacheConnector, DistributedCacheProvider};
use tgov_domain::value_objects::TenantId;
use tgov_providers::cache::{MokaCacheConnector, MokaCacheProvider};

#[tokio::test]
async fn test_moka_provider_basic_operations() {
    let provider = MokaCacheProvider::new();

    provider
        .set_with_ttl("tgov:tenant:acme:k", "payload", None)
        .await
        .unwrap();
    assert_eq!(
        provider.get("tgov:tenant:acme:k").await.unwrap().as_deref(),
        Some("payload")
    );

    assert!(provider.delete("tgov:tenant:acme:k").await.unwrap());
    assert!(!provider.delete("tgov:tenant:acme:k").await.unwrap());
    assert!(provider.get("tgov:tenant:acme:k").await.unwrap().is_none());
}

#[tokio::test]
async fn test_moka_provider_per_entry_ttl() {
    let provider = MokaCacheProvider::new();

    provider
        .set_with_ttl("short", "a", Some(Duration::from_millis(200)))
        .await
        .unwrap();
    provider
        .set_with_ttl("long", "b", Some(Duration::from_secs(60)))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(provider.get("short").await.unwrap().is_none());
    assert_eq!(provider.get("long").await.unwrap().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_moka_provider_clamps_huge_ttl() {
    let provider = MokaCacheProvider::new();

    provider
        .set_with_ttl("forever", "v", Some(Duration::from_secs(u64::MAX)))
        .await
        .unwrap();
    assert_eq!(provider.get("forever").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_moka_provider_delete_by_prefix_is_scoped() {
    let provider = MokaCacheProvider::new();
    for key in ["a", "b", "c"] {
        provider
            .set_with_ttl(&format!("tgov:tenant:t1:{key}"), "x", None)
            .await
            .unwrap();
    }
    provider
        .set_with_ttl("tgov:tenant:t10:a", "y", None)
        .await
        .unwrap();

    let removed = provider
        .delete_by_prefix("tgov:tenant:t1:")
        .await
        .unwrap();

    assert_eq!(removed, 3);
    assert_eq!(
        provider.get("tgov:tenant:t10:a").await.unwrap().as_deref(),
        Some("y")
    );
}

#[tokio::test]
async fn test_moka_provider_close_drops_entries() {
    let provider = MokaCacheProvider::with_capacity(10);
    provider.set_with_ttl("k", "v", None).await.unwrap();
    provider.close().await.unwrap();
    assert_eq!(provider.entry_count().await, 0);
}

#[tokio::test]
async fn test_moka_connector_instances_are_private() {
    let connector = MokaCacheConnector::default();
    let t1 = TenantId::parse("t1").unwrap();
    let t2 = TenantId::parse("t2").unwrap();

    let first = connector.connect_dedicated(&t1).await.unwrap();
    let second = connector.connect_dedicated(&t2).await.unwrap();

    first.set_with_ttl("k", "one", None).await.unwrap();
    assert!(second.get("k").await.unwrap().is_none());
    assert_eq!(first.provider_name(), "moka");
    assert!(first.ping().await.is_ok());
}
