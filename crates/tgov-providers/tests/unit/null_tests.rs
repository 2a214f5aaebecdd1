//! Null provider tests

use tgov_domain::ports::providers::DistributedCacheProvider;
use tgov_providers::cache::NullCacheProvider;

#[tokio::test]
async fn test_null_provider_stores_nothing() {
    let provider = NullCacheProvider::new();

    provider.set_with_ttl("k", "v", None).await.unwrap();
    assert!(provider.get("k").await.unwrap().is_none());
    assert!(!provider.delete("k").await.unwrap());
    assert_eq!(provider.delete_by_prefix("").await.unwrap(), 0);
    assert!(provider.ping().await.is_ok());
    assert!(provider.close().await.is_ok());
    assert_eq!(provider.provider_name(), "null");
}
