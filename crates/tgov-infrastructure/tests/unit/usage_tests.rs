//! Usage Recorder Tests

use crate::test_utils::tenant;
use std::time::Duration;
use tgov_domain::ports::infrastructure::UsageSampler;
use tgov_infrastructure::UsageRecorder;

#[tokio::test]
async fn test_unknown_tenant_samples_idle() {
    let usage = UsageRecorder::new();
    let sample = usage.sample(&tenant("ghost")).await.unwrap();
    assert!(sample.is_idle());
    assert_eq!(usage.tracked_tenants(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_requests_slide_out_of_window() {
    let usage = UsageRecorder::new();
    let acme = tenant("acme");

    usage.record_requests(&acme, 10);
    tokio::time::advance(Duration::from_secs(30)).await;
    usage.record_request(&acme);
    assert_eq!(usage.sample(&acme).await.unwrap().requests_per_minute, 11);

    tokio::time::advance(Duration::from_secs(31)).await;
    let sample = usage.sample(&acme).await.unwrap();
    assert_eq!(sample.requests_per_minute, 1);
    assert!(sample.last_activity.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_custom_request_window() {
    let usage = UsageRecorder::with_request_window(Duration::from_secs(5));
    let acme = tenant("acme");

    usage.record_requests(&acme, 3);
    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(usage.sample(&acme).await.unwrap().requests_per_minute, 0);
}

#[tokio::test(start_paused = true)]
async fn test_request_bursts_saturate_without_growing() {
    let usage = UsageRecorder::new();
    let acme = tenant("acme");

    usage.record_requests(&acme, u32::MAX);
    usage.record_requests(&acme, u32::MAX);
    assert_eq!(usage.sample(&acme).await.unwrap().requests_per_minute, u32::MAX);

    tokio::time::advance(Duration::from_secs(60)).await;
    usage.record_requests(&acme, 7);
    assert_eq!(usage.sample(&acme).await.unwrap().requests_per_minute, 7);
}

#[tokio::test]
async fn test_known_tenants_lists_recorded_usage() {
    let usage = UsageRecorder::new();
    usage.record_request(&tenant("acme"));
    usage.record_api_call(&tenant("other"));

    let mut known = usage.known_tenants().await;
    known.sort();
    assert_eq!(known, vec![tenant("acme"), tenant("other")]);
}

#[tokio::test]
async fn test_api_calls_are_counted_separately() {
    let usage = UsageRecorder::new();
    let acme = tenant("acme");

    usage.record_request(&acme);
    usage.record_api_call(&acme);
    usage.record_api_call(&acme);

    let sample = usage.sample(&acme).await.unwrap();
    assert_eq!(sample.requests_per_minute, 1);
    assert_eq!(sample.api_calls_today, 2);
}

#[tokio::test]
async fn test_gauges_never_go_negative() {
    let usage = UsageRecorder::new();
    let acme = tenant("acme");

    usage.connection_opened(&acme);
    usage.connection_opened(&acme);
    usage.connection_closed(&acme);
    usage.session_ended(&acme);
    usage.session_started(&acme);
    usage.set_memory_usage_mb(&acme, 128.0);
    usage.set_storage_usage_mb(&acme, -4.0);

    let sample = usage.sample(&acme).await.unwrap();
    assert_eq!(sample.active_connections, 1);
    assert_eq!(sample.concurrent_sessions, 1);
    assert_eq!(sample.memory_usage_mb, 128.0);
    assert_eq!(sample.storage_usage_mb, 0.0);
    assert_eq!(sample.cache_usage_mb, 0.0);
}

#[tokio::test]
async fn test_forget_drops_tenant() {
    let usage = UsageRecorder::new();
    let acme = tenant("acme");
    usage.record_request(&acme);
    usage.record_request(&tenant("other"));
    assert_eq!(usage.tracked_tenants(), 2);

    usage.forget(&acme).await;
    assert_eq!(usage.tracked_tenants(), 1);
    assert!(usage.sample(&acme).await.unwrap().is_idle());
}
