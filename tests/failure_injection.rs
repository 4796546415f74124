//! Failure injection tests for the streaming proxy.

use std::time::{Duration, Instant};

use m3u_proxy::config::ProxyConfig;
use reqwest::header;

mod common;
use common::MockResponse;

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let dead = common::closed_port();
    let (proxy, _shutdown) = common::start_proxy(ProxyConfig::default()).await;

    let res = common::client()
        .get(format!("http://{}/{}/video/seg1.ts", proxy, dead))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 502);
    assert!(res.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(res.text().await.unwrap().starts_with("Error de proxy:"));
}

#[tokio::test]
async fn test_unreachable_default_origin_manifest() {
    let dead = common::closed_port();
    let mut config = ProxyConfig::default();
    config.upstream.base_url = format!("http://{}/", dead);
    let (proxy, _shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{}/live/index.m3u8", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert!(res.text().await.unwrap().starts_with("Error de proxy:"));
}

#[tokio::test]
async fn test_slow_upstream_head_times_out() {
    let (upstream, _seen) = common::start_upstream(|_| {
        MockResponse::ok("video/mp2t", vec![0u8; 16]).delayed(Duration::from_secs(5))
    })
    .await;

    let mut config = ProxyConfig::default();
    config.timeouts.upstream_secs = 1;
    let (proxy, _shutdown) = common::start_proxy(config).await;

    let started = Instant::now();
    let res = common::client()
        .get(format!("http://{}/{}/video/seg1.ts", proxy, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(res.text().await.unwrap().starts_with("Error de proxy:"));
}

#[tokio::test]
async fn test_undecomposable_manifest_is_internal_error() {
    let (upstream, _seen) = common::start_upstream(|_| {
        MockResponse::ok("application/x-mpegURL", "#EXTM3U\nhttp://[::1/seg1.ts\n")
    })
    .await;
    let (proxy, _shutdown) = common::start_proxy(ProxyConfig::default()).await;

    let res = common::client()
        .get(format!("http://{}/{}/live/index.m3u8", proxy, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert!(res
        .text()
        .await
        .unwrap()
        .starts_with("Error interno del servidor:"));
}

#[tokio::test]
async fn test_client_disconnect_mid_segment() {
    const BIG: usize = 32 * 1024 * 1024;

    let (logs, _guard) = common::capture_logs();
    let (upstream, _seen) = common::start_upstream(|target| {
        if target.contains("big") {
            MockResponse::ok("video/mp2t", vec![0x47u8; BIG])
        } else {
            MockResponse::ok("video/mp2t", vec![0x47u8; 1024])
        }
    })
    .await;
    let (proxy, _shutdown) = common::start_proxy(ProxyConfig::default()).await;
    let client = common::client();

    let mut res = client
        .get(format!("http://{}/{}/video/big.ts", proxy, upstream))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let first = res.chunk().await.unwrap().expect("at least one chunk");
    assert!(!first.is_empty());
    drop(res);

    // The abandoned stream is reported exactly once, with what was sent.
    let reports = logs.wait_for_report("video/big.ts").await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["outcome"], "abandoned");
    let sent = reports[0]["bytes"].as_u64().unwrap();
    assert!(sent > 0 && sent < BIG as u64);

    // The proxy keeps serving after the abandoned stream.
    let res = client
        .get(format!("http://{}/{}/video/small.ts", proxy, upstream))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.bytes().await.unwrap().len(), 1024);

    let reports = logs.wait_for_report("video/small.ts").await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["outcome"], "completed");
    assert_eq!(reports[0]["bytes"], 1024);
    assert_eq!(logs.segment_reports("video/big.ts").len(), 1);
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let (proxy, shutdown) = common::start_proxy(ProxyConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("http://{}/", proxy)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    drop(res);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = common::client();
    assert!(fresh.get(format!("http://{}/", proxy)).send().await.is_err());
}
