//! Integration tests for the probe pipeline
//!
//! These tests use wiremock to stand in for the DNS-over-HTTPS resolver and
//! run the full normalize -> probe -> write cycle against temporary files.

use aaaa_sieve::config::ProbeConfig;
use aaaa_sieve::probe::{build_http_client, probe_url, Orchestrator, ProbeResult, ResolveError};
use aaaa_sieve::storage::{FileStore, LineStore};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRESENT: &str = r#"{"Status":0,"Answer":[{"name":"x.","type":28,"TTL":300,"data":"2001:db8::1"}]}"#;
const NO_ANSWER: &str = r#"{"Status":0}"#;

/// Creates a probe configuration pointing at the mock resolver
fn probe_config(server: &MockServer, concurrency: usize) -> ProbeConfig {
    ProbeConfig {
        concurrency,
        timeout_secs: 5,
        resolver_url: format!("{}/dns-query", server.uri()),
    }
}

/// Mounts a resolver answer for one host
async fn mount_answer(server: &MockServer, host: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", host))
        .and(query_param("type", "AAAA"))
        .and(header("accept", "application/dns-json"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/dns-json")
}

/// Writes `lines` to a file in `dir` and returns a store for it
fn list_file(dir: &TempDir, name: &str, lines: &[&str]) -> FileStore {
    let store = FileStore::new(dir.path().join(name));
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(store.path(), content).expect("Failed to write list file");
    store
}

#[tokio::test]
async fn test_probe_present_host() {
    let server = MockServer::start().await;
    mount_answer(&server, "ipv6.example", json(PRESENT)).await;

    let client = build_http_client(&probe_config(&server, 1)).unwrap();
    let resolver = format!("{}/dns-query", server.uri());

    let result = probe_url(&client, &resolver, "http://ipv6.example/index.html")
        .await
        .expect("Probe failed");

    assert_eq!(
        result,
        ProbeResult::Ipv6Present {
            address: "2001:db8::1".to_string()
        }
    );
}

#[tokio::test]
async fn test_probe_server_error_is_indeterminate() {
    let server = MockServer::start().await;
    mount_answer(&server, "broken.example", ResponseTemplate::new(500)).await;

    let client = build_http_client(&probe_config(&server, 1)).unwrap();
    let resolver = format!("{}/dns-query", server.uri());

    let result = probe_url(&client, &resolver, "http://broken.example").await;

    assert!(matches!(
        result,
        Ok(ProbeResult::Indeterminate { status_code: 500 })
    ));
}

#[tokio::test]
async fn test_probe_missing_answer_is_absent() {
    let server = MockServer::start().await;
    mount_answer(&server, "noaaaa.example", json(NO_ANSWER)).await;

    let client = build_http_client(&probe_config(&server, 1)).unwrap();
    let resolver = format!("{}/dns-query", server.uri());

    let result = probe_url(&client, &resolver, "https://noaaaa.example/").await;

    assert!(matches!(result, Ok(ProbeResult::Ipv6Absent)));
}

#[tokio::test]
async fn test_probe_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_answer(&server, "garbled.example", json("{\"Status\": ")).await;

    let client = build_http_client(&probe_config(&server, 1)).unwrap();
    let resolver = format!("{}/dns-query", server.uri());

    let result = probe_url(&client, &resolver, "http://garbled.example").await;

    assert!(matches!(result, Err(ResolveError::Decode { .. })));
}

#[tokio::test]
async fn test_probe_queries_host_only() {
    let server = MockServer::start().await;
    // only the bare host matches; port, userinfo, path and query are dropped
    mount_answer(&server, "ipv6.example", json(PRESENT)).await;

    let client = build_http_client(&probe_config(&server, 1)).unwrap();
    let resolver = format!("{}/dns-query", server.uri());

    let result = probe_url(
        &client,
        &resolver,
        "https://user@IPv6.Example:8443/deep/path?q=1#top",
    )
    .await;

    assert!(matches!(result, Ok(ProbeResult::Ipv6Present { .. })));
}

#[tokio::test]
async fn test_full_run_mixed_results() {
    let server = MockServer::start().await;
    mount_answer(&server, "ipv6.example", json(PRESENT)).await;
    mount_answer(&server, "broken.example", ResponseTemplate::new(500)).await;
    mount_answer(&server, "noaaaa.example", json(NO_ANSWER)).await;
    mount_answer(&server, "garbled.example", json("not json at all")).await;
    mount_answer(
        &server,
        "nxdomain.example",
        json(r#"{"Status":3,"Answer":[{"data":"2001:db8::9"}]}"#),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let input = list_file(
        &dir,
        "urls.txt",
        &[
            "http://broken.example",
            "http://ipv6.example/a",
            "http://noaaaa.example",
            "http://ipv6.example/a",
            "http://garbled.example",
            "",
            "http://nxdomain.example",
            "http://ipv6.example/b",
        ],
    );
    let output = FileStore::new(dir.path().join("ipv6.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 4)).unwrap();
    let stats = orchestrator
        .run(&input, &output, None)
        .await
        .expect("Run failed");

    assert_eq!(
        output.read_lines().unwrap(),
        vec!["http://ipv6.example/a", "http://ipv6.example/b"]
    );
    assert_eq!(
        input.read_lines().unwrap(),
        vec![
            "http://broken.example",
            "http://ipv6.example/a",
            "http://noaaaa.example",
            "http://garbled.example",
            "http://nxdomain.example",
            "http://ipv6.example/b",
        ]
    );

    assert_eq!(stats.input_lines, 7);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.probed, 6);
    assert_eq!(stats.ipv6_present, 2);
    assert_eq!(stats.ipv6_absent, 2);
    assert_eq!(stats.indeterminate, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_duplicate_urls_probed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", "example.com"))
        .respond_with(json(PRESENT))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = list_file(&dir, "urls.txt", &["http://example.com", "http://example.com"]);
    let output = FileStore::new(dir.path().join("out.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 2)).unwrap();
    orchestrator.run(&input, &output, None).await.unwrap();

    assert_eq!(input.read_lines().unwrap(), vec!["http://example.com"]);
    assert_eq!(output.read_lines().unwrap(), vec!["http://example.com"]);
}

#[tokio::test]
async fn test_ignored_urls_never_probed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", "skip.com"))
        .respond_with(json(PRESENT))
        .expect(0)
        .mount(&server)
        .await;
    mount_answer(&server, "keep.com", json(PRESENT)).await;

    let dir = TempDir::new().unwrap();
    let input = list_file(&dir, "urls.txt", &["http://skip.com/a", "http://keep.com/a"]);
    let ignore = list_file(&dir, "ignore.txt", &["http://skip.com"]);
    let output = FileStore::new(dir.path().join("out.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 2)).unwrap();
    let stats = orchestrator
        .run(&input, &output, Some(&ignore))
        .await
        .unwrap();

    assert_eq!(input.read_lines().unwrap(), vec!["http://keep.com/a"]);
    assert_eq!(output.read_lines().unwrap(), vec!["http://keep.com/a"]);
    assert_eq!(stats.ignored, 1);
    // ignore list is read, never rewritten
    assert_eq!(
        std::fs::read_to_string(ignore.path()).unwrap(),
        "http://skip.com\n"
    );
}

#[tokio::test]
async fn test_idn_host_queried_in_punycode() {
    let server = MockServer::start().await;
    mount_answer(&server, "xn--bcher-kva.example", json(PRESENT)).await;

    let dir = TempDir::new().unwrap();
    let input = list_file(&dir, "urls.txt", &["https://bücher.example/katalog"]);
    let output = FileStore::new(dir.path().join("out.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 1)).unwrap();
    orchestrator.run(&input, &output, None).await.unwrap();

    assert_eq!(
        input.read_lines().unwrap(),
        vec!["https://xn--bcher-kva.example/katalog"]
    );
    assert_eq!(
        output.read_lines().unwrap(),
        vec!["https://xn--bcher-kva.example/katalog"]
    );
}

#[tokio::test]
async fn test_output_follows_input_order_not_completion_order() {
    let server = MockServer::start().await;

    // earlier URLs answer slower, so completion order is reversed
    let hosts: Vec<String> = (0..8).map(|i| format!("h{}.example", i)).collect();
    for (i, host) in hosts.iter().enumerate() {
        let delay = Duration::from_millis(20 * (8 - i as u64));
        mount_answer(&server, host, json(PRESENT).set_delay(delay)).await;
    }

    let dir = TempDir::new().unwrap();
    let urls: Vec<String> = hosts.iter().map(|h| format!("http://{}/", h)).collect();
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let input = list_file(&dir, "urls.txt", &url_refs);
    let output = FileStore::new(dir.path().join("out.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 8)).unwrap();
    orchestrator.run(&input, &output, None).await.unwrap();

    assert_eq!(output.read_lines().unwrap(), urls);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gate_bounds_concurrent_probes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(json(PRESENT).set_delay(Duration::from_millis(50)))
        .expect(20)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..20).map(|i| format!("http://host{}.example", i)).collect();

    let orchestrator = Orchestrator::new(probe_config(&server, 3)).unwrap();
    let outcomes = orchestrator.probe_all(&urls).await;

    assert_eq!(outcomes.len(), 20);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, Ok(ProbeResult::Ipv6Present { .. }))));

    let gate = orchestrator.gate();
    assert!(gate.peak() <= 3, "peak {} exceeded capacity", gate.peak());
    assert!(gate.peak() >= 1);
    assert_eq!(gate.in_flight(), 0);
    assert_eq!(gate.available(), 3);
}

#[tokio::test]
async fn test_stalled_resolver_times_out_without_stalling_run() {
    let server = MockServer::start().await;
    mount_answer(
        &server,
        "slow.example",
        json(PRESENT).set_delay(Duration::from_secs(5)),
    )
    .await;
    mount_answer(&server, "fast.example", json(PRESENT)).await;

    let dir = TempDir::new().unwrap();
    let input = list_file(&dir, "urls.txt", &["http://slow.example", "http://fast.example"]);
    let output = FileStore::new(dir.path().join("out.txt"));

    let config = ProbeConfig {
        timeout_secs: 1,
        ..probe_config(&server, 2)
    };
    let orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run(&input, &output, None).await.unwrap();

    assert_eq!(output.read_lines().unwrap(), vec!["http://fast.example"]);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.ipv6_present, 1);
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let server = MockServer::start().await;
    mount_answer(&server, "ipv6.example", json(PRESENT)).await;

    let dir = TempDir::new().unwrap();
    let input = list_file(&dir, "urls.txt", &["http://ipv6.example"]);
    let output = FileStore::new(dir.path().join("missing-dir").join("out.txt"));

    let orchestrator = Orchestrator::new(probe_config(&server, 1)).unwrap();
    let result = orchestrator.run(&input, &output, None).await;

    assert!(matches!(result, Err(aaaa_sieve::SieveError::Storage(_))));
}
