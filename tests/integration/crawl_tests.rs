//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the platform and run full
//! searches end-to-end. Pacing runs on a virtual clock, so no test waits on
//! real sleeps.

use gifter_radar::config::{Config, EndpointConfig};
use gifter_radar::credentials::{Anonymous, CredentialProvider, StaticCredentials};
use gifter_radar::crawler::{CancelHandle, Crawler, SearchRequest, VirtualClock};
use gifter_radar::{
    AbortReason, Category, Credits, FetchError, RadarError, Role, SearchError, SearchReport,
};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use reqwest::header::HeaderMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every endpoint at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.endpoints = EndpointConfig {
        landing_url: format!("{}/live/recommended", base_url),
        feed_base: format!("{}/feeds/byTags", base_url),
        social_base: format!("{}/social", base_url),
        profile_base: "https://tango.example/profile/".to_string(),
        stream_base: "https://tango.example/stream/".to_string(),
    };
    config
}

fn create_test_crawler(
    config: Config,
    credentials: Arc<dyn CredentialProvider>,
) -> (Crawler, Arc<VirtualClock>) {
    let clock = Arc::new(VirtualClock::new());
    let crawler = Crawler::new(config, credentials)
        .expect("Failed to create crawler")
        .with_clock(clock.clone());
    (crawler, clock)
}

/// Builds a feed page from (stream id, broadcaster id, broadcaster name)
fn feed_body(streams: &[(&str, &str, &str)]) -> String {
    let stream_map: Map<String, Value> = streams
        .iter()
        .enumerate()
        .map(|(i, (sid, bid, _))| {
            (
                format!("entry{}", i),
                json!({"id": sid, "broadcasterId": bid, "viewerCount": 12}),
            )
        })
        .collect();
    let profile_map: Map<String, Value> = streams
        .iter()
        .map(|(_, bid, name)| (bid.to_string(), json!({"firstName": name})))
        .collect();

    json!({
        "data": {
            "stream": stream_map,
            "basicProfile": profile_map
        }
    })
    .to_string()
}

fn gifter(id: &str, credits: u64) -> Value {
    json!({
        "account": {"encryptedAccountId": id, "firstName": format!("{}-name", id), "vipConfigId": 2},
        "creditsInStream": credits,
        "isSubscriber": false,
        "subscriptionLevel": 1,
        "incognito": false
    })
}

fn viewer(id: &str) -> Value {
    json!({"account": {"encryptedAccountId": id, "gender": "MALE"}})
}

fn social_body(gifters: Vec<Value>, viewers: Vec<Value>) -> String {
    json!({"gifters": gifters, "viewers": viewers}).to_string()
}

async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/live/recommended"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(server)
        .await;
}

async fn mount_feed(server: &MockServer, tag: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/feeds/byTags"))
        .and(query_param("tag", tag))
        .and(query_param("pageCount", "0"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_social(server: &MockServer, stream_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/social/{}/topGifters", stream_id)))
        .respond_with(response)
        .mount(server)
        .await;
}

fn json_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/json")
}

fn request(targets: &[&str], budget: u32, categories: &[&str]) -> SearchRequest {
    SearchRequest::new(targets, budget, Some(categories)).expect("Invalid request")
}

fn assert_report_invariants(report: &SearchReport, targets: &[&str], budget: u32) {
    let ordinals: Vec<u64> = report.matches.iter().map(|m| m.ordinal).collect();
    let expected: Vec<u64> = (1..=report.matches.len() as u64).collect();
    assert_eq!(ordinals, expected, "ordinals must be gapless from 1");

    assert_eq!(report.total_found, report.matches.len());

    let targets: HashSet<&str> = targets.iter().copied().collect();
    for record in &report.matches {
        assert!(targets.contains(record.target_account_id.as_str()));
    }

    let mut seen = HashSet::new();
    for record in &report.matches {
        assert!(
            seen.insert((record.target_account_id.clone(), record.stream_link.clone())),
            "a target appears at most once per stream"
        );
    }

    let bound = u64::from(budget) * report.categories_searched.len() as u64;
    assert!(report.searched_streams_count <= bound);
}

#[tokio::test]
async fn test_targets_found_as_gifter_and_viewer() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "Bella"), ("S2", "B2", "Bruno")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("X", 5), gifter("A", 1200)], vec![])),
    )
    .await;
    mount_social(
        &mock_server,
        "S2",
        json_response(social_body(vec![], vec![viewer("B")])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A", "B"], 2, &["Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.total_found, 2);
    assert_eq!(report.searched_streams_count, 2);
    assert_eq!(report.categories_searched, vec![Category::Popular]);

    let first = &report.matches[0];
    assert_eq!(first.ordinal, 1);
    assert_eq!(first.target_account_id, "A");
    assert_eq!(first.target_display_name.as_deref(), Some("A-name"));
    assert_eq!(first.role, Role::Gifter);
    assert_eq!(first.credits, Credits::Amount(1200));
    assert_eq!(first.streamer_id, "B1");
    assert_eq!(first.streamer_name.as_deref(), Some("Bella"));
    assert_eq!(first.vip_status.as_deref(), Some("2"));
    assert_eq!(first.fan_level, Some(1));
    assert_eq!(first.profile_links.target, "https://tango.example/profile/A");
    assert_eq!(first.profile_links.streamer, "https://tango.example/profile/B1");
    assert_eq!(first.stream_link, "https://tango.example/stream/S1");
    assert_eq!(first.category, Category::Popular);

    let second = &report.matches[1];
    assert_eq!(second.ordinal, 2);
    assert_eq!(second.target_account_id, "B");
    assert_eq!(second.role, Role::Viewer);
    assert_eq!(second.credits, Credits::Viewer);
    assert_eq!(second.gender.as_deref(), Some("MALE"));
    assert_eq!(second.stream_link, "https://tango.example/stream/S2");

    assert_report_invariants(&report, &["A", "B"], 2);
}

#[tokio::test]
async fn test_budget_limits_inspected_streams() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[
            ("S1", "B1", "One"),
            ("S2", "B2", "Two"),
            ("S3", "B3", "Three"),
        ])),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/social/S1/topGifters"))
        .respond_with(json_response(social_body(vec![], vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/social/S2/topGifters"))
        .respond_with(json_response(social_body(vec![gifter("A", 1)], vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 1, &["Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.searched_streams_count, 1);
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_budget_applies_per_category() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One"), ("S2", "B2", "Two")])),
    )
    .await;
    mount_feed(
        &mock_server,
        "hottest",
        json_response(feed_body(&[("S3", "B3", "Three"), ("S4", "B4", "Four")])),
    )
    .await;
    for stream in ["S1", "S2", "S3", "S4"] {
        mount_social(
            &mock_server,
            stream,
            json_response(social_body(vec![gifter("A", 3)], vec![])),
        )
        .await;
    }

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 2, &["Recommended", "Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.searched_streams_count, 4);
    assert_eq!(
        report.categories_searched,
        vec![Category::Recommended, Category::Popular]
    );

    // Same target in every stream: one record each, in crawl order
    let streams: Vec<&str> = report.matches.iter().map(|m| m.stream_link.as_str()).collect();
    assert_eq!(
        streams,
        vec![
            "https://tango.example/stream/S3",
            "https://tango.example/stream/S4",
            "https://tango.example/stream/S1",
            "https://tango.example/stream/S2",
        ]
    );
    assert_eq!(report.matches[0].category, Category::Recommended);
    assert_eq!(report.matches[3].category, Category::Popular);
    assert_report_invariants(&report, &["A"], 2);
}

#[tokio::test]
async fn test_malformed_feed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(r#"{"stream": {"a": {"id": "S9", "broadcasterId": "B9"}}}"#.to_string()),
    )
    .await;
    mount_feed(
        &mock_server,
        "nearby",
        json_response(feed_body(&[("S1", "B1", "Near")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 7)], vec![])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 5, &["Popular", "Nearby"]))
        .await
        .expect("A malformed page must not end the search");

    assert_eq!(report.categories_searched, vec![Category::Popular, Category::Nearby]);
    assert_eq!(report.searched_streams_count, 1);
    assert_eq!(report.total_found, 1);
    assert_eq!(report.matches[0].category, Category::Nearby);
}

#[tokio::test]
async fn test_profiles_out_of_order_are_matched_by_key() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;

    let body = json!({
        "stream": {
            "a": {"id": "S1", "broadcasterId": "B1"},
            "b": {"id": "S2", "broadcasterId": "B2"}
        },
        "basicProfile": {
            "B2": {"firstName": "Two"},
            "B1": {"firstName": "One"}
        }
    })
    .to_string();
    mount_feed(&mock_server, "popular", json_response(body)).await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 1)], vec![])),
    )
    .await;
    mount_social(
        &mock_server,
        "S2",
        json_response(social_body(vec![], vec![viewer("A")])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 5, &["Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.searched_streams_count, 2);
    assert_eq!(report.total_found, 2);
    assert_eq!(report.matches[0].streamer_id, "B1");
    assert_eq!(report.matches[0].streamer_name.as_deref(), Some("One"));
    assert_eq!(report.matches[1].streamer_id, "B2");
    assert_eq!(report.matches[1].streamer_name.as_deref(), Some("Two"));
}

#[tokio::test]
async fn test_malformed_first_page_does_not_stop_later_pages() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response("{\"data\": ".to_string()),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feeds/byTags"))
        .and(query_param("tag", "popular"))
        .and(query_param("pageCount", "1"))
        .and(query_param("pageSize", "2"))
        .respond_with(json_response(feed_body(&[("S3", "B3", "Three")])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_social(
        &mock_server,
        "S3",
        json_response(social_body(vec![gifter("A", 6)], vec![])),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.search.page_size = 2;
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 3, &["Popular"]))
        .await
        .expect("A malformed page must not end the category");

    assert_eq!(report.searched_streams_count, 1);
    assert_eq!(report.total_found, 1);
    assert_eq!(report.matches[0].stream_link, "https://tango.example/stream/S3");
}

#[tokio::test]
async fn test_anonymous_viewer_does_not_hide_gifter() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(
            vec![gifter("A", 25)],
            vec![json!({"account": {"firstName": "hidden"}}), viewer("B")],
        )),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A", "B"], 1, &["Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.total_found, 2);
    assert_eq!(report.matches[0].target_account_id, "A");
    assert_eq!(report.matches[0].credits, Credits::Amount(25));
    assert_eq!(report.matches[1].target_account_id, "B");
    assert_report_invariants(&report, &["A", "B"], 1);
}

#[tokio::test]
async fn test_failed_social_list_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[
            ("S1", "B1", "One"),
            ("S2", "B2", "Two"),
            ("S3", "B3", "Three"),
        ])),
    )
    .await;
    mount_social(&mock_server, "S1", ResponseTemplate::new(500)).await;
    mount_social(&mock_server, "S2", json_response("not json".to_string())).await;
    mount_social(
        &mock_server,
        "S3",
        json_response(social_body(vec![], vec![viewer("A")])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 3, &["Popular"]))
        .await
        .expect("Search failed");

    // Skipped streams still count as searched
    assert_eq!(report.searched_streams_count, 3);
    assert_eq!(report.total_found, 1);
    assert_eq!(report.matches[0].ordinal, 1);
    assert_eq!(report.matches[0].stream_link, "https://tango.example/stream/S3");
}

#[tokio::test]
async fn test_timed_out_social_list_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "Slow"), ("S2", "B2", "Fast")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 1)], vec![])).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_social(
        &mock_server,
        "S2",
        json_response(social_body(vec![gifter("A", 2)], vec![])),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.http.request_timeout_secs = 1;
    config.http.connect_timeout_secs = 1;
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 2, &["Popular"]))
        .await
        .expect("Search failed");

    assert_eq!(report.searched_streams_count, 2);
    assert_eq!(report.total_found, 1);
    assert_eq!(report.matches[0].credits, Credits::Amount(2));
}

#[tokio::test]
async fn test_rejected_credentials_abort_with_partial_report() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[
            ("S1", "B1", "One"),
            ("S2", "B2", "Two"),
            ("S3", "B3", "Three"),
        ])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 9)], vec![])),
    )
    .await;
    mount_social(&mock_server, "S2", ResponseTemplate::new(403)).await;

    Mock::given(method("GET"))
        .and(path("/social/S3/topGifters"))
        .respond_with(json_response(social_body(vec![gifter("A", 1)], vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let result = crawler.search(&request(&["A"], 3, &["Popular", "Nearby"])).await;

    match result {
        Err(SearchError::Aborted { partial, reason }) => {
            assert!(matches!(
                reason,
                AbortReason::Fatal(FetchError::Unauthorized { status: 403, .. })
            ));
            assert_eq!(partial.total_found, 1);
            assert_eq!(partial.matches[0].stream_link, "https://tango.example/stream/S1");
            assert_eq!(partial.searched_streams_count, 1);
            assert_eq!(partial.categories_searched, vec![Category::Popular]);
        }
        other => panic!("Expected an aborted search, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_feed_request_aborts() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(&mock_server, "popular", ResponseTemplate::new(401)).await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let error = crawler
        .search(&request(&["A"], 3, &["Popular"]))
        .await
        .expect_err("401 must abort");

    let partial = error.partial_report().expect("Aborted searches keep a report");
    assert!(partial.is_empty());
    assert_eq!(partial.searched_streams_count, 0);
}

#[tokio::test]
async fn test_failed_warmup_is_ignored() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live/recommended"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 4)], vec![])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));

    let report = crawler
        .search(&request(&["A"], 1, &["Popular"]))
        .await
        .expect("Search failed");
    assert_eq!(report.total_found, 1);
}

#[tokio::test]
async fn test_cancelled_search_returns_partial_report() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/feeds/byTags"))
        .respond_with(json_response(feed_body(&[("S1", "B1", "One")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));
    crawler.cancel_handle().cancel();

    let result = crawler.search(&request(&["A"], 3, &["Popular"])).await;

    match result {
        Err(SearchError::Aborted { partial, reason }) => {
            assert!(matches!(reason, AbortReason::Cancelled));
            assert_eq!(partial.searched_streams_count, 0);
            assert!(partial.categories_searched.is_empty());
        }
        other => panic!("Expected a cancelled search, got {:?}", other),
    }
}

/// Cancels the search from inside the request path once `cancel_on` requests were started
struct CancellingCredentials {
    handle: Mutex<Option<CancelHandle>>,
    calls: AtomicUsize,
    cancel_on: usize,
}

impl CredentialProvider for CancellingCredentials {
    fn auth_headers(&self) -> Result<HeaderMap, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.cancel_on {
            if let Some(handle) = self.handle.lock().unwrap().as_ref() {
                handle.cancel();
            }
        }
        Ok(HeaderMap::new())
    }
}

#[tokio::test]
async fn test_cancel_during_search_keeps_finished_streams() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One"), ("S2", "B2", "Two")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 8)], vec![])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/social/S2/topGifters"))
        .respond_with(json_response(social_body(vec![gifter("A", 1)], vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    // Warmup, feed page, then the first social list
    let credentials = Arc::new(CancellingCredentials {
        handle: Mutex::new(None),
        calls: AtomicUsize::new(0),
        cancel_on: 3,
    });
    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, credentials.clone());
    *credentials.handle.lock().unwrap() = Some(crawler.cancel_handle());

    let result = crawler.search(&request(&["A"], 2, &["Popular", "Nearby"])).await;

    match result {
        Err(SearchError::Aborted { partial, reason }) => {
            assert!(matches!(reason, AbortReason::Cancelled));
            assert_eq!(partial.searched_streams_count, 1);
            assert_eq!(partial.total_found, 1);
            assert_eq!(partial.matches[0].stream_link, "https://tango.example/stream/S1");
            assert_eq!(partial.categories_searched, vec![Category::Popular]);
        }
        other => panic!("Expected a cancelled search, got {:?}", other),
    }
}

#[tokio::test]
async fn test_crawler_is_reusable_after_cancel() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![], vec![viewer("A")])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));
    let handle = crawler.cancel_handle();
    handle.cancel();

    let first = crawler.search(&request(&["A"], 1, &["Popular"])).await;
    assert!(matches!(
        first,
        Err(SearchError::Aborted {
            reason: AbortReason::Cancelled,
            ..
        })
    ));
    assert!(!handle.is_cancelled());

    let report = crawler
        .search(&request(&["A"], 1, &["Popular"]))
        .await
        .expect("Second search must run");
    assert_eq!(report.total_found, 1);
}

#[tokio::test]
async fn test_pacing_pauses() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One"), ("S2", "B2", "Two")])),
    )
    .await;
    mount_social(&mock_server, "S1", json_response(social_body(vec![], vec![]))).await;
    mount_social(&mock_server, "S2", json_response(social_body(vec![], vec![]))).await;

    let mut config = create_test_config(&mock_server.uri());
    config.pacing.request_delay_ms = 500;
    config.pacing.burst_every = 2;
    config.pacing.burst_pause_ms = 2000;
    config.pacing.warmup_pause_factor = 2;
    let (crawler, clock) = create_test_crawler(config, Arc::new(Anonymous));

    crawler
        .search(&request(&["A"], 2, &["Popular"]))
        .await
        .expect("Search failed");

    // Warmup pause, gap before the first social list, burst pause before stream 2
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(500),
            Duration::from_millis(2000),
        ]
    );
}

#[tokio::test]
async fn test_credential_headers_are_sent() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/feeds/byTags"))
        .and(header("cookie", "session=abc"))
        .respond_with(json_response(feed_body(&[("S1", "B1", "One")])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/social/S1/topGifters"))
        .and(query_param("enableViewers", "true"))
        .and(header("cookie", "session=abc"))
        .respond_with(json_response(social_body(vec![], vec![viewer("A")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config
        .credentials
        .headers
        .insert("Cookie".to_string(), "session=abc".to_string());
    let credentials = StaticCredentials::from_config(&config.credentials).unwrap();
    let (crawler, _clock) = create_test_crawler(config, Arc::new(credentials));

    let report = crawler
        .search(&request(&["A"], 1, &["Popular"]))
        .await
        .expect("Search failed");
    assert_eq!(report.total_found, 1);
}

#[tokio::test]
async fn test_search_entry_point_uses_configured_categories() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "following",
        json_response(feed_body(&[("S1", "B1", "Friend")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![gifter("A", 50)], vec![])),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.search.categories = vec!["Following".to_string()];
    config.pacing.request_delay_ms = 0;
    config.pacing.burst_pause_ms = 0;

    let report = gifter_radar::search(config, Arc::new(Anonymous), &["A"], 1, None)
        .await
        .expect("Search failed");

    assert_eq!(report.categories_searched, vec![Category::Following]);
    assert_eq!(report.total_found, 1);
}

#[tokio::test]
async fn test_search_entry_point_rejects_bad_parameters() {
    let config = create_test_config("http://127.0.0.1:9");
    let empty: [&str; 0] = [];

    let result = gifter_radar::search(config.clone(), Arc::new(Anonymous), &empty, 1, None).await;
    assert!(matches!(
        result,
        Err(RadarError::Config(gifter_radar::ConfigError::EmptyTargets))
    ));

    let unknown = vec!["Trending".to_string()];
    let result =
        gifter_radar::search(config, Arc::new(Anonymous), &["A"], 1, Some(unknown.as_slice())).await;
    assert!(matches!(
        result,
        Err(RadarError::Config(gifter_radar::ConfigError::UnknownCategory(_)))
    ));
}

#[tokio::test]
async fn test_report_serializes_with_expected_fields() {
    let mock_server = MockServer::start().await;
    mount_landing(&mock_server).await;
    mount_feed(
        &mock_server,
        "popular",
        json_response(feed_body(&[("S1", "B1", "One")])),
    )
    .await;
    mount_social(
        &mock_server,
        "S1",
        json_response(social_body(vec![], vec![viewer("A")])),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let (crawler, _clock) = create_test_crawler(config, Arc::new(Anonymous));
    let report = crawler
        .search(&request(&["A"], 1, &["Popular"]))
        .await
        .expect("Search failed");

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["totalFound"], 1);
    assert_eq!(value["searchedStreamsCount"], 1);
    assert_eq!(value["categoriesSearched"], json!(["Popular"]));

    let record = &value["matches"][0];
    assert_eq!(record["ordinal"], 1);
    assert_eq!(record["targetAccountId"], "A");
    assert_eq!(record["role"], "viewer");
    assert_eq!(record["credits"], "viewer");
    assert_eq!(record["streamerName"], "One");
    assert_eq!(record["profileLinks"]["target"], "https://tango.example/profile/A");
    assert_eq!(record["streamLink"], "https://tango.example/stream/S1");
    assert!(record["targetDisplayName"].is_null());

    let decoded: SearchReport = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, report);
}
