//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up both the crawled site and the
//! ingestion endpoint, and run the full crawl cycle end-to-end.

use std::collections::HashMap;
use std::time::Duration;
use web_connector::config::{parse_config, CrawlConfig, CrawlerLimits};
use web_connector::crawler::Coordinator;
use web_connector::ingest::content_id;
use web_connector::state::PageState;
use web_connector::CrawlReport;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `site` and posting to `ingest`
fn create_test_config(site: &MockServer, ingest: &MockServer) -> CrawlConfig {
    CrawlConfig {
        timestamp: 1_609_459_200_000,
        datasource_id: "42".to_string(),
        ingestion_url: format!("{}/ingest", ingest.uri()),
        allowed_domains: vec!["127.0.0.1".to_string()],
        start_urls: vec![format!("{}/", site.uri())],
        allowed_paths: vec![],
        excluded_paths: vec![],
        follow: true,
        max_content_length: 1000,
        crawler: CrawlerLimits {
            max_concurrent_pages: 4,
            fetch_timeout: Duration::from_secs(5),
            ingestion_timeout: Duration::from_secs(5),
            ..CrawlerLimits::default()
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

async fn mount_ingestion(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_redirect(server: &MockServer, page_path: &str, location: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location))
        .expect(1)
        .mount(server)
        .await;
}

type Record = HashMap<String, String>;

/// Decodes the form fields of every ingestion POST the endpoint received
async fn received_records(server: &MockServer) -> Vec<Record> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            url::form_urlencoded::parse(&request.body)
                .into_owned()
                .collect()
        })
        .collect()
}

fn payload(record: &Record) -> serde_json::Value {
    serde_json::from_str(&record["datasourcePayload"]).expect("payload is JSON")
}

fn payload_url(record: &Record) -> String {
    payload(record)["web"]["url"]
        .as_str()
        .expect("url")
        .to_string()
}

async fn crawl(config: CrawlConfig) -> CrawlReport {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
}

#[tokio::test]
async fn test_single_page_truncated_without_follow() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <p>Hello world</p>
            <a href="/other">Other</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_page(&site, "/other", "<p>never fetched</p>", 0).await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.start_urls = vec![site.uri()];
    config.allowed_paths = vec![".*".to_string()];
    config.follow = false;
    config.max_content_length = 5;

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.ingested(), 1);

    let records = received_records(&ingest).await;
    assert_eq!(records.len(), 1);

    let record = &records[0];
    let page_url = format!("{}/", site.uri());
    assert_eq!(record.len(), 5);
    assert_eq!(record["datasourceId"], "42");
    assert_eq!(record["rawContent"], "Hello");
    assert_eq!(record["contentId"], content_id(&page_url).to_string());

    let payload = payload(record);
    assert_eq!(payload["web"]["url"], page_url.as_str());
    assert_eq!(payload["web"]["title"], "Home");
    assert_eq!(payload["web"]["content"], "Hello");
    assert_eq!(
        payload["web"]["favicon"],
        format!("{}/favicon.ico", site.uri()).as_str()
    );
}

#[tokio::test]
async fn test_follows_links_and_visits_each_page_once() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_page(&site, "/a", r#"<p>A</p><a href="/">Home</a><a href="/b">B</a>"#, 1).await;
    mount_page(&site, "/b", r#"<p>B</p><a href="/a#top">A</a><a href="/b/">B</a>"#, 1).await;
    mount_ingestion(&ingest, 200).await;

    let report = crawl(create_test_config(&site, &ingest)).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.ingested(), 3);
    assert!(report.failures.is_empty());

    let records = received_records(&ingest).await;
    assert_eq!(records.len(), 3);

    // Every record carries the same run-constant parsing date
    let dates: Vec<i64> = records
        .iter()
        .map(|r| r["parsingDate"].parse().unwrap())
        .collect();
    assert!(dates.iter().all(|d| *d == dates[0]));
}

#[tokio::test]
async fn test_excluded_page_is_traversed_but_not_ingested() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/private">Private</a>"#, 1).await;
    mount_page(
        &site,
        "/private",
        r#"<p>Secret</p><a href="/public">Public</a>"#,
        1,
    )
    .await;
    mount_page(&site, "/public", "<p>Public</p>", 1).await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.excluded_paths = vec!["/private".to_string()];

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.ingested(), 2);
    assert_eq!(report.excluded(), 1);

    let records = received_records(&ingest).await;
    let mut urls: Vec<String> = records.iter().map(payload_url).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![format!("{}/", site.uri()), format!("{}/public", site.uri())]
    );
}

#[tokio::test]
async fn test_dispatch_failure_does_not_stop_the_crawl() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/a">A</a>"#, 1).await;
    mount_page(&site, "/a", r#"<p>A</p><a href="/b">B</a>"#, 1).await;
    mount_page(&site, "/b", "<p>B</p>", 1).await;
    mount_ingestion(&ingest, 503).await;

    let report = crawl(create_test_config(&site, &ingest)).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.ingested(), 0);
    assert_eq!(report.count(PageState::DispatchFailed), 3);
    assert_eq!(report.failures.len(), 3);
    assert!(report
        .failures
        .iter()
        .all(|f| f.state == PageState::DispatchFailed && f.message.contains("503")));
}

#[tokio::test]
async fn test_rejected_sibling_does_not_affect_the_other() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_page(&site, "/a", "<p>A</p>", 1).await;
    mount_page(&site, "/b", "<p>B</p>", 1).await;

    let rejected = format!("contentId={}&", content_id(&format!("{}/a", site.uri())));
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(body_string_contains(rejected.as_str()))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&ingest)
        .await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.excluded_paths = vec![format!("^{}/$", site.uri())];

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.excluded(), 1);
    assert_eq!(report.ingested(), 1);
    assert_eq!(report.count(PageState::DispatchFailed), 1);

    let failed = &report.failures[0];
    assert_eq!(failed.url, format!("{}/a", site.uri()));
    assert_eq!(received_records(&ingest).await.len(), 2);
}

#[tokio::test]
async fn test_redirect_to_visited_page_is_not_ingested_twice() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/old">Old</a>"#, 1).await;
    mount_redirect(&site, "/old", "/").await;
    mount_ingestion(&ingest, 200).await;

    let report = crawl(create_test_config(&site, &ingest)).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.ingested(), 1);
    assert_eq!(report.count(PageState::Redirected), 1);

    let records = received_records(&ingest).await;
    assert_eq!(records.len(), 1);
    assert_eq!(payload_url(&records[0]), format!("{}/", site.uri()));
}

#[tokio::test]
async fn test_redirect_target_is_crawled_under_its_own_url() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/moved">Moved</a>"#, 1).await;
    mount_redirect(&site, "/moved", "/landing").await;
    mount_page(&site, "/landing", "<p>Landing</p>", 1).await;
    mount_ingestion(&ingest, 200).await;

    let report = crawl(create_test_config(&site, &ingest)).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.ingested(), 2);

    let mut urls: Vec<String> = received_records(&ingest).await.iter().map(payload_url).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![format!("{}/", site.uri()), format!("{}/landing", site.uri())]
    );
}

#[tokio::test]
async fn test_allowed_paths_and_domains_filter_links() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<p>Home</p>
        <a href="/blog/1">Post</a>
        <a href="/about">About</a>
        <a href="https://elsewhere.example.org/blog/2">Offsite</a>
        <a href="mailto:someone@example.com">Mail</a>"#,
        1,
    )
    .await;
    mount_page(&site, "/blog/1", "<p>Post</p>", 1).await;
    mount_page(&site, "/about", "<p>About</p>", 0).await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.allowed_paths = vec!["/blog/".to_string()];

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.ingested(), 2);
    assert_eq!(report.links_discovered, 3);
    assert_eq!(report.links_admitted, 1);
}

#[tokio::test]
async fn test_max_pages_bounds_the_crawl() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/page/{}">{}</a>"#, i, i))
        .collect();
    mount_page(&site, "/", &links, 1).await;
    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&site)
        .await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.crawler.max_pages = 3;

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.links_admitted, 2);
    assert_eq!(received_records(&ingest).await.len(), 3);
}

#[tokio::test]
async fn test_max_depth_bounds_the_crawl() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<a href="/1">1</a>"#, 1).await;
    mount_page(&site, "/1", r#"<a href="/2">2</a>"#, 1).await;
    mount_page(&site, "/2", r#"<a href="/3">3</a>"#, 0).await;
    mount_ingestion(&ingest, 200).await;

    let mut config = create_test_config(&site, &ingest);
    config.crawler.max_depth = Some(1);

    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.pages_by_depth.get(&0), Some(&1));
    assert_eq!(report.pages_by_depth.get(&1), Some(&1));
}

#[tokio::test]
async fn test_fetch_failures_are_reported() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<p>Home</p><a href="/missing">Gone</a><a href="/doc.pdf">PDF</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25_u8, 0x50], "application/pdf"))
        .expect(1)
        .mount(&site)
        .await;
    mount_ingestion(&ingest, 200).await;

    let report = crawl(create_test_config(&site, &ingest)).await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.ingested(), 1);
    assert_eq!(report.count(PageState::DeadLink), 1);
    assert_eq!(report.count(PageState::ContentMismatch), 1);
    assert_eq!(received_records(&ingest).await.len(), 1);

    let dead = report
        .failures
        .iter()
        .find(|f| f.state == PageState::DeadLink)
        .expect("dead link recorded");
    assert_eq!(dead.url, format!("{}/missing", site.uri()));
}

#[tokio::test]
async fn test_crawl_from_toml_config() {
    let site = MockServer::start().await;
    let ingest = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/news/1">News</a>"#, 1).await;
    mount_page(&site, "/news/1", "<p>Story</p>", 1).await;
    mount_ingestion(&ingest, 200).await;

    let toml = format!(
        r#"
timestamp = "1609459200000"
datasource-id = 7
ingestion-url = "{}/ingest"
allowed-domains = "['127.0.0.1']"
start-urls = "['{}/']"
allowed-paths = "['/news/']"
excluded-paths = "[]"
follow = "true"
max-length = "100"

[crawler]
max-concurrent-pages = 2
"#,
        ingest.uri(),
        site.uri()
    );
    let config = parse_config(&toml).expect("valid config");

    let report = crawl(config).await;

    assert_eq!(report.ingested(), 2);
    let records = received_records(&ingest).await;
    assert!(records.iter().all(|r| r["datasourceId"] == "7"));
}
