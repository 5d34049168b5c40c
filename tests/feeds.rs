// Content sources against mocked upstream APIs.

use godfather::config::{ScienceConfig, ScienceDomain, TechConfig};
use godfather::feed::arxiv::ScienceFeed;
use godfather::feed::market::MarketPulse;
use godfather::feed::tech::TechFeed;
use godfather::feed::types::Channel;
use godfather::feed::IntelFeed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tech_config(base: &str) -> TechConfig {
    TechConfig {
        hn_base_url: base.to_string(),
        market_base_url: base.to_string(),
        top_stories: 10,
        ..TechConfig::default()
    }
}

fn chart_body(open: f64, close: f64) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {"symbol": "NVDA"},
                "indicators": {"quote": [{"open": [open], "close": [close]}]}
            }],
            "error": null
        }
    })
}

async fn mount_item(server: &MockServer, id: u64, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id, "title": title, "type": "story"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_tech_feed_picks_first_keyword_story() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([11, 12, 13])))
        .mount(&server)
        .await;
    mount_item(&server, 11, "Rust 2024 edition is out").await;
    mount_item(&server, 12, "Nvidia ships a new GPU").await;
    Mock::given(method("GET"))
        .and(path("/item/13.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 13, "title": "startup"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NVDA"))
        .and(query_param("range", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(100.0, 102.0)))
        .mount(&server)
        .await;

    let mut feed = TechFeed::new(&tech_config(&server.uri()));
    let briefing = feed.gather(&mut StdRng::seed_from_u64(1)).await.unwrap();

    assert_eq!(briefing.channel, Channel::Tech);
    assert_eq!(briefing.intel.title, "Nvidia ships a new GPU");
    assert_eq!(briefing.intel.source, "Hacker News");
    assert_eq!(briefing.detail, "NVDA UP 2.00%");
}

#[tokio::test]
async fn test_tech_feed_only_scans_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;
    mount_item(&server, 1, "Gardening tips").await;
    Mock::given(method("GET"))
        .and(path("/item/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "title": "AI startup raises"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = tech_config(&server.uri());
    config.top_stories = 1;
    let mut feed = TechFeed::new(&config);
    let briefing = feed.gather(&mut StdRng::seed_from_u64(1)).await.unwrap();

    assert_eq!(briefing.intel.title, "The Stagnation of Software");
    assert_eq!(briefing.intel.source, "Observation");
}

#[tokio::test]
async fn test_tech_feed_survives_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topstories.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NVDA"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let mut feed = TechFeed::new(&tech_config(&server.uri()));
    let briefing = feed.gather(&mut StdRng::seed_from_u64(1)).await.unwrap();

    assert_eq!(briefing.intel.title, "The Stagnation of Software");
    assert_eq!(briefing.detail, "Flat");
}

#[tokio::test]
async fn test_market_down_and_empty_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NVDA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(200.0, 199.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AMD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chart": {"result": null, "error": {"code": "Not Found"}}})))
        .mount(&server)
        .await;

    let market = MarketPulse::new(&server.uri(), 5_000);
    assert_eq!(market.market_line("NVDA").await, "NVDA DOWN 0.50%");
    assert_eq!(market.market_line("AMD").await, "Flat");
}

const ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query</title>
  <entry><title>Gene Regulatory
     Networks in Yeast</title></entry>
  <entry><title>Long-read Assembly at Scale</title></entry>
</feed>"#;

fn science_config(base: &str) -> ScienceConfig {
    ScienceConfig {
        arxiv_base_url: format!("{}/api/query", base),
        domains: vec![ScienceDomain {
            name: "genetics".into(),
            category: "q-bio.GN".into(),
        }],
        ..ScienceConfig::default()
    }
}

#[tokio::test]
async fn test_science_feed_queries_latest_papers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "cat:q-bio.GN"))
        .and(query_param("start", "0"))
        .and(query_param("max_results", "5"))
        .and(query_param("sortBy", "submittedDate"))
        .and(query_param("sortOrder", "descending"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATOM))
        .expect(1)
        .mount(&server)
        .await;

    let mut feed = ScienceFeed::new(&science_config(&server.uri()));
    let briefing = feed.gather(&mut StdRng::seed_from_u64(4)).await.unwrap();

    assert_eq!(briefing.channel, Channel::Science);
    assert_eq!(briefing.intel.source, "ArXiv (GENETICS)");
    assert_eq!(briefing.detail, "genetics");
    assert!(
        briefing.intel.title == "Gene Regulatory Networks in Yeast"
            || briefing.intel.title == "Long-read Assembly at Scale",
        "unexpected title {}",
        briefing.intel.title
    );
}

#[tokio::test]
async fn test_science_feed_errors_without_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed><title>empty</title></feed>"))
        .mount(&server)
        .await;

    let mut feed = ScienceFeed::new(&science_config(&server.uri()));
    let err = feed.gather(&mut StdRng::seed_from_u64(4)).await.unwrap_err();
    assert!(err.to_string().contains("no entries"), "{err:#}");
}

#[tokio::test]
async fn test_science_feed_errors_on_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let mut feed = ScienceFeed::new(&science_config(&server.uri()));
    let err = feed.gather(&mut StdRng::seed_from_u64(4)).await.unwrap_err();
    assert!(err.to_string().contains("503"), "{err:#}");
}
