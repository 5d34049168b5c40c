// End-to-end runs with every external API mocked.

use godfather::config::{ArtStyle, Config};
use godfather::feed::types::Channel;
use godfather::linkedin::auth::LinkedInAuth;
use godfather::linkedin::rest::LinkedInRest;
use godfather::pipeline::{Pipeline, Publisher, RunOptions};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &tempfile::TempDir) -> Config {
    let base = server.uri();
    let mut config = Config::default();
    config.tech.hn_base_url = base.clone();
    config.tech.market_base_url = base.clone();
    config.science.arxiv_base_url = format!("{}/api/query", base);
    config.gemini.base_url = base.clone();
    config.gemini.models = vec!["m1".into()];
    config.gemini.discover_models = false;
    config.gemini.retry_backoff_ms = 0;
    config.linkedin.api_base = base;
    config.art.width = 320;
    config.art.height = 160;
    config.art.attractor_iterations = 10_000;
    config.art.image_path = dir.path().join("visual.png").to_string_lossy().into_owned();
    config
}

async fn mount_gemini(server: &MockServer, prompt_fragment: &str, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/models/m1:generateContent"))
        .and(body_string_contains(prompt_fragment))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": reply}]}}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mind_run_publishes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, &dir);
    config.mind.topics = vec!["Camus and The Absurd".into()];

    mount_gemini(&server, "Modern Philosopher", "\"Roll the boulder anyway.\"").await;
    Mock::given(method("POST"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {
                "uploadMechanism": {
                    "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest": {
                        "uploadUrl": format!("{}/upload/1", server.uri())
                    }
                },
                "asset": "urn:li:digitalmediaAsset:A1"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ugcPosts"))
        .and(body_string_contains("Roll the boulder anyway."))
        .respond_with(ResponseTemplate::new(201).insert_header("x-restli-id", "urn:li:share:1"))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(LinkedInAuth::new("tok".into()));
    let rest = LinkedInRest::new(auth, &config.linkedin).unwrap();
    let publisher = Publisher::new(rest, Some("member1".into()));
    let mut pipeline = Pipeline::new(&config, vec!["k1".into()], Some(publisher)).unwrap();

    let opts = RunOptions {
        dry_run: false,
        channel: Some(Channel::Mind),
        style: Some(ArtStyle::Chart),
        seed: Some(7),
    };
    let report = pipeline.run(&opts).await.unwrap();

    assert_eq!(report.briefing.channel, Channel::Mind);
    assert_eq!(report.briefing.intel.title, "Camus and The Absurd");
    assert_eq!(report.post, "Roll the boulder anyway.");
    assert!(!report.fell_back());
    let published = report.published.unwrap();
    assert_eq!(published.author, "urn:li:person:member1");
    assert_eq!(published.post_id.as_deref(), Some("urn:li:share:1"));

    let png = std::fs::read(&report.image_path).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    // The uploaded bytes are the image written to disk.
    let requests = server.received_requests().await.unwrap();
    let upload = requests.iter().find(|r| r.url.path() == "/upload/1").unwrap();
    assert_eq!(upload.body, png);
}

#[tokio::test]
async fn test_science_failure_falls_back_to_mind_in_dry_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, &dir);
    config.mind.topics = vec!["Biocentrism".into()];

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_gemini(&server, "Biocentrism", "Life first.").await;
    Mock::given(method("POST"))
        .and(path("/ugcPosts"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut pipeline = Pipeline::new(&config, vec!["k1".into()], None).unwrap();
    let opts = RunOptions {
        dry_run: true,
        channel: Some(Channel::Science),
        style: Some(ArtStyle::Attractor),
        seed: Some(3),
    };
    let report = pipeline.run(&opts).await.unwrap();

    assert_eq!(report.requested, Channel::Science);
    assert_eq!(report.briefing.channel, Channel::Mind);
    assert!(report.fell_back());
    assert_eq!(report.style, ArtStyle::Attractor);
    assert_eq!(report.post, "Life first.");
    assert!(report.published.is_none());
    assert!(report.image_path.exists());
}

#[tokio::test]
async fn test_weighted_draw_honours_config() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, &dir);
    config.channels.tech_weight = 0;
    config.channels.science_weight = 0;
    config.channels.mind_weight = 1;

    mount_gemini(&server, "Modern Philosopher", "Stay curious.").await;

    let mut pipeline = Pipeline::new(&config, vec!["k1".into()], None).unwrap();
    let opts = RunOptions {
        dry_run: true,
        seed: Some(11),
        ..RunOptions::default()
    };
    let report = pipeline.run(&opts).await.unwrap();
    assert_eq!(report.requested, Channel::Mind);
}

#[tokio::test]
async fn test_publish_without_publisher_errors() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);
    mount_gemini(&server, "Modern Philosopher", "Unsent.").await;

    let mut pipeline = Pipeline::new(&config, vec!["k1".into()], None).unwrap();
    let opts = RunOptions {
        dry_run: false,
        channel: Some(Channel::Mind),
        style: None,
        seed: Some(1),
    };
    let err = pipeline.run(&opts).await.unwrap_err();
    assert!(err.to_string().contains("no LinkedIn publisher"), "{err:#}");
}
