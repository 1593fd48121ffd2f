//! Integration tests for the advisor resolver
//!
//! Drives the live branch against a mock chat-completion endpoint and checks
//! that every failure lands on the local template.

use compass_engine::advisor::{template, AdviceSource, AdvisorResolver};
use compass_engine::config::AdvisorConfig;
use sdk::types::{AdvisorRequest, UserProfile};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const PROMPT: &str = "What should I study?";

fn ana() -> UserProfile {
    UserProfile {
        id: "user-ana".into(),
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password_hash: String::new(),
        grade: Some("10".into()),
        interests: vec!["biology".into(), "art".into()],
        goals: Some("become a designer".into()),
        created_at: 0,
    }
}

fn config(server: &MockServer, api_key: Option<&str>) -> AdvisorConfig {
    AdvisorConfig {
        api_key: api_key.map(String::from),
        base_url: server.uri(),
        model: "gpt-4o-mini".into(),
        temperature: 0.7,
        timeout_secs: 1,
    }
}

async fn resolve(server: &MockServer) -> compass_engine::advisor::Advice {
    let resolver = AdvisorResolver::from_config(&config(server, Some("test-key")));
    resolver.resolve(&AdvisorRequest::new(ana(), Some(PROMPT))).await
}

async fn assert_falls_back(response: ResponseTemplate) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;

    let advice = resolve(&server).await;

    assert_eq!(advice.source, AdviceSource::Fallback);
    assert_eq!(advice.text, template::render(&ana(), PROMPT));
    server.verify().await;
}

#[tokio::test]
async fn test_live_answer_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system" },
                { "role": "user" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Try a biology club and an art portfolio." },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let advice = resolve(&server).await;

    assert_eq!(advice.source, AdviceSource::Live);
    assert_eq!(advice.text, "Try a biology club and an art portfolio.");
    server.verify().await;
}

#[tokio::test]
async fn test_server_error_falls_back() {
    assert_falls_back(ResponseTemplate::new(500).set_body_string("upstream exploded")).await;
}

#[tokio::test]
async fn test_unauthorized_falls_back() {
    assert_falls_back(ResponseTemplate::new(401)).await;
}

#[tokio::test]
async fn test_empty_body_falls_back() {
    assert_falls_back(ResponseTemplate::new(200)).await;
}

#[tokio::test]
async fn test_malformed_json_falls_back() {
    assert_falls_back(ResponseTemplate::new(200).set_body_string("{\"choices\": [")).await;
}

#[tokio::test]
async fn test_missing_content_falls_back() {
    assert_falls_back(
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [{ "message": {} }] })),
    )
    .await;
    assert_falls_back(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] }))).await;
}

#[tokio::test]
async fn test_blank_content_falls_back() {
    assert_falls_back(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": "   " } }]
    })))
    .await;
}

#[tokio::test]
async fn test_slow_response_times_out_and_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let advice = resolve(&server).await;

    assert_eq!(advice.source, AdviceSource::Fallback);
    assert_eq!(advice.text, template::render(&ana(), PROMPT));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_no_credential_makes_no_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for key in [None, Some(""), Some("   ")] {
        let resolver = AdvisorResolver::from_config(&config(&server, key));
        assert!(!resolver.is_live());

        let advice = resolver
            .resolve(&AdvisorRequest::new(ana(), Some(PROMPT)))
            .await;
        assert_eq!(advice.source, AdviceSource::Template);
    }

    server.verify().await;
}

#[tokio::test]
async fn test_scenario_ana_without_credential() {
    let text = AdvisorResolver::local_only()
        .resolve_advice(&ana(), Some(PROMPT))
        .await;

    assert!(text.starts_with(
        "Hi Ana, based on your interests in biology, art and your goal \"become a designer\""
    ));
    assert!(text.ends_with(template::CLOSING_LINE));
    assert!(text.contains("What should I study?"));
}
