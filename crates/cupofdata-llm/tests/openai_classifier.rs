//! Integration tests for `OpenAiClassifier` against a local `wiremock` server.

use cupofdata_core::{DrinkStat, Segment};
use cupofdata_extract::{
    Capability, ClassifierError, EntityExtractor, OpinionClassifier, ProseSummarizer,
    RelevanceClassifier, Segmenter,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cupofdata_llm::{LlmConfig, OpenAiClassifier};

fn classifier(server: &MockServer) -> OpenAiClassifier {
    OpenAiClassifier::new(LlmConfig {
        api_key: "sk-test".to_owned(),
        base_url: format!("{}/v1", server.uri()),
        model: "gpt-4o-mini".to_owned(),
        timeout_secs: 5,
    })
    .expect("failed to build test classifier")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn mount_reply(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn extract_drinks_requests_json_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"drinks":["蜜桃凍飲","珍珠奶茶"]}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drinks = classifier(&server).extract_drinks("蜜桃凍飲跟珍奶").await.unwrap();
    assert_eq!(drinks, vec!["蜜桃凍飲", "珍珠奶茶"]);
}

#[tokio::test]
async fn relevance_yes_and_no() {
    let server = MockServer::start().await;
    mount_reply(&server, "YES").await;
    assert!(classifier(&server).is_relevant("五十嵐", "四季春好喝").await.unwrap());

    let server = MockServer::start().await;
    mount_reply(&server, "no").await;
    assert!(!classifier(&server).is_relevant("五十嵐", "可不可紅茶").await.unwrap());
}

#[tokio::test]
async fn relevance_free_text_is_malformed() {
    let server = MockServer::start().await;
    mount_reply(&server, "Yes, this is about the brand.").await;
    let err = classifier(&server)
        .is_relevant("五十嵐", "四季春")
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            ClassifierError::MalformedResponse {
                capability: Capability::Relevance,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn opinion_true_false() {
    let server = MockServer::start().await;
    mount_reply(&server, "false").await;
    assert!(!classifier(&server).is_opinion("店在捷運站旁").await.unwrap());
}

#[tokio::test]
async fn segments_are_decoded() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        r#"{"segments":[{"brand":"迷客夏","content":"珍珠鮮奶"}]}"#,
    )
    .await;
    let segments = classifier(&server).segment("迷客夏的珍珠鮮奶").await.unwrap();
    assert_eq!(segments, vec![Segment::new("迷客夏", "珍珠鮮奶")]);
}

#[tokio::test]
async fn summary_is_trimmed() {
    let server = MockServer::start().await;
    mount_reply(&server, "\n大家最推珍珠奶茶。\n").await;
    let text = classifier(&server)
        .summarize("五十嵐", &[DrinkStat::new("珍珠奶茶")])
        .await
        .unwrap();
    assert_eq!(text, "大家最推珍珠奶茶。");
}

#[tokio::test]
async fn quota_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("insufficient_quota"))
        .mount(&server)
        .await;
    let err = classifier(&server).is_opinion("好喝").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Unavailable { .. }), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let err = classifier(&server).extract_drinks("紅茶").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Request { .. }), "got {err:?}");
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;
    let err = classifier(&server)
        .summarize("五十嵐", &[DrinkStat::new("紅茶")])
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClassifierError::MalformedResponse { .. }),
        "got {err:?}"
    );
}
