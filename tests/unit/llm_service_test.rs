// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use jobtex::config::settings::{LlmSettings, Settings};
use jobtex::domain::services::llm_service::{LLMService, LlmError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_settings(base_url: &str) -> LlmSettings {
    let mut settings = Settings::defaults().expect("default settings").llm;
    settings.api_key = Some("test-key".to_string());
    settings.api_base_url = format!("{}/v1/", base_url);
    settings
}

#[tokio::test]
async fn test_extract_parses_fenced_json_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"content": "```json\n{\"job_title\": \"Software Engineer\"}\n```"}
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = LLMService::new(&llm_settings(&server.uri()), reqwest::Client::new());
    let (value, usage) = service
        .extract("Extract the job title", "Software Engineer at Example")
        .await
        .unwrap();

    assert_eq!(value, json!({"job_title": "Software Engineer"}));
    assert_eq!(usage.total_tokens, 132);
}

#[tokio::test]
async fn test_extract_reports_api_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let service = LLMService::new(&llm_settings(&server.uri()), reqwest::Client::new());
    let err = service.extract("x", "y").await.unwrap_err();

    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_extract_rejects_reply_without_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
        .mount(&server)
        .await;

    let service = LLMService::new(&llm_settings(&server.uri()), reqwest::Client::new());
    let err = service.extract("x", "y").await.unwrap_err();

    assert!(matches!(err, LlmError::InvalidResponse(_)));
}
