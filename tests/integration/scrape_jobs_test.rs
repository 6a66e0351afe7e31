// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use jobtex::infrastructure::artifact::ReportArtifact;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use tempfile::TempDir;

use super::helpers::{build_app, permissive_cors, test_server, ScriptedEngine, StubRenderer};

fn job_engine() -> ScriptedEngine {
    ScriptedEngine::default()
        .succeed(
            "https://x.example/job1",
            json!({"job_title": "Software Engineer"}),
        )
        .fail("https://x.example/job2", "Scraping failed")
}

#[tokio::test]
async fn test_partial_failure_is_reported_per_unit() {
    let engine = job_engine();
    let calls = engine.calls();
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .json(&json!({
            "urls": ["https://x.example/job1", "https://x.example/job2"],
            "prompt": "Test prompt"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();

    assert_eq!(
        body["input"],
        json!({
            "urls": ["https://x.example/job1", "https://x.example/job2"],
            "prompt": "Test prompt"
        })
    );
    assert_eq!(body["results"]["result1"]["url"], "https://x.example/job1");
    assert_eq!(
        body["results"]["result1"]["result"],
        json!({"job_title": "Software Engineer"})
    );
    assert!(body["results"]["result1"]["error"].is_null());

    assert!(body["results"]["result2"]["result"].is_null());
    assert_eq!(body["results"]["result2"]["error"]["error_type"], "EngineError");
    assert_eq!(
        body["results"]["result2"]["error"]["error_message"],
        "Scraping failed"
    );
    assert!(body["results"]["result2"]["error"]["traceback"]
        .as_str()
        .unwrap()
        .contains("Scraping failed"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_keys_follow_input_order() {
    let sources: Vec<String> = (1..=5).map(|i| format!("https://x.example/job{i}")).collect();
    let engine = sources.iter().fold(ScriptedEngine::default(), |engine, source| {
        engine.succeed(source, json!({"source": source}))
    });
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .json(&json!({"urls": &sources, "prompt": ""}))
        .await;

    let body = response.json::<Value>();
    let results = body["results"].as_object().unwrap();
    let keys: Vec<&String> = results.keys().collect();
    assert_eq!(keys, ["result1", "result2", "result3", "result4", "result5"]);
    for (i, source) in sources.iter().enumerate() {
        assert_eq!(body["results"][format!("result{}", i + 1)]["url"], *source);
    }
}

#[tokio::test]
async fn test_missing_prompt_defaults_to_empty() {
    let server = test_server(job_engine(), StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .json(&json!({"urls": ["https://x.example/job1"]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["input"]["prompt"], "");
}

#[tokio::test]
async fn test_missing_urls_is_rejected() {
    let engine = job_engine();
    let calls = engine.calls();
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .json(&json!({"prompt": "Test prompt"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "No URLs provided"}));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_urls_is_rejected() {
    let engine = job_engine();
    let calls = engine.calls();
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .json(&json!({"urls": [], "prompt": "Test prompt"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"error": "No URLs provided"}));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let engine = job_engine();
    let calls = engine.calls();
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server
        .post("/scrape_jobs")
        .text("{\"urls\": [")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let engine = job_engine();
    let calls = engine.calls();
    let server = test_server(engine, StubRenderer::Pdf(vec![]));

    let response = server.get("/scrape_jobs").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Only POST requests are supported"})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_report_artifact_is_written() {
    let dir = TempDir::new().unwrap();
    let artifact_path = dir.path().join("outputs.json");
    let app = build_app(
        job_engine(),
        StubRenderer::Pdf(vec![]),
        Some(ReportArtifact::new(&artifact_path)),
        &permissive_cors(),
    );
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/scrape_jobs")
        .json(&json!({"urls": ["https://x.example/job1"], "prompt": "p"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let written: Value = serde_json::from_slice(&std::fs::read(&artifact_path).unwrap()).unwrap();
    assert_eq!(written, response.json::<Value>());
}
