// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use super::helpers::{test_server, ScriptedEngine, StubRenderer};

#[tokio::test]
async fn test_pdf_is_returned_base64_encoded() {
    let server = test_server(
        ScriptedEngine::default(),
        StubRenderer::Pdf(b"%PDF-1.5 rendered".to_vec()),
    );

    let response = server
        .post("/latex-to-pdf")
        .json(&json!({"latex": "\\documentclass{article}\\begin{document}Hi\\end{document}"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let pdf = STANDARD.decode(body["pdf"].as_str().unwrap()).unwrap();
    assert_eq!(pdf, b"%PDF-1.5 rendered");
}

#[tokio::test]
async fn test_missing_latex_is_rejected() {
    let server = test_server(ScriptedEngine::default(), StubRenderer::Pdf(vec![]));

    let response = server.post("/latex-to-pdf").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "No LaTeX content provided"})
    );
}

#[tokio::test]
async fn test_compilation_failure_returns_report() {
    let server = test_server(
        ScriptedEngine::default(),
        StubRenderer::CompileError("! Undefined control sequence.".to_string()),
    );

    let response = server
        .post("/latex-to-pdf")
        .json(&json!({"latex": "\\foo"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "LaTeX compilation failed");
    assert_eq!(body["details"], "! Undefined control sequence.");
    assert_eq!(body["error_type"], "CompilationFailed");
    assert!(body["error_message"].as_str().unwrap().contains("pass 1"));
    assert_eq!(body["traceback"], "! Undefined control sequence.");
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let server = test_server(ScriptedEngine::default(), StubRenderer::Pdf(vec![]));

    let response = server.get("/latex-to-pdf").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}
