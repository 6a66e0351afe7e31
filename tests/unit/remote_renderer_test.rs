// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use jobtex::domain::models::error_report::ErrorReport;
use jobtex::domain::services::render_service::{DocumentRenderer, RenderError};
use jobtex::infrastructure::renderers::remote::RemoteLatexRenderer;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn renderer(server: &MockServer) -> RemoteLatexRenderer {
    RemoteLatexRenderer::new(
        reqwest::Client::new(),
        format!("{}/compile", server.uri()),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_remote_render_returns_pdf_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile"))
        .and(body_json(serde_json::json!({"latex": "\\documentclass{article}"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let document = renderer(&server).render("\\documentclass{article}").await.unwrap();

    assert_eq!(document.bytes, b"%PDF-1.7");
    assert_eq!(document.content_type, "application/pdf");
}

#[tokio::test]
async fn test_remote_failure_carries_service_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile"))
        .respond_with(ResponseTemplate::new(422).set_body_string("! Missing $ inserted."))
        .mount(&server)
        .await;

    let err = renderer(&server).render("$x").await.unwrap_err();
    assert!(matches!(err, RenderError::RemoteStatus { status: 422, .. }));

    let report = ErrorReport::capture(&err);
    assert_eq!(report.kind, "RemoteCompilationFailed");
    assert_eq!(report.trace, "! Missing $ inserted.");
}
