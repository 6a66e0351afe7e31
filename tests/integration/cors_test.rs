// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use jobtex::config::settings::CorsSettings;
use tower::util::ServiceExt;

use super::helpers::{build_app, permissive_cors, ScriptedEngine, StubRenderer};

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/scrape_jobs")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_preflight_is_answered_without_body() {
    let app = build_app(
        ScriptedEngine::default(),
        StubRenderer::Pdf(vec![]),
        None,
        &permissive_cors(),
    );

    let response = app.oneshot(preflight("https://jobs.example.com")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("POST"));
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_configured_origin_is_echoed() {
    let cors = CorsSettings {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        max_age_secs: 600,
    };
    let app = build_app(ScriptedEngine::default(), StubRenderer::Pdf(vec![]), None, &cors);

    let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_unknown_origin_gets_no_allow_header() {
    let cors = CorsSettings {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        max_age_secs: 600,
    };
    let app = build_app(ScriptedEngine::default(), StubRenderer::Pdf(vec![]), None, &cors);

    let response = app.oneshot(preflight("https://evil.example.com")).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
