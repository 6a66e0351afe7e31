// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::config::settings::CorsSettings;
use crate::domain::services::batch_service::BatchService;
use crate::domain::services::render_service::DocumentRenderer;
use crate::infrastructure::artifact::ReportArtifact;
use crate::presentation::handlers::{latex_handler, method_not_allowed, scrape_jobs_handler};
use crate::presentation::middleware::cors::cors_layer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回未挂载依赖的路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route(
            "/scrape_jobs",
            post(scrape_jobs_handler::scrape_jobs).fallback(method_not_allowed),
        )
        .route(
            "/latex-to-pdf",
            post(latex_handler::latex_to_pdf).fallback(method_not_allowed),
        )
}

/// 组装完整应用
///
/// 挂载服务依赖、请求追踪、panic 捕获和跨域处理
pub fn build_router(
    batch_service: Arc<BatchService>,
    renderer: Arc<dyn DocumentRenderer>,
    artifact: Option<Arc<ReportArtifact>>,
    cors: &CorsSettings,
) -> Router {
    routes()
        .layer(Extension(batch_service))
        .layer(Extension(renderer))
        .layer(Extension(artifact))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    error!(details = %details, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "error_type": "Panic",
            "error_message": details,
            "traceback": "",
        })),
    )
        .into_response()
}
