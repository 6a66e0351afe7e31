// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use jobtex::config::settings::CorsSettings;
use jobtex::domain::services::batch_service::BatchService;
use jobtex::domain::services::extraction_service::{ExtractionEngine, ExtractionError};
use jobtex::domain::services::render_service::{DocumentRenderer, RenderError, RenderedDocument};
use jobtex::infrastructure::artifact::ReportArtifact;
use jobtex::presentation::routes;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 按来源返回预设结果的提取引擎
#[derive(Default)]
pub struct ScriptedEngine {
    outcomes: HashMap<String, Result<Value, String>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    /// 提取调用计数，引擎移交给服务后仍可读取
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn succeed(mut self, source: &str, payload: Value) -> Self {
        self.outcomes.insert(source.to_string(), Ok(payload));
        self
    }

    pub fn fail(mut self, source: &str, message: &str) -> Self {
        self.outcomes.insert(source.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl ExtractionEngine for ScriptedEngine {
    async fn extract(&self, source: &str, _instruction: &str) -> Result<Value, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.get(source) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(ExtractionError::Other(message.clone())),
            None => Err(ExtractionError::Other(format!("no script for {}", source))),
        }
    }
}

/// 返回固定结果的渲染器
pub enum StubRenderer {
    Pdf(Vec<u8>),
    CompileError(String),
}

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn render(&self, _markup: &str) -> Result<RenderedDocument, RenderError> {
        match self {
            StubRenderer::Pdf(bytes) => Ok(RenderedDocument::pdf(bytes.clone())),
            StubRenderer::CompileError(diagnostics) => Err(RenderError::Compilation {
                pass: 1,
                exit_code: Some(1),
                diagnostics: diagnostics.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn permissive_cors() -> CorsSettings {
    CorsSettings {
        allowed_origins: vec![],
        max_age_secs: 3600,
    }
}

pub fn build_app(
    engine: ScriptedEngine,
    renderer: StubRenderer,
    artifact: Option<ReportArtifact>,
    cors: &CorsSettings,
) -> Router {
    let batch_service = Arc::new(BatchService::with_limits(
        Arc::new(engine),
        Duration::from_secs(5),
        2,
    ));
    routes::build_router(batch_service, Arc::new(renderer), artifact.map(Arc::new), cors)
}

pub fn test_server(engine: ScriptedEngine, renderer: StubRenderer) -> TestServer {
    TestServer::new(build_app(engine, renderer, None, &permissive_cors())).unwrap()
}
