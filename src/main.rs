// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jobtex::config::settings::Settings;
use jobtex::domain::services::batch_service::BatchService;
use jobtex::domain::services::llm_service::LLMService;
use jobtex::engines::build_fetcher;
use jobtex::engines::smart_scraper::SmartScraper;
use jobtex::infrastructure::artifact::ReportArtifact;
use jobtex::infrastructure::metrics;
use jobtex::infrastructure::renderers::build_renderer;
use jobtex::presentation::routes;
use jobtex::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting jobtex...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 3. Initialize Prometheus Metrics
    if settings.metrics.enabled {
        metrics::init_metrics(&settings.metrics.listen_addr);
    }

    // 4. Extraction pipeline
    let http_client = reqwest::Client::builder().build()?;
    if settings.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        warn!("LLM api_key is not configured; every scrape unit will fail");
    }
    let llm = LLMService::new(&settings.llm, http_client.clone());
    let fetcher = build_fetcher(&settings.browser, settings.extraction.allow_private_hosts)?;
    info!(engine = fetcher.name(), model = llm.model(), "Extraction engine ready");
    let scraper = Arc::new(SmartScraper::new(
        fetcher,
        llm,
        &settings.llm,
        &settings.extraction,
    ));
    let batch_service = Arc::new(BatchService::new(scraper, &settings.extraction));

    // 5. Document renderer
    let renderer = build_renderer(&settings.renderer, http_client)?;
    info!(backend = renderer.name(), "Document renderer ready");

    let artifact = settings
        .extraction
        .artifact_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(|p| Arc::new(ReportArtifact::new(p)));

    // 6. Start HTTP server
    let app = routes::build_router(batch_service, renderer, artifact, &settings.cors);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
