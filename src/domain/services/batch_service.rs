// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::settings::ExtractionSettings;
use crate::domain::models::batch::{BatchReport, BatchRequest, BatchResults, UnitResult};
use crate::domain::models::error_report::ErrorReport;
use crate::domain::services::extraction_service::{ExtractionEngine, ExtractionError};
use crate::domain::services::prompt::enhance_prompt;

/// 批量提取服务
///
/// 对每个来源各调用一次提取引擎，单个来源的失败被捕获为 `ErrorReport`，
/// 不会中断其余来源的处理。结果按输入顺序以 `result{N}` 为键返回
pub struct BatchService {
    engine: Arc<dyn ExtractionEngine>,
    unit_timeout: Duration,
    concurrency: usize,
}

impl BatchService {
    pub fn new(engine: Arc<dyn ExtractionEngine>, settings: &ExtractionSettings) -> Self {
        Self::with_limits(engine, settings.unit_timeout(), settings.concurrency)
    }

    pub fn with_limits(
        engine: Arc<dyn ExtractionEngine>,
        unit_timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            engine,
            unit_timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// 执行批量提取
    ///
    /// # 参数
    ///
    /// * `request` - 已校验的批量请求（至少一个来源）
    ///
    /// # 返回值
    ///
    /// 无论多少来源失败都返回完整报告
    pub async fn run_batch(&self, request: &BatchRequest) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        let instruction: Arc<str> = Arc::from(enhance_prompt(request.task()));

        info!(
            %batch_id,
            sources = request.sources().len(),
            concurrency = self.concurrency,
            "Starting batch extraction"
        );

        // buffered 保持输入顺序；条目按值持有以满足 Handler 约束
        let sources = request.sources().to_vec();
        let units: Vec<UnitResult> = stream::iter(sources.into_iter().enumerate())
            .map(|(index, source)| {
                let instruction = Arc::clone(&instruction);
                async move { self.run_unit(batch_id, index + 1, &source, &instruction).await }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let results = BatchResults::from(units);
        metrics::counter!("scrape_batches_total").increment(1);
        info!(
            %batch_id,
            total = results.len(),
            failed = results.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch extraction finished"
        );

        BatchReport {
            input: request.clone(),
            results,
        }
    }

    async fn run_unit(
        &self,
        batch_id: Uuid,
        index: usize,
        source: &str,
        instruction: &str,
    ) -> UnitResult {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(
            self.unit_timeout,
            self.engine.extract(source, instruction),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Timeout(self.unit_timeout)),
        };
        let elapsed = started.elapsed();
        metrics::histogram!("extraction_unit_duration_seconds").record(elapsed.as_secs_f64());

        match outcome {
            Ok(payload) => {
                metrics::counter!("extraction_units_total", "outcome" => "success").increment(1);
                info!(
                    %batch_id,
                    index,
                    source,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Unit extracted"
                );
                UnitResult::success(source, payload)
            }
            Err(err) => {
                let report = ErrorReport::capture(&err);
                metrics::counter!("extraction_units_total", "outcome" => "failure").increment(1);
                warn!(
                    %batch_id,
                    index,
                    source,
                    kind = %report.kind,
                    error = %report.message,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Unit extraction failed"
                );
                UnitResult::failure(source, report)
            }
        }
    }
}
