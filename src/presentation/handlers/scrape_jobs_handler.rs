// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{rejection::JsonRejection, Extension, Json};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::scrape_jobs_request::ScrapeJobsRequestDto;
use crate::domain::models::batch::{BatchReport, BatchRequest};
use crate::domain::services::batch_service::BatchService;
use crate::infrastructure::artifact::ReportArtifact;
use crate::presentation::errors::AppError;

/// 批量职位抓取处理器
///
/// 单个URL的失败记录在响应体中，只要请求本身有效就返回 200
pub async fn scrape_jobs(
    Extension(batch_service): Extension<Arc<BatchService>>,
    Extension(artifact): Extension<Option<Arc<ReportArtifact>>>,
    payload: Result<Json<ScrapeJobsRequestDto>, JsonRejection>,
) -> Result<Json<BatchReport>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let request = BatchRequest::try_from(payload)?;
    info!(sources = request.sources().len(), "Received scrape_jobs request");

    let report = batch_service.run_batch(&request).await;

    if let Some(artifact) = artifact {
        artifact.record(&report).await;
    }

    Ok(Json(report))
}
