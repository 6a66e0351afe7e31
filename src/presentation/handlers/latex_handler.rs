// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{rejection::JsonRejection, Extension, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tracing::info;

use crate::application::dto::latex_request::{LatexRequestDto, LatexResponseDto};
use crate::domain::services::render_service::DocumentRenderer;
use crate::presentation::errors::AppError;

/// LaTeX 转 PDF 处理器
pub async fn latex_to_pdf(
    Extension(renderer): Extension<Arc<dyn DocumentRenderer>>,
    payload: Result<Json<LatexRequestDto>, JsonRejection>,
) -> Result<Json<LatexResponseDto>, AppError> {
    let Json(payload) = payload?;
    let source = payload
        .source()
        .ok_or_else(|| AppError::Validation("No LaTeX content provided".to_string()))?;

    info!(renderer = renderer.name(), source_bytes = source.len(), "Received latex-to-pdf request");

    match renderer.render(source).await {
        Ok(document) => {
            metrics::counter!("document_renders_total", "outcome" => "success").increment(1);
            Ok(Json(LatexResponseDto {
                pdf: STANDARD.encode(&document.bytes),
            }))
        }
        Err(err) => {
            metrics::counter!("document_renders_total", "outcome" => "failure").increment(1);
            Err(AppError::from(err))
        }
    }
}
