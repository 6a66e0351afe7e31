// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;
use validator::ValidationErrors;

use crate::domain::models::batch::BatchRequestError;
use crate::domain::models::error_report::{ErrorReport, Reportable};
use crate::domain::services::render_service::RenderError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口。
/// 响应体总是包含 `error` 字段
#[derive(Debug)]
pub enum AppError {
    /// 请求参数无效 (400)
    Validation(String),
    /// 请求方法不支持 (405)
    MethodNotAllowed,
    /// 文档渲染失败 (500)
    Render(RenderError),
    /// 其他内部错误 (500)
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            AppError::Validation(message) => json!({ "error": message }),
            AppError::MethodNotAllowed => json!({ "error": "Only POST requests are supported" }),
            AppError::Render(err) => {
                let report = ErrorReport::capture(err);
                let details = err.diagnostics().unwrap_or_else(|| report.message.clone());
                json!({
                    "error": "LaTeX compilation failed",
                    "details": details,
                    "error_type": report.kind,
                    "error_message": report.message,
                    "traceback": report.trace,
                })
            }
            AppError::Internal(err) => json!({
                "error": err.to_string(),
                "error_type": "InternalError",
                "error_message": err.to_string(),
                "traceback": format!("{:?}", err),
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // 只返回第一条校验信息
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("Validation error: {}", errors));
        AppError::Validation(message)
    }
}

impl From<BatchRequestError> for AppError {
    fn from(err: BatchRequestError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}
