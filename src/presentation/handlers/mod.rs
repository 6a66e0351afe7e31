// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 包含各个API端点的具体处理逻辑
pub mod latex_handler;
pub mod scrape_jobs_handler;

use crate::presentation::errors::AppError;

/// 非 POST 请求的统一响应
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
