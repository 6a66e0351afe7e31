// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::error_report::Reportable;
use crate::domain::services::llm_service::LlmError;
use crate::engines::traits::EngineError;

/// 提取引擎错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 来源地址未通过校验
    #[error("Invalid source URL {url}: {reason}")]
    InvalidSource { url: String, reason: String },

    /// 页面获取失败
    #[error(transparent)]
    Fetch(#[from] EngineError),

    /// 模型调用失败
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// 单元处理超时
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    /// 其他引擎错误
    #[error("{0}")]
    Other(String),
}

impl ExtractionError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractionError::Fetch(e) => e.is_retryable(),
            ExtractionError::Llm(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl Reportable for ExtractionError {
    fn kind(&self) -> &'static str {
        match self {
            ExtractionError::InvalidSource { .. } => "InvalidSource",
            ExtractionError::Fetch(e) => e.kind(),
            ExtractionError::Llm(LlmError::MissingApiKey) => "MissingApiKey",
            ExtractionError::Llm(LlmError::Request(_)) => "LlmRequestError",
            ExtractionError::Llm(LlmError::Api { .. }) => "LlmApiError",
            ExtractionError::Llm(LlmError::InvalidResponse(_)) => "LlmResponseError",
            ExtractionError::Timeout(_) => "Timeout",
            ExtractionError::Other(_) => "EngineError",
        }
    }
}

/// 提取引擎
///
/// 给定一个来源和一条指令，返回结构化内容（或字符串）或失败。
/// 每次调用相互独立，实现需保证可被并发调用
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    async fn extract(&self, source: &str, instruction: &str) -> Result<Value, ExtractionError>;
}
