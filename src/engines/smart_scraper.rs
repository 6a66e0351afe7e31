// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::settings::{ExtractionSettings, LlmSettings};
use crate::domain::services::extraction_service::{ExtractionEngine, ExtractionError};
use crate::domain::services::llm_service::LLMService;
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::html_text::{html_to_text, truncate_chars};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::validators::validate_url;

/// 智能抓取引擎
///
/// 获取页面 -> 转换为纯文本 -> 交给LLM按指令提取。
/// 可重试的失败（超时、连接错误、5xx、429）按重试策略重新执行整个流程
pub struct SmartScraper {
    fetcher: Arc<dyn PageFetcher>,
    llm: LLMService,
    retry_policy: RetryPolicy,
    fetch_timeout: Duration,
    max_content_chars: usize,
    allow_private_hosts: bool,
}

impl SmartScraper {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        llm: LLMService,
        llm_settings: &LlmSettings,
        settings: &ExtractionSettings,
    ) -> Self {
        Self {
            fetcher,
            llm,
            retry_policy: RetryPolicy::with_max_retries(settings.max_retries),
            fetch_timeout: settings.fetch_timeout(),
            max_content_chars: llm_settings.max_content_chars,
            allow_private_hosts: settings.allow_private_hosts,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    async fn attempt(&self, source: &str, instruction: &str) -> Result<Value, ExtractionError> {
        let request = FetchRequest {
            url: source.to_string(),
            timeout: self.fetch_timeout,
        };
        let page = self.fetcher.fetch(&request).await?;

        let text = html_to_text(&page.content);
        let text = truncate_chars(&text, self.max_content_chars);
        debug!(
            source,
            engine = self.fetcher.name(),
            status = page.status_code,
            response_time_ms = page.response_time_ms,
            text_chars = text.len(),
            "Page fetched"
        );

        let (value, usage) = self.llm.extract(instruction, text).await?;
        debug!(
            source,
            model = self.llm.model(),
            total_tokens = usage.total_tokens,
            "Content extracted"
        );
        Ok(value)
    }
}

#[async_trait]
impl ExtractionEngine for SmartScraper {
    async fn extract(&self, source: &str, instruction: &str) -> Result<Value, ExtractionError> {
        validate_url(source, self.allow_private_hosts)
            .await
            .map_err(|e| ExtractionError::InvalidSource {
                url: source.to_string(),
                reason: e.to_string(),
            })?;

        self.retry_policy
            .run(|| self.attempt(source, instruction), ExtractionError::is_retryable)
            .await
    }
}
