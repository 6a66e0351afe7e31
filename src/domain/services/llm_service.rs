// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::settings::LlmSettings;

/// LLM调用错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM api_key not configured")]
    MissingApiKey,

    #[error("Failed to send request to LLM API: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM API returned error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response format from LLM API: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Request(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// LLM服务 - 处理与LLM提供商的交互
///
/// 使用兼容 OpenAI 的 `/chat/completions` 接口。模型名称按配置原样传递
pub struct LLMService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    temperature: f32,
}

impl LLMService {
    pub fn new(settings: &LlmSettings, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 按指令从页面文本中提取数据
    ///
    /// # 参数
    /// * `instruction` - 提取指令
    /// * `content` - 页面文本
    ///
    /// # 返回值
    /// * 模型回复可解析为JSON时返回解析后的值，否则返回原始文本字符串
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或返回格式无效时返回错误
    pub async fn extract(
        &self,
        instruction: &str,
        content: &str,
    ) -> Result<(Value, TokenUsage), LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a precise web data extraction assistant. Reply with a single JSON object and nothing else."
                },
                {
                    "role": "user",
                    "content": format!("{}\n\nPage content:\n{}", instruction, content)
                }
            ],
            "temperature": self.temperature
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body: Value = response.json().await?;

        let usage = body
            .get("usage")
            .map(|u| TokenUsage {
                prompt_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
                completion_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
                total_tokens: u["total_tokens"].as_u64().unwrap_or(0) as u32,
            })
            .unwrap_or_default();

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".into()))?;

        debug!(
            model = %self.model,
            total_tokens = usage.total_tokens,
            "LLM extraction completed"
        );

        Ok((parse_reply(content), usage))
    }
}

/// 去掉 markdown 代码块后解析JSON，失败时保留原文
fn parse_reply(content: &str) -> Value {
    let clean = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str::<Value>(clean).unwrap_or_else(|_| Value::String(content.trim().to_string()))
}
