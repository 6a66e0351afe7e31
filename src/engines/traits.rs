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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::error_report::Reportable;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 页面返回非成功状态码
    #[error("Page returned HTTP {0}")]
    HttpStatus(u16),
    /// 重定向目标未通过地址校验
    #[error("Redirect blocked: {0}")]
    BlockedRedirect(String),
    /// 浏览器操作失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::HttpStatus(status) => *status == 429 || *status >= 500,
            EngineError::Timeout => true,
            _ => false,
        }
    }
}

impl Reportable for EngineError {
    fn kind(&self) -> &'static str {
        match self {
            EngineError::RequestFailed(_) => "FetchError",
            EngineError::HttpStatus(_) => "HttpStatusError",
            EngineError::BlockedRedirect(_) => "BlockedRedirect",
            EngineError::Browser(_) => "BrowserError",
            EngineError::Timeout => "FetchTimeout",
            EngineError::Other(_) => "FetchError",
        }
    }
}

/// 页面获取请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
}

/// 获取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP状态码
    pub status_code: u16,
    /// 页面HTML
    pub content: String,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面获取引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取页面
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
