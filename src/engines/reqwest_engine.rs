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

use crate::engines::traits::{EngineError, FetchRequest, FetchedPage, PageFetcher};
use crate::utils::validators::validate_url;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::time::Instant;
use tracing::debug;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const MAX_REDIRECTS: usize = 10;

/// HTTP抓取引擎
///
/// 基于reqwest实现，不执行JavaScript。
/// 重定向由引擎逐跳跟随，每一跳的目标都经过与入口URL相同的地址校验
pub struct ReqwestEngine {
    client: reqwest::Client,
    allow_private_hosts: bool,
}

impl ReqwestEngine {
    pub fn new(allow_private_hosts: bool) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            allow_private_hosts,
        })
    }

    /// 解析并校验重定向目标
    async fn redirect_target(&self, current: &str, location: &str) -> Result<String, EngineError> {
        let next = Url::parse(current)
            .and_then(|base| base.join(location))
            .map_err(|e| EngineError::BlockedRedirect(format!("{location}: {e}")))?;

        validate_url(next.as_str(), self.allow_private_hosts)
            .await
            .map_err(|e| EngineError::BlockedRedirect(format!("{next}: {e}")))?;

        Ok(next.into())
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 抓取响应
    /// * `Err(EngineError)` - 请求失败或返回非成功状态码
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError> {
        let start = Instant::now();
        let deadline = start + request.timeout;
        let mut url = request.url.clone();
        let mut hops = 0;

        let response = loop {
            let response = self
                .client
                .get(&url)
                .timeout(deadline.saturating_duration_since(Instant::now()))
                .send()
                .await?;

            let location = response
                .headers()
                .get(LOCATION)
                .filter(|_| response.status().is_redirection())
                .map(|value| value.to_str().map(str::to_string));
            let location = match location {
                Some(value) => value.map_err(|e| EngineError::BlockedRedirect(e.to_string()))?,
                None => break response,
            };

            if hops == MAX_REDIRECTS {
                return Err(EngineError::BlockedRedirect(format!(
                    "more than {MAX_REDIRECTS} redirects from {}",
                    request.url
                )));
            }
            hops += 1;

            let next = self.redirect_target(&url, &location).await?;
            debug!(from = %url, to = %next, hops, "Following redirect");
            url = next;
        };

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Err(EngineError::HttpStatus(status_code));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        let content = response.text().await?;

        Ok(FetchedPage {
            status_code,
            content,
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
