// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::services::render_service::{DocumentRenderer, RenderError, RenderedDocument};

/// 远程LaTeX编译服务
///
/// 以 `{"latex": ...}` 提交源文件，成功时响应体即为PDF字节
#[derive(Debug, Clone)]
pub struct RemoteLatexRenderer {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl RemoteLatexRenderer {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DocumentRenderer for RemoteLatexRenderer {
    async fn render(&self, markup: &str) -> Result<RenderedDocument, RenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&json!({ "latex": markup }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Remote LaTeX compilation failed");
            return Err(RenderError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(RenderError::MissingArtifact);
        }

        info!(endpoint = %self.endpoint, pdf_bytes = bytes.len(), "Remote LaTeX document rendered");
        Ok(RenderedDocument::pdf(bytes.to_vec()))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
