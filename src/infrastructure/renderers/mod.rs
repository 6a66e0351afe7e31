// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 文档渲染器实现
///
/// - 本地（local）：在临时目录中调用 `pdflatex`
/// - 远程（remote）：提交到外部编译服务
pub mod local;
pub mod remote;

use std::sync::Arc;
use thiserror::Error;

use crate::config::settings::{RendererBackend, RendererSettings};
use crate::domain::services::render_service::DocumentRenderer;
use local::LocalLatexRenderer;
use remote::RemoteLatexRenderer;

#[derive(Error, Debug)]
pub enum RendererConfigError {
    #[error("renderer.remote_url is required for the remote backend")]
    MissingRemoteUrl,
}

/// 根据配置构建渲染器
pub fn build_renderer(
    settings: &RendererSettings,
    client: reqwest::Client,
) -> Result<Arc<dyn DocumentRenderer>, RendererConfigError> {
    let renderer: Arc<dyn DocumentRenderer> = match settings.backend {
        RendererBackend::Local => Arc::new(LocalLatexRenderer::from_settings(settings)),
        RendererBackend::Remote => {
            let url = settings
                .remote_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .ok_or(RendererConfigError::MissingRemoteUrl)?;
            Arc::new(RemoteLatexRenderer::new(client, url, settings.timeout()))
        }
    };
    Ok(renderer)
}
