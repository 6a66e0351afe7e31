// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::error_report::Reportable;

/// 渲染错误
#[derive(Error, Debug)]
pub enum RenderError {
    /// 工作目录读写失败
    #[error("Renderer workspace I/O failed: {0}")]
    Workspace(#[source] io::Error),

    /// 无法启动渲染程序
    #[error("Failed to start renderer {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// 渲染程序返回失败
    #[error("Renderer exited with status {exit_code:?} on pass {pass}")]
    Compilation {
        pass: u32,
        exit_code: Option<i32>,
        diagnostics: String,
    },

    /// 单遍渲染超时
    #[error("Renderer pass {pass} timed out after {timeout:?}")]
    Timeout { pass: u32, timeout: Duration },

    /// 渲染成功但没有产出文件
    #[error("Renderer finished without producing a document")]
    MissingArtifact,

    /// 远程编译服务请求失败
    #[error("Remote compile request failed: {0}")]
    RemoteRequest(#[from] reqwest::Error),

    /// 远程编译服务返回错误
    #[error("Remote compile service returned HTTP {status}")]
    RemoteStatus { status: u16, body: String },
}

impl Reportable for RenderError {
    fn kind(&self) -> &'static str {
        match self {
            RenderError::Workspace(_) => "WorkspaceError",
            RenderError::Spawn { .. } => "RendererUnavailable",
            RenderError::Compilation { .. } => "CompilationFailed",
            RenderError::Timeout { .. } => "Timeout",
            RenderError::MissingArtifact => "MissingArtifact",
            RenderError::RemoteRequest(_) => "RemoteRequestError",
            RenderError::RemoteStatus { .. } => "RemoteCompilationFailed",
        }
    }

    fn diagnostics(&self) -> Option<String> {
        match self {
            RenderError::Compilation { diagnostics, .. } => Some(diagnostics.clone()),
            RenderError::RemoteStatus { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

/// 渲染后的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl RenderedDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: "application/pdf",
        }
    }
}

/// 文档渲染器
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, markup: &str) -> Result<RenderedDocument, RenderError>;

    /// 渲染器名称
    fn name(&self) -> &'static str;
}
