// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persist error: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// 调试用的最近一次响应文件
///
/// 每次写入覆盖上一次的内容，写入失败只记录警告，不影响响应。
/// 内容先写入同目录的临时文件再重命名到目标路径，并发写入时读者只会看到某一份完整报告
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    path: PathBuf,
}

impl ReportArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save<T: Serialize + ?Sized>(&self, report: &T) -> Result<(), ArtifactError> {
        let data = serde_json::to_vec_pretty(report)?;

        // 确保目录存在
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).await?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), ArtifactError> {
            let mut staged = NamedTempFile::new_in(&dir)?;
            staged.write_all(&data)?;
            staged.flush()?;
            staged.persist(&target)?;
            Ok(())
        })
        .await??;

        Ok(())
    }

    /// 写入报告，失败时只记录日志
    pub async fn record<T: Serialize + ?Sized>(&self, report: &T) {
        match self.save(report).await {
            Ok(()) => debug!(path = %self.path.display(), "Report artifact written"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to write report artifact"),
        }
    }
}
