// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::settings::RendererSettings;
use crate::domain::services::render_service::{DocumentRenderer, RenderError, RenderedDocument};

const JOB_NAME: &str = "document";
const LOG_TAIL_LINES: usize = 20;

/// 本地LaTeX渲染器
///
/// 在临时目录中写入源文件并多遍调用排版程序（默认 `pdflatex`），
/// 以便解析交叉引用。非零退出码视为失败，即使已生成PDF也不返回。
/// 临时目录在任何退出路径上都会被删除
#[derive(Debug, Clone)]
pub struct LocalLatexRenderer {
    program: PathBuf,
    passes: u32,
    timeout: Duration,
}

impl LocalLatexRenderer {
    pub fn new(program: impl Into<PathBuf>, passes: u32, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            passes: passes.max(1),
            timeout,
        }
    }

    pub fn from_settings(settings: &RendererSettings) -> Self {
        Self::new(&settings.program, settings.passes, settings.timeout())
    }

    async fn run_pass(&self, workdir: &Path, pass: u32) -> Result<Output, RenderError> {
        let child = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg(format!("{}.tex", JOB_NAME))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Dropping the future on timeout kills the child
        tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout {
                pass,
                timeout: self.timeout,
            })?
            .map_err(RenderError::Workspace)
    }
}

#[async_trait]
impl DocumentRenderer for LocalLatexRenderer {
    async fn render(&self, markup: &str) -> Result<RenderedDocument, RenderError> {
        let started = Instant::now();
        let workdir = tempfile::Builder::new()
            .prefix("latex-")
            .tempdir()
            .map_err(RenderError::Workspace)?;

        tokio::fs::write(workdir.path().join(format!("{}.tex", JOB_NAME)), markup)
            .await
            .map_err(RenderError::Workspace)?;

        for pass in 1..=self.passes {
            let output = self.run_pass(workdir.path(), pass).await?;
            if !output.status.success() {
                let diagnostics = collect_diagnostics(workdir.path(), &output).await;
                warn!(
                    program = %self.program.display(),
                    pass,
                    exit_code = output.status.code().unwrap_or(-1),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "LaTeX compilation failed"
                );
                return Err(RenderError::Compilation {
                    pass,
                    exit_code: output.status.code(),
                    diagnostics,
                });
            }
        }

        let bytes = match tokio::fs::read(workdir.path().join(format!("{}.pdf", JOB_NAME))).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(RenderError::MissingArtifact),
            Err(e) => return Err(RenderError::Workspace(e)),
        };

        info!(
            program = %self.program.display(),
            passes = self.passes,
            pdf_bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LaTeX document rendered"
        );

        Ok(RenderedDocument::pdf(bytes))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// 从编译日志提取错误行，没有日志时退回到程序输出
async fn collect_diagnostics(workdir: &Path, output: &Output) -> String {
    match tokio::fs::read(workdir.join(format!("{}.log", JOB_NAME))).await {
        Ok(log) => diagnostics_from_log(&String::from_utf8_lossy(&log)),
        Err(_) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

fn diagnostics_from_log(log: &str) -> String {
    let errors = log
        .lines()
        .filter(|line| line.contains('!') || line.contains("Error"))
        .collect::<Vec<_>>();

    if !errors.is_empty() {
        return errors.join("\n");
    }

    let lines = log.lines().collect::<Vec<_>>();
    lines[lines.len().saturating_sub(LOG_TAIL_LINES)..].join("\n")
}
