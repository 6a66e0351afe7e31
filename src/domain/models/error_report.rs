// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::Write as _;

/// 可生成结构化报告的错误
///
/// 每个对外报告的错误类型都需要给出稳定的类别名称
pub trait Reportable: StdError {
    /// 错误类别，例如 `Timeout`、`MissingApiKey`
    fn kind(&self) -> &'static str;

    /// 面向运维的诊断文本，默认使用错误链
    fn diagnostics(&self) -> Option<String> {
        None
    }
}

/// 错误报告
///
/// 描述一次失败的类别、消息和诊断追踪，三个字段总是同时填写
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// 错误类别
    #[serde(rename = "error_type")]
    pub kind: String,
    /// 可读的错误消息
    #[serde(rename = "error_message")]
    pub message: String,
    /// 完整诊断追踪
    #[serde(rename = "traceback")]
    pub trace: String,
}

impl ErrorReport {
    /// 捕获错误详情
    ///
    /// 从正在处理的错误生成报告，本身不会失败；
    /// 无法获取追踪信息时 `trace` 为空字符串
    pub fn capture<E>(err: &E) -> Self
    where
        E: Reportable + ?Sized,
    {
        let trace = err
            .diagnostics()
            .unwrap_or_else(|| format_chain(err, &Backtrace::capture()));

        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            trace,
        }
    }

    pub fn new(kind: impl Into<String>, message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: trace.into(),
        }
    }
}

/// 格式化错误链和回溯
fn format_chain<E>(err: &E, backtrace: &Backtrace) -> String
where
    E: Reportable + ?Sized,
{
    let mut out = String::new();
    let _ = write!(out, "{}: {}", err.kind(), err);

    let mut source = err.source();
    let mut depth = 0;
    while let Some(cause) = source {
        if depth == 0 {
            out.push_str("\n\nCaused by:");
        }
        let _ = write!(out, "\n    {}: {}", depth, cause);
        depth += 1;
        source = cause.source();
    }

    if backtrace.status() == BacktraceStatus::Captured {
        let _ = write!(out, "\n\nStack backtrace:\n{}", backtrace);
    }

    out
}
