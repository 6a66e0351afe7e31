// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// LaTeX 转 PDF 请求
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LatexRequestDto {
    /// LaTeX 源文件内容
    #[serde(default)]
    pub latex: Option<String>,
}

impl LatexRequestDto {
    /// 非空白的源文件内容
    pub fn source(&self) -> Option<&str> {
        self.latex.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// LaTeX 转 PDF 响应，PDF 以 base64 编码
#[derive(Debug, Deserialize, Serialize)]
pub struct LatexResponseDto {
    pub pdf: String,
}
