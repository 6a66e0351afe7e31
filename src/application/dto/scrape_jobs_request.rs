// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::batch::{BatchRequest, BatchRequestError};

/// 批量职位抓取请求数据传输对象
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ScrapeJobsRequestDto {
    /// 要抓取的职位页面URL，按顺序处理
    #[serde(default)]
    #[validate(length(min = 1, message = "No URLs provided"))]
    pub urls: Vec<String>,
    /// 提取指令，缺省为空字符串
    #[serde(default)]
    pub prompt: Option<String>,
}

impl TryFrom<ScrapeJobsRequestDto> for BatchRequest {
    type Error = BatchRequestError;

    fn try_from(dto: ScrapeJobsRequestDto) -> Result<Self, Self::Error> {
        BatchRequest::new(dto.urls, dto.prompt.unwrap_or_default())
    }
}
