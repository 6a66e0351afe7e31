// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod chromium_engine;
pub mod reqwest_engine;
pub mod smart_scraper;
pub mod traits;


use std::sync::Arc;

use crate::config::settings::{BrowserMode, BrowserSettings};
use chromium_engine::ChromiumEngine;
use reqwest_engine::ReqwestEngine;
use traits::{EngineError, PageFetcher};

/// 根据浏览器配置选择页面获取引擎
///
/// `allow_private_hosts` 同时约束引擎跟随的重定向目标
pub fn build_fetcher(
    settings: &BrowserSettings,
    allow_private_hosts: bool,
) -> Result<Arc<dyn PageFetcher>, EngineError> {
    let fetcher: Arc<dyn PageFetcher> = match settings.mode {
        BrowserMode::Http => Arc::new(ReqwestEngine::new(allow_private_hosts)?),
        BrowserMode::Chromium => Arc::new(ChromiumEngine::new(
            settings.clone(),
            allow_private_hosts,
        )),
    };
    Ok(fetcher)
}
