// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{EngineError, FetchRequest, FetchedPage, PageFetcher};
use crate::utils::validators::validate_url;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// 可重建的共享句柄
///
/// 句柄附带一个存活标记，由驱动连接的后台任务在退出时清除。
/// 标记失效后下一次获取会重新创建句柄
struct Relaunchable<T> {
    slot: Mutex<Option<(Arc<T>, Arc<AtomicBool>)>>,
}

impl<T> Relaunchable<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    async fn get_or_launch<F, Fut, E>(&self, launch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(T, Arc<AtomicBool>), E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some((handle, alive)) = slot.as_ref() {
            if alive.load(Ordering::SeqCst) {
                return Ok(Arc::clone(handle));
            }
            warn!("Shared browser connection ended, relaunching");
        }

        *slot = None;
        let (handle, alive) = launch().await?;
        let handle = Arc::new(handle);
        *slot = Some((Arc::clone(&handle), alive));
        Ok(handle)
    }
}

/// Chromium引擎
///
/// 基于chromiumoxide的浏览器渲染抓取，用于依赖JavaScript的页面。
/// 浏览器实例在首次使用时启动并在所有请求间共享，连接断开后自动重建；
/// 每次抓取使用独立的标签页，无论成功、失败还是超时都会关闭
pub struct ChromiumEngine {
    settings: BrowserSettings,
    allow_private_hosts: bool,
    browser: Relaunchable<Browser>,
}

impl ChromiumEngine {
    pub fn new(settings: BrowserSettings, allow_private_hosts: bool) -> Self {
        Self {
            settings,
            allow_private_hosts,
            browser: Relaunchable::new(),
        }
    }

    async fn browser(&self) -> Result<Arc<Browser>, EngineError> {
        self.browser.get_or_launch(|| self.launch()).await
    }

    async fn launch(&self) -> Result<(Browser, Arc<AtomicBool>), EngineError> {
        let (browser, mut handler) = match &self.settings.remote_debugging_url {
            Some(url) => {
                info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url.as_str()).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            }
            None => {
                let mut builder = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage");
                if !self.settings.headless {
                    builder = builder.with_head();
                }
                let config = builder.build().map_err(EngineError::Browser)?;
                Browser::launch(config)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?
            }
        };

        let alive = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&alive);

        // Drive browser events until the connection closes
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            flag.store(false, Ordering::SeqCst);
        });

        Ok((browser, alive))
    }

    async fn render(&self, page: &Page, request: &FetchRequest) -> Result<String, EngineError> {
        page.goto(request.url.as_str())
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // 页面内跳转后的落点同样要过地址校验
        if !self.allow_private_hosts {
            let landed = page
                .url()
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?;
            if let Some(landed) = landed.filter(|u| u.as_str() != request.url) {
                validate_url(&landed, false)
                    .await
                    .map_err(|e| EngineError::BlockedRedirect(format!("{landed}: {e}")))?;
            }
        }

        // Stand-in for network idle: give late XHR content time to land
        if self.settings.settle_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.settle_ms)).await;
        }

        page.content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for ChromiumEngine {
    /// 执行浏览器渲染抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 渲染后的页面
    /// * `Err(EngineError)` - 浏览器启动、导航失败或超时
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, EngineError> {
        let start = Instant::now();
        let browser = self.browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let remaining = request.timeout.saturating_sub(start.elapsed());
        let rendered = tokio::time::timeout(remaining, self.render(&page, request))
            .await
            .unwrap_or(Err(EngineError::Timeout));

        // 超时后同样关闭标签页
        if let Err(e) = page.close().await {
            warn!("Failed to close browser tab: {}", e);
        }

        Ok(FetchedPage {
            status_code: 200,
            content: rendered?,
            content_type: "text/html".to_string(),
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
