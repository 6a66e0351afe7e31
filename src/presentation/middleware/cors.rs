// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::settings::CorsSettings;

/// 根据配置构建跨域中间件
///
/// 预检请求由该层直接应答，不会进入处理器
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins = if settings.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(settings.max_age())
}
