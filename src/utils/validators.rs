// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// URL无效
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// 不支持的协议
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    /// 检测到SSRF攻击
    #[error("SSRF protection: private address {0} is not allowed")]
    SsrfDetected(IpAddr),
}

/// 检查IP地址是否安全
///
/// # 参数
///
/// * `ip` - IP地址
///
/// # 返回值
///
/// 如果IP地址是公网地址则返回true，否则返回false
pub fn is_safe_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            !ipv4.is_loopback()
                && !ipv4.is_private()
                && !ipv4.is_link_local()
                && !ipv4.is_broadcast()
                && !ipv4.is_documentation()
                && !ipv4.is_unspecified()
                && !ipv4.is_multicast()
        }
        IpAddr::V6(ipv6) => {
            let first = ipv6.segments()[0];
            !ipv6.is_loopback()
                && !ipv6.is_unspecified()
                && !ipv6.is_multicast()
                // fc00::/7 unique local, fe80::/10 link local
                && (first & 0xfe00) != 0xfc00
                && (first & 0xffc0) != 0xfe80
        }
    }
}

/// 验证URL
///
/// 只允许 http/https；`allow_private` 为 false 时拒绝解析到私有地址的主机
///
/// # 返回值
///
/// * `Ok(Url)` - 解析后的URL
/// * `Err(ValidationError)` - URL无效或存在安全风险
pub async fn validate_url(url: &str, allow_private: bool) -> Result<Url, ValidationError> {
    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ValidationError::InvalidUrl("missing host".to_string()))?
        .to_string();

    if allow_private {
        return Ok(parsed);
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host.trim_matches(['[', ']']), port))
        .await
        .map_err(|e| ValidationError::InvalidUrl(format!("cannot resolve {}: {}", host, e)))?;

    for addr in addrs {
        if !is_safe_ip(addr.ip()) {
            return Err(ValidationError::SsrfDetected(addr.ip()));
        }
    }

    Ok(parsed)
}
