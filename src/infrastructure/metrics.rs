// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动Prometheus导出器并注册指标说明
///
/// 地址无效或端口被占用时只记录警告，服务继续运行
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("scrape_batches_total", "Total number of extraction batches processed");
    describe_counter!(
        "extraction_units_total",
        "Total number of per-URL extraction units, labelled by outcome"
    );
    describe_histogram!(
        "extraction_unit_duration_seconds",
        "Duration of per-URL extraction units in seconds"
    );
    describe_counter!(
        "document_renders_total",
        "Total number of LaTeX render requests, labelled by outcome"
    );

    info!("Metrics exporter listening on {}", addr);
}
