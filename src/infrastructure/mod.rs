// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 调试文件（artifact）：保存最近一次批量响应
/// - 指标（metrics）：Prometheus 导出器
/// - 渲染器（renderers）：文档渲染接口的具体实现
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体实现。
pub mod artifact;
pub mod metrics;
pub mod renderers;
