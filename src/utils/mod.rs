// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括HTML文本提取、重试策略、URL校验和日志初始化
pub mod html_text;
pub mod retry_policy;
pub mod telemetry;
pub mod validators;
