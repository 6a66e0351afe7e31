// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 批量请求、单元结果和报告
pub mod batch;
/// 结构化错误报告
pub mod error_report;
