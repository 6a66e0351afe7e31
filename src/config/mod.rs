// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理服务器、跨域、LLM、提取、浏览器和渲染等配置
pub mod settings;
