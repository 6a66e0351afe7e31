// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod batch_service;
pub mod extraction_service;
pub mod llm_service;
pub mod prompt;
pub mod render_service;
