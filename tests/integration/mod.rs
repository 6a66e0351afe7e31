// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod cors_test;
pub mod helpers;
pub mod latex_test;
pub mod scrape_jobs_test;
