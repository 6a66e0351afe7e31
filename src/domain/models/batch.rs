// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::error_report::ErrorReport;

/// 批量请求错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchRequestError {
    #[error("No URLs provided")]
    NoSources,
}

/// 批量提取请求
///
/// 构造时保证至少包含一个来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    #[serde(rename = "urls")]
    sources: Vec<String>,
    #[serde(rename = "prompt")]
    task: String,
}

impl BatchRequest {
    pub fn new(sources: Vec<String>, task: impl Into<String>) -> Result<Self, BatchRequestError> {
        if sources.is_empty() {
            return Err(BatchRequestError::NoSources);
        }
        Ok(Self {
            sources,
            task: task.into(),
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn task(&self) -> &str {
        &self.task
    }
}

/// 单个来源的处理结果
///
/// `payload` 与 `failure` 有且只有一个被设置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitResult {
    #[serde(rename = "url")]
    source: String,
    #[serde(rename = "result")]
    payload: Option<Value>,
    #[serde(rename = "error")]
    failure: Option<ErrorReport>,
}

impl UnitResult {
    /// 成功结果；非结构化的值会被转换为字符串
    pub fn success(source: impl Into<String>, payload: Value) -> Self {
        Self {
            source: source.into(),
            payload: Some(coerce_payload(payload)),
            failure: None,
        }
    }

    pub fn failure(source: impl Into<String>, report: ErrorReport) -> Self {
        Self {
            source: source.into(),
            payload: None,
            failure: Some(report),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn failure_report(&self) -> Option<&ErrorReport> {
        self.failure.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.payload.is_some()
    }
}

/// 对象和数组保持原样，其余值保存为字符串形式
fn coerce_payload(value: Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => value,
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}

/// 按输入顺序排列的结果集合
///
/// 序列化为 `{"result1": .., "result2": ..}`，键只由位置决定
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResults(Vec<UnitResult>);

impl BatchResults {
    pub fn positional_key(index: usize) -> String {
        format!("result{}", index + 1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按位置键查找，例如 `"result2"`
    ///
    /// 只接受 `positional_key` 生成的规范形式，`"result02"`、`"result+2"` 都查不到
    pub fn get(&self, key: &str) -> Option<&UnitResult> {
        let position: usize = key.strip_prefix("result")?.parse().ok()?;
        let index = position.checked_sub(1)?;
        if Self::positional_key(index) != key {
            return None;
        }
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &UnitResult)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, unit)| (Self::positional_key(i), unit))
    }

    pub fn failed(&self) -> usize {
        self.0.iter().filter(|u| !u.is_success()).count()
    }
}

impl From<Vec<UnitResult>> for BatchResults {
    fn from(units: Vec<UnitResult>) -> Self {
        Self(units)
    }
}

impl Serialize for BatchResults {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, unit) in self.iter() {
            map.serialize_entry(&key, unit)?;
        }
        map.end()
    }
}

/// 批量提取报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub input: BatchRequest,
    pub results: BatchResults,
}
