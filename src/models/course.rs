//! 课程相关数据结构

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// 当前登录用户的数字 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    /// 从 JSON 值解析（数字或数字字符串）
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(UserId),
            Value::String(s) => s.trim().parse().ok().map(UserId),
            _ => None,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 平台内部的课程 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl CourseId {
    /// 从 JSON 值解析（非空字符串，数字会转成字符串）
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(CourseId(s.clone())),
            Value::Number(n) => Some(CourseId(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 课程引用：公开 slug + 每次运行重新解析出的内部 ID（从不缓存）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseReference {
    pub slug: String,
    pub resolved_id: CourseId,
}

/// 课程中的一个可完成条目，字段以上游返回为准
///
/// 所有字段都宽松解析：类型不符的字段视为缺失，不会让整个条目解析失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub time_commitment: Option<u64>,
    #[serde(deserialize_with = "lenient_string")]
    pub track_id: Option<String>,
}

impl Item {
    /// 可用于请求的条目 ID（缺失或为空时返回 `None`）
    pub fn item_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// 日志中使用的名称
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.slug.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }
}

// ========== 宽松解析 ==========

/// 字符串原样保留，数字转成字符串，其他类型视为缺失
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 非负整数原样保留，小数向下取整，数字字符串会被解析，其他类型视为缺失
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
