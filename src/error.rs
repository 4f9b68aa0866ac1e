use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上游响应成功，但找不到期望的标识符
    #[error("无法解析 {target}")]
    Resolution { target: ResolutionTarget },

    /// 上游返回非成功状态码
    #[error("HTTP {status} ({url}): {body}")]
    Http {
        status: u16,
        url: String,
        /// 解析后的响应体（无法解析为 JSON 时为原始文本）
        body: Value,
    },

    /// 网络请求失败（连接、超时、读取响应体等）
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 请求头的值包含非法字符
    #[error("非法的请求头: {name}")]
    InvalidHeader { name: String },

    /// 调用方请求缺少必填字段
    #[error("缺少必填字段: {field}")]
    MissingField { field: &'static str },

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
}

/// 需要解析的标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTarget {
    UserId,
    CourseId,
}

impl fmt::Display for ResolutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionTarget::UserId => write!(f, "user id"),
            ResolutionTarget::CourseId => write!(f, "course id"),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 配置文件读取或解析失败
    #[error("配置文件 {path} 加载失败: {source}")]
    FileLoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// API 根地址无法作为 URL 基址
    #[error("无效的 API 根地址: {url}")]
    InvalidBaseUrl { url: String },

    /// 未配置统计文件路径
    #[error("未设置统计文件路径 (STATS_FILE)")]
    MissingStatsFile,
}

/// 统计存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("读取统计文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("写入统计文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("统计文件格式错误 ({path}): {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建标识符解析错误
    pub fn resolution(target: ResolutionTarget) -> Self {
        AppError::Resolution { target }
    }

    /// 创建网络请求失败错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 上游返回的状态码（仅 `Http` 错误）
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
