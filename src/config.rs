use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 上游 API 根地址（以 `/` 结尾）
    pub base_url: String,
    // --- 客户端标识请求头 ---
    pub user_agent: String,
    pub application: String,
    pub client_version: String,
    /// 单次请求超时（秒），未设置时使用 HTTP 客户端默认值
    pub request_timeout_secs: Option<u64>,
    /// 用户统计文件路径
    pub stats_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.coursera.org/api/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36".to_string(),
            application: "ondemand".to_string(),
            client_version: "cde5f24972aff1ebd6447e911113e781b9c52f7f".to_string(),
            request_timeout_secs: None,
            stats_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，环境变量优先
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::FileLoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = std::fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = toml::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.with_env_overrides()
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: std::env::var("COURSERA_BASE_URL").unwrap_or(self.base_url),
            user_agent: std::env::var("COURSERA_USER_AGENT").unwrap_or(self.user_agent),
            application: std::env::var("COURSERA_APPLICATION").unwrap_or(self.application),
            client_version: std::env::var("COURSERA_VERSION").unwrap_or(self.client_version),
            request_timeout_secs: match parse_env("REQUEST_TIMEOUT_SECS", "u64")? {
                Some(secs) => Some(secs),
                None => self.request_timeout_secs,
            },
            stats_file: std::env::var("STATS_FILE").ok().or(self.stats_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
