//! 会话上下文
//!
//! 把调用方提供的凭据转换为每次请求都会携带的请求头集合

use crate::config::Config;

/// 调用方提供的登录凭据（只在一次运行中使用，从不持久化）
#[derive(Clone, Default)]
pub struct Credentials {
    pub auth_token: String,
    pub csrf_token: String,
}

impl Credentials {
    pub fn new(auth_token: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            csrf_token: csrf_token.into(),
        }
    }
}

// 不在日志里泄露 token
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_token", &redact(&self.auth_token))
            .field("csrf_token", &redact(&self.csrf_token))
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// 上游要求的客户端标识
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub application: String,
    pub client_version: String,
}

impl ClientIdentity {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            application: config.application.clone(),
            client_version: config.client_version.clone(),
        }
    }
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 一次运行使用的请求头集合
///
/// 构建后不可变，只属于一次运行，不在运行之间复用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    headers: Vec<(&'static str, String)>,
}

impl Session {
    /// 构建会话请求头
    ///
    /// 纯函数，不会失败。`cookie` 由非空的 token 拼接而成，两个都为空时为空字符串。
    pub fn build(credentials: &Credentials, identity: &ClientIdentity) -> Self {
        let headers = vec![
            ("user-agent", identity.user_agent.clone()),
            ("x-coursera-application", identity.application.clone()),
            ("x-coursera-version", identity.client_version.clone()),
            ("x-requested-with", "XMLHttpRequest".to_string()),
            (
                "cookie",
                build_cookie(&credentials.auth_token, &credentials.csrf_token),
            ),
        ];
        Self { headers }
    }

    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn cookie(&self) -> &str {
        self.header("cookie").unwrap_or_default()
    }
}

/// 拼接 cookie：`CAUTH=<auth>; CSRF3-Token=<csrf>`，跳过空值
pub fn build_cookie(auth_token: &str, csrf_token: &str) -> String {
    let mut parts = Vec::with_capacity(2);
    if !auth_token.is_empty() {
        parts.push(format!("CAUTH={}", auth_token));
    }
    if !csrf_token.is_empty() {
        parts.push(format!("CSRF3-Token={}", csrf_token));
    }
    parts.join("; ")
}
