//! HTTP 传输层
//!
//! 唯一直接接触网络的地方。上层只通过 [`HttpTransport`] 发请求，
//! 测试时替换为 [`crate::infrastructure::fakes::FakeTransport`]。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// 一次上游请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    /// JSON 请求体（仅 POST）
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn method_name(&self) -> &'static str {
        match self.method {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// 发送请求并返回解析后的 JSON
///
/// 非 2xx 状态返回 [`AppError::Http`]，网络层失败返回 [`AppError::Transport`]。
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> AppResult<Value>;
}

/// 基于 reqwest 的传输实现，进程内共享同一个连接池
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::transport("reqwest::Client", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> AppResult<Value> {
        let endpoint = request.url.to_string();
        let method_name = request.method_name();
        let headers = to_header_map(&request.headers)?;

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            // json() 同时设置 content-type: application/json
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;

        debug!("{} {} -> {}", method_name, endpoint, status);

        let body = parse_body(&text);
        if !status.is_success() {
            return Err(AppError::Http {
                status: status.as_u16(),
                url: endpoint,
                body,
            });
        }
        Ok(body)
    }
}

fn to_header_map(headers: &[(&'static str, String)]) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let value = HeaderValue::from_str(value).map_err(|_| AppError::InvalidHeader {
            name: name.to_string(),
        })?;
        map.insert(HeaderName::from_static(*name), value);
    }
    Ok(map)
}

/// 解析响应体：空文本视为 `{}`，非 JSON 文本原样保留为字符串
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
