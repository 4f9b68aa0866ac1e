//! 内存版传输实现（仅用于测试）
//!
//! 按 "方法 + URL 片段" 预置响应，并记录每一次调用，不访问网络。

use crate::error::{AppError, AppResult};
use crate::infrastructure::transport::{HttpMethod, HttpRequest, HttpTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Mutex, MutexGuard};

/// 预置的响应
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 2xx + JSON 响应体
    Json(Value),
    /// 非成功状态码 + 响应体
    Status(u16, Value),
    /// 网络层失败
    Failure(String),
}

#[derive(Debug)]
struct Route {
    method: HttpMethod,
    url_fragment: String,
    reply: FakeReply,
}

/// 记录调用、按路由返回预置响应的传输实现
///
/// 路由按注册顺序匹配，第一个命中的生效；没有命中时返回 404。
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条路由
    pub fn on(&self, method: HttpMethod, url_fragment: &str, reply: FakeReply) -> &Self {
        lock(&self.routes).push(Route {
            method,
            url_fragment: url_fragment.to_string(),
            reply,
        });
        self
    }

    pub fn on_get(&self, url_fragment: &str, reply: FakeReply) -> &Self {
        self.on(HttpMethod::Get, url_fragment, reply)
    }

    pub fn on_post(&self, url_fragment: &str, reply: FakeReply) -> &Self {
        self.on(HttpMethod::Post, url_fragment, reply)
    }

    /// 所有已记录的请求（按发送顺序）
    pub fn calls(&self) -> Vec<HttpRequest> {
        lock(&self.calls).clone()
    }

    /// 命中某个 URL 片段的请求数
    pub fn count(&self, method: HttpMethod, url_fragment: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method == method && call.url.as_str().contains(url_fragment))
            .count()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> AppResult<Value> {
        let url = request.url.to_string();
        let method = request.method;
        lock(&self.calls).push(request);

        let reply = lock(&self.routes)
            .iter()
            .find(|route| route.method == method && url.contains(&route.url_fragment))
            .map(|route| route.reply.clone());

        match reply {
            Some(FakeReply::Json(body)) => Ok(body),
            Some(FakeReply::Status(status, body)) => Err(AppError::Http { status, url, body }),
            Some(FakeReply::Failure(message)) => Err(AppError::transport(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, message),
            )),
            None => Err(AppError::Http {
                status: 404,
                url,
                body: json!({}),
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
