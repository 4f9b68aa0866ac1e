//! HTTP 执行器 - 基础设施层
//!
//! 持有共享的传输资源，只暴露"带会话发请求"的能力

use crate::error::AppResult;
use crate::infrastructure::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::models::Session;
use reqwest::Url;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的传输实现（连接池在多次运行之间复用）
/// - 把会话请求头附加到每个请求上
/// - 不认识 Item / Course
/// - 不处理业务流程
#[derive(Clone)]
pub struct HttpExecutor {
    transport: Arc<dyn HttpTransport>,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 发送带会话的 GET 请求
    pub async fn get(&self, session: &Session, url: Url) -> AppResult<JsonValue> {
        self.transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url,
                headers: session.headers().to_vec(),
                body: None,
            })
            .await
    }

    /// 发送带会话的 JSON POST 请求
    pub async fn post(&self, session: &Session, url: Url, body: JsonValue) -> AppResult<JsonValue> {
        let mut headers = session.headers().to_vec();
        headers.push(("content-type", "application/json".to_string()));

        self.transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url,
                headers,
                body: Some(body),
            })
            .await
    }
}
