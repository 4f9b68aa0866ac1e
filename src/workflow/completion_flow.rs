//! 条目完成流程 - 流程层
//!
//! 核心职责：定义"一个条目"的完成流程
//!
//! 流程顺序：
//! 1. 内容结束事件（主动作）
//! 2. 主动作没有返回 `contentResponseBody` 时，提交补充完成记录（兜底）
//!
//! 两处调用的错误都在本层吸收，流程本身永不失败。

use crate::clients::CourseraClient;
use crate::error::AppResult;
use crate::models::Session;
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

/// 单个条目的完成结果
///
/// 只在内部用于日志统计，不暴露给调用方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// 主动作成功
    PrimarySucceeded,
    /// 主动作未成功，兜底请求已提交
    FallbackSubmitted,
    /// 主动作未成功，兜底请求也失败
    FallbackFailed,
}

/// 主动作是否成功：响应中有非空的 `contentResponseBody`
///
/// 网络或 HTTP 错误一律视为"没有成功响应"。
pub fn primary_succeeded(primary: &AppResult<JsonValue>) -> bool {
    match primary {
        Ok(response) => CourseraClient::has_content_response(response),
        Err(_) => false,
    }
}

/// 根据两次调用的结果得出完成结果
///
/// `fallback` 为 `None` 表示兜底没有执行。
pub fn decide(
    primary: &AppResult<JsonValue>,
    fallback: Option<&AppResult<JsonValue>>,
) -> CompletionOutcome {
    if primary_succeeded(primary) {
        return CompletionOutcome::PrimarySucceeded;
    }
    match fallback {
        Some(Ok(_)) => CompletionOutcome::FallbackSubmitted,
        Some(Err(_)) | None => CompletionOutcome::FallbackFailed,
    }
}

/// 条目完成流程
///
/// - 不重试，兜底最多执行一次
/// - 不设置额外超时，依赖 HTTP 客户端的默认行为
pub struct CompletionFlow {
    client: CourseraClient,
}

impl CompletionFlow {
    pub fn new(client: CourseraClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, session: &Session, ctx: &ItemCtx<'_>, item_id: &str) -> CompletionOutcome {
        let primary = self
            .client
            .post_video_ended(session, ctx.user_id, &ctx.course.slug, item_id)
            .await;

        if let Err(e) = &primary {
            warn!("{} 内容结束事件失败: {}", ctx, e);
        }

        if primary_succeeded(&primary) {
            debug!("{} ✓ 内容结束事件已确认", ctx);
            return decide(&primary, None);
        }

        if let Ok(response) = &primary {
            debug!(
                "{} 内容结束事件未返回 contentResponseBody: {}",
                ctx,
                truncate_text(&response.to_string(), 200)
            );
        }
        info!("{} 🔁 尝试补充完成记录...", ctx);

        let fallback = self
            .client
            .post_supplement_completion(session, &ctx.course.resolved_id, item_id, ctx.user_id)
            .await;

        if let Err(e) = &fallback {
            warn!("{} ⚠️ 补充完成记录失败: {}", ctx, e);
        }

        decide(&primary, Some(&fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::infrastructure::fakes::{FakeReply, FakeTransport};
    use crate::infrastructure::{HttpExecutor, HttpMethod};
    use crate::models::{ClientIdentity, CourseId, CourseReference, Credentials, UserId};
    use serde_json::json;
    use std::sync::Arc;

    const PRIMARY: &str = "videoEvents/ended";
    const FALLBACK: &str = "onDemandSupplementCompletions.v1";

    fn flow(transport: Arc<FakeTransport>) -> CompletionFlow {
        let client = CourseraClient::new(&Config::default(), HttpExecutor::new(transport)).unwrap();
        CompletionFlow::new(client)
    }

    fn course() -> CourseReference {
        CourseReference {
            slug: "ml".to_string(),
            resolved_id: CourseId("course-1".to_string()),
        }
    }

    fn session() -> Session {
        Session::build(&Credentials::new("A", "B"), &ClientIdentity::default())
    }

    #[test]
    fn test_decide_primary_success_ignores_fallback() {
        let primary: AppResult<JsonValue> = Ok(json!({"contentResponseBody": {}}));
        assert_eq!(decide(&primary, None), CompletionOutcome::PrimarySucceeded);
    }

    #[test]
    fn test_decide_fallback_outcomes() {
        let primary: AppResult<JsonValue> = Ok(json!({}));
        let fallback_ok: AppResult<JsonValue> = Ok(json!({}));
        let fallback_err: AppResult<JsonValue> = Err(AppError::Http {
            status: 400,
            url: "u".to_string(),
            body: json!({}),
        });

        assert_eq!(
            decide(&primary, Some(&fallback_ok)),
            CompletionOutcome::FallbackSubmitted
        );
        assert_eq!(
            decide(&primary, Some(&fallback_err)),
            CompletionOutcome::FallbackFailed
        );
    }

    #[test]
    fn test_null_content_body_is_not_success() {
        let primary: AppResult<JsonValue> = Ok(json!({"contentResponseBody": null}));
        assert!(!primary_succeeded(&primary));
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_post(PRIMARY, FakeReply::Json(json!({"contentResponseBody": {}})));

        let course = course();
        let ctx = ItemCtx::new(UserId(7), &course, 1, 1);
        let outcome = flow(transport.clone()).run(&session(), &ctx, "item-1").await;

        assert_eq!(outcome, CompletionOutcome::PrimarySucceeded);
        assert_eq!(transport.count(HttpMethod::Post, FALLBACK), 0);

        let calls = transport.calls();
        assert_eq!(calls[0].body, Some(json!({"contentRequestBody": {}})));
        assert_eq!(calls[0].header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_missing_content_body_triggers_fallback() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .on_post(PRIMARY, FakeReply::Json(json!({})))
            .on_post(FALLBACK, FakeReply::Json(json!({"elements": []})));

        let course = course();
        let ctx = ItemCtx::new(UserId(7), &course, 1, 1);
        let outcome = flow(transport.clone()).run(&session(), &ctx, "item-1").await;

        assert_eq!(outcome, CompletionOutcome::FallbackSubmitted);
        let fallback = transport
            .calls()
            .into_iter()
            .find(|c| c.url.as_str().contains(FALLBACK))
            .unwrap();
        assert_eq!(
            fallback.body,
            Some(json!({"courseId": "course-1", "itemId": "item-1", "userId": 7}))
        );
    }

    #[tokio::test]
    async fn test_primary_failure_triggers_fallback() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .on_post(PRIMARY, FakeReply::Failure("connection reset".to_string()))
            .on_post(FALLBACK, FakeReply::Json(json!({})));

        let course = course();
        let ctx = ItemCtx::new(UserId(7), &course, 1, 1);
        let outcome = flow(transport.clone()).run(&session(), &ctx, "item-1").await;

        assert_eq!(outcome, CompletionOutcome::FallbackSubmitted);
        assert_eq!(transport.count(HttpMethod::Post, FALLBACK), 1);
    }

    #[tokio::test]
    async fn test_both_failures_are_absorbed() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .on_post(PRIMARY, FakeReply::Status(500, json!({})))
            .on_post(FALLBACK, FakeReply::Status(400, json!({"message": "bad"})));

        let course = course();
        let ctx = ItemCtx::new(UserId(7), &course, 1, 1);
        let outcome = flow(transport.clone()).run(&session(), &ctx, "item-1").await;

        assert_eq!(outcome, CompletionOutcome::FallbackFailed);
        assert_eq!(transport.count(HttpMethod::Post, PRIMARY), 1);
        assert_eq!(transport.count(HttpMethod::Post, FALLBACK), 1);
    }
}
