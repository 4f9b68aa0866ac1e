//! 单门课程运行器 - 编排层
//!
//! ## 职责
//!
//! 按顺序执行一次完整运行，并返回处理过的条目数：
//!
//! 1. **构建会话**：凭据 → 请求头
//! 2. **解析身份**：当前用户 ID
//! 3. **解析课程**：slug → 课程 ID
//! 4. **枚举条目**
//! 5. **逐个完成**：串行调用 `CompletionFlow`，不并发，避免触发上游限流
//!
//! 第 2-4 步的错误原样向上传播，此时还没有任何完成请求发出。
//! 枚举成功后运行不会再失败。

use crate::clients::CourseraClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{HttpExecutor, HttpTransport, ReqwestTransport};
use crate::models::{ClientIdentity, Credentials, Session};
use crate::services::{CourseResolver, IdentityResolver, ItemEnumerator};
use crate::workflow::{CompletionFlow, CompletionOutcome, ItemCtx};
use std::sync::Arc;
use tracing::{info, warn};

/// 单次运行的统计（仅用于日志）
#[derive(Debug, Default)]
struct RunStats {
    processed: usize,
    primary_succeeded: usize,
    fallback_submitted: usize,
    fallback_failed: usize,
    missing_id: usize,
}

impl RunStats {
    fn record(&mut self, outcome: CompletionOutcome) {
        // 无论哪个分支，条目都计为已处理
        self.processed += 1;
        match outcome {
            CompletionOutcome::PrimarySucceeded => self.primary_succeeded += 1,
            CompletionOutcome::FallbackSubmitted => self.fallback_submitted += 1,
            CompletionOutcome::FallbackFailed => self.fallback_failed += 1,
        }
    }
}

/// 课程运行器
///
/// 不持有任何跨运行的状态：每次运行都重新构建会话、重新解析用户和课程。
pub struct CourseRunner {
    identity: ClientIdentity,
    identity_resolver: IdentityResolver,
    course_resolver: CourseResolver,
    item_enumerator: ItemEnumerator,
    completion_flow: CompletionFlow,
}

impl CourseRunner {
    /// 使用给定的平台客户端创建运行器
    pub fn new(client: CourseraClient, identity: ClientIdentity) -> Self {
        Self {
            identity,
            identity_resolver: IdentityResolver::new(client.clone()),
            course_resolver: CourseResolver::new(client.clone()),
            item_enumerator: ItemEnumerator::new(client.clone()),
            completion_flow: CompletionFlow::new(client),
        }
    }

    /// 基于配置和指定传输实现创建运行器
    pub fn with_transport(config: &Config, transport: Arc<dyn HttpTransport>) -> AppResult<Self> {
        let client = CourseraClient::new(config, HttpExecutor::new(transport))?;
        Ok(Self::new(client, ClientIdentity::from_config(config)))
    }

    /// 基于配置创建运行器（使用 reqwest）
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new(config)?))
    }

    /// 执行一次完整运行
    ///
    /// # 参数
    /// - `course_slug`: 课程 slug
    /// - `auth_token`: CAUTH
    /// - `csrf_token`: CSRF3-Token
    ///
    /// # 返回
    /// 尝试过完成动作的条目数（不代表平台确认完成的条目数）
    pub async fn run_completion(
        &self,
        course_slug: &str,
        auth_token: &str,
        csrf_token: &str,
    ) -> AppResult<usize> {
        let credentials = Credentials::new(auth_token, csrf_token);
        let session = Session::build(&credentials, &self.identity);

        info!("🎓 开始处理课程: {}", course_slug);

        let user_id = self.identity_resolver.resolve(&session).await?;
        let course = self.course_resolver.resolve(&session, course_slug).await?;
        let items = self.item_enumerator.enumerate(&session, course_slug).await?;

        log_run_start(course_slug, &course.resolved_id.to_string(), items.len());

        let total = items.len();
        let mut stats = RunStats::default();

        // ========== 串行遍历所有条目 ==========
        for (index, item) in items.iter().enumerate() {
            let ctx = ItemCtx::new(user_id, &course, index + 1, total);

            let Some(item_id) = item.item_id() else {
                warn!("{} ⚠️ 条目缺少 ID，跳过: {}", ctx, item.display_name());
                stats.missing_id += 1;
                continue;
            };

            info!("{} ▶ {}", ctx, item.display_name());
            let outcome = self.completion_flow.run(&session, &ctx, item_id).await;
            stats.record(outcome);
        }

        log_run_complete(course_slug, &stats, total);
        Ok(stats.processed)
    }
}

// ========== 日志辅助函数 ==========

fn log_run_start(slug: &str, course_id: &str, item_count: usize) {
    info!("[课程 {}] ID: {}", slug, course_id);
    info!("[课程 {}] 条目总数: {}", slug, item_count);
}

fn log_run_complete(slug: &str, stats: &RunStats, total: usize) {
    info!(
        "[课程 {}] 条目统计: 已处理 {}/{} (主动作 {}, 兜底 {}, 兜底失败 {}, 缺少 ID {})",
        slug,
        stats.processed,
        total,
        stats.primary_succeeded,
        stats.fallback_submitted,
        stats.fallback_failed,
        stats.missing_id
    );
    info!("[课程 {}] ✅ 处理完成", slug);
}
