//! 课程完成服务 - 调用方边界
//!
//! 校验请求 → 打开统计存储 → 执行一次运行 → 累计用户统计。
//! 路由、跨域和调用方鉴权不在这里处理。

use crate::error::{AppError, AppResult};
use crate::orchestrator::course_runner::CourseRunner;
use crate::storage::{record_run, StoreHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 调用方请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default)]
    pub course_slug: String,
    #[serde(rename = "cAuth", default)]
    pub cauth: String,
    #[serde(default)]
    pub csrf: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CompletionRequest {
    fn validate(&self) -> AppResult<()> {
        let required = [
            ("courseSlug", &self.course_slug),
            ("cAuth", &self.cauth),
            ("csrf", &self.csrf),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(AppError::MissingField { field });
            }
        }
        Ok(())
    }
}

/// 返回给调用方的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    /// 本次处理过的条目数
    pub modules_skipped: usize,
}

/// 课程完成服务
pub struct CompletionService {
    runner: CourseRunner,
    stats: Arc<StoreHandle>,
}

impl CompletionService {
    pub fn new(runner: CourseRunner, stats: Arc<StoreHandle>) -> Self {
        Self { runner, stats }
    }

    /// 处理一次请求
    pub async fn handle(&self, request: CompletionRequest) -> AppResult<CompletionResponse> {
        request.validate()?;
        // 统计存储必须在触达平台之前可用
        let store = self.stats.get().await?;

        let modules = self
            .runner
            .run_completion(&request.course_slug, &request.cauth, &request.csrf)
            .await?;

        if let Some(stats) = record_run(store.as_ref(), request.name.as_deref(), modules).await? {
            info!(
                "📊 用户 {} 累计: 课程 {}, 条目 {}",
                stats.name, stats.courses_solved, stats.modules_skipped
            );
        }

        Ok(CompletionResponse {
            modules_skipped: modules,
        })
    }
}
