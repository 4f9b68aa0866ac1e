//! 用户使用统计

use crate::error::AppResult;
use crate::storage::stats_store::StatsStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 新建用户时使用的占位 API key
pub const PLACEHOLDER_API_KEY: &str = "not-available";

/// 单个用户的累计统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub name: String,
    pub api_key: String,
    #[serde(default)]
    pub courses_solved: u64,
    /// 累计处理过的条目数（尝试过即计入，不代表平台确认完成）
    #[serde(default)]
    pub modules_skipped: u64,
    #[serde(default)]
    pub forms_solved: u64,
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
            courses_solved: 0,
            modules_skipped: 0,
            forms_solved: 0,
            updated_at: Utc::now(),
        }
    }
}

/// 记录一次课程运行
///
/// - 已有用户：`courses_solved + 1`，`modules_skipped + modules`
/// - 未知用户且提供了名字：新建，占位 API key
/// - 没有名字：不记录
///
/// # 返回
/// 保存后的统计；没有记录时返回 `None`
pub async fn record_run(
    store: &dyn StatsStore,
    name: Option<&str>,
    modules: usize,
) -> AppResult<Option<UserStats>> {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        debug!("未提供用户名，跳过统计");
        return Ok(None);
    };

    let mut stats = match store.find(name).await? {
        Some(existing) => existing,
        None => {
            info!("📝 新建用户统计: {}", name);
            UserStats::new(name, PLACEHOLDER_API_KEY)
        }
    };

    stats.courses_solved += 1;
    stats.modules_skipped += modules as u64;
    stats.updated_at = Utc::now();

    store.save(&stats).await?;
    debug!(
        "用户 {} 统计: 课程 {}, 条目 {}",
        name, stats.courses_solved, stats.modules_skipped
    );
    Ok(Some(stats))
}
