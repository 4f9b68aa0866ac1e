//! 统计存储句柄
//!
//! 显式持有、按需打开：第一次 `get()` 时打开，之后复用，`close()` 落盘并释放。
//! 由调用方创建并注入，不存在进程级的全局连接。

use crate::error::{AppResult, ConfigError};
use crate::storage::stats_store::{JsonFileStatsStore, StatsStore};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

enum StoreSource {
    /// 打开时读取该文件
    File(PathBuf),
    /// 打开时直接返回该存储（内存存储、测试）
    Ready(Arc<dyn StatsStore>),
    /// 未配置，打开时报错
    Unconfigured,
}

/// 统计存储句柄
pub struct StoreHandle {
    source: StoreSource,
    store: Mutex<Option<Arc<dyn StatsStore>>>,
    opens: AtomicUsize,
}

impl StoreHandle {
    /// 使用统计文件；`None` 表示未配置，`get()` 会返回 [`ConfigError::MissingStatsFile`]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        let source = match path {
            Some(path) => StoreSource::File(path),
            None => StoreSource::Unconfigured,
        };
        Self::with_source(source)
    }

    /// 包装一个已存在的存储
    pub fn from_store(store: Arc<dyn StatsStore>) -> Self {
        Self::with_source(StoreSource::Ready(store))
    }

    fn with_source(source: StoreSource) -> Self {
        Self {
            source,
            store: Mutex::new(None),
            opens: AtomicUsize::new(0),
        }
    }

    /// 获取存储，未打开时先打开
    pub async fn get(&self) -> AppResult<Arc<dyn StatsStore>> {
        let mut guard = self.store.lock().await;
        if let Some(store) = guard.as_ref() {
            return Ok(store.clone());
        }

        let store: Arc<dyn StatsStore> = match &self.source {
            StoreSource::File(path) => {
                info!("📂 打开统计文件: {}", path.display());
                Arc::new(JsonFileStatsStore::open(path).await?)
            }
            StoreSource::Ready(store) => store.clone(),
            StoreSource::Unconfigured => return Err(ConfigError::MissingStatsFile.into()),
        };

        self.opens.fetch_add(1, Ordering::SeqCst);
        *guard = Some(store.clone());
        Ok(store)
    }

    /// 落盘并释放；之后的 `get()` 会重新打开
    pub async fn close(&self) -> AppResult<()> {
        let store = self.store.lock().await.take();
        if let Some(store) = store {
            store.flush().await?;
            info!("统计存储已关闭");
        }
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.store.lock().await.is_some()
    }

    /// 实际打开的次数
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::stats_store::MemoryStatsStore;
    use crate::storage::user_stats::UserStats;

    #[tokio::test]
    async fn test_opens_once_and_reuses() {
        let handle = StoreHandle::from_store(Arc::new(MemoryStatsStore::new()));
        assert!(!handle.is_open().await);

        handle.get().await.unwrap();
        handle.get().await.unwrap();

        assert!(handle.is_open().await);
        assert_eq!(handle.open_count(), 1);
    }

    #[tokio::test]
    async fn test_close_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let handle = StoreHandle::from_path(Some(path.clone()));

        let store = handle.get().await.unwrap();
        store.save(&UserStats::new("ada", "k")).await.unwrap();
        handle.close().await.unwrap();
        assert!(!handle.is_open().await);
        assert!(path.exists());

        let store = handle.get().await.unwrap();
        assert!(store.find("ada").await.unwrap().is_some());
        assert_eq!(handle.open_count(), 2);
    }

    #[tokio::test]
    async fn test_unconfigured_handle_fails_on_get() {
        let handle = StoreHandle::from_path(None);
        let err = handle.get().await.err().unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::MissingStatsFile)));
        // 关闭未打开的句柄不是错误
        handle.close().await.unwrap();
    }
}
