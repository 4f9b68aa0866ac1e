//! 统计存储实现

use crate::error::{AppResult, StorageError};
use crate::storage::user_stats::UserStats;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// 用户统计存储
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// 按用户名查找
    async fn find(&self, name: &str) -> AppResult<Option<UserStats>>;

    /// 新建或覆盖
    async fn save(&self, stats: &UserStats) -> AppResult<()>;

    /// 关闭前把缓冲内容落盘
    async fn flush(&self) -> AppResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStatsStore
// ---------------------------------------------------------------------------

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    users: Mutex<BTreeMap<String, UserStats>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn find(&self, name: &str) -> AppResult<Option<UserStats>> {
        Ok(self.users.lock().await.get(name).cloned())
    }

    async fn save(&self, stats: &UserStats) -> AppResult<()> {
        self.users
            .lock()
            .await
            .insert(stats.name.clone(), stats.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStatsStore
// ---------------------------------------------------------------------------

/// JSON 文件存储：整个文件是一个以用户名为键的对象，每次保存整体重写
#[derive(Debug)]
pub struct JsonFileStatsStore {
    path: PathBuf,
    users: Mutex<BTreeMap<String, UserStats>>,
}

impl JsonFileStatsStore {
    /// 打开统计文件，文件不存在时视为空
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let users: BTreeMap<String, UserStats> = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StorageError::Corrupted {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };

        debug!("统计文件 {} 已加载 {} 个用户", path.display(), users.len());
        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, users: &BTreeMap<String, UserStats>) -> AppResult<()> {
        let content = serde_json::to_string_pretty(users).map_err(|source| StorageError::Corrupted {
            path: self.path.display().to_string(),
            source,
        })?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StorageError::WriteFailed {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(())
    }
}

#[async_trait]
impl StatsStore for JsonFileStatsStore {
    async fn find(&self, name: &str) -> AppResult<Option<UserStats>> {
        Ok(self.users.lock().await.get(name).cloned())
    }

    async fn save(&self, stats: &UserStats) -> AppResult<()> {
        let mut users = self.users.lock().await;
        users.insert(stats.name.clone(), stats.clone());
        self.persist(&users).await
    }

    async fn flush(&self) -> AppResult<()> {
        let users = self.users.lock().await;
        self.persist(&users).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_memory_store_len_and_is_empty() {
        let store = MemoryStatsStore::new();
        assert!(store.is_empty().await);

        store.save(&UserStats::new("ada", "k")).await.unwrap();
        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let store = JsonFileStatsStore::open(&path).await.unwrap();
        assert!(store.find("ada").await.unwrap().is_none());

        let mut stats = UserStats::new("ada", "not-available");
        stats.modules_skipped = 9;
        store.save(&stats).await.unwrap();

        let reopened = JsonFileStatsStore::open(&path).await.unwrap();
        let loaded = reopened.find("ada").await.unwrap().unwrap();
        assert_eq!(loaded.modules_skipped, 9);
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = JsonFileStatsStore::open(&path).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Storage(StorageError::Corrupted { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_reads_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        tokio::fs::write(
            &path,
            r#"{"ada":{"name":"ada","apiKey":"k","coursesSolved":4,"modulesSkipped":40,"updatedAt":"2026-01-01T00:00:00Z"}}"#,
        )
        .await
        .unwrap();

        let store = JsonFileStatsStore::open(&path).await.unwrap();
        let stats = store.find("ada").await.unwrap().unwrap();
        assert_eq!(stats.courses_solved, 4);
        assert_eq!(stats.forms_solved, 0);
    }
}
