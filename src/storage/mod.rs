//! 用户统计持久化
//!
//! 课程完成流程本身不持久化任何状态；这里是调用方用来累计使用次数的存储。

pub mod stats_store;
pub mod store_handle;
pub mod user_stats;

pub use stats_store::{JsonFileStatsStore, MemoryStatsStore, StatsStore};
pub use store_handle::StoreHandle;
pub use user_stats::{record_run, UserStats, PLACEHOLDER_API_KEY};
