//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `course_runner` - 单门课程运行器
//! - 构建会话、解析用户和课程、枚举条目
//! - 串行调度 `CompletionFlow`
//! - 返回处理过的条目数
//!
//! ### `completion_service` - 调用方边界
//! - 校验请求字段
//! - 调用 `course_runner`
//! - 通过注入的 `StoreHandle` 累计用户统计
//!
//! ## 层次关系
//!
//! ```text
//! completion_service (请求 + 统计)
//!     ↓
//! course_runner (处理 Vec<Item>)
//!     ↓
//! workflow::CompletionFlow (处理单个 Item)
//!     ↓
//! services / clients (能力层：身份 / 课程 / 条目 / 平台 API)
//!     ↓
//! infrastructure (基础设施：HttpExecutor)
//! ```

pub mod completion_service;
pub mod course_runner;

pub use completion_service::{CompletionRequest, CompletionResponse, CompletionService};
pub use course_runner::CourseRunner;
