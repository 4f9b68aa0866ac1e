//! # Course Completion
//!
//! 代表用户把课程平台上某门课的所有条目标记为"已完成"
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 传输资源，只暴露"发请求"的能力
//! - `HttpExecutor` - 把会话请求头附加到每个请求
//!
//! ### ② 业务能力层（Clients / Services）
//! - `clients/` - 平台 API 地址与调用
//! - `IdentityResolver` / `CourseResolver` / `ItemEnumerator`
//!
//! ### ③ 流程层（Workflow）
//! - `CompletionFlow` - 单个条目：主动作 → 兜底
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/course_runner` - 一次完整运行，返回处理过的条目数
//! - `orchestrator/completion_service` - 请求校验 + 用户统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::CourseraClient;
pub use config::Config;
pub use error::{AppError, AppResult, ResolutionTarget};
pub use infrastructure::{HttpExecutor, HttpTransport, ReqwestTransport};
pub use models::{Credentials, Item, Session};
pub use orchestrator::{CompletionRequest, CompletionResponse, CompletionService, CourseRunner};
pub use storage::StoreHandle;
pub use workflow::{CompletionFlow, CompletionOutcome};
