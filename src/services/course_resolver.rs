//! 课程 ID 解析 - 业务能力层
//!
//! 把公开 slug 转成平台内部 ID，每次运行都重新查询，不做缓存

use crate::clients::CourseraClient;
use crate::error::{AppError, AppResult, ResolutionTarget};
use crate::models::{CourseId, CourseReference, Session};
use tracing::debug;

/// 课程 ID 解析服务
pub struct CourseResolver {
    client: CourseraClient,
}

impl CourseResolver {
    pub fn new(client: CourseraClient) -> Self {
        Self { client }
    }

    /// 按 slug 查询课程资料，取第一条记录的 ID
    ///
    /// 失败方式与 [`crate::services::IdentityResolver::resolve`] 相同，
    /// 只是解析目标为 `course id`。
    pub async fn resolve(&self, session: &Session, slug: &str) -> AppResult<CourseReference> {
        let response = self.client.get_course_materials(session, slug).await?;

        let resolved_id = CourseraClient::first_element_id(&response)
            .and_then(CourseId::from_json)
            .ok_or_else(|| AppError::resolution(ResolutionTarget::CourseId))?;

        debug!("课程 {} -> {}", slug, resolved_id);
        Ok(CourseReference {
            slug: slug.to_string(),
            resolved_id,
        })
    }
}
