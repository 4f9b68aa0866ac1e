//! 用户身份解析 - 业务能力层
//!
//! 只负责"当前会话属于哪个用户"

use crate::clients::CourseraClient;
use crate::error::{AppError, AppResult, ResolutionTarget};
use crate::models::{Session, UserId};
use tracing::debug;

/// 用户身份解析服务
pub struct IdentityResolver {
    client: CourseraClient,
}

impl IdentityResolver {
    pub fn new(client: CourseraClient) -> Self {
        Self { client }
    }

    /// 读取当前用户权限列表，取第一条记录的 ID
    ///
    /// # 错误
    /// - 上游返回非成功状态：原样传播 [`AppError::Http`]
    /// - 列表为空或 ID 缺失/格式错误：`ResolutionError("user id")`
    pub async fn resolve(&self, session: &Session) -> AppResult<UserId> {
        let response = self.client.get_my_permissions(session).await?;

        let user_id = CourseraClient::first_element_id(&response)
            .and_then(UserId::from_json)
            .ok_or_else(|| AppError::resolution(ResolutionTarget::UserId))?;

        debug!("当前用户 ID: {}", user_id);
        Ok(user_id)
    }
}
