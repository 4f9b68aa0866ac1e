//! 课程条目枚举 - 业务能力层
//!
//! 只负责"这门课有哪些条目"，不去重、不排序

use crate::clients::CourseraClient;
use crate::error::AppResult;
use crate::models::{Item, Session};
use tracing::{debug, warn};

/// 课程条目枚举服务
pub struct ItemEnumerator {
    client: CourseraClient,
}

impl ItemEnumerator {
    pub fn new(client: CourseraClient) -> Self {
        Self { client }
    }

    /// 列出课程的所有条目
    ///
    /// # 返回
    /// 上游给出的条目序列（顺序与重复项保持原样）。
    /// 响应中没有条目集合时返回空序列，这不是错误。
    pub async fn enumerate(&self, session: &Session, slug: &str) -> AppResult<Vec<Item>> {
        let response = self.client.get_course_items(session, slug).await?;

        let Some(linked) = CourseraClient::linked_items(&response) else {
            debug!("课程 {} 没有可完成的条目", slug);
            return Ok(Vec::new());
        };

        let items: Vec<Item> = linked
            .iter()
            .filter_map(|raw| match serde_json::from_value::<Item>(raw.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("跳过无法解析的条目 {}: {}", raw, e);
                    None
                }
            })
            .collect();

        debug!("课程 {} 共 {} 个条目", slug, items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infrastructure::fakes::{FakeReply, FakeTransport};
    use crate::infrastructure::HttpExecutor;
    use crate::models::{ClientIdentity, Credentials};
    use serde_json::json;
    use std::sync::Arc;

    fn enumerator(transport: Arc<FakeTransport>) -> ItemEnumerator {
        let client = CourseraClient::new(&Config::default(), HttpExecutor::new(transport)).unwrap();
        ItemEnumerator::new(client)
    }

    fn session() -> Session {
        Session::build(&Credentials::new("A", "B"), &ClientIdentity::default())
    }

    #[tokio::test]
    async fn test_missing_linked_items_is_empty() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_get("showLockedItems=true", FakeReply::Json(json!({"elements": [{}]})));

        let items = enumerator(transport).enumerate(&session(), "ml").await.unwrap();
        assert_eq!(items.len(), 0);
    }

    #[tokio::test]
    async fn test_keeps_duplicates_and_order() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_get(
            "showLockedItems=true",
            FakeReply::Json(json!({
                "linked": {
                    "onDemandCourseMaterialItems.v2": [
                        {"id": "b", "name": "Second"},
                        {"id": "a", "name": "First"},
                        {"id": "b", "name": "Second"}
                    ]
                }
            })),
        );

        let items = enumerator(transport).enumerate(&session(), "ml").await.unwrap();
        let ids: Vec<_> = items.iter().filter_map(|i| i.item_id()).collect();
        assert_eq!(ids, vec!["b", "a", "b"]);
    }

    #[tokio::test]
    async fn test_non_object_entries_are_skipped() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_get(
            "showLockedItems=true",
            FakeReply::Json(json!({
                "linked": {"onDemandCourseMaterialItems.v2": [{"id": "a"}, 42, "oops"]}
            })),
        );

        let items = enumerator(transport).enumerate(&session(), "ml").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_field_types_keep_the_item() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_get(
            "showLockedItems=true",
            FakeReply::Json(json!({
                "linked": {"onDemandCourseMaterialItems.v2": [
                    {"id": "a", "timeCommitment": 1.5},
                    {"id": "b", "timeCommitment": "600000"},
                    {"id": "c", "trackId": 3},
                    {"id": 4}
                ]}
            })),
        );

        let items = enumerator(transport).enumerate(&session(), "ml").await.unwrap();
        let ids: Vec<_> = items.iter().filter_map(|i| i.item_id()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "4"]);
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let transport = Arc::new(FakeTransport::new());
        transport.on_get("showLockedItems=true", FakeReply::Status(403, json!({})));

        let err = enumerator(transport).enumerate(&session(), "ml").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
