/// 课程平台 API 客户端
///
/// 封装所有与平台 API 相关的调用逻辑（地址拼接 + 请求发送），
/// 不做任何结果判断以外的业务决策
use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::infrastructure::HttpExecutor;
use crate::models::{CourseId, Session, UserId};
use reqwest::Url;
use serde_json::{json, Value};
use tracing::debug;

/// 条目列表所在的 linked 集合名
pub const ITEMS_COLLECTION: &str = "onDemandCourseMaterialItems.v2";

const ITEM_INCLUDES: &str =
    "passableItemGroups,passableItemGroupChoices,items,tracks,gradePolicy,gradingParameters";
const ITEM_FIELDS: &str = "onDemandCourseMaterialItems.v2(name,slug,timeCommitment,trackId)";

/// 课程平台 API 客户端
#[derive(Clone)]
pub struct CourseraClient {
    base_url: Url,
    executor: HttpExecutor,
}

impl CourseraClient {
    /// 创建新的平台客户端
    pub fn new(config: &Config, executor: HttpExecutor) -> AppResult<Self> {
        let invalid = || ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
        };
        let base_url = Url::parse(&config.base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid().into());
        }
        Ok(Self { base_url, executor })
    }

    // ========== 读取 ==========

    /// 查询当前用户的权限列表（`q=my`）
    pub async fn get_my_permissions(&self, session: &Session) -> AppResult<Value> {
        self.executor.get(session, self.permissions_url()?).await
    }

    /// 按 slug 查询课程资料（仅包含 modules）
    pub async fn get_course_materials(&self, session: &Session, slug: &str) -> AppResult<Value> {
        self.executor.get(session, self.course_lookup_url(slug)?).await
    }

    /// 按 slug 查询课程条目（扩展 includes + 字段投影 + 显示锁定条目）
    pub async fn get_course_items(&self, session: &Session, slug: &str) -> AppResult<Value> {
        self.executor.get(session, self.course_items_url(slug)?).await
    }

    // ========== 完成动作 ==========

    /// 发送"内容结束"事件
    ///
    /// # 参数
    /// - `user_id`: 当前用户 ID
    /// - `course_slug`: 课程 slug
    /// - `item_id`: 条目 ID
    pub async fn post_video_ended(
        &self,
        session: &Session,
        user_id: UserId,
        course_slug: &str,
        item_id: &str,
    ) -> AppResult<Value> {
        let url = self.video_ended_url(user_id, course_slug, item_id)?;
        debug!("发送内容结束事件: {}", url);
        self.executor
            .post(session, url, json!({ "contentRequestBody": {} }))
            .await
    }

    /// 提交补充完成记录
    pub async fn post_supplement_completion(
        &self,
        session: &Session,
        course_id: &CourseId,
        item_id: &str,
        user_id: UserId,
    ) -> AppResult<Value> {
        let url = self.endpoint("onDemandSupplementCompletions.v1")?;
        let body = json!({
            "courseId": course_id.as_str(),
            "itemId": item_id,
            "userId": user_id.0
        });
        debug!("提交补充完成记录: {}", body);
        self.executor.post(session, url, body).await
    }

    // ========== 地址拼接 ==========

    pub fn permissions_url(&self) -> AppResult<Url> {
        let mut url = self.endpoint("adminUserPermissions.v1")?;
        url.query_pairs_mut().append_pair("q", "my");
        Ok(url)
    }

    pub fn course_lookup_url(&self, slug: &str) -> AppResult<Url> {
        let mut url = self.endpoint("onDemandCourseMaterials.v2/")?;
        url.query_pairs_mut()
            .append_pair("q", "slug")
            .append_pair("slug", slug)
            .append_pair("includes", "modules");
        Ok(url)
    }

    pub fn course_items_url(&self, slug: &str) -> AppResult<Url> {
        let mut url = self.endpoint("onDemandCourseMaterials.v2/")?;
        url.query_pairs_mut()
            .append_pair("q", "slug")
            .append_pair("slug", slug)
            .append_pair("includes", ITEM_INCLUDES)
            .append_pair("fields", ITEM_FIELDS)
            .append_pair("showLockedItems", "true");
        Ok(url)
    }

    pub fn video_ended_url(&self, user_id: UserId, course_slug: &str, item_id: &str) -> AppResult<Url> {
        let mut url = self.endpoint("opencourse.v1/")?;
        let user = user_id.to_string();
        url.path_segments_mut()
            .map_err(|_| self.invalid_base())?
            .pop_if_empty()
            .extend([
                "user",
                user.as_str(),
                "course",
                course_slug,
                "item",
                item_id,
                "lecture",
                "videoEvents",
                "ended",
            ]);
        url.query_pairs_mut().append_pair("autoEnroll", "false");
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|_| self.invalid_base().into())
    }

    fn invalid_base(&self) -> ConfigError {
        ConfigError::InvalidBaseUrl {
            url: self.base_url.to_string(),
        }
    }

    // ========== 响应解析 ==========

    /// 提取 `elements[0].id`
    pub fn first_element_id(response: &Value) -> Option<&Value> {
        response
            .get("elements")
            .and_then(|v| v.as_array())
            .and_then(|elements| elements.first())
            .and_then(|first| first.get("id"))
    }

    /// 提取 `linked["onDemandCourseMaterialItems.v2"]`
    pub fn linked_items(response: &Value) -> Option<&Vec<Value>> {
        response
            .get("linked")
            .and_then(|linked| linked.get(ITEMS_COLLECTION))
            .and_then(|v| v.as_array())
    }

    /// 主完成动作是否返回了非空的 `contentResponseBody`
    pub fn has_content_response(response: &Value) -> bool {
        response
            .get("contentResponseBody")
            .map(|body| !body.is_null())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fakes::FakeTransport;
    use std::sync::Arc;

    fn client() -> CourseraClient {
        let executor = HttpExecutor::new(Arc::new(FakeTransport::new()));
        CourseraClient::new(&Config::default(), executor).unwrap()
    }

    #[test]
    fn test_permissions_url() {
        assert_eq!(
            client().permissions_url().unwrap().as_str(),
            "https://www.coursera.org/api/adminUserPermissions.v1?q=my"
        );
    }

    #[test]
    fn test_course_lookup_url_encodes_slug() {
        let url = client().course_lookup_url("machine learning").unwrap();
        assert_eq!(url.path(), "/api/onDemandCourseMaterials.v2/");
        assert_eq!(
            url.query(),
            Some("q=slug&slug=machine+learning&includes=modules")
        );
    }

    #[test]
    fn test_course_items_url_requests_locked_items() {
        let url = client().course_items_url("ml").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("showLockedItems".to_string(), "true".to_string())));
        assert!(pairs.contains(&("fields".to_string(), ITEM_FIELDS.to_string())));
        assert!(pairs.contains(&("includes".to_string(), ITEM_INCLUDES.to_string())));
    }

    #[test]
    fn test_video_ended_url_scopes_user_course_item() {
        let url = client().video_ended_url(UserId(7), "ml", "abc12").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.coursera.org/api/opencourse.v1/user/7/course/ml/item/abc12/lecture/videoEvents/ended?autoEnroll=false"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        let executor = HttpExecutor::new(Arc::new(FakeTransport::new()));
        assert!(CourseraClient::new(&config, executor).is_err());
    }

    #[test]
    fn test_has_content_response() {
        assert!(CourseraClient::has_content_response(&json!({"contentResponseBody": {}})));
        assert!(!CourseraClient::has_content_response(&json!({"contentResponseBody": null})));
        assert!(!CourseraClient::has_content_response(&json!({})));
        assert!(!CourseraClient::has_content_response(&json!("raw text")));
    }

    #[test]
    fn test_first_element_id() {
        let response = json!({"elements": [{"id": 7}, {"id": 8}]});
        assert_eq!(CourseraClient::first_element_id(&response), Some(&json!(7)));
        assert_eq!(CourseraClient::first_element_id(&json!({"elements": []})), None);
        assert_eq!(CourseraClient::first_element_id(&json!({})), None);
    }
}
