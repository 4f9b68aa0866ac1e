//! 条目处理上下文
//!
//! 封装"我正在以哪个用户身份处理哪门课的第几个条目"这一信息

use crate::models::{CourseReference, UserId};
use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone, Copy)]
pub struct ItemCtx<'a> {
    /// 当前用户 ID
    pub user_id: UserId,

    /// 本次运行解析出的课程
    pub course: &'a CourseReference,

    /// 条目在枚举结果中的位置（从1开始，仅用于日志）
    pub item_index: usize,

    /// 条目总数（仅用于日志）
    pub total: usize,
}

impl<'a> ItemCtx<'a> {
    pub fn new(user_id: UserId, course: &'a CourseReference, item_index: usize, total: usize) -> Self {
        Self {
            user_id,
            course,
            item_index,
            total,
        }
    }
}

impl Display for ItemCtx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[课程 {} 条目 {}/{}]",
            self.course.slug, self.item_index, self.total
        )
    }
}
