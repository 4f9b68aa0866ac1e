/// 日志工具模块
///
/// 初始化 tracing 订阅器，并提供日志格式化的辅助函数
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，未设置时按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用不会报错（测试中常见）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 课程完成工具启动");
    info!("🌐 API 地址: {}", config.base_url);
    match config.request_timeout_secs {
        Some(secs) => info!("⏱️ 请求超时: {} 秒", secs),
        None => info!("⏱️ 请求超时: 客户端默认"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
