use anyhow::{Context, Result};
use clap::Parser;
use course_completion::storage::record_run;
use course_completion::utils::logging;
use course_completion::{Config, CourseRunner, StoreHandle};
use std::path::PathBuf;
use tracing::info;

/// 把课程的所有条目标记为已完成
#[derive(Debug, Parser)]
#[command(name = "course_completion", version)]
struct Cli {
    /// 课程 slug
    course_slug: String,

    /// CAUTH cookie
    #[arg(long, env = "CAUTH", hide_env_values = true)]
    cauth: String,

    /// CSRF3-Token cookie
    #[arg(long, env = "CSRF3_TOKEN", hide_env_values = true)]
    csrf: String,

    /// 记录统计时使用的用户名
    #[arg(long)]
    name: Option<String>,

    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 用户统计文件（覆盖配置）
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// 详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env()?,
    };

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);
    logging::log_startup(&config);

    // 统计存储在触达平台之前打开，打不开就不运行
    let stats_file = cli.stats_file.or(config.stats_file.clone().map(PathBuf::from));
    let stats = match stats_file {
        Some(path) => {
            let handle = StoreHandle::from_path(Some(path));
            let store = handle.get().await.context("无法打开统计文件")?;
            Some((handle, store))
        }
        None => None,
    };

    let runner = CourseRunner::from_config(&config).context("无法创建 HTTP 客户端")?;
    let modules = runner
        .run_completion(&cli.course_slug, &cli.cauth, &cli.csrf)
        .await
        .with_context(|| format!("课程 {} 处理失败", cli.course_slug))?;

    if let Some((handle, store)) = stats {
        if let Some(totals) = record_run(store.as_ref(), cli.name.as_deref(), modules).await? {
            info!(
                "📊 用户 {} 累计: 课程 {}, 条目 {}",
                totals.name, totals.courses_solved, totals.modules_skipped
            );
        }
        handle.close().await?;
    }

    println!("{}", modules);
    Ok(())
}
