use std::path::Path;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// 初始化日志系统
///
/// stdout 专用于 MCP 协议帧，日志只写到：
/// - 标准错误（stderr），人类可读或 JSON 格式
/// - 文件（可选，JSON 格式，非阻塞写入）
///
/// 返回的 `WorkerGuard` 需要在进程生命周期内持有，否则文件日志会丢失。
pub fn init_logging(
    log_level: &str,
    json_format: bool,
    log_file: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level = parse_log_level(log_level);

    // 环境变量 RUST_LOG 优先
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{}", level)))?;

    let (file_writer, guard) = match log_file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    build_subscriber(env_filter, json_format, file_writer).init();

    tracing::info!(
        log_level = %log_level,
        json_format = %json_format,
        log_file = ?log_file,
        "日志系统初始化完成"
    );

    Ok(guard)
}

/// 组装订阅器：stderr 层（pretty 或 JSON）+ 可选的 JSON 文件层
fn build_subscriber(
    env_filter: EnvFilter,
    json_format: bool,
    file_writer: Option<NonBlocking>,
) -> impl Subscriber + Send + Sync + 'static {
    let stderr_layer: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
    });

    Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
}

/// 拆分日志文件路径为目录和文件名
fn split_log_path(path: &str) -> anyhow::Result<(&Path, &std::ffi::OsStr)> {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("LOG_FILE 必须指向文件: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((directory, file_name))
}

/// 解析日志级别字符串
fn parse_log_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "⚠️  无效的日志级别 '{}', 使用默认值 'info'",
                level_str
            );
            Level::INFO
        }
    }
}
