// ==========================================
// 热轧精整排产系统 - 日志初始化
// ==========================================
// 输出: 终端可读格式 / JSON 行格式 (供上层外壳采集)
// 级别: RUST_LOG 优先, 否则使用默认级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认日志级别
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化日志系统 (终端格式, 默认 info)
///
/// # 示例
/// ```no_run
/// use hot_rolling_aps_compare::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::Pretty, DEFAULT_LOG_LEVEL);
}

/// 按指定格式与默认级别初始化
///
/// 重复初始化时保留已有订阅者
pub fn init_with(format: LogFormat, default_level: &str) {
    let filter = env_filter(default_level);
    let result = match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .try_init(),
    };
    if let Err(e) = result {
        tracing::debug!("日志系统已初始化: {}", e);
    }
}

/// 测试环境日志 (debug 级别, 输出到测试捕获)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
