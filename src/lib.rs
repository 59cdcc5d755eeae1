// ==========================================
// 热轧精整排产系统 - 版本对比核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (对比结果只读, 不修改排产)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 快照/差异/产能值类型
pub mod domain;

// 引擎层 - 规范化与对比计算 (纯函数)
pub mod engine;

// 报告层 - 导出行与报告正文
pub mod report;

// 数据仓储层 - 复盘备注
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能埋点
pub mod perf;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CapacityDeltaRow, CapacityPoolRecord, ChangeType, DiffEntry, DiffResult, DiffSummary,
    MachineDayKey, ScheduledItemSnapshot, VersionLabelSource,
};

// 引擎
pub use engine::{
    aggregate_capacity, compare_daily_totals, compute_diff, flag_overflow, format_version_label,
    merge_thresholds, normalize_items, retrospective_note_key, CapacityComparison, DailyTrendPoint,
};

// API
pub use api::{
    ApiError, ApiResult, CompareRequest, ComparisonDataSource, ExportFormat, StaticDataSource,
    VersionComparisonApi, VersionComparisonView,
};

// ==========================================
// 版本信息
// ==========================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "热轧精整排产系统-版本对比";
