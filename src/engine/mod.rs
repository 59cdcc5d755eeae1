// ==========================================
// 热轧精整排产系统 - 版本对比引擎层
// ==========================================
// 职责: 快照规范化 / 差异对账 / 产能与日吨位聚合 / 标签与键
// 红线: 引擎均为纯函数, 不做 I/O, 不抛错 (坏数据降级为缺省值)
// ==========================================

pub mod capacity;
pub mod daily_totals;
pub mod diff;
pub mod labels;
pub mod normalizer;

// 重导出核心引擎函数
pub use capacity::{aggregate_capacity, flag_overflow, merge_thresholds, CapacityComparison};
pub use daily_totals::{aggregate_daily_totals, compare_daily_totals, DailyTrendPoint};
pub use diff::{compute_diff, WEIGHT_TOLERANCE};
pub use labels::{format_version_label, machine_day_key, retrospective_note_key};
pub use normalizer::{
    normalize_date_key, normalize_item, normalize_items, normalize_pool, normalize_pools,
};
