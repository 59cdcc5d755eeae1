// ==========================================
// 热轧精整排产系统 - 版本对比领域模型层
// ==========================================
// 职责: 定义对比快照、差异条目、产能变化行等值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod diff;
pub mod snapshot;
pub mod version;

// 重导出核心类型
pub use capacity::{CapacityDeltaRow, CapacityPoolRecord, MachineDayKey};
pub use diff::{ChangeType, DiffEntry, DiffResult, DiffSummary};
pub use snapshot::ScheduledItemSnapshot;
pub use version::VersionLabelSource;
