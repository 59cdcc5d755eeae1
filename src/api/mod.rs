// ==========================================
// 热轧精整排产系统 - API 层
// ==========================================
// 职责: 编排数据加载与对比引擎, 管理复盘备注, 导出对比结果
// 红线: 引擎层保持纯计算, I/O 只发生在 API 层
// ==========================================

pub mod comparison_api;
pub mod data_source;
pub mod error;

pub use comparison_api::{CompareRequest, ExportFormat, VersionComparisonApi, VersionComparisonView};
pub use data_source::{ComparisonDataSource, DateRange, StaticDataSource};
pub use error::{ApiError, ApiResult};
