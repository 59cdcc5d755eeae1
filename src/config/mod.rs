// ==========================================
// 热轧精整排产系统 - 配置层
// ==========================================
// 职责: 版本对比相关配置的加载
// 存储: config_kv 表
// ==========================================

pub mod compare_config;
pub mod config_manager;

// 重导出核心配置
pub use compare_config::{config_keys, CompareConfig};
pub use config_manager::ConfigManager;
