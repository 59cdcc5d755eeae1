// ==========================================
// 热轧精整排产系统 - 版本对比配置
// ==========================================
// 来源: config_kv (scope_id='global') 键值对
// 容错: 值格式错误时回退默认值并告警, 不阻断对比
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 配置键
pub mod config_keys {
    /// 默认仅显示有变化的产能行 (bool)
    pub const SHOW_CHANGES_ONLY: &str = "compare_show_changes_only";
    /// 报告中列出的差异明细上限 (usize)
    pub const REPORT_DIFF_LIMIT: &str = "compare_report_diff_limit";
    /// 默认导出目录
    pub const EXPORT_DIR: &str = "compare_export_dir";
}

pub const DEFAULT_REPORT_DIFF_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareConfig {
    pub show_changes_only: bool,
    pub report_diff_limit: usize,
    pub export_dir: Option<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            show_changes_only: true,
            report_diff_limit: DEFAULT_REPORT_DIFF_LIMIT,
            export_dir: None,
        }
    }
}

impl CompareConfig {
    /// 从键值对解析配置 (缺失/非法值回退默认)
    pub fn from_kv(kv: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let show_changes_only = match kv.get(config_keys::SHOW_CHANGES_ONLY) {
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                tracing::warn!(
                    key = config_keys::SHOW_CHANGES_ONLY,
                    value = %raw,
                    "配置值非法, 使用默认值"
                );
                defaults.show_changes_only
            }),
            None => defaults.show_changes_only,
        };

        let report_diff_limit = match kv.get(config_keys::REPORT_DIFF_LIMIT) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => v,
                _ => {
                    tracing::warn!(
                        key = config_keys::REPORT_DIFF_LIMIT,
                        value = %raw,
                        "配置值非法, 使用默认值"
                    );
                    defaults.report_diff_limit
                }
            },
            None => defaults.report_diff_limit,
        };

        let export_dir = kv
            .get(config_keys::EXPORT_DIR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            show_changes_only,
            report_diff_limit,
            export_dir,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
