// ==========================================
// 热轧精整排产系统 - 版本标签来源
// ==========================================
// 用途: 版本展示名称的输入 (版本ID / 版本号 / 配置快照)
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionLabelSource {
    pub version_id: String,                   // 版本ID
    pub version_no: Option<f64>,              // 版本号 (后端可能缺失)
    pub config_snapshot_json: Option<String>, // 配置快照 (JSON, 可能含 __meta_ 元信息)
}

impl VersionLabelSource {
    /// 仅知道版本ID时的来源
    pub fn from_id(version_id: &str) -> Self {
        Self {
            version_id: version_id.to_string(),
            version_no: None,
            config_snapshot_json: None,
        }
    }
}
