// ==========================================
// 热轧精整排产系统 - 版本差异领域模型
// ==========================================
// 用途: 两个版本快照按 material_id 对账后的分类结果
// 红线: previous_state 为空 <=> ADDED; current_state 为空 <=> REMOVED
// ==========================================

use crate::domain::snapshot::ScheduledItemSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ChangeType - 变更类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Added,    // 仅在版本B中出现
    Removed,  // 仅在版本A中出现
    Moved,    // 机组/日期/序号变化
    Modified, // 落位不变, 属性变化
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "ADDED",
            ChangeType::Removed => "REMOVED",
            ChangeType::Moved => "MOVED",
            ChangeType::Modified => "MODIFIED",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// DiffEntry - 单个材料的差异条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub material_id: String,
    pub change_type: ChangeType,
    pub previous_state: Option<ScheduledItemSnapshot>,
    pub current_state: Option<ScheduledItemSnapshot>,
}

impl DiffEntry {
    pub fn added(current: &ScheduledItemSnapshot) -> Self {
        Self {
            material_id: current.material_id.clone(),
            change_type: ChangeType::Added,
            previous_state: None,
            current_state: Some(current.clone()),
        }
    }

    pub fn removed(previous: &ScheduledItemSnapshot) -> Self {
        Self {
            material_id: previous.material_id.clone(),
            change_type: ChangeType::Removed,
            previous_state: Some(previous.clone()),
            current_state: None,
        }
    }

    /// 两侧都存在的变更 (MOVED / MODIFIED)
    pub fn changed(
        change_type: ChangeType,
        previous: &ScheduledItemSnapshot,
        current: &ScheduledItemSnapshot,
    ) -> Self {
        debug_assert!(matches!(change_type, ChangeType::Moved | ChangeType::Modified));
        Self {
            material_id: current.material_id.clone(),
            change_type,
            previous_state: Some(previous.clone()),
            current_state: Some(current.clone()),
        }
    }

    /// 优先取版本B的状态, 缺失时回退到版本A
    pub fn latest_state(&self) -> Option<&ScheduledItemSnapshot> {
        self.current_state.as_ref().or(self.previous_state.as_ref())
    }
}

// ==========================================
// DiffSummary - 差异汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_changes: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub moved_count: usize,
}

impl DiffSummary {
    /// 由差异列表折叠得出 (不单独存储)
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            match entry.change_type {
                ChangeType::Added => acc.added_count += 1,
                ChangeType::Removed => acc.removed_count += 1,
                ChangeType::Moved => acc.moved_count += 1,
                ChangeType::Modified => acc.modified_count += 1,
            }
            acc.total_changes += 1;
            acc
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }
}

// ==========================================
// DiffResult - 差异计算结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub diffs: Vec<DiffEntry>,
    pub summary: DiffSummary,
}

impl DiffResult {
    pub fn from_entries(diffs: Vec<DiffEntry>) -> Self {
        let summary = DiffSummary::from_entries(&diffs);
        Self { diffs, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_folds_all_categories() {
        let a = ScheduledItemSnapshot::placed("M1", "H1", "2024-01-01", 1);
        let b = ScheduledItemSnapshot::placed("M1", "H2", "2024-01-01", 1);
        let entries = vec![
            DiffEntry::added(&b),
            DiffEntry::removed(&a),
            DiffEntry::changed(ChangeType::Moved, &a, &b),
            DiffEntry::changed(ChangeType::Modified, &a, &a),
            DiffEntry::added(&a),
        ];

        let summary = DiffSummary::from_entries(&entries);
        assert_eq!(summary.total_changes, 5);
        assert_eq!(summary.added_count, 2);
        assert_eq!(summary.removed_count, 1);
        assert_eq!(summary.moved_count, 1);
        assert_eq!(summary.modified_count, 1);
    }

    #[test]
    fn test_constructors_keep_state_nullability() {
        let a = ScheduledItemSnapshot::placed("M1", "H1", "2024-01-01", 1);
        let added = DiffEntry::added(&a);
        assert!(added.previous_state.is_none());
        assert!(added.current_state.is_some());

        let removed = DiffEntry::removed(&a);
        assert!(removed.previous_state.is_some());
        assert!(removed.current_state.is_none());
        assert_eq!(removed.latest_state().map(|s| s.machine_code.as_str()), Some("H1"));
    }

    #[test]
    fn test_change_type_serializes_upper_case() {
        let json = serde_json::to_string(&ChangeType::Modified).unwrap();
        assert_eq!(json, "\"MODIFIED\"");
    }
}
