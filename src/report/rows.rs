// ==========================================
// 热轧精整排产系统 - 导出行整形
// ==========================================
// 字段顺序即 CSV 表头顺序, 不可调整
// ==========================================

use crate::domain::capacity::CapacityDeltaRow;
use crate::domain::diff::DiffEntry;
use serde::{Deserialize, Serialize};

pub const DIFF_EXPORT_HEADERS: [&str; 12] = [
    "change_type",
    "material_id",
    "from_machine",
    "from_date",
    "from_seq",
    "to_machine",
    "to_date",
    "to_seq",
    "weight_t",
    "urgent_level",
    "locked_in_plan",
    "force_release_in_plan",
];

pub const CAPACITY_EXPORT_HEADERS: [&str; 9] = [
    "date",
    "machine_code",
    "used_a",
    "used_b",
    "delta",
    "target_a",
    "limit_a",
    "target_b",
    "limit_b",
];

/// 差异导出行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffExportRow {
    pub change_type: String,
    pub material_id: String,
    pub from_machine: Option<String>,
    pub from_date: Option<String>,
    pub from_seq: Option<i64>,
    pub to_machine: Option<String>,
    pub to_date: Option<String>,
    pub to_seq: Option<i64>,
    pub weight_t: Option<f64>,
    pub urgent_level: Option<String>,
    pub locked_in_plan: Option<bool>,
    pub force_release_in_plan: Option<bool>,
}

/// 产能变化导出行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityExportRow {
    pub date: String,
    pub machine_code: String,
    pub used_a: f64,
    pub used_b: f64,
    pub delta: f64,
    pub target_a: Option<f64>,
    pub limit_a: Option<f64>,
    pub target_b: Option<f64>,
    pub limit_b: Option<f64>,
}

/// 差异列表 → 导出行
///
/// 属性列 (吨位/紧急等级/锁定/强制放行) 优先取版本B, REMOVED 时取版本A。
pub fn diff_export_rows(diffs: &[DiffEntry]) -> Vec<DiffExportRow> {
    diffs
        .iter()
        .map(|entry| {
            let from = entry.previous_state.as_ref();
            let to = entry.current_state.as_ref();
            let latest = entry.latest_state();
            DiffExportRow {
                change_type: entry.change_type.as_str().to_string(),
                material_id: entry.material_id.clone(),
                from_machine: from.map(|s| s.machine_code.clone()),
                from_date: from.map(|s| s.plan_date.clone()),
                from_seq: from.map(|s| s.seq_no),
                to_machine: to.map(|s| s.machine_code.clone()),
                to_date: to.map(|s| s.plan_date.clone()),
                to_seq: to.map(|s| s.seq_no),
                weight_t: latest.and_then(|s| s.weight_t).filter(|w| w.is_finite()),
                urgent_level: latest.and_then(|s| s.urgent_level.clone()),
                locked_in_plan: latest.and_then(|s| s.locked_in_plan),
                force_release_in_plan: latest.and_then(|s| s.force_release_in_plan),
            }
        })
        .collect()
}

/// 产能变化行 → 导出行
pub fn capacity_export_rows(rows: &[CapacityDeltaRow]) -> Vec<CapacityExportRow> {
    rows.iter()
        .map(|row| CapacityExportRow {
            date: row.date.clone(),
            machine_code: row.machine_code.clone(),
            used_a: row.used_a(),
            used_b: row.used_b(),
            delta: row.delta(),
            target_a: row.target_a,
            limit_a: row.limit_a,
            target_b: row.target_b,
            limit_b: row.limit_b,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diff::ChangeType;
    use crate::domain::snapshot::ScheduledItemSnapshot;

    #[test]
    fn test_moved_row_has_both_sides() {
        let a = ScheduledItemSnapshot::placed("M1", "H1", "2024-01-01", 1).with_weight(12.0);
        let mut b = ScheduledItemSnapshot::placed("M1", "H2", "2024-01-02", 4).with_weight(12.0);
        b.urgent_level = Some("L1".to_string());

        let rows = diff_export_rows(&[DiffEntry::changed(ChangeType::Moved, &a, &b)]);
        let row = &rows[0];
        assert_eq!(row.change_type, "MOVED");
        assert_eq!(row.from_machine.as_deref(), Some("H1"));
        assert_eq!(row.from_seq, Some(1));
        assert_eq!(row.to_machine.as_deref(), Some("H2"));
        assert_eq!(row.to_date.as_deref(), Some("2024-01-02"));
        assert_eq!(row.weight_t, Some(12.0));
        assert_eq!(row.urgent_level.as_deref(), Some("L1"));
    }

    #[test]
    fn test_removed_row_uses_previous_attributes() {
        let mut a =
            ScheduledItemSnapshot::placed("M9", "H1", "2024-01-01", 2).with_weight(f64::NAN);
        a.locked_in_plan = Some(true);

        let rows = diff_export_rows(&[DiffEntry::removed(&a)]);
        let row = &rows[0];
        assert_eq!(row.change_type, "REMOVED");
        assert!(row.to_machine.is_none() && row.to_seq.is_none());
        assert_eq!(row.weight_t, None);
        assert_eq!(row.locked_in_plan, Some(true));
    }

    #[test]
    fn test_capacity_row_copy() {
        let mut row = CapacityDeltaRow::new("H1", "2024-01-01", 50.0, 30.0);
        row.limit_b = Some(40.0);
        let rows = capacity_export_rows(&[row]);
        assert_eq!(rows[0].delta, -20.0);
        assert_eq!(rows[0].limit_b, Some(40.0));
        assert_eq!(rows[0].target_a, None);
    }
}
