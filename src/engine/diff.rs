// ==========================================
// 热轧精整排产系统 - 版本差异引擎
// ==========================================
// 口径:
// - 以 material_id 对账, 按 material_id 字典序输出 (结果可复现, 导出稳定)
// - 仅B有 = ADDED; 仅A有 = REMOVED
// - 两侧都有: 机组/日期/序号 任一变化 = MOVED (优先)
//             否则 吨位/紧急等级/锁定/强制放行/状态/落位原因 任一变化 = MODIFIED
//             否则视为未变化, 不输出
// ==========================================

use crate::domain::diff::{ChangeType, DiffEntry, DiffResult};
use crate::domain::snapshot::ScheduledItemSnapshot;
use std::collections::{BTreeMap, BTreeSet};

/// 吨位比较容差
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// 计算两个快照集合的差异
///
/// # 参数
/// - items_a: 版本A (基准) 明细
/// - items_b: 版本B (对比) 明细
///
/// # 返回
/// 稀疏差异列表 (未变化的材料不出现) 及汇总计数
pub fn compute_diff(
    items_a: &[ScheduledItemSnapshot],
    items_b: &[ScheduledItemSnapshot],
) -> DiffResult {
    let map_a: BTreeMap<&str, &ScheduledItemSnapshot> = items_a
        .iter()
        .map(|item| (item.material_id.as_str(), item))
        .collect();
    let map_b: BTreeMap<&str, &ScheduledItemSnapshot> = items_b
        .iter()
        .map(|item| (item.material_id.as_str(), item))
        .collect();

    let mut all_ids: BTreeSet<&str> = map_a.keys().copied().collect();
    all_ids.extend(map_b.keys().copied());

    let diffs = all_ids
        .into_iter()
        .filter_map(|material_id| {
            match (map_a.get(material_id), map_b.get(material_id)) {
                (None, Some(b)) => Some(DiffEntry::added(b)),
                (Some(a), None) => Some(DiffEntry::removed(a)),
                (Some(a), Some(b)) => {
                    classify_pair(a, b).map(|change_type| DiffEntry::changed(change_type, a, b))
                }
                (None, None) => None,
            }
        })
        .collect::<Vec<_>>();

    let result = DiffResult::from_entries(diffs);
    tracing::debug!(
        items_a = items_a.len(),
        items_b = items_b.len(),
        total_changes = result.summary.total_changes,
        "版本差异计算完成"
    );
    result
}

/// 对同一材料的两侧状态分类; None 表示未变化
pub fn classify_pair(
    a: &ScheduledItemSnapshot,
    b: &ScheduledItemSnapshot,
) -> Option<ChangeType> {
    if is_moved(a, b) {
        Some(ChangeType::Moved)
    } else if is_modified(a, b) {
        Some(ChangeType::Modified)
    } else {
        None
    }
}

fn is_moved(a: &ScheduledItemSnapshot, b: &ScheduledItemSnapshot) -> bool {
    a.machine_code != b.machine_code || a.plan_date != b.plan_date || a.seq_no != b.seq_no
}

fn is_modified(a: &ScheduledItemSnapshot, b: &ScheduledItemSnapshot) -> bool {
    weight_differs(a.weight_t, b.weight_t)
        || a.urgent_level != b.urgent_level
        || a.locked_in_plan != b.locked_in_plan
        || a.force_release_in_plan != b.force_release_in_plan
        || a.sched_state != b.sched_state
        || a.assign_reason != b.assign_reason
}

/// 吨位差异判断
///
/// - 一侧缺失一侧存在: 有差异
/// - 两侧都是非有限值 ("未知"): 无差异; 仅一侧非有限: 有差异
/// - 其余按 WEIGHT_TOLERANCE 比较
fn weight_differs(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => false,
        (Some(x), Some(y)) => match (x.is_finite(), y.is_finite()) {
            (true, true) => (x - y).abs() > WEIGHT_TOLERANCE,
            (false, false) => false,
            _ => true,
        },
        _ => true,
    }
}
