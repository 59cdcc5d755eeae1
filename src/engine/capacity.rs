// ==========================================
// 热轧精整排产系统 - 产能对比聚合
// ==========================================
// 口径:
// - 按 (机组, 日期) 汇总 weight_t; 机组/日期为空或吨位非正/非有限的明细不计入
// - 某键只在一侧出现时, 另一侧已用产能按 0 计
// - 默认只保留 |delta| > ε 的行; include_unchanged=true 时保留全部
// - 行排序: 日期升序, 再按机组代码
// - total_a/total_b 为全量汇总, 不受展示过滤影响
// ==========================================

use crate::domain::capacity::{
    normalize_threshold, CapacityDeltaRow, CapacityPoolRecord, MachineDayKey,
};
use crate::domain::snapshot::ScheduledItemSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ==========================================
// CapacityComparison - 产能对比结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityComparison {
    pub rows: Vec<CapacityDeltaRow>,
    pub total_a: f64,              // 版本A 全量已用吨位
    pub total_b: f64,              // 版本B 全量已用吨位
    pub date_from: Option<String>, // 覆盖的最早日期 (全部键, 不受过滤影响)
    pub date_to: Option<String>,   // 覆盖的最晚日期
    pub machines: Vec<String>,     // 涉及机组 (去重, 升序)
}

/// 单个快照按 (机组, 日期) 汇总已用吨位
///
/// # 返回
/// (按键汇总, 全量合计)
pub fn aggregate_used_capacity(
    items: &[ScheduledItemSnapshot],
) -> (BTreeMap<MachineDayKey, f64>, f64) {
    let mut used: BTreeMap<MachineDayKey, f64> = BTreeMap::new();
    let mut total = 0.0;

    for item in items {
        if item.machine_code.is_empty() || item.plan_date.is_empty() {
            continue;
        }
        let Some(weight_t) = item.effective_weight_t() else {
            continue;
        };
        *used
            .entry(MachineDayKey::new(&item.machine_code, &item.plan_date))
            .or_insert(0.0) += weight_t;
        total += weight_t;
    }

    (used, total)
}

/// 产能对比聚合
///
/// # 参数
/// - items_a / items_b: 两个版本的规范化明细
/// - include_unchanged: 是否保留 delta 为 0 的行
pub fn aggregate_capacity(
    items_a: &[ScheduledItemSnapshot],
    items_b: &[ScheduledItemSnapshot],
    include_unchanged: bool,
) -> CapacityComparison {
    let (used_a, total_a) = aggregate_used_capacity(items_a);
    let (used_b, total_b) = aggregate_used_capacity(items_b);

    let mut all_keys: BTreeSet<&MachineDayKey> = used_a.keys().collect();
    all_keys.extend(used_b.keys());

    let date_from = all_keys.iter().next().map(|k| k.plan_date.clone());
    let date_to = all_keys.iter().next_back().map(|k| k.plan_date.clone());
    let machines: Vec<String> = all_keys
        .iter()
        .map(|k| k.machine_code.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // BTreeSet 的顺序即 (日期, 机组) 顺序
    let rows: Vec<CapacityDeltaRow> = all_keys
        .into_iter()
        .map(|key| {
            CapacityDeltaRow::new(
                &key.machine_code,
                &key.plan_date,
                used_a.get(key).copied().unwrap_or(0.0),
                used_b.get(key).copied().unwrap_or(0.0),
            )
        })
        .filter(|row| include_unchanged || row.has_change())
        .collect();

    CapacityComparison {
        rows,
        total_a,
        total_b,
        date_from,
        date_to,
        machines,
    }
}

/// 合并产能池阈值 (target / limit)
///
/// 说明: 阈值为 0 或非有限值时按 None 处理 (视为未配置)。
pub fn merge_thresholds(
    rows: Vec<CapacityDeltaRow>,
    pools_a: &[CapacityPoolRecord],
    pools_b: &[CapacityPoolRecord],
) -> Vec<CapacityDeltaRow> {
    let index_a = index_pools(pools_a);
    let index_b = index_pools(pools_b);

    rows.into_iter()
        .map(|mut row| {
            let key = row.key();
            if let Some(pool) = index_a.get(&key) {
                row.target_a = normalize_threshold(pool.target_capacity_t);
                row.limit_a = normalize_threshold(pool.limit_capacity_t);
            }
            if let Some(pool) = index_b.get(&key) {
                row.target_b = normalize_threshold(pool.target_capacity_t);
                row.limit_b = normalize_threshold(pool.limit_capacity_t);
            }
            row
        })
        .collect()
}

/// 超限行: limit_b 已配置且 used_b > limit_b + ε
pub fn flag_overflow(rows: &[CapacityDeltaRow]) -> Vec<&CapacityDeltaRow> {
    rows.iter().filter(|row| row.is_overflow()).collect()
}

fn index_pools(pools: &[CapacityPoolRecord]) -> HashMap<MachineDayKey, &CapacityPoolRecord> {
    // 同键重复时后写覆盖
    pools.iter().map(|pool| (pool.key(), pool)).collect()
}
