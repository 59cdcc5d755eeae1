// ==========================================
// 热轧精整排产系统 - 日吨位汇总
// ==========================================
// 用途: 驱动两个版本的日吨位趋势对比
// 口径: 日期非空且吨位为有限正数的明细才计入 (与产能聚合一致)
// ==========================================

use crate::domain::snapshot::ScheduledItemSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 日吨位趋势点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    pub date: String,
    pub total_a: f64,
    pub total_b: f64,
    pub delta: f64,
}

/// 按日期汇总吨位 (日期升序)
pub fn aggregate_daily_totals(items: &[ScheduledItemSnapshot]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for item in items {
        if item.plan_date.is_empty() {
            continue;
        }
        if let Some(weight_t) = item.effective_weight_t() {
            *totals.entry(item.plan_date.clone()).or_insert(0.0) += weight_t;
        }
    }
    totals
}

/// 两个版本的日吨位对比 (日期并集, 缺失按 0)
pub fn compare_daily_totals(
    items_a: &[ScheduledItemSnapshot],
    items_b: &[ScheduledItemSnapshot],
) -> Vec<DailyTrendPoint> {
    let daily_a = aggregate_daily_totals(items_a);
    let daily_b = aggregate_daily_totals(items_b);

    let mut all_dates: BTreeSet<&String> = daily_a.keys().collect();
    all_dates.extend(daily_b.keys());

    all_dates
        .into_iter()
        .map(|date| {
            let total_a = daily_a.get(date).copied().unwrap_or(0.0);
            let total_b = daily_b.get(date).copied().unwrap_or(0.0);
            DailyTrendPoint {
                date: date.clone(),
                total_a,
                total_b,
                delta: total_b - total_a,
            }
        })
        .collect()
}
