// ==========================================
// 热轧精整排产系统 - 产能对比领域模型
// ==========================================
// 用途: 机组×日期 维度的已用产能对比, 以及产能池阈值
// 红线: delta 恒等于 used_b - used_a, 不可单独设置
// ==========================================

use serde::{Deserialize, Serialize};

/// 产能比较的浮点容差 (delta 过滤 / 超限判断)
pub const CAPACITY_EPSILON: f64 = 1e-9;

// ==========================================
// MachineDayKey - 机组×日期 复合键
// ==========================================
// 排序: 先日期, 后机组代码 (字典序)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MachineDayKey {
    pub plan_date: String,
    pub machine_code: String,
}

impl MachineDayKey {
    pub fn new(machine_code: &str, plan_date: &str) -> Self {
        Self {
            plan_date: plan_date.to_string(),
            machine_code: machine_code.to_string(),
        }
    }
}

// ==========================================
// CapacityPoolRecord - 产能池阈值记录 (后端查询结果)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPoolRecord {
    pub machine_code: String,
    pub plan_date: String,
    pub target_capacity_t: Option<f64>, // 目标产能 (吨)
    pub limit_capacity_t: Option<f64>,  // 上限产能 (吨)
}

impl CapacityPoolRecord {
    pub fn key(&self) -> MachineDayKey {
        MachineDayKey::new(&self.machine_code, &self.plan_date)
    }
}

/// 阈值规范化: 0 或非有限值视为"未配置"
///
/// 说明: 避免误配置的 0 阈值造成误报超限。
pub fn normalize_threshold(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

// ==========================================
// CapacityDeltaRow - 产能变化行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityDeltaRow {
    pub machine_code: String,
    pub date: String,

    // ===== 已用产能 (缺失按 0) =====
    used_a: f64,
    used_b: f64,
    delta: f64,

    // ===== 产能池阈值 (缺失为 None) =====
    pub target_a: Option<f64>,
    pub limit_a: Option<f64>,
    pub target_b: Option<f64>,
    pub limit_b: Option<f64>,
}

impl CapacityDeltaRow {
    pub fn new(machine_code: &str, date: &str, used_a: f64, used_b: f64) -> Self {
        Self {
            machine_code: machine_code.to_string(),
            date: date.to_string(),
            used_a,
            used_b,
            delta: used_b - used_a,
            target_a: None,
            limit_a: None,
            target_b: None,
            limit_b: None,
        }
    }

    pub fn used_a(&self) -> f64 {
        self.used_a
    }

    pub fn used_b(&self) -> f64 {
        self.used_b
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn key(&self) -> MachineDayKey {
        MachineDayKey::new(&self.machine_code, &self.date)
    }

    /// 是否有变化 (|delta| > ε)
    pub fn has_change(&self) -> bool {
        self.delta.abs() > CAPACITY_EPSILON
    }

    /// 是否超限: limit_b 已配置且 used_b > limit_b + ε
    pub fn is_overflow(&self) -> bool {
        match self.limit_b {
            Some(limit) => self.used_b > limit + CAPACITY_EPSILON,
            None => false,
        }
    }

    /// 超限吨位 (未超限为 0)
    pub fn overflow_t(&self) -> f64 {
        match self.limit_b {
            Some(limit) if self.is_overflow() => self.used_b - limit,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with_limit(used_b: f64, limit_b: Option<f64>) -> CapacityDeltaRow {
        let mut row = CapacityDeltaRow::new("H1", "2024-01-01", 0.0, used_b);
        row.limit_b = limit_b;
        row
    }

    #[test]
    fn test_delta_is_derived() {
        let row = CapacityDeltaRow::new("H1", "2024-01-01", 50.0, 30.0);
        assert_eq!(row.delta(), -20.0);
        assert!(row.has_change());
    }

    #[test]
    fn test_overflow_epsilon_boundary() {
        assert!(!row_with_limit(100.0, Some(100.0)).is_overflow());
        assert!(row_with_limit(100.0 + 1e-6, Some(100.0)).is_overflow());
        assert!(!row_with_limit(100.0 - 1e-10, Some(100.0)).is_overflow());
        assert!(!row_with_limit(1_000.0, None).is_overflow());
    }

    #[test]
    fn test_overflow_tonnage() {
        let row = row_with_limit(120.0, Some(100.0));
        assert!((row.overflow_t() - 20.0).abs() < 1e-9);
        assert_eq!(row_with_limit(80.0, Some(100.0)).overflow_t(), 0.0);
    }

    #[test]
    fn test_normalize_threshold() {
        assert_eq!(normalize_threshold(Some(0.0)), None);
        assert_eq!(normalize_threshold(Some(f64::NAN)), None);
        assert_eq!(normalize_threshold(Some(f64::INFINITY)), None);
        assert_eq!(normalize_threshold(None), None);
        assert_eq!(normalize_threshold(Some(1200.0)), Some(1200.0));
    }

    #[test]
    fn test_key_orders_by_date_then_machine() {
        let mut keys = vec![
            MachineDayKey::new("H2", "2024-01-01"),
            MachineDayKey::new("H1", "2024-01-02"),
            MachineDayKey::new("H1", "2024-01-01"),
        ];
        keys.sort();
        assert_eq!(keys[0], MachineDayKey::new("H1", "2024-01-01"));
        assert_eq!(keys[1], MachineDayKey::new("H2", "2024-01-01"));
        assert_eq!(keys[2], MachineDayKey::new("H1", "2024-01-02"));
    }
}
