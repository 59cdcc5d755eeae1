// ==========================================
// 热轧精整排产系统 - 排产明细快照
// ==========================================
// 用途: 版本对比的规范化输入 (由 Normalizer 生成)
// 红线: material_id 在同一快照集合内唯一
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ScheduledItemSnapshot - 排产明细快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledItemSnapshot {
    // ===== 主键 =====
    pub material_id: String,          // 材料ID (非空, 已 trim)

    // ===== 落位信息 =====
    pub machine_code: String,         // 机组代码 (未落位时为空串)
    pub plan_date: String,            // 排产日期 (YYYY-MM-DD, 缺失为空串)
    pub seq_no: i64,                  // 机组日内序号 (缺失/非数值为 0)

    // ===== 属性 =====
    pub weight_t: Option<f64>,        // 吨位 (None 表示缺失, 不等同于 0; 可能为 NaN)
    pub urgent_level: Option<String>, // 紧急等级
    pub locked_in_plan: Option<bool>, // 计划中锁定
    pub force_release_in_plan: Option<bool>, // 计划中强制放行
    pub sched_state: Option<String>,  // 排产状态
    pub assign_reason: Option<String>, // 落位原因
}

impl ScheduledItemSnapshot {
    /// 只含主键与落位信息的快照 (其余字段缺失)
    pub fn placed(material_id: &str, machine_code: &str, plan_date: &str, seq_no: i64) -> Self {
        Self {
            material_id: material_id.to_string(),
            machine_code: machine_code.to_string(),
            plan_date: plan_date.to_string(),
            seq_no,
            weight_t: None,
            urgent_level: None,
            locked_in_plan: None,
            force_release_in_plan: None,
            sched_state: None,
            assign_reason: None,
        }
    }

    /// 设置吨位（构造辅助）
    pub fn with_weight(mut self, weight_t: f64) -> Self {
        self.weight_t = Some(weight_t);
        self
    }

    /// 有效吨位: 仅在有限且为正时返回
    ///
    /// 说明: 零/负/非有限吨位不占用产能，聚合时直接跳过。
    pub fn effective_weight_t(&self) -> Option<f64> {
        self.weight_t.filter(|w| w.is_finite() && *w > 0.0)
    }
}
