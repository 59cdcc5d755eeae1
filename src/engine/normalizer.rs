// ==========================================
// 热轧精整排产系统 - 快照规范化
// ==========================================
// 输入: 后端返回的松散 JSON 记录 (字段可能缺失/类型错误/为 null)
// 输出: 强类型 ScheduledItemSnapshot / CapacityPoolRecord
// 红线: 不报错, 最坏情况为降级记录或丢弃 (material_id 为空)
// ==========================================

use crate::domain::capacity::CapacityPoolRecord;
use crate::domain::snapshot::ScheduledItemSnapshot;
use serde_json::Value;
use std::collections::HashMap;

/// 规范化单条排产明细
///
/// # 返回
/// - Some: 规范化后的快照
/// - None: material_id 缺失或 trim 后为空 (无法对账, 直接丢弃)
pub fn normalize_item(raw: &Value) -> Option<ScheduledItemSnapshot> {
    let material_id = text_field(raw, "material_id")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if material_id.is_empty() {
        return None;
    }

    let seq_no = field(raw, "seq_no").map(coerce_number).unwrap_or(0.0);

    Some(ScheduledItemSnapshot {
        material_id,
        machine_code: text_field(raw, "machine_code")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        plan_date: text_field(raw, "plan_date")
            .map(|s| normalize_date_key(&s))
            .unwrap_or_default(),
        seq_no: if seq_no.is_finite() { seq_no.trunc() as i64 } else { 0 },
        weight_t: field(raw, "weight_t").map(coerce_number),
        urgent_level: text_field(raw, "urgent_level"),
        locked_in_plan: field(raw, "locked_in_plan").map(coerce_truthy),
        force_release_in_plan: field(raw, "force_release_in_plan").map(coerce_truthy),
        sched_state: text_field(raw, "sched_state"),
        assign_reason: text_field(raw, "assign_reason"),
    })
}

/// 规范化一个快照集合
///
/// 说明:
/// - 无法识别的记录被丢弃
/// - material_id 重复时后写覆盖先写, 保留首次出现的位置
pub fn normalize_items(raw_items: &[Value]) -> Vec<ScheduledItemSnapshot> {
    let mut items: Vec<ScheduledItemSnapshot> = Vec::with_capacity(raw_items.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(raw_items.len());
    let mut dropped = 0usize;

    for raw in raw_items {
        let Some(item) = normalize_item(raw) else {
            dropped += 1;
            continue;
        };
        match index.get(&item.material_id) {
            Some(&pos) => items[pos] = item,
            None => {
                index.insert(item.material_id.clone(), items.len());
                items.push(item);
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = items.len(), "丢弃无 material_id 的明细记录");
    }
    items
}

/// 规范化单条产能池记录 (机组或日期缺失时丢弃)
pub fn normalize_pool(raw: &Value) -> Option<CapacityPoolRecord> {
    let machine_code = text_field(raw, "machine_code")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let plan_date = text_field(raw, "plan_date")
        .map(|s| normalize_date_key(&s))
        .unwrap_or_default();
    if machine_code.is_empty() || plan_date.is_empty() {
        return None;
    }

    Some(CapacityPoolRecord {
        machine_code,
        plan_date,
        target_capacity_t: field(raw, "target_capacity_t").map(coerce_number),
        limit_capacity_t: field(raw, "limit_capacity_t").map(coerce_number),
    })
}

pub fn normalize_pools(raw_pools: &[Value]) -> Vec<CapacityPoolRecord> {
    raw_pools.iter().filter_map(normalize_pool).collect()
}

/// 日期键规范化
///
/// - 以 `YYYY-MM-DD` 开头: 截取前 10 个字符
/// - 其他: 原样返回 trim 后的字符串
pub fn normalize_date_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_iso_date_prefix(trimmed) {
        trimmed[..10].to_string()
    } else {
        trimmed.to_string()
    }
}

fn has_iso_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

// ==========================================
// 字段读取与类型宽容转换
// ==========================================

/// 读取字段; 缺失或 null 均视为 None
fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

fn text_field(raw: &Value, key: &str) -> Option<String> {
    field(raw, key).map(coerce_text)
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 数值转换: 空串为 0, 无法解析为 NaN
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

fn coerce_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|x| x != 0.0 && !x.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
