// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构造后端风格的原始 JSON 明细 / 产能池记录, 创建临时数据库
// ==========================================
#![allow(dead_code)]

use rusqlite::Connection;
use serde_json::{json, Value};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 排产明细原始记录
pub fn raw_item(
    material_id: &str,
    machine_code: &str,
    plan_date: &str,
    seq_no: i64,
    weight_t: f64,
) -> Value {
    json!({
        "material_id": material_id,
        "machine_code": machine_code,
        "plan_date": plan_date,
        "seq_no": seq_no,
        "weight_t": weight_t,
        "urgent_level": "L1",
        "locked_in_plan": false,
        "force_release_in_plan": false,
        "sched_state": "SCHEDULED",
        "assign_reason": "CAPACITY_FILL",
    })
}

/// 覆盖原始记录中的某个字段
pub fn with_field(mut raw: Value, key: &str, value: Value) -> Value {
    if let Some(obj) = raw.as_object_mut() {
        obj.insert(key.to_string(), value);
    }
    raw
}

/// 产能池原始记录
pub fn raw_pool(machine_code: &str, plan_date: &str, target_t: f64, limit_t: f64) -> Value {
    json!({
        "machine_code": machine_code,
        "plan_date": plan_date,
        "target_capacity_t": target_t,
        "limit_capacity_t": limit_t,
    })
}

/// 批量生成明细: 机组轮转, 日期按 2024-01-01 起递增
pub fn generate_items(prefix: &str, count: usize, machines: &[&str], days: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let machine = machines[i % machines.len()];
            let date = format!("2024-01-{:02}", 1 + (i / machines.len()) % days);
            let weight_t = 10.0 + (i % 7) as f64;
            raw_item(&format!("{}{:04}", prefix, i), machine, &date, (i + 1) as i64, weight_t)
        })
        .collect()
}

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn open_shared_conn(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = hot_rolling_aps_compare::db::open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}
