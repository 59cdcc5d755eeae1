// ==========================================
// 热轧精整排产系统 - 标签与键工具
// ==========================================
// - 机组×日期 展示键 (machine__date)
// - 复盘备注存储键 (与对比方向无关)
// - 版本展示名称 (中文命名 → V+版本号 → 版本ID前8位)
// ==========================================

use crate::domain::version::VersionLabelSource;
use serde_json::Value;

/// 机组×日期 展示键分隔符 (保留字符, 机组代码/日期中不应出现)
pub const MACHINE_DAY_KEY_SEPARATOR: &str = "__";

/// 配置快照中的版本中文命名元信息键
pub const VERSION_NAME_META_KEY: &str = "__meta_version_name_cn";

/// 复盘备注存储键前缀
pub const RETROSPECTIVE_KEY_PREFIX: &str = "compare_retrospective";

/// 版本ID回退展示长度
const VERSION_ID_FALLBACK_LEN: usize = 8;

/// 机组×日期 展示键
///
/// 仅用于导出/展示; 内部聚合使用结构化的 `MachineDayKey`。
pub fn machine_day_key(machine_code: &str, date: &str) -> String {
    format!("{}{}{}", machine_code, MACHINE_DAY_KEY_SEPARATOR, date)
}

/// 复盘备注存储键
///
/// 两个版本ID先按字典序排序再拼接, A对B 与 B对A 得到同一个键。
pub fn retrospective_note_key(version_id_a: &str, version_id_b: &str) -> String {
    let (lo, hi) = if version_id_a <= version_id_b {
        (version_id_a, version_id_b)
    } else {
        (version_id_b, version_id_a)
    };
    format!("{}/{}__{}", RETROSPECTIVE_KEY_PREFIX, lo, hi)
}

/// 从配置快照 JSON 中读取版本中文命名
///
/// # 返回
/// - Ok(Some): 存在非空命名
/// - Ok(None): 快照中没有该字段 / 字段为空 / 非字符串
/// - Err: JSON 解析失败
pub fn parse_version_meta_name(snapshot_json: &str) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(snapshot_json)?;
    Ok(value
        .get(VERSION_NAME_META_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}

/// 读取版本中文命名, 解析失败静默回退为 None
pub fn extract_version_name(snapshot_json: Option<&str>) -> Option<String> {
    let raw = snapshot_json?.trim();
    if raw.is_empty() {
        return None;
    }
    parse_version_meta_name(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "配置快照解析失败, 忽略版本中文命名");
        None
    })
}

/// 版本展示名称
///
/// 优先级:
/// 1. 配置快照中的 `__meta_version_name_cn`
/// 2. `V{version_no}` (版本号为有限正数)
/// 3. 版本ID前 8 个字符
pub fn format_version_label(source: &VersionLabelSource) -> String {
    if let Some(name) = extract_version_name(source.config_snapshot_json.as_deref()) {
        return name;
    }
    if let Some(version_no) = source.version_no.filter(|n| n.is_finite() && *n > 0.0) {
        return format!("V{}", version_no);
    }
    source.version_id.chars().take(VERSION_ID_FALLBACK_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, no: Option<f64>, json: Option<&str>) -> VersionLabelSource {
        VersionLabelSource {
            version_id: id.to_string(),
            version_no: no,
            config_snapshot_json: json.map(str::to_string),
        }
    }

    #[test]
    fn test_machine_day_key() {
        assert_eq!(machine_day_key("H032", "2024-01-01"), "H032__2024-01-01");
    }

    #[test]
    fn test_retrospective_key_symmetry() {
        let pairs = [("v-a", "v-b"), ("2", "10"), ("same", "same"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(retrospective_note_key(a, b), retrospective_note_key(b, a));
        }
        assert_eq!(retrospective_note_key("vb", "va"), "compare_retrospective/va__vb");
    }

    #[test]
    fn test_label_prefers_meta_name() {
        let json = r#"{"__meta_version_name_cn":"均衡策略-0105-003","season_mode":"AUTO"}"#;
        let label = format_version_label(&source("0f1e2d3c-aaaa", Some(3.0), Some(json)));
        assert_eq!(label, "均衡策略-0105-003");
    }

    #[test]
    fn test_label_falls_back_to_version_no() {
        let label = format_version_label(&source("0f1e2d3c-aaaa", Some(3.0), Some("{not json")));
        assert_eq!(label, "V3");

        let blank_name = r#"{"__meta_version_name_cn":"  "}"#;
        let label = format_version_label(&source("0f1e2d3c-aaaa", Some(7.0), Some(blank_name)));
        assert_eq!(label, "V7");

        let label = format_version_label(&source("0f1e2d3c-aaaa", Some(4.0), Some("[1,2]")));
        assert_eq!(label, "V4");
    }

    #[test]
    fn test_label_falls_back_to_truncated_id() {
        assert_eq!(format_version_label(&source("0f1e2d3c-aaaa", None, None)), "0f1e2d3c");
        assert_eq!(format_version_label(&source("0f1e2d3c-aaaa", Some(0.0), None)), "0f1e2d3c");
        assert_eq!(
            format_version_label(&source("0f1e2d3c-aaaa", Some(f64::NAN), None)),
            "0f1e2d3c"
        );
        assert_eq!(format_version_label(&source("short", Some(-1.0), None)), "short");
    }

    #[test]
    fn test_meta_parse_error_is_reported_by_helper() {
        assert!(parse_version_meta_name("{oops").is_err());
        assert_eq!(extract_version_name(Some("{oops")), None);
        assert_eq!(extract_version_name(None), None);
    }
}
