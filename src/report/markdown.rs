// ==========================================
// 热轧精整排产系统 - Markdown 对比报告
// ==========================================

use super::{fmt_opt_t, fmt_t, ReportContext};
use crate::engine::capacity::flag_overflow;
use std::fmt::Write;

/// 生成 Markdown 报告正文
pub fn build_markdown_report(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();
    let summary = &ctx.diff.summary;
    let capacity = ctx.capacity;
    let overflow = flag_overflow(&capacity.rows);

    // String 的 fmt::Write 不会失败
    let _ = writeln!(
        out,
        "# 版本对比报告: {} → {}\n",
        md_text(ctx.version_label_a),
        md_text(ctx.version_label_b)
    );
    let _ = writeln!(out, "- 生成时间: {}", ctx.generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "- 操作人: {}\n", md_text(ctx.operator.unwrap_or("-")));

    out.push_str("## 差异汇总\n\n");
    out.push_str("| 变更类型 | 数量 |\n|---|---:|\n");
    let _ = writeln!(out, "| 合计 | {} |", summary.total_changes);
    let _ = writeln!(out, "| 新增 (ADDED) | {} |", summary.added_count);
    let _ = writeln!(out, "| 移除 (REMOVED) | {} |", summary.removed_count);
    let _ = writeln!(out, "| 移动 (MOVED) | {} |", summary.moved_count);
    let _ = writeln!(out, "| 修改 (MODIFIED) | {} |\n", summary.modified_count);

    out.push_str("## 产能汇总\n\n");
    let _ = writeln!(out, "- 版本A 总吨位: {} t", fmt_t(capacity.total_a));
    let _ = writeln!(out, "- 版本B 总吨位: {} t", fmt_t(capacity.total_b));
    let _ = writeln!(out, "- 变化: {:+.3} t", capacity.total_b - capacity.total_a);
    let _ = writeln!(
        out,
        "- 日期范围: {} ~ {}",
        md_text(capacity.date_from.as_deref().unwrap_or("-")),
        md_text(capacity.date_to.as_deref().unwrap_or("-"))
    );
    let _ = writeln!(out, "- 变化机组日: {}", ctx.changed_machine_days());
    let _ = writeln!(out, "- 超限机组日: {}\n", overflow.len());

    if !overflow.is_empty() {
        out.push_str("### 超限明细\n\n");
        out.push_str("| 日期 | 机组 | 已用(B) | 上限(B) | 超限 |\n|---|---|---:|---:|---:|\n");
        for row in &overflow {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                md_text(&row.date),
                md_text(&row.machine_code),
                fmt_t(row.used_b()),
                fmt_opt_t(row.limit_b),
                fmt_t(row.overflow_t())
            );
        }
        out.push('\n');
    }

    let listed = ctx.listed_diffs();
    if ctx.is_truncated() {
        let _ = writeln!(
            out,
            "## 差异明细 (前 {} 条 / 共 {} 条)\n",
            listed.len(),
            ctx.diff.diffs.len()
        );
    } else {
        let _ = writeln!(out, "## 差异明细 (共 {} 条)\n", listed.len());
    }

    if listed.is_empty() {
        out.push_str("无差异\n\n");
    } else {
        out.push_str("| 类型 | 材料 | 原机组 | 原日期 | 原序号 | 新机组 | 新日期 | 新序号 |\n");
        out.push_str("|---|---|---|---|---:|---|---|---:|\n");
        for entry in listed {
            let from = entry.previous_state.as_ref();
            let to = entry.current_state.as_ref();
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                entry.change_type,
                md_text(&entry.material_id),
                md_text(from.map(|s| s.machine_code.as_str()).unwrap_or("-")),
                md_text(from.map(|s| s.plan_date.as_str()).unwrap_or("-")),
                from.map(|s| s.seq_no.to_string()).unwrap_or_else(|| "-".to_string()),
                md_text(to.map(|s| s.machine_code.as_str()).unwrap_or("-")),
                md_text(to.map(|s| s.plan_date.as_str()).unwrap_or("-")),
                to.map(|s| s.seq_no.to_string()).unwrap_or_else(|| "-".to_string()),
            );
        }
        out.push('\n');
    }

    out.push_str("## 复盘备注\n\n");
    match ctx.retrospective_note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => {
            for line in note.lines() {
                let _ = writeln!(out, "> {}", line);
            }
        }
        None => out.push_str("(无)\n"),
    }

    out
}

/// 表格单元格文本: 竖线转义, 换行折叠为空格
fn md_text(value: &str) -> String {
    value.replace('|', "\\|").replace(&['\r', '\n'][..], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capacity::CapacityDeltaRow;
    use crate::domain::diff::{DiffEntry, DiffResult};
    use crate::domain::snapshot::ScheduledItemSnapshot;
    use crate::engine::capacity::CapacityComparison;
    use chrono::NaiveDate;

    fn generated_at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_markdown_sections() {
        let item = ScheduledItemSnapshot::placed("M|1", "H1", "2024-01-01", 1);
        let diff = DiffResult::from_entries(vec![DiffEntry::added(&item)]);
        let mut row = CapacityDeltaRow::new("H1", "2024-01-01", 0.0, 120.0);
        row.limit_b = Some(100.0);
        let capacity = CapacityComparison {
            total_b: 120.0,
            rows: vec![row],
            date_from: Some("2024-01-01".to_string()),
            date_to: Some("2024-01-01".to_string()),
            machines: vec!["H1".to_string()],
            ..Default::default()
        };
        let ctx = ReportContext {
            version_label_a: "V1",
            version_label_b: "V2",
            generated_at: generated_at(),
            operator: Some("张三"),
            diff: &diff,
            capacity: &capacity,
            retrospective_note: Some("第一行\n第二行"),
            diff_limit: 10,
        };

        let md = build_markdown_report(&ctx);
        assert!(md.starts_with("# 版本对比报告: V1 → V2"));
        assert!(md.contains("- 操作人: 张三"));
        assert!(md.contains("| 新增 (ADDED) | 1 |"));
        assert!(md.contains("### 超限明细"));
        assert!(md.contains("| 2024-01-01 | H1 | 120.000 | 100.000 | 20.000 |"));
        assert!(md.contains("M\\|1"));
        assert!(md.contains("> 第一行\n> 第二行"));
    }

    #[test]
    fn test_markdown_truncation_notice() {
        let items: Vec<ScheduledItemSnapshot> = (0..5)
            .map(|i| ScheduledItemSnapshot::placed(&format!("M{}", i), "H1", "2024-01-01", i))
            .collect();
        let diff = DiffResult::from_entries(items.iter().map(DiffEntry::added).collect());
        let capacity = CapacityComparison::default();
        let ctx = ReportContext {
            version_label_a: "A",
            version_label_b: "B",
            generated_at: generated_at(),
            operator: None,
            diff: &diff,
            capacity: &capacity,
            retrospective_note: None,
            diff_limit: 2,
        };

        let md = build_markdown_report(&ctx);
        assert!(md.contains("## 差异明细 (前 2 条 / 共 5 条)"));
        assert!(!md.contains("| ADDED | M2 |"));
        assert!(md.contains("(无)"));
    }

    #[test]
    fn test_changed_machine_days_skips_unchanged_rows() {
        let diff = DiffResult::default();
        let capacity = CapacityComparison {
            rows: vec![
                CapacityDeltaRow::new("H1", "2024-01-01", 50.0, 50.0),
                CapacityDeltaRow::new("H2", "2024-01-01", 50.0, 30.0),
            ],
            ..Default::default()
        };
        let ctx = ReportContext {
            version_label_a: "A",
            version_label_b: "B",
            generated_at: generated_at(),
            operator: None,
            diff: &diff,
            capacity: &capacity,
            retrospective_note: None,
            diff_limit: 10,
        };

        assert_eq!(ctx.changed_machine_days(), 1);
        assert!(build_markdown_report(&ctx).contains("- 变化机组日: 1\n"));
    }
}
