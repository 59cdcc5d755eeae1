// ==========================================
// 热轧精整排产系统 - HTML 对比报告
// ==========================================
// 红线: 每个插值都经过 escape_html (& < > ")
// ==========================================

use super::{fmt_opt_t, fmt_t, ReportContext};
use crate::engine::capacity::flag_overflow;
use std::fmt::Write;

/// HTML 转义
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 生成 HTML 报告正文 (自包含页面)
pub fn build_html_report(ctx: &ReportContext<'_>) -> String {
    let e = escape_html;
    let summary = &ctx.diff.summary;
    let capacity = ctx.capacity;
    let overflow = flag_overflow(&capacity.rows);
    let title = format!("版本对比报告: {} → {}", ctx.version_label_a, ctx.version_label_b);

    let mut out = String::new();
    // String 的 fmt::Write 不会失败
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\" />\n<title>{}</title>\n",
        e(&title)
    );
    out.push_str(
        "<style>body{font-family:sans-serif;margin:24px;}table{border-collapse:collapse;margin:8px 0 16px;}\
         th,td{border:1px solid #ccc;padding:4px 8px;}th{background:#f5f5f5;}\
         .overflow{color:#c0392b;}.note{white-space:pre-wrap;border-left:3px solid #999;padding-left:8px;}</style>\n",
    );
    out.push_str("</head>\n<body>\n");

    let _ = writeln!(out, "<h1>{}</h1>", e(&title));
    let _ = writeln!(
        out,
        "<p>生成时间: {}<br />操作人: {}</p>",
        e(&ctx.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        e(ctx.operator.unwrap_or("-"))
    );

    out.push_str("<h2>差异汇总</h2>\n<table>\n<tr><th>变更类型</th><th>数量</th></tr>\n");
    for (label, count) in [
        ("合计", summary.total_changes),
        ("新增 (ADDED)", summary.added_count),
        ("移除 (REMOVED)", summary.removed_count),
        ("移动 (MOVED)", summary.moved_count),
        ("修改 (MODIFIED)", summary.modified_count),
    ] {
        let _ = writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", e(label), count);
    }
    out.push_str("</table>\n");

    out.push_str("<h2>产能汇总</h2>\n<ul>\n");
    let _ = writeln!(out, "<li>版本A 总吨位: {} t</li>", e(&fmt_t(capacity.total_a)));
    let _ = writeln!(out, "<li>版本B 总吨位: {} t</li>", e(&fmt_t(capacity.total_b)));
    let _ = writeln!(
        out,
        "<li>变化: {} t</li>",
        e(&format!("{:+.3}", capacity.total_b - capacity.total_a))
    );
    let _ = writeln!(
        out,
        "<li>日期范围: {} ~ {}</li>",
        e(capacity.date_from.as_deref().unwrap_or("-")),
        e(capacity.date_to.as_deref().unwrap_or("-"))
    );
    let _ = writeln!(out, "<li>变化机组日: {}</li>", ctx.changed_machine_days());
    let _ = writeln!(out, "<li>超限机组日: {}</li>\n</ul>", overflow.len());

    if !overflow.is_empty() {
        out.push_str("<h3>超限明细</h3>\n<table>\n");
        out.push_str("<tr><th>日期</th><th>机组</th><th>已用(B)</th><th>上限(B)</th><th>超限</th></tr>\n");
        for row in &overflow {
            let _ = writeln!(
                out,
                "<tr class=\"overflow\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                e(&row.date),
                e(&row.machine_code),
                e(&fmt_t(row.used_b())),
                e(&fmt_opt_t(row.limit_b)),
                e(&fmt_t(row.overflow_t()))
            );
        }
        out.push_str("</table>\n");
    }

    let listed = ctx.listed_diffs();
    let heading = if ctx.is_truncated() {
        format!("差异明细 (前 {} 条 / 共 {} 条)", listed.len(), ctx.diff.diffs.len())
    } else {
        format!("差异明细 (共 {} 条)", listed.len())
    };
    let _ = writeln!(out, "<h2>{}</h2>", e(&heading));

    if listed.is_empty() {
        out.push_str("<p>无差异</p>\n");
    } else {
        out.push_str("<table>\n<tr><th>类型</th><th>材料</th><th>原机组</th><th>原日期</th><th>原序号</th>");
        out.push_str("<th>新机组</th><th>新日期</th><th>新序号</th></tr>\n");
        for entry in listed {
            let from = entry.previous_state.as_ref();
            let to = entry.current_state.as_ref();
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                e(entry.change_type.as_str()),
                e(&entry.material_id),
                e(from.map(|s| s.machine_code.as_str()).unwrap_or("-")),
                e(from.map(|s| s.plan_date.as_str()).unwrap_or("-")),
                e(&from.map(|s| s.seq_no.to_string()).unwrap_or_else(|| "-".to_string())),
                e(to.map(|s| s.machine_code.as_str()).unwrap_or("-")),
                e(to.map(|s| s.plan_date.as_str()).unwrap_or("-")),
                e(&to.map(|s| s.seq_no.to_string()).unwrap_or_else(|| "-".to_string())),
            );
        }
        out.push_str("</table>\n");
    }

    out.push_str("<h2>复盘备注</h2>\n");
    match ctx.retrospective_note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => {
            let _ = writeln!(out, "<div class=\"note\">{}</div>", e(note));
        }
        None => out.push_str("<p>(无)</p>\n"),
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capacity::CapacityDeltaRow;
    use crate::domain::diff::{DiffEntry, DiffResult};
    use crate::domain::snapshot::ScheduledItemSnapshot;
    use crate::engine::capacity::CapacityComparison;
    use chrono::NaiveDate;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; 'y'&lt;/script&gt;"
        );
        assert_eq!(escape_html("普通文本"), "普通文本");
    }

    #[test]
    fn test_user_text_cannot_inject_markup() {
        let item = ScheduledItemSnapshot::placed("<b>M1</b>", "H\"1", "2024-01-01", 1);
        let diff = DiffResult::from_entries(vec![DiffEntry::added(&item)]);
        let capacity = CapacityComparison::default();
        let ctx = ReportContext {
            version_label_a: "<i>A</i>",
            version_label_b: "B",
            generated_at: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            operator: Some("<img src=x onerror=alert(1)>"),
            diff: &diff,
            capacity: &capacity,
            retrospective_note: Some("</div><script>steal()</script>"),
            diff_limit: 100,
        };

        let html = build_html_report(&ctx);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<i>A</i>"));
        assert!(!html.contains("<b>M1</b>"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("&lt;/div&gt;&lt;script&gt;steal()&lt;/script&gt;"));
        assert!(html.contains("H&quot;1"));
    }

    #[test]
    fn test_changed_machine_days_in_summary() {
        let diff = DiffResult::default();
        let capacity = CapacityComparison {
            rows: vec![
                CapacityDeltaRow::new("H1", "2024-01-01", 10.0, 10.0),
                CapacityDeltaRow::new("H1", "2024-01-02", 0.0, 10.0),
            ],
            ..Default::default()
        };
        let ctx = ReportContext {
            version_label_a: "A",
            version_label_b: "B",
            generated_at: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            operator: None,
            diff: &diff,
            capacity: &capacity,
            retrospective_note: None,
            diff_limit: 100,
        };

        assert!(build_html_report(&ctx).contains("<li>变化机组日: 1</li>"));
    }
}
