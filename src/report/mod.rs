// ==========================================
// 热轧精整排产系统 - 对比报告层
// ==========================================
// 职责: 将差异/产能对比结果整形为导出行 (CSV/JSON) 与报告正文 (Markdown/HTML)
// 红线: HTML 中所有插值必须转义 (复盘备注/操作人等为用户自由文本)
// ==========================================

pub mod html;
pub mod markdown;
pub mod rows;
pub mod writer;

use crate::domain::diff::DiffResult;
use crate::engine::capacity::CapacityComparison;
use chrono::NaiveDateTime;

pub use html::{build_html_report, escape_html};
pub use markdown::build_markdown_report;
pub use rows::{
    capacity_export_rows, diff_export_rows, CapacityExportRow, DiffExportRow,
    CAPACITY_EXPORT_HEADERS, DIFF_EXPORT_HEADERS,
};
pub use writer::{
    render_csv, render_json, write_csv_file, write_text_file, ExportError, ExportResult,
};

/// 报告正文所需的上下文
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub version_label_a: &'a str,
    pub version_label_b: &'a str,
    pub generated_at: NaiveDateTime,
    pub operator: Option<&'a str>,
    pub diff: &'a DiffResult,
    pub capacity: &'a CapacityComparison,
    pub retrospective_note: Option<&'a str>,
    /// 报告中最多列出的差异明细条数
    pub diff_limit: usize,
}

impl<'a> ReportContext<'a> {
    /// 报告中实际列出的差异明细
    pub fn listed_diffs(&self) -> &'a [crate::domain::diff::DiffEntry] {
        let end = self.diff.diffs.len().min(self.diff_limit);
        &self.diff.diffs[..end]
    }

    pub fn is_truncated(&self) -> bool {
        self.diff.diffs.len() > self.diff_limit
    }

    /// 产能有变化的机组日数 (保留无变化行时也只计有变化的行)
    pub fn changed_machine_days(&self) -> usize {
        self.capacity.rows.iter().filter(|row| row.has_change()).count()
    }
}

/// 吨位展示: 保留 3 位小数
pub(crate) fn fmt_t(value: f64) -> String {
    format!("{:.3}", value)
}

/// 可选阈值展示: 缺失显示 "-"
pub(crate) fn fmt_opt_t(value: Option<f64>) -> String {
    value.map(fmt_t).unwrap_or_else(|| "-".to_string())
}
