// ==========================================
// 热轧精整排产系统 - 版本对比 API
// ==========================================
// 流程:
// 1. 并发加载 版本A/B 明细 与 版本信息
// 2. 规范化 → 差异对账 / 产能聚合 / 日吨位趋势
// 3. 并发加载 版本A/B 产能池阈值并合并, 标记超限
// 4. 附加版本展示名称与复盘备注
// 说明: 产能池与复盘备注加载失败只告警, 不阻断对比 (阈值/备注为空)
// ==========================================

use crate::api::data_source::{ComparisonDataSource, DateRange};
use crate::api::error::{ApiError, ApiResult};
use crate::config::CompareConfig;
use crate::domain::capacity::CapacityDeltaRow;
use crate::domain::diff::DiffResult;
use crate::engine::capacity::{
    aggregate_capacity, flag_overflow, merge_thresholds, CapacityComparison,
};
use crate::engine::daily_totals::{compare_daily_totals, DailyTrendPoint};
use crate::engine::diff::compute_diff;
use crate::engine::labels::{format_version_label, machine_day_key};
use crate::engine::normalizer::{normalize_items, normalize_pools};
use crate::perf::PerfGuard;
use crate::report::{
    build_html_report, build_markdown_report, capacity_export_rows, diff_export_rows, render_json,
    write_csv_file, write_text_file, ReportContext, CAPACITY_EXPORT_HEADERS, DIFF_EXPORT_HEADERS,
};
use crate::repository::{load_note, save_note, RetrospectiveNoteStore};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ==========================================
// 请求 / 结果
// ==========================================

/// 版本对比请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub version_id_a: String,
    pub version_id_b: String,
    #[serde(default)]
    pub date_range: DateRange,
    /// 是否保留无变化的产能行; None 时按配置 (compare_show_changes_only)
    #[serde(default)]
    pub include_unchanged: Option<bool>,
}

impl CompareRequest {
    pub fn new(version_id_a: &str, version_id_b: &str) -> Self {
        Self {
            version_id_a: version_id_a.to_string(),
            version_id_b: version_id_b.to_string(),
            ..Default::default()
        }
    }
}

/// 版本对比结果 (供展示层与导出使用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionComparisonView {
    pub version_id_a: String,
    pub version_id_b: String,
    pub version_label_a: String,
    pub version_label_b: String,
    pub diff: DiffResult,
    pub capacity: CapacityComparison,
    pub overflow_rows: Vec<CapacityDeltaRow>,
    pub daily_trend: Vec<DailyTrendPoint>,
    pub retrospective_note: Option<String>,
    pub message: String,
}

impl VersionComparisonView {
    pub fn report_context<'a>(
        &'a self,
        operator: Option<&'a str>,
        diff_limit: usize,
        generated_at: NaiveDateTime,
    ) -> ReportContext<'a> {
        ReportContext {
            version_label_a: &self.version_label_a,
            version_label_b: &self.version_label_b,
            generated_at,
            operator,
            diff: &self.diff,
            capacity: &self.capacity,
            retrospective_note: self.retrospective_note.as_deref(),
            diff_limit,
        }
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    DiffCsv,
    CapacityCsv,
    Json,
    Markdown,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::DiffCsv,
        ExportFormat::CapacityCsv,
        ExportFormat::Json,
        ExportFormat::Markdown,
        ExportFormat::Html,
    ];

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::DiffCsv => "diff.csv",
            ExportFormat::CapacityCsv => "capacity.csv",
            ExportFormat::Json => "comparison.json",
            ExportFormat::Markdown => "report.md",
            ExportFormat::Html => "report.html",
        }
    }
}

// ==========================================
// VersionComparisonApi
// ==========================================
pub struct VersionComparisonApi<S: ComparisonDataSource> {
    source: Arc<S>,
    notes: Arc<dyn RetrospectiveNoteStore>,
    config: CompareConfig,
}

impl<S: ComparisonDataSource> VersionComparisonApi<S> {
    pub fn new(
        source: Arc<S>,
        notes: Arc<dyn RetrospectiveNoteStore>,
        config: CompareConfig,
    ) -> Self {
        Self {
            source,
            notes,
            config,
        }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// 版本对比
    ///
    /// # 返回
    /// - Ok(VersionComparisonView): 对比结果
    /// - Err(ApiError): 参数非法 / 版本不存在 / 明细加载失败
    pub async fn compare_versions(
        &self,
        request: &CompareRequest,
    ) -> ApiResult<VersionComparisonView> {
        let _perf = PerfGuard::new("compare_versions");
        let (version_id_a, version_id_b) =
            validate_version_pair(&request.version_id_a, &request.version_id_b)?;
        let source = self.source.as_ref();

        // 1. 并发加载明细与版本信息
        let (raw_a, raw_b, version_a, version_b) = futures::try_join!(
            source.fetch_plan_items(version_id_a, &request.date_range),
            source.fetch_plan_items(version_id_b, &request.date_range),
            source.fetch_version(version_id_a),
            source.fetch_version(version_id_b),
        )
        .map_err(|e| ApiError::DataSourceError(format!("{:#}", e)))?;

        let version_a = version_a
            .ok_or_else(|| ApiError::NotFound(format!("版本{}不存在", version_id_a)))?;
        let version_b = version_b
            .ok_or_else(|| ApiError::NotFound(format!("版本{}不存在", version_id_b)))?;

        // 2. 规范化 + 纯计算
        let items_a = normalize_items(&raw_a);
        let items_b = normalize_items(&raw_b);

        let diff = compute_diff(&items_a, &items_b);
        let include_unchanged = request
            .include_unchanged
            .unwrap_or(!self.config.show_changes_only);
        let mut capacity = aggregate_capacity(&items_a, &items_b, include_unchanged);
        let daily_trend = compare_daily_totals(&items_a, &items_b);

        // 3. 产能池阈值
        if capacity.date_from.is_some() {
            let pool_range = DateRange {
                from: capacity.date_from.clone(),
                to: capacity.date_to.clone(),
            };
            let pools = futures::try_join!(
                source.fetch_capacity_pools(version_id_a, &pool_range, &capacity.machines),
                source.fetch_capacity_pools(version_id_b, &pool_range, &capacity.machines),
            );
            match pools {
                Ok((raw_pools_a, raw_pools_b)) => {
                    let rows = std::mem::take(&mut capacity.rows);
                    capacity.rows = merge_thresholds(
                        rows,
                        &normalize_pools(&raw_pools_a),
                        &normalize_pools(&raw_pools_b),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        version_id_a,
                        version_id_b,
                        error = %e,
                        "产能池加载失败, 阈值留空"
                    );
                }
            }
        }
        let overflow_rows: Vec<CapacityDeltaRow> =
            flag_overflow(&capacity.rows).into_iter().cloned().collect();
        for row in &overflow_rows {
            tracing::warn!(
                version_id_b,
                machine_day = %machine_day_key(&row.machine_code, &row.date),
                used_t = row.used_b(),
                overflow_t = row.overflow_t(),
                "版本B产能超限"
            );
        }

        // 4. 展示名称 / 复盘备注
        let retrospective_note = match load_note(self.notes.as_ref(), version_id_a, version_id_b) {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!(
                    version_id_a,
                    version_id_b,
                    error = %e,
                    "复盘备注读取失败"
                );
                None
            }
        };

        let summary = diff.summary;
        let changed_rows = capacity.rows.iter().filter(|row| row.has_change()).count();
        let message = format!(
            "版本对比完成: 移动{}个, 新增{}个, 移除{}个, 修改{}个; 产能变化{}行, 超限{}行",
            summary.moved_count,
            summary.added_count,
            summary.removed_count,
            summary.modified_count,
            changed_rows,
            overflow_rows.len()
        );
        tracing::info!(
            version_id_a,
            version_id_b,
            total_changes = summary.total_changes,
            capacity_rows = capacity.rows.len(),
            overflow_rows = overflow_rows.len(),
            "{}",
            message
        );

        Ok(VersionComparisonView {
            version_id_a: version_id_a.to_string(),
            version_id_b: version_id_b.to_string(),
            version_label_a: format_version_label(&version_a),
            version_label_b: format_version_label(&version_b),
            diff,
            capacity,
            overflow_rows,
            daily_trend,
            retrospective_note,
            message,
        })
    }

    /// 读取复盘备注
    pub fn load_retrospective_note(
        &self,
        version_id_a: &str,
        version_id_b: &str,
    ) -> ApiResult<Option<String>> {
        let (a, b) = validate_version_pair(version_id_a, version_id_b)?;
        Ok(load_note(self.notes.as_ref(), a, b)?)
    }

    /// 保存复盘备注
    pub fn save_retrospective_note(
        &self,
        version_id_a: &str,
        version_id_b: &str,
        note: &str,
    ) -> ApiResult<()> {
        let (a, b) = validate_version_pair(version_id_a, version_id_b)?;
        save_note(self.notes.as_ref(), a, b, note)?;
        tracing::info!(version_id_a = a, version_id_b = b, "复盘备注已保存");
        Ok(())
    }

    /// 导出对比结果 (整文件写入)
    pub fn export_view(
        &self,
        view: &VersionComparisonView,
        format: ExportFormat,
        path: &Path,
        operator: Option<&str>,
    ) -> ApiResult<()> {
        let _perf = PerfGuard::new("export_view");
        let generated_at = chrono::Local::now().naive_local();
        let ctx = view.report_context(operator, self.config.report_diff_limit, generated_at);

        let result = match format {
            ExportFormat::DiffCsv => {
                write_csv_file(path, &DIFF_EXPORT_HEADERS, &diff_export_rows(&view.diff.diffs))
            }
            ExportFormat::CapacityCsv => write_csv_file(
                path,
                &CAPACITY_EXPORT_HEADERS,
                &capacity_export_rows(&view.capacity.rows),
            ),
            ExportFormat::Json => render_json(view).and_then(|body| write_text_file(path, &body)),
            ExportFormat::Markdown => write_text_file(path, &build_markdown_report(&ctx)),
            ExportFormat::Html => write_text_file(path, &build_html_report(&ctx)),
        };

        result.map_err(|e| {
            tracing::error!(path = %path.display(), ?format, error = %e, "导出失败");
            ApiError::from(e)
        })
    }

    /// 按全部格式导出到目录
    ///
    /// dir 为 None 时使用配置 compare_export_dir
    pub fn export_all(
        &self,
        view: &VersionComparisonView,
        dir: Option<&Path>,
        operator: Option<&str>,
    ) -> ApiResult<Vec<PathBuf>> {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => self
                .config
                .export_dir
                .as_deref()
                .map(PathBuf::from)
                .ok_or_else(|| ApiError::InvalidInput("未指定导出目录".to_string()))?,
        };

        let mut written = Vec::with_capacity(ExportFormat::ALL.len());
        for format in ExportFormat::ALL {
            let path = dir.join(format.default_file_name());
            self.export_view(view, format, &path, operator)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// 校验版本ID: 非空, 且两者不同
fn validate_version_pair<'a>(
    version_id_a: &'a str,
    version_id_b: &'a str,
) -> ApiResult<(&'a str, &'a str)> {
    let a = version_id_a.trim();
    let b = version_id_b.trim();
    if a.is_empty() || b.is_empty() {
        return Err(ApiError::InvalidInput("版本ID不能为空".to_string()));
    }
    if a == b {
        return Err(ApiError::InvalidInput(format!("对比版本不能相同: {}", a)));
    }
    Ok((a, b))
}
