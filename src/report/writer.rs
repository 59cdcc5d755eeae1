// ==========================================
// 热轧精整排产系统 - 导出文件写入
// ==========================================
// 说明:
// - 先在内存中生成完整内容, 再整文件写入 (不会产生半截文件内容)
// - CSV 带 UTF-8 BOM, 便于 Excel 正确识别中文
// ==========================================

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

const UTF8_BOM: &str = "\u{feff}";

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 生成失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 生成失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("导出内容编码失败: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 生成 CSV 文本 (表头固定, 行为空时仍输出表头)
pub fn render_csv<T: Serialize>(headers: &[&str], rows: &[T]) -> ExportResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// 生成格式化 JSON 文本
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// 整文件写入文本 (自动创建父目录)
pub fn write_text_file(path: &Path, content: &str) -> ExportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "导出文件写入完成");
    Ok(())
}

/// 生成 CSV 并写入文件 (带 BOM)
pub fn write_csv_file<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> ExportResult<()> {
    let body = render_csv(headers, rows)?;
    write_text_file(path, &format!("{}{}", UTF8_BOM, body))
}
