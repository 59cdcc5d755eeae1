// ==========================================
// 热轧精整排产系统 - 版本对比命令行工具
// ==========================================
// 用法:
//   version-compare <items_a.json> <items_b.json>
//       [--pools-a f] [--pools-b f] [--from YYYY-MM-DD] [--to YYYY-MM-DD]
//       [--all] [--out dir] [--db path|default] [--operator name] [--note text]
//       [--log-json]
//
// 输入: 排产明细 JSON 数组 (版本ID取文件名)
// 输出: diff.csv / capacity.csv / comparison.json / report.md / report.html
// ==========================================

use anyhow::{bail, Context};
use hot_rolling_aps_compare::api::{
    CompareRequest, DateRange, StaticDataSource, VersionComparisonApi,
};
use hot_rolling_aps_compare::config::{CompareConfig, ConfigManager};
use hot_rolling_aps_compare::db::{get_default_db_path, open_sqlite_connection};
use hot_rolling_aps_compare::logging::{self, LogFormat};
use hot_rolling_aps_compare::repository::{
    InMemoryNoteStore, RetrospectiveNoteStore, SqliteNoteStore,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const DEFAULT_OUT_DIR: &str = "compare_out";

#[derive(Debug, Default)]
struct CliArgs {
    items_a: PathBuf,
    items_b: PathBuf,
    pools_a: Option<PathBuf>,
    pools_b: Option<PathBuf>,
    date_from: Option<String>,
    date_to: Option<String>,
    include_unchanged: bool,
    out_dir: Option<PathBuf>,
    db_path: Option<String>,
    operator: Option<String>,
    note: Option<String>,
    log_json: bool,
}

fn usage() -> &'static str {
    "usage: version-compare <items_a.json> <items_b.json> [--pools-a f] [--pools-b f] \
     [--from date] [--to date] [--all] [--out dir] [--db path|default] [--operator name] \
     [--note text] [--log-json]"
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut positional = Vec::new();
    let mut args = args;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| -> anyhow::Result<String> {
            args.next().with_context(|| format!("{} 缺少参数值", flag))
        };
        match arg.as_str() {
            "--pools-a" => cli.pools_a = Some(PathBuf::from(value("--pools-a")?)),
            "--pools-b" => cli.pools_b = Some(PathBuf::from(value("--pools-b")?)),
            "--from" => cli.date_from = Some(value("--from")?),
            "--to" => cli.date_to = Some(value("--to")?),
            "--all" => cli.include_unchanged = true,
            "--out" => cli.out_dir = Some(PathBuf::from(value("--out")?)),
            "--db" => cli.db_path = Some(value("--db")?),
            "--operator" => cli.operator = Some(value("--operator")?),
            "--note" => cli.note = Some(value("--note")?),
            "--log-json" => cli.log_json = true,
            "-h" | "--help" => bail!(usage()),
            flag if flag.starts_with("--") => bail!("未知参数: {}\n{}", flag, usage()),
            _ => positional.push(PathBuf::from(arg.as_str())),
        }
    }

    if positional.len() != 2 {
        bail!(usage());
    }
    cli.items_b = positional.pop().unwrap_or_default();
    cli.items_a = positional.pop().unwrap_or_default();
    Ok(cli)
}

/// 读取 JSON 数组文件
fn read_json_array(path: &Path) -> anyhow::Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("JSON 解析失败: {}", path.display()))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => bail!("文件内容不是 JSON 数组: {}", path.display()),
    }
}

fn version_id_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 加载配置与备注存储
///
/// - 未指定 --db: 默认配置 + 内存备注
/// - --db default: 系统默认数据库路径
fn open_stores(
    db_path: Option<&str>,
) -> anyhow::Result<(CompareConfig, Arc<dyn RetrospectiveNoteStore>)> {
    let db_path = match db_path {
        None => return Ok((CompareConfig::default(), Arc::new(InMemoryNoteStore::new()))),
        Some("default") => get_default_db_path(),
        Some(path) => path.to_string(),
    };
    let db_path = db_path.as_str();

    tracing::info!("使用数据库: {}", db_path);
    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("打开数据库失败: {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));
    let config = ConfigManager::from_connection(conn.clone())
        .and_then(|manager| manager.load_compare_config())
        .map_err(|e| anyhow::anyhow!("加载配置失败: {}", e))?;
    let notes = SqliteNoteStore::new(conn)?;
    Ok((config, Arc::new(notes)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_args(std::env::args().skip(1))?;
    if cli.log_json {
        logging::init_with(LogFormat::Json, logging::DEFAULT_LOG_LEVEL);
    } else {
        logging::init();
    }
    tracing::info!(
        "{} v{}",
        hot_rolling_aps_compare::APP_NAME,
        hot_rolling_aps_compare::VERSION
    );

    let version_id_a = version_id_of(&cli.items_a);
    let version_id_b = version_id_of(&cli.items_b);

    let mut source = StaticDataSource::new()
        .with_version(&version_id_a, read_json_array(&cli.items_a)?)
        .with_version(&version_id_b, read_json_array(&cli.items_b)?);
    if let Some(path) = &cli.pools_a {
        source = source.with_pools(&version_id_a, read_json_array(path)?);
    }
    if let Some(path) = &cli.pools_b {
        source = source.with_pools(&version_id_b, read_json_array(path)?);
    }

    let (config, notes) = open_stores(cli.db_path.as_deref())?;
    let api = VersionComparisonApi::new(Arc::new(source), notes, config);
    let out_dir = cli
        .out_dir
        .clone()
        .or_else(|| api.config().export_dir.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    if let Some(note) = &cli.note {
        api.save_retrospective_note(&version_id_a, &version_id_b, note)?;
    }

    let request = CompareRequest {
        version_id_a,
        version_id_b,
        date_range: DateRange::new(cli.date_from.as_deref(), cli.date_to.as_deref()),
        include_unchanged: cli.include_unchanged.then_some(true),
    };
    let view = api.compare_versions(&request).await?;
    println!("{}", view.message);

    let written = api.export_all(&view, Some(&out_dir), cli.operator.as_deref())?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(args(&[
            "a.json", "--all", "b.json", "--out", "dir", "--from", "2024-01-01", "--log-json",
        ]))
        .unwrap();
        assert_eq!(cli.items_a, PathBuf::from("a.json"));
        assert_eq!(cli.items_b, PathBuf::from("b.json"));
        assert!(cli.include_unchanged);
        assert_eq!(cli.out_dir, Some(PathBuf::from("dir")));
        assert_eq!(cli.date_from.as_deref(), Some("2024-01-01"));
        assert!(cli.log_json);
        assert_eq!(cli.db_path, None);
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(args(&["a.json"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json", "--out"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json", "--bogus"])).is_err());
    }

    #[test]
    fn test_version_id_of() {
        assert_eq!(version_id_of(Path::new("/tmp/v_20240101.json")), "v_20240101");
    }
}
