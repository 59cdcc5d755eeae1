// ==========================================
// 热轧精整排产系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "HOT_ROLLING_APS_DB_PATH";

const DATA_DIR_NAME: &str = "hot-rolling-aps";
const DB_FILE_NAME: &str = "hot_rolling_aps.db";
const FALLBACK_DB_PATH: &str = "./hot_rolling_aps.db";

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 HOT_ROLLING_APS_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    let from_env = std::env::var(DB_PATH_ENV).ok();
    env_db_path(from_env.as_deref())
        .unwrap_or_else(|| db_path_under(dirs::data_dir().as_deref()))
}

/// 环境变量指定的路径 (trim 后为空视为未指定)
fn env_db_path(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// 数据目录下的数据库路径; 目录无法创建时回退到当前目录
pub fn db_path_under(data_dir: Option<&Path>) -> String {
    let mut path = PathBuf::from(FALLBACK_DB_PATH);
    if let Some(data_dir) = data_dir {
        let dir = data_dir.join(DATA_DIR_NAME);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("无法创建数据目录 {}: {}", dir.display(), e);
        } else {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().into_owned()
}
