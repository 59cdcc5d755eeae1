// ==========================================
// 热轧精整排产系统 - 版本对比复盘备注存储
// ==========================================
// 职责: 按键读写复盘备注 (键由 retrospective_note_key 生成, 与对比方向无关)
// 实现: SQLite (compare_retrospective_note 表) / 内存 (测试与离线工具)
// ==========================================

use crate::engine::labels::retrospective_note_key;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 复盘备注单条最大长度 (字符)
pub const MAX_NOTE_CHARS: usize = 20_000;

// ==========================================
// Trait: RetrospectiveNoteStore
// ==========================================
pub trait RetrospectiveNoteStore: Send + Sync {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    fn set(&self, key: &str, note: &str) -> RepositoryResult<()>;
}

/// 读取一对版本的复盘备注
pub fn load_note(
    store: &dyn RetrospectiveNoteStore,
    version_id_a: &str,
    version_id_b: &str,
) -> RepositoryResult<Option<String>> {
    store.get(&retrospective_note_key(version_id_a, version_id_b))
}

/// 保存一对版本的复盘备注
pub fn save_note(
    store: &dyn RetrospectiveNoteStore,
    version_id_a: &str,
    version_id_b: &str,
    note: &str,
) -> RepositoryResult<()> {
    if note.chars().count() > MAX_NOTE_CHARS {
        return Err(RepositoryError::FieldValueError {
            field: "note".to_string(),
            message: format!("备注长度超过 {} 字符", MAX_NOTE_CHARS),
        });
    }
    store.set(&retrospective_note_key(version_id_a, version_id_b), note)
}

// ==========================================
// SqliteNoteStore
// ==========================================
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoteStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        store.ensure_table()?;
        Ok(store)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS compare_retrospective_note (
              note_key TEXT PRIMARY KEY,
              note TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl RetrospectiveNoteStore for SqliteNoteStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let note = conn
            .query_row(
                "SELECT note FROM compare_retrospective_note WHERE note_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(note)
    }

    fn set(&self, key: &str, note: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO compare_retrospective_note (note_key, note, updated_at)
             VALUES (?1, ?2, datetime('now', 'localtime'))
             ON CONFLICT(note_key) DO UPDATE SET note = ?2, updated_at = datetime('now', 'localtime')",
            params![key, note],
        )?;
        tracing::debug!(note_key = key, chars = note.chars().count(), "复盘备注已保存");
        Ok(())
    }
}

// ==========================================
// InMemoryNoteStore
// ==========================================
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<HashMap<String, String>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RetrospectiveNoteStore for InMemoryNoteStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let notes = self
            .notes
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(notes.get(key).cloned())
    }

    fn set(&self, key: &str, note: &str) -> RepositoryResult<()> {
        let mut notes = self
            .notes
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        notes.insert(key.to_string(), note.to_string());
        Ok(())
    }
}
