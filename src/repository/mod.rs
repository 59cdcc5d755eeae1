// ==========================================
// 热轧精整排产系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod retrospective_note_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use retrospective_note_repo::{
    load_note, save_note, InMemoryNoteStore, RetrospectiveNoteStore, SqliteNoteStore,
};
