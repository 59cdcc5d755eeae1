// ==========================================
// 复盘备注持久化测试
// ==========================================
// 目标:
// - 备注按版本对存储, 与对比方向无关
// - 重新打开数据库后仍可读取 (模拟重启)
// - 超长备注被拒绝
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod retrospective_note_test {
    use hot_rolling_aps_compare::repository::{
        load_note, save_note, RepositoryError, RetrospectiveNoteStore, SqliteNoteStore,
    };
    use hot_rolling_aps_compare::repository::retrospective_note_repo::MAX_NOTE_CHARS;

    use crate::test_helpers::{create_test_db, open_shared_conn};

    #[test]
    fn test_note_survives_reopen() {
        let (_temp, db_path) = create_test_db().unwrap();

        {
            let store = SqliteNoteStore::new(open_shared_conn(&db_path).unwrap()).unwrap();
            save_note(&store, "v_a", "v_b", "H1 1月1日产能下降, 原因: 检修").unwrap();
        }

        let store = SqliteNoteStore::new(open_shared_conn(&db_path).unwrap()).unwrap();
        assert_eq!(
            load_note(&store, "v_b", "v_a").unwrap().as_deref(),
            Some("H1 1月1日产能下降, 原因: 检修")
        );
        assert_eq!(load_note(&store, "v_a", "v_c").unwrap(), None);
    }

    #[test]
    fn test_note_overwrite() {
        let (_temp, db_path) = create_test_db().unwrap();
        let store = SqliteNoteStore::new(open_shared_conn(&db_path).unwrap()).unwrap();

        save_note(&store, "v1", "v2", "first").unwrap();
        save_note(&store, "v2", "v1", "second").unwrap();
        assert_eq!(load_note(&store, "v1", "v2").unwrap().as_deref(), Some("second"));
        assert_eq!(
            store.get("compare_retrospective/v1__v2").unwrap().as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_note_too_long_rejected() {
        let (_temp, db_path) = create_test_db().unwrap();
        let store = SqliteNoteStore::new(open_shared_conn(&db_path).unwrap()).unwrap();

        let note = "备".repeat(MAX_NOTE_CHARS + 1);
        let err = save_note(&store, "v1", "v2", &note).unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { .. }));
        assert_eq!(load_note(&store, "v1", "v2").unwrap(), None);

        // 恰好上限可以保存
        let note = "备".repeat(MAX_NOTE_CHARS);
        save_note(&store, "v1", "v2", &note).unwrap();
    }
}
