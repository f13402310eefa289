use linknote_core::{
    FsNoteRepository, MemoryNoteRepository, NoteRepository, RepoError, SqliteNoteRepository,
};

fn assert_contract(repo: &mut dyn NoteRepository) {
    repo.ensure_ready().unwrap();
    assert!(repo.list_keys().unwrap().is_empty());
    assert_eq!(repo.read("a.md").unwrap(), None);
    assert!(!repo.exists("a.md").unwrap());

    repo.write("a.md", "first").unwrap();
    repo.write("a.md", "second").unwrap();
    repo.write("b.md", "").unwrap();
    assert_eq!(repo.read("a.md").unwrap().as_deref(), Some("second"));
    assert_eq!(repo.read("b.md").unwrap().as_deref(), Some(""));
    assert!(repo.exists("a.md").unwrap());

    let mut keys = repo.list_keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a.md", "b.md"]);

    repo.delete("a.md").unwrap();
    assert!(matches!(repo.delete("a.md"), Err(RepoError::NotFound(_))));
    assert_eq!(repo.list_keys().unwrap(), vec!["b.md"]);
}

#[test]
fn memory_repository_meets_contract() {
    assert_contract(&mut MemoryNoteRepository::new());
}

#[test]
fn directory_repository_meets_contract() {
    let dir = tempfile::tempdir().unwrap();
    assert_contract(&mut FsNoteRepository::new(dir.path().join("notes")));
}

#[test]
fn sqlite_repository_meets_contract() {
    assert_contract(&mut SqliteNoteRepository::open_in_memory().unwrap());
}

#[test]
fn utf8_content_survives_every_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut backends: Vec<Box<dyn NoteRepository>> = vec![
        Box::new(MemoryNoteRepository::new()),
        Box::new(FsNoteRepository::new(dir.path())),
        Box::new(SqliteNoteRepository::open_in_memory().unwrap()),
    ];
    for repo in &mut backends {
        repo.ensure_ready().unwrap();
        repo.write("日記.md", "今日は [[晴れ]] ✨").unwrap();
        assert_eq!(
            repo.read("日記.md").unwrap().as_deref(),
            Some("今日は [[晴れ]] ✨")
        );
    }
}
