use drawpad::{Library, RecordStore, StorageConfig};
use tempfile::TempDir;

/// Create a catalog in a temporary directory
fn create_test_library() -> (TempDir, Library) {
    let temp_dir = TempDir::new().unwrap();
    let library = Library::open(&StorageConfig::in_dir(temp_dir.path())).unwrap();
    (temp_dir, library)
}

#[test]
fn test_first_drawing_scenario() {
    let (_temp_dir, mut library) = create_test_library();

    let id = library.insert("drawing_0.json", "A", "me").unwrap();

    assert_eq!(id, 0);
    assert_eq!(library.count().unwrap(), 1);
    assert!(library.exists(0).unwrap());
    assert!(!library.exists(1).unwrap());
}

#[test]
fn test_insert_then_exists() {
    let (_temp_dir, mut library) = create_test_library();
    for n in 0..5 {
        let id = library
            .insert(&format!("drawing_{n}.json"), "n", "me")
            .unwrap();
        assert!(library.exists(id).unwrap());
        assert_eq!(library.last_id().unwrap(), Some(id));
    }
    assert!(!library.exists(-1).unwrap());
    assert!(!library.exists(5).unwrap());
}

#[test]
fn test_last_id_empty() {
    let (_temp_dir, library) = create_test_library();
    assert_eq!(library.last_id().unwrap(), None);
    assert_eq!(library.count().unwrap(), 0);
    assert!(library.get_all().unwrap().is_empty());
}

#[test]
fn test_catalog_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig::in_dir(temp_dir.path());

    {
        let mut library = Library::open(&config).unwrap();
        library.insert("drawing_0.json", "A", "me").unwrap();
        let second = library.insert("drawing_1.json", "B", "me").unwrap();
        library.remove(second).unwrap();
    }

    let mut library = Library::open(&config).unwrap();
    assert_eq!(library.path(), Some(config.database_path().as_path()));
    assert_eq!(library.count().unwrap(), 1);
    // the removed id stays retired across restarts
    assert_eq!(library.insert("drawing_1.json", "C", "me").unwrap(), 2);

    let records = library.get_all().unwrap();
    assert_eq!(records[0].name, "A");
    assert_eq!(records[1].name, "C");
    assert!(records[0].created_at <= records[1].created_at);
}
