// Tests for database functionality

use linkmark_core::data::{DataError, Database};
use linkmark_core::model::NewBookmark;
use tempfile::TempDir;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

fn new_bookmark(url: &str, title: &str) -> NewBookmark {
    NewBookmark {
        url: url.to_string(),
        title: title.to_string(),
        description: format!("About {}", title),
        favicon_url: format!("{}/favicon.ico", url),
    }
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));

    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));
}

#[test]
fn test_database_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path).unwrap();
    drop(db);
    assert!(Database::exists(&db_path));

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_reopen_keeps_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    {
        let db = Database::new(&db_path).unwrap();
        db.create_bookmark(&new_bookmark("https://example.com", "Example"))
            .unwrap();
    }

    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.count_bookmarks().unwrap(), 1);
}

// ============================================================================
// Create / Get Tests
// ============================================================================

#[test]
fn test_create_bookmark_assigns_id_and_timestamps() {
    let (_temp_dir, db) = create_test_db();

    let bookmark = db
        .create_bookmark(&new_bookmark("https://example.com", "Example"))
        .unwrap();

    assert!(bookmark.id > 0);
    assert_eq!(bookmark.url, "https://example.com");
    assert_eq!(bookmark.title, "Example");
    assert_eq!(bookmark.created_at, bookmark.updated_at);
}

#[test]
fn test_create_assigns_distinct_ids() {
    let (_temp_dir, db) = create_test_db();

    let first = db
        .create_bookmark(&new_bookmark("https://one.example", "One"))
        .unwrap();
    let second = db
        .create_bookmark(&new_bookmark("https://two.example", "Two"))
        .unwrap();

    assert_ne!(first.id, second.id);
}

#[test]
fn test_get_bookmark_round_trips_row() {
    let (_temp_dir, db) = create_test_db();

    let created = db
        .create_bookmark(&new_bookmark("https://example.com", "Example"))
        .unwrap();
    let fetched = db.get_bookmark(created.id).unwrap();

    assert_eq!(created, fetched);
}

#[test]
fn test_get_missing_bookmark_is_not_found() {
    let (_temp_dir, db) = create_test_db();

    let err = db.get_bookmark(42).unwrap_err();
    assert!(matches!(err, DataError::NotFound(42)));
}

#[test]
fn test_empty_metadata_is_stored_as_empty_strings() {
    let (_temp_dir, db) = create_test_db();

    let created = db
        .create_bookmark(&NewBookmark {
            url: "https://bare.example".to_string(),
            ..Default::default()
        })
        .unwrap();
    let fetched = db.get_bookmark(created.id).unwrap();

    assert_eq!(fetched.title, "");
    assert_eq!(fetched.description, "");
    assert_eq!(fetched.favicon_url, "");
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_empty() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.list_bookmarks().unwrap().is_empty());
}

#[test]
fn test_list_newest_first() {
    let (_temp_dir, db) = create_test_db();

    let first = db
        .create_bookmark(&new_bookmark("https://one.example", "One"))
        .unwrap();
    let second = db
        .create_bookmark(&new_bookmark("https://two.example", "Two"))
        .unwrap();
    let third = db
        .create_bookmark(&new_bookmark("https://three.example", "Three"))
        .unwrap();

    let ids: Vec<i64> = db.list_bookmarks().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

// ============================================================================
// Delete Tests
// ============================================================================

#[test]
fn test_delete_bookmark() {
    let (_temp_dir, db) = create_test_db();

    let bookmark = db
        .create_bookmark(&new_bookmark("https://example.com", "Example"))
        .unwrap();
    db.delete_bookmark(bookmark.id).unwrap();

    assert!(matches!(
        db.get_bookmark(bookmark.id),
        Err(DataError::NotFound(_))
    ));
    assert_eq!(db.count_bookmarks().unwrap(), 0);
}

#[test]
fn test_delete_missing_bookmark_is_not_found() {
    let (_temp_dir, db) = create_test_db();

    let err = db.delete_bookmark(7).unwrap_err();
    assert!(matches!(err, DataError::NotFound(7)));
}

#[test]
fn test_delete_twice() {
    let (_temp_dir, db) = create_test_db();

    let bookmark = db
        .create_bookmark(&new_bookmark("https://example.com", "Example"))
        .unwrap();
    assert!(db.delete_bookmark(bookmark.id).is_ok());
    assert!(matches!(
        db.delete_bookmark(bookmark.id),
        Err(DataError::NotFound(_))
    ));
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let db = Database::in_memory().unwrap();

    let first = db
        .create_bookmark(&new_bookmark("https://one.example", "One"))
        .unwrap();
    db.delete_bookmark(first.id).unwrap();
    let second = db
        .create_bookmark(&new_bookmark("https://two.example", "Two"))
        .unwrap();

    assert!(second.id > first.id);
}
