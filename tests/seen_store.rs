// tests/seen_store.rs
use jobwatch::store::{SeenRecord, SeenStore};

fn rec(id: &str) -> SeenRecord {
    SeenRecord {
        id: id.into(),
        source: "indeed".into(),
        title: "Backend Developer".into(),
        company: "Hooli".into(),
        created_at: "2025-06-10T11:55:00Z".into(),
    }
}

#[tokio::test]
async fn survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("seen_jobs.db");

    let s = SeenStore::open(&db).await.unwrap();
    s.put(&rec("indeed_abc123")).await.unwrap();
    s.close().await;

    let s = SeenStore::open(&db).await.unwrap();
    assert!(s.has("indeed_abc123").await.unwrap());
    assert!(!s.has("indeed_other").await.unwrap());
    assert_eq!(s.len().await.unwrap(), 1);
}

#[tokio::test]
async fn creates_missing_parent_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("nested/deeper/seen.db");
    let s = SeenStore::open(&db).await.unwrap();
    assert!(s.is_empty().await.unwrap());
    assert!(db.exists());
}

#[tokio::test]
async fn double_put_leaves_one_row() {
    let tmp = tempfile::tempdir().unwrap();
    let s = SeenStore::open(&tmp.path().join("s.db")).await.unwrap();
    assert!(s.put(&rec("x")).await.unwrap());
    assert!(!s.put(&rec("x")).await.unwrap());
    assert!(s.has("x").await.unwrap());
    assert_eq!(s.len().await.unwrap(), 1);
}
