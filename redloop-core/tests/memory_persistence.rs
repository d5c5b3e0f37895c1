//! Integration tests for persistent run memory

use redloop_core::state::MemoryStore;
use tempfile::TempDir;

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("memory.sqlite");

    {
        let store = MemoryStore::open(&path).expect("open");
        store
            .put("192.168.56.103", "finding-1", "port 80 serves Apache 2.4.52")
            .expect("put");
        store
            .put("192.168.56.103", "finding-2", "login.php redirects to /admin")
            .expect("put");
    }

    let store = MemoryStore::open(&path).expect("reopen");
    let records = store.search("192.168.56.103", 10).expect("search");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].key, "finding-2");
    assert!(records[1].value.contains("Apache"));
}

#[test]
fn test_wipe_clears_every_namespace() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("memory.sqlite");

    let store = MemoryStore::open(&path).expect("open");
    store.put("hostA", "k", "v").expect("put");
    store.put("hostB", "k", "v").expect("put");

    assert_eq!(store.wipe().expect("wipe"), 2);
    assert!(store.all().expect("all").is_empty());
}
