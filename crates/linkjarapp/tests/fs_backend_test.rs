use linkjarapp::store::backend::KeyValueStore;
use linkjarapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    // 1. Missing key
    assert_eq!(backend.get("links").unwrap(), None);

    // 2. Write and read back
    backend.set("links", "[]").unwrap();
    assert_eq!(backend.get("links").unwrap(), Some("[]".to_string()));

    // 3. Remove, twice
    backend.remove("links").unwrap();
    backend.remove("links").unwrap();
    assert_eq!(backend.get("links").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    backend.set("links", "first").unwrap();
    backend.set("links", "second").unwrap();

    let expected_path = dir.path().join("links.json");
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "second");

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let backend = FsBackend::new(nested.clone());
    backend.set("links", "[]").unwrap();
    assert!(nested.join("links.json").exists());
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (_dir, backend) = setup();
    for key in ["", "../escape", "a/b", ".hidden"] {
        assert!(backend.set(key, "x").is_err(), "accepted {:?}", key);
    }
}
