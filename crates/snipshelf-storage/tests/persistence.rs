use snipshelf_core::keys;
use snipshelf_core::models::snippet::{Snippet, SnippetDraft, SnippetId};
use snipshelf_storage::error::StorageError;
use snipshelf_storage::snippets::SnippetStorage;
use snipshelf_storage::store::{FileStore, KeyValueStore, MemoryStore};

fn sample(id: u64, title: &str) -> Snippet {
    let created: jiff::Timestamp = "2024-05-01T08:30:00Z".parse().unwrap();
    Snippet::new(
        SnippetId(id),
        &SnippetDraft::new(title, "rust", "fn main() {}\n", "cli, demo"),
        created,
    )
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SnippetStorage::new(FileStore::new(dir.path()));

    let mut edited = sample(2, "second");
    edited.favorite = true;
    edited.updated_at = Some("2024-05-02T00:00:00Z".parse().unwrap());
    let snippets = vec![edited, sample(1, "first")];

    storage.save(&snippets).unwrap();
    assert_eq!(storage.load(), snippets);
}

#[test]
fn file_store_writes_under_the_well_known_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SnippetStorage::new(FileStore::new(dir.path()));
    storage.save(&[sample(1, "a")]).unwrap();

    let path = dir.path().join(format!("{}.json", keys::SNIPPETS));
    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.is_array());
    assert_eq!(json[0]["title"], "a");

    assert!(!dir.path().join("codeSnippets.json.tmp").exists());
}

#[test]
fn file_store_creates_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("data");
    let storage = SnippetStorage::new(FileStore::new(&root));

    storage.save(&[sample(1, "a")]).unwrap();
    assert_eq!(storage.load().len(), 1);
}

#[test]
fn save_overwrites_previous_contents() {
    let storage = SnippetStorage::new(MemoryStore::new());
    storage.save(&[sample(1, "a"), sample(2, "b")]).unwrap();
    storage.save(&[sample(3, "c")]).unwrap();

    let loaded = storage.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, SnippetId(3));
}

#[test]
fn nothing_stored_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SnippetStorage::new(FileStore::new(dir.path()));
    assert!(storage.load().is_empty());
}

#[test]
fn corrupt_value_loads_empty() {
    let store = MemoryStore::new();
    store.set(keys::SNIPPETS, "{not json").unwrap();
    assert!(SnippetStorage::new(store.clone()).load().is_empty());

    store.set(keys::SNIPPETS, r#"{"id": 1}"#).unwrap();
    assert!(SnippetStorage::new(store).load().is_empty());
}

#[test]
fn unreadable_store_loads_empty() {
    assert!(SnippetStorage::new(BrokenStore).load().is_empty());
}

#[test]
fn failed_write_is_reported() {
    let err = SnippetStorage::new(BrokenStore)
        .save(&[sample(1, "a")])
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}

#[test]
fn failed_rename_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the value file belongs makes the rename fail.
    std::fs::create_dir(dir.path().join("codeSnippets.json")).unwrap();
    std::fs::write(dir.path().join("codeSnippets.json").join("keep"), "x").unwrap();

    let err = FileStore::new(dir.path())
        .set(keys::SNIPPETS, "[]")
        .unwrap_err();

    assert!(matches!(err, StorageError::Write { .. }));
    assert!(!dir.path().join("codeSnippets.json.tmp").exists());
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let storage = SnippetStorage::new(store.clone());
    storage.save(&[sample(1, "a")]).unwrap();

    assert!(store.get(keys::SNIPPETS).unwrap().is_some());
}

#[test]
fn records_from_older_versions_load_with_defaults() {
    let store = MemoryStore::new();
    store
        .set(
            keys::SNIPPETS,
            r#"[{"id": 1700000000000, "title": "legacy", "code": "ls -la",
                 "createdAt": "2023-11-14T22:13:20.000Z"}]"#,
        )
        .unwrap();

    let loaded = SnippetStorage::new(store).load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].language, "");
    assert!(loaded[0].tags.is_empty());
    assert!(!loaded[0].favorite);
}
