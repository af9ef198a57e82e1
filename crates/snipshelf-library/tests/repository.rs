use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use snipshelf_core::keys;
use snipshelf_core::models::snippet::{Snippet, SnippetDraft, SnippetId};
use snipshelf_library::error::LibraryError;
use snipshelf_library::repository::Repository;
use snipshelf_search::query::{query, Query};
use snipshelf_search::sort::SortKey;
use snipshelf_storage::error::StorageError;
use snipshelf_storage::snippets::SnippetStorage;
use snipshelf_storage::store::{KeyValueStore, MemoryStore};

fn draft(title: &str) -> SnippetDraft {
    SnippetDraft::new(title, "rust", "fn main() {}", "demo")
}

fn stored(store: &MemoryStore) -> Vec<Snippet> {
    SnippetStorage::new(store.clone()).load()
}

/// Counts writes and can be switched to fail them.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
    writes: Arc<std::sync::atomic::AtomicUsize>,
}

impl FlakyStore {
    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }
}

#[test]
fn create_inserts_at_front_and_persists() {
    let store = MemoryStore::new();
    let mut repo = Repository::open(store.clone());

    repo.create(&draft("first")).unwrap();
    let second = repo.create(&draft("second")).unwrap();

    assert_eq!(repo.all()[0], second);
    assert_eq!(repo.all()[1].title, "first");
    assert_eq!(stored(&store), repo.all());
}

#[test]
fn create_fills_in_defaults() {
    let mut repo = Repository::open(MemoryStore::new());
    let snippet = repo
        .create(&SnippetDraft::new("", "", "echo hi\n", " shell, ,bash "))
        .unwrap();

    assert_eq!(snippet.title, "");
    assert_eq!(snippet.language(), None);
    assert_eq!(snippet.tags, vec!["shell", "bash"]);
    assert!(!snippet.favorite);
    assert_eq!(snippet.updated_at, None);
}

#[test]
fn ids_stay_unique_across_mutations() {
    let mut repo = Repository::open(MemoryStore::new());
    let mut created = Vec::new();
    for i in 0..20 {
        created.push(repo.create(&draft(&format!("s{i}"))).unwrap().id);
    }
    repo.delete(created[3]).unwrap();
    repo.update(created[7], &draft("edited")).unwrap();
    for i in 0..5 {
        repo.create(&draft(&format!("t{i}"))).unwrap();
    }

    let ids: HashSet<SnippetId> = repo.all().iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), repo.len());
    assert_eq!(repo.len(), 24);
}

#[test]
fn create_after_importing_the_largest_id_picks_a_fresh_one() {
    let mut repo = Repository::open(MemoryStore::new());
    let added = repo
        .import_json(
            r#"[{"id": 18446744073709551615, "title": "last", "code": "x",
                "createdAt": "2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
    assert_eq!(added, 1);

    let created = repo.create(&draft("new")).unwrap();
    assert_ne!(created.id, SnippetId(u64::MAX));
    assert_eq!(repo.all()[0], created);
    assert_eq!(repo.len(), 2);
}

#[test]
fn ids_stay_unique_after_importing_ids_ahead_of_the_clock() {
    let mut repo = Repository::open(MemoryStore::new());
    let template = repo.create(&draft("template")).unwrap();

    let imported: Vec<Snippet> = [u64::MAX - 2, u64::MAX, 4_000_000_000_000_000]
        .into_iter()
        .map(|raw| {
            let mut snippet = template.clone();
            snippet.id = SnippetId(raw);
            snippet
        })
        .collect();
    assert_eq!(repo.import_merge(imported).unwrap(), 3);

    for i in 0..6 {
        repo.create(&draft(&format!("after import {i}"))).unwrap();
    }

    let ids: HashSet<SnippetId> = repo.all().iter().map(|s| s.id).collect();
    assert_eq!(repo.len(), 10);
    assert_eq!(ids.len(), repo.len());
}

#[test]
fn update_replaces_fields_and_keeps_identity() {
    let store = MemoryStore::new();
    let mut repo = Repository::open(store.clone());
    let original = repo.create(&draft("old")).unwrap();
    repo.toggle_favorite(original.id).unwrap();

    let updated = repo
        .update(
            original.id,
            &SnippetDraft::new("new", "python", "print(1)", "a, b"),
        )
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.favorite);
    assert_eq!(updated.title, "new");
    assert_eq!(updated.language, "python");
    assert_eq!(updated.code, "print(1)");
    assert_eq!(updated.tags, vec!["a", "b"]);
    let edited_at = updated.updated_at.expect("updated_at set");
    assert!(edited_at >= original.created_at);

    assert_eq!(repo.get(original.id), Some(&updated));
    assert_eq!(stored(&store)[0], updated);
}

#[test]
fn update_missing_is_not_found_and_writes_nothing() {
    let store = FlakyStore::default();
    let mut repo = Repository::open(store.clone());
    repo.create(&draft("a")).unwrap();
    let before = repo.export_all();
    let writes = store.writes();

    let err = repo.update(SnippetId(1), &draft("x")).unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { id } if id == SnippetId(1)));
    assert_eq!(repo.all(), before);
    assert_eq!(store.writes(), writes);
}

#[test]
fn toggle_favorite_flips_and_persists() {
    let store = MemoryStore::new();
    let mut repo = Repository::open(store.clone());
    let id = repo.create(&draft("a")).unwrap().id;

    assert!(repo.toggle_favorite(id).unwrap());
    assert!(stored(&store)[0].favorite);
    assert!(!repo.toggle_favorite(id).unwrap());
    assert!(!stored(&store)[0].favorite);

    assert!(matches!(
        repo.toggle_favorite(SnippetId(9)),
        Err(LibraryError::NotFound { .. })
    ));
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let store = MemoryStore::new();
    let mut repo = Repository::open(store.clone());
    let a = repo.create(&draft("a")).unwrap().id;
    let b = repo.create(&draft("b")).unwrap().id;
    let c = repo.create(&draft("c")).unwrap().id;

    assert!(repo.delete(b).unwrap());
    let remaining: Vec<SnippetId> = repo.all().iter().map(|s| s.id).collect();
    assert_eq!(remaining, vec![c, a]);
    assert_eq!(stored(&store).len(), 2);

    assert!(!repo.delete(b).unwrap());
    assert_eq!(repo.len(), 2);
}

#[test]
fn every_mutation_writes_once() {
    let store = FlakyStore::default();
    let mut repo = Repository::open(store.clone());

    let id = repo.create(&draft("a")).unwrap().id;
    assert_eq!(store.writes(), 1);
    repo.update(id, &draft("b")).unwrap();
    assert_eq!(store.writes(), 2);
    repo.toggle_favorite(id).unwrap();
    assert_eq!(store.writes(), 3);
    repo.import_merge(Vec::new()).unwrap();
    assert_eq!(store.writes(), 4);
    repo.delete(id).unwrap();
    assert_eq!(store.writes(), 5);
}

#[test]
fn reopening_restores_the_collection() {
    let store = MemoryStore::new();
    let mut repo = Repository::open(store.clone());
    repo.create(&draft("a")).unwrap();
    repo.create(&draft("b")).unwrap();
    let snapshot = repo.export_all();

    let reopened = Repository::open(store);
    assert_eq!(reopened.all(), snapshot);
}

#[test]
fn corrupt_storage_opens_empty() {
    let store = MemoryStore::new();
    store.set(keys::SNIPPETS, "[{\"oops\":").unwrap();
    assert!(Repository::open(store).is_empty());
}

#[test]
fn failed_save_keeps_memory_intact_until_flushed() {
    let store = FlakyStore::default();
    let mut repo = Repository::open(store.clone());
    let kept = repo.create(&draft("kept")).unwrap();

    store.fail(true);
    let err = repo.create(&draft("unsaved")).unwrap_err();
    assert!(matches!(err, LibraryError::StorageUnavailable(_)));
    assert!(repo.is_dirty());
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.all()[0].title, "unsaved");
    assert_eq!(repo.all()[1], kept);

    store.fail(false);
    repo.flush().unwrap();
    assert!(!repo.is_dirty());
    let reopened = Repository::open(store);
    assert_eq!(reopened.all(), repo.all());
}

#[test]
fn import_skips_existing_ids() {
    let mut source = Repository::open(MemoryStore::new());
    let five = source.create(&draft("five")).unwrap();

    let mut six = five.clone();
    six.id = SnippetId(five.id.0 + 1);
    six.title = "six".into();
    let mut colliding = five.clone();
    colliding.title = "different content, same id".into();

    let mut target = Repository::open(MemoryStore::new());
    target.import_merge(vec![five.clone()]).unwrap();

    let added = target.import_merge(vec![colliding, six.clone()]).unwrap();
    assert_eq!(added, 1);
    assert_eq!(target.all(), &[six, five][..]);
}

#[test]
fn import_prepends_new_and_keeps_group_order() {
    let mut repo = Repository::open(MemoryStore::new());
    let existing_b = repo.create(&draft("b")).unwrap();
    let existing_a = repo.create(&draft("a")).unwrap();

    let mut x = existing_a.clone();
    x.id = SnippetId(1);
    let mut y = existing_a.clone();
    y.id = SnippetId(2);
    let mut duplicate_x = existing_a.clone();
    duplicate_x.id = SnippetId(1);

    let added = repo
        .import_merge(vec![x.clone(), y.clone(), duplicate_x])
        .unwrap();
    assert_eq!(added, 2);

    let order: Vec<SnippetId> = repo.all().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![x.id, y.id, existing_a.id, existing_b.id]);
}

#[test]
fn export_then_import_into_empty_reproduces_collection() {
    let mut source = Repository::open(MemoryStore::new());
    let id = source.create(&draft("one")).unwrap().id;
    source.create(&SnippetDraft::new("two", "", "a\nb", "")).unwrap();
    source.toggle_favorite(id).unwrap();
    source.update(id, &draft("one, edited")).unwrap();

    let document = source.export_json().unwrap();

    let mut target = Repository::open(MemoryStore::new());
    assert_eq!(target.import_json(&document).unwrap(), 2);
    assert_eq!(target.all(), source.all());
}

#[test]
fn invalid_import_changes_nothing() {
    let store = FlakyStore::default();
    let mut repo = Repository::open(store.clone());
    repo.create(&draft("a")).unwrap();
    let before = repo.export_all();
    let writes = store.writes();

    for bad in [
        "not json",
        r#"{"id": 1, "title": "object, not array"}"#,
        r#"[{"id": 1, "title": "no code or createdAt"}]"#,
        r#"[1, 2, 3]"#,
    ] {
        let err = repo.import_json(bad).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidFormat(_)), "{bad}");
    }

    assert_eq!(repo.all(), before);
    assert_eq!(store.writes(), writes);
}

#[test]
fn import_accepts_records_from_older_versions() {
    let mut repo = Repository::open(MemoryStore::new());
    let added = repo
        .import_json(
            r#"[{"id": 1700000000000, "title": "legacy", "language": "",
                 "code": "ls", "createdAt": "2023-11-14T22:13:20.000Z"}]"#,
        )
        .unwrap();

    assert_eq!(added, 1);
    assert!(repo.all()[0].tags.is_empty());
    assert!(!repo.all()[0].favorite);
}

#[test]
fn languages_are_distinct_and_sorted() {
    let mut repo = Repository::open(MemoryStore::new());
    repo.create(&SnippetDraft::new("a", "rust", "", "")).unwrap();
    repo.create(&SnippetDraft::new("b", "", "", "")).unwrap();
    repo.create(&SnippetDraft::new("c", "go", "", "")).unwrap();
    repo.create(&SnippetDraft::new("d", "rust", "", "")).unwrap();

    assert_eq!(repo.languages(), vec!["go", "rust"]);
}

#[test]
fn newly_created_snippet_leads_the_newest_view() {
    let mut repo = Repository::open(MemoryStore::new());
    repo.create(&draft("older")).unwrap();
    let newest = repo.create(&draft("newer")).unwrap();

    let view = query(repo.all(), &Query::sorted(SortKey::Newest));
    assert_eq!(view[0].id, newest.id);
}
