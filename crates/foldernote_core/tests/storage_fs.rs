use foldernote_core::{
    EntryKind, EntryStatus, FsStorage, Location, NotesConfig, StorageAccessor, StorageError,
};
use tempfile::TempDir;

fn setup() -> (TempDir, FsStorage) {
    let dir = tempfile::tempdir().unwrap();
    let config = NotesConfig::new(dir.path()).unwrap();
    (dir, FsStorage::new(&config))
}

fn loc(segments: &[&str]) -> Location {
    Location::from_segments(segments.iter().copied()).unwrap()
}

#[tokio::test]
async fn ensure_folder_creates_ancestors_and_is_idempotent() {
    let (_dir, storage) = setup();
    let deep = loc(&["a", "b", "c"]);

    storage.ensure_folder(&deep).await.unwrap();
    storage.ensure_folder(&deep).await.unwrap();

    assert!(storage.path_of(&deep).is_dir());
    let status = storage.exists(&loc(&["a"])).await.unwrap();
    assert_eq!(
        status,
        EntryStatus {
            present: true,
            is_folder: true
        }
    );
}

#[tokio::test]
async fn exists_distinguishes_file_folder_and_absent() {
    let (_dir, storage) = setup();
    storage.write_text(&loc(&["note.md"]), "body").await.unwrap();

    let file = storage.exists(&loc(&["note.md"])).await.unwrap();
    assert!(file.present);
    assert!(!file.is_folder);

    let absent = storage.exists(&loc(&["missing.md"])).await.unwrap();
    assert_eq!(absent, EntryStatus::default());
}

#[tokio::test]
async fn list_tags_entries_by_kind() {
    let (_dir, storage) = setup();
    let root = Location::root();
    storage.ensure_folder(&loc(&["Work"])).await.unwrap();
    storage.write_text(&loc(&["idea.md"]), "# idea").await.unwrap();

    let mut entries = storage.list(&root).await.unwrap();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Work");
    assert_eq!(entries[0].kind, EntryKind::Folder);
    assert_eq!(entries[1].name, "idea.md");
    assert_eq!(entries[1].kind, EntryKind::Note);
    assert!(entries[1].modified_at.is_some());
}

#[tokio::test]
async fn list_fails_for_missing_folder_and_files() {
    let (_dir, storage) = setup();

    let missing = storage.list(&loc(&["nowhere"])).await.unwrap_err();
    assert!(missing.is_not_found());

    storage.write_text(&loc(&["a.md"]), "").await.unwrap();
    let not_folder = storage.list(&loc(&["a.md"])).await.unwrap_err();
    assert!(matches!(not_folder, StorageError::NotAFolder(_)));
}

#[tokio::test]
async fn read_text_of_absent_target_is_empty() {
    let (_dir, storage) = setup();
    let text = storage.read_text(&loc(&["ghost.md"])).await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn write_text_creates_parents_and_overwrites() {
    let (_dir, storage) = setup();
    let note = loc(&["deep", "er", "n.md"]);

    storage.write_text(&note, "first").await.unwrap();
    storage.write_text(&note, "second").await.unwrap();

    assert_eq!(storage.read_text(&note).await.unwrap(), "second");
}

#[tokio::test]
async fn remove_is_recursive_and_idempotent() {
    let (_dir, storage) = setup();
    let folder = loc(&["trash"]);
    storage.write_text(&loc(&["trash", "inner", "n.md"]), "x").await.unwrap();
    storage.write_text(&loc(&["lone.md"]), "y").await.unwrap();

    storage.remove(&folder).await.unwrap();
    storage.remove(&folder).await.unwrap();
    storage.remove(&loc(&["lone.md"])).await.unwrap();
    storage.remove(&loc(&["lone.md"])).await.unwrap();

    assert!(!storage.exists(&folder).await.unwrap().present);
    assert!(!storage.exists(&loc(&["lone.md"])).await.unwrap().present);
}

#[test]
fn storage_resolves_locations_under_notes_root() {
    let (dir, storage) = setup();
    assert_eq!(storage.root(), dir.path().join("notes"));
    assert_eq!(
        storage.path_of(&loc(&["a", "b.md"])),
        dir.path().join("notes").join("a").join("b.md")
    );
}
