use foldernote_core::{
    DirectoryEntry, EditMode, EntryKind, Explorer, ExplorerError, FsStorage, Location, NoteFormat,
    NotesConfig, SettingsStore, SortOrder, StorageAccessor,
};
use tempfile::TempDir;

async fn setup() -> (TempDir, Explorer<FsStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let config = NotesConfig::new(dir.path()).unwrap();
    let storage = FsStorage::new(&config);
    let explorer = Explorer::open(config, storage).await.unwrap();
    (dir, explorer)
}

#[tokio::test]
async fn session_moves_between_viewing_and_editing() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_note("page", Some(NoteFormat::Html)).await.unwrap();
    explorer.close_note();

    let session = explorer.open_note("page.html").await.unwrap();
    assert_eq!(session.mode(), EditMode::Viewing);
    assert_eq!(session.format(), Some(NoteFormat::Html));

    assert_eq!(explorer.toggle_edit_mode().unwrap(), EditMode::Editing);
    assert_eq!(explorer.toggle_edit_mode().unwrap(), EditMode::Viewing);
    assert!(explorer.close_note().is_some());
    assert!(explorer.note_session().is_none());
}

#[tokio::test]
async fn edits_write_through_only_while_editing() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_note("n", None).await.unwrap();
    let location = Location::root().child("n.md").unwrap();

    let err = explorer.edit_open_note("too early").await.unwrap_err();
    assert!(matches!(err, ExplorerError::NotEditing));

    explorer.toggle_edit_mode().unwrap();
    explorer.edit_open_note("# one").await.unwrap();
    assert_eq!(explorer.storage().read_text(&location).await.unwrap(), "# one");
    explorer.edit_open_note("# two").await.unwrap();

    explorer.toggle_edit_mode().unwrap();
    let session = explorer.note_session().unwrap();
    assert_eq!(session.content(), "# two");
    assert_eq!(explorer.storage().read_text(&location).await.unwrap(), "# two");
}

#[tokio::test]
async fn session_operations_need_an_open_note() {
    let (_dir, mut explorer) = setup().await;
    assert!(matches!(
        explorer.toggle_edit_mode().unwrap_err(),
        ExplorerError::NoOpenNote
    ));
    assert!(matches!(
        explorer.edit_open_note("x").await.unwrap_err(),
        ExplorerError::NoOpenNote
    ));
}

#[tokio::test]
async fn opening_absent_note_reads_empty() {
    let (_dir, mut explorer) = setup().await;
    let session = explorer.open_note("ghost.md").await.unwrap();
    assert_eq!(session.content(), "");
    assert_eq!(session.format(), Some(NoteFormat::Markdown));
}

#[tokio::test]
async fn plain_text_note_has_no_format() {
    let (_dir, mut explorer) = setup().await;
    explorer.save_note_content("todo.txt", "- milk").await.unwrap();

    let listed = explorer.content().sorted_files(SortOrder::Ascending);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].format(), None);
    assert_eq!(listed[0].stem(), "todo");
}

#[tokio::test]
async fn saving_unlisted_note_updates_listing() {
    let (_dir, mut explorer) = setup().await;
    assert!(explorer.content().is_empty());

    explorer.save_note_content("fresh.md", "x").await.unwrap();

    let on_disk: Vec<String> = explorer
        .storage()
        .list(&Location::root())
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(on_disk, vec!["fresh.md"]);
    assert_eq!(explorer.content().file_names(), vec!["fresh.md"]);
}

#[tokio::test]
async fn editing_open_note_updates_listed_timestamp() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_note("n", None).await.unwrap();
    explorer.toggle_edit_mode().unwrap();
    explorer.edit_open_note("changed").await.unwrap();

    let location = Location::root().child("n.md").unwrap();
    let listed = explorer.content().find("n.md").unwrap().modified_at;
    let stored = explorer
        .storage()
        .list(&Location::root())
        .await
        .unwrap()
        .into_iter()
        .find(|entry| entry.name == "n.md")
        .unwrap()
        .modified_at;
    assert_eq!(listed, stored);
    assert_eq!(explorer.storage().read_text(&location).await.unwrap(), "changed");
}

#[tokio::test]
async fn api_key_round_trips_through_settings_file() {
    let (dir, explorer) = setup().await;
    assert_eq!(explorer.read_api_key().await.unwrap(), "");

    explorer.write_api_key("  abc123 ").await.unwrap();
    assert_eq!(explorer.read_api_key().await.unwrap(), "abc123");

    let on_disk = std::fs::read_to_string(dir.path().join("notes").join("apiKey.txt")).unwrap();
    assert_eq!(on_disk, "abc123");

    let settings = SettingsStore::new(explorer.storage(), explorer.config()).unwrap();
    assert_eq!(settings.key_file().segments(), ["apiKey.txt"]);
}

#[test]
fn entry_model_serializes_with_snake_case_tags() {
    let entry = DirectoryEntry::note("a.md");
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["kind"], "note");
    assert_eq!(json["name"], "a.md");

    let kind: EntryKind = serde_json::from_str("\"folder\"").unwrap();
    assert_eq!(kind, EntryKind::Folder);
    let format: NoteFormat = serde_json::from_str("\"html\"").unwrap();
    assert_eq!(format, NoteFormat::Html);
}

#[test]
fn config_round_trips_through_json() {
    let config = NotesConfig::new(std::env::temp_dir()).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let decoded: NotesConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, config);
    decoded.validate().unwrap();
}
