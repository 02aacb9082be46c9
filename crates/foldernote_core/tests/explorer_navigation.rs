use foldernote_core::{
    Explorer, ExplorerAction, ExplorerError, FsStorage, Location, NotesConfig, SortOrder,
    StorageAccessor,
};
use tempfile::TempDir;

async fn setup() -> (TempDir, Explorer<FsStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let config = NotesConfig::new(dir.path()).unwrap();
    let storage = FsStorage::new(&config);
    let explorer = Explorer::open(config, storage).await.unwrap();
    (dir, explorer)
}

fn folder_names(explorer: &Explorer<FsStorage>, order: SortOrder) -> Vec<String> {
    explorer
        .content()
        .sorted_folders(order)
        .into_iter()
        .map(|entry| entry.name.clone())
        .collect()
}

#[tokio::test]
async fn open_creates_notes_root_on_disk() {
    let (dir, explorer) = setup().await;
    assert!(dir.path().join("notes").is_dir());
    assert!(explorer.is_at_root());
    assert!(explorer.content().is_empty());
    assert_eq!(explorer.content().location, Location::root());
}

#[tokio::test]
async fn enter_then_back_restores_location_and_content() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_folder("sub").await.unwrap();
    explorer.create_note("top", None).await.unwrap();
    let before = explorer.content().clone();
    let origin = explorer.current_location().clone();

    let inside = explorer.enter("sub").await.unwrap();
    assert!(inside.is_empty());
    assert_eq!(explorer.current_location().title(), "sub");

    assert!(explorer.back().await.unwrap());
    assert_eq!(explorer.current_location(), &origin);
    assert_eq!(explorer.content(), &before);
}

#[tokio::test]
async fn back_at_root_is_noop() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_folder("A").await.unwrap();
    let before = explorer.content().clone();

    assert!(!explorer.back().await.unwrap());
    assert!(explorer.is_at_root());
    assert_eq!(explorer.content(), &before);
}

#[tokio::test]
async fn nested_navigation_walks_one_level_at_a_time() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_folder("a").await.unwrap();
    explorer.enter("a").await.unwrap();
    explorer.create_folder("b").await.unwrap();
    explorer.enter("b").await.unwrap();
    assert_eq!(explorer.current_location().segments(), ["a", "b"]);

    explorer.back().await.unwrap();
    assert_eq!(explorer.current_location().segments(), ["a"]);
    assert_eq!(explorer.content().folder_names(), vec!["b"]);

    explorer.list_root().await.unwrap();
    assert!(explorer.is_at_root());
    assert_eq!(explorer.content().folder_names(), vec!["a"]);
}

#[tokio::test]
async fn enter_rejects_invalid_names_without_moving() {
    let (_dir, mut explorer) = setup().await;
    let err = explorer.enter("a/b").await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidName(_)));
    assert!(explorer.is_at_root());
}

#[tokio::test]
async fn refresh_failure_keeps_navigation_and_empties_snapshot() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_note("clash", None).await.unwrap();

    let err = explorer.enter("clash.md").await.unwrap_err();
    assert!(matches!(
        err,
        ExplorerError::Storage {
            action: ExplorerAction::ListDirectory,
            ..
        }
    ));
    assert!(err.user_message().starts_with("Failed to read directory contents"));
    assert_eq!(explorer.current_location().segments(), ["clash.md"]);
    assert!(explorer.content().is_empty());

    assert!(explorer.back().await.unwrap());
    assert_eq!(explorer.content().file_names(), vec!["clash.md"]);
}

#[tokio::test]
async fn root_folders_sort_and_toggle() {
    let (_dir, mut explorer) = setup().await;
    explorer.create_folder("B").await.unwrap();
    explorer.create_folder("A").await.unwrap();

    let order = SortOrder::Ascending;
    assert_eq!(folder_names(&explorer, order), vec!["A", "B"]);
    assert_eq!(folder_names(&explorer, order.toggle()), vec!["B", "A"]);
}

#[tokio::test]
async fn settings_key_file_is_hidden_from_root_listing() {
    let (_dir, mut explorer) = setup().await;
    explorer.write_api_key("secret-key").await.unwrap();
    explorer.create_note("visible", None).await.unwrap();

    assert_eq!(explorer.content().file_names(), vec!["visible.md"]);
    let raw = explorer
        .storage()
        .list(&Location::root())
        .await
        .unwrap()
        .into_iter()
        .any(|entry| entry.name == "apiKey.txt");
    assert!(raw);
}
