use basket_kv::{FileStore, KeyValueStore, PendingSave, StorageError, Synced, WriteOrder};
use std::sync::Arc;

#[tokio::test]
async fn missing_file_has_no_slots() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::at(dir.path().join("basket.json"));

    assert_eq!(store.read("@user_profile").await.unwrap(), None);
}

#[tokio::test]
async fn writes_create_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store").join("basket.json");
    let store = FileStore::at(&path);

    store
        .write("@theme_preference", "dark".to_string())
        .await
        .unwrap();

    assert!(path.exists());
    assert_eq!(
        store.read("@theme_preference").await.unwrap().as_deref(),
        Some("dark")
    );
}

#[tokio::test]
async fn keys_do_not_clobber_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::at(dir.path().join("basket.json"));

    store.write("@a", "1".to_string()).await.unwrap();
    store.write("@b", "2".to_string()).await.unwrap();
    store.write("@a", "3".to_string()).await.unwrap();

    assert_eq!(store.read("@a").await.unwrap().as_deref(), Some("3"));
    assert_eq!(store.read("@b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn values_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basket.json");

    FileStore::at(&path)
        .write("@shopping_list_items", "[]".to_string())
        .await
        .unwrap();

    let reopened = FileStore::at(&path);
    assert_eq!(
        reopened.read("@shopping_list_items").await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn empty_file_has_no_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basket.json");
    std::fs::write(&path, "  \n").unwrap();

    assert_eq!(FileStore::at(&path).read("@a").await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_file_fails_reads_and_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basket.json");
    std::fs::write(&path, "{ definitely not json").unwrap();
    let store = FileStore::at(&path);

    let read = store.read("@a").await.unwrap_err();
    assert!(matches!(read, StorageError::ReadFailed { ref key, .. } if key == "@a"));

    let write = store.write("@a", "1".to_string()).await.unwrap_err();
    assert!(matches!(write, StorageError::WriteFailed { .. }));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{ definitely not json"
    );
}

#[tokio::test]
async fn concurrent_writes_keep_every_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::at(dir.path().join("basket.json")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.write(&format!("@k{i}"), i.to_string()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for i in 0..8 {
        assert_eq!(
            store.read(&format!("@k{i}")).await.unwrap(),
            Some(i.to_string())
        );
    }
}

#[tokio::test]
async fn synced_record_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basket.json");

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::at(&path));
    let mut tags: Synced<Vec<String>> = Synced::new(Arc::clone(&store), "@tags");
    tags.load().await.unwrap();
    tags.value_mut().unwrap().push("groceries".to_string());
    tags.finish_save(tags.save().unwrap().run().await).unwrap();

    let reopened: Arc<dyn KeyValueStore> = Arc::new(FileStore::at(&path));
    let mut again: Synced<Vec<String>> = Synced::new(reopened, "@tags");
    again.load().await.unwrap();
    assert_eq!(again.value(), &vec!["groceries".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reads_never_see_a_write_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::at(dir.path().join("basket.json")));
    store
        .write("@user_profile", r#"{"name":"Ada"}"#.to_string())
        .await
        .unwrap();

    let big = "x".repeat(4 * 1024 * 1024);
    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for _ in 0..5 {
                store
                    .write("@shopping_list_items", big.clone())
                    .await
                    .unwrap();
            }
        })
    };

    let mut reads = 0;
    while !writer.is_finished() || reads == 0 {
        let profile = store.read("@user_profile").await.unwrap();
        assert_eq!(profile.as_deref(), Some(r#"{"name":"Ada"}"#));
        reads += 1;
    }
    writer.await.unwrap();
}

#[tokio::test]
async fn staging_file_is_not_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::at(dir.path().join("basket.json"));

    store.write("@a", "1".to_string()).await.unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("basket.json")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ordered_writes_to_one_key_keep_the_newest() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::at(dir.path().join("basket.json")));
    let order = WriteOrder::new();

    for round in 0..50 {
        let old = PendingSave::ordered(&order, Arc::clone(&store), "@k", format!("old{round}"));
        let new = PendingSave::ordered(&order, Arc::clone(&store), "@k", format!("new{round}"));
        let old = tokio::spawn(old.run());
        let new = tokio::spawn(new.run());
        old.await.unwrap().unwrap();
        new.await.unwrap().unwrap();

        assert_eq!(store.read("@k").await.unwrap(), Some(format!("new{round}")));
    }
}
