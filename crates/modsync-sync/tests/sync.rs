mod common;

use std::sync::Arc;

use common::*;
use modsync_catalog::{Blacklist, FileId, Mod, ModFile};
use modsync_fetch::MockClient;
use modsync_sync::{Error, ProbeCache, Syncer};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn maps_only() -> modsync_sync::EntryPredicate {
    modsync_sync::entry_matches(regex::Regex::new(r"^Maps/").unwrap())
}

#[tokio::test]
async fn downloads_latest_file_of_each_mod() {
    let dir = tempdir().unwrap();
    let client = MockClient::new();
    client.route(&download_url(11), body(11)).route(&download_url(21), body(21));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(10, "one-old.zip"), mod_file(11, "one.zip")]),
        catalog_mod(2, vec![mod_file(21, "two.zip")]),
    ]);

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config()).unwrap();
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.synced.len(), 2);
    assert_eq!(zip_names(dir.path()), vec!["one.zip", "two.zip"]);
    assert_eq!(std::fs::read(dir.path().join("one.zip")).unwrap(), body(11));
    assert_eq!(client.hits(&download_url(10)), 0);
    assert!(dir.path().join("modList.json").exists());
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let dir = tempdir().unwrap();
    let client = MockClient::new();
    client.route(&download_url(11), body(11));
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);
    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config()).unwrap();

    syncer.run(&CancellationToken::new()).await.unwrap();
    let second = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(second.is_success());
    assert!(second.removed.is_empty());
    assert_eq!(client.hits(&download_url(11)), 1);
}

#[tokio::test]
async fn accepted_by_probe_is_downloaded_and_cached() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("binDownloadCache.json");
    let client = MockClient::new();
    client
        .route(&listing_url(11), "everest.yaml\nMaps/level.bin\n")
        .route(&download_url(11), body(11));
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config())
        .unwrap()
        .with_content_filter(ProbeCache::load(&cache_path).unwrap(), maps_only());
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(zip_names(dir.path()), vec!["one.zip"]);
    let cache = ProbeCache::load(&cache_path).unwrap();
    assert_eq!(cache.get(FileId(11)), Some(true));
}

#[tokio::test]
async fn present_artifact_skips_probe_and_download() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("one.zip"), body(11)).unwrap();
    let client = MockClient::new();
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config())
        .unwrap()
        .with_content_filter(ProbeCache::empty(dir.path().join("cache.json")), maps_only());
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.synced.len(), 1);
    assert_eq!(client.total_hits(), 0);
}

#[tokio::test]
async fn rejected_by_probe_is_remembered() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let client = MockClient::new();
    client
        .route(&listing_url(11), "everest.yaml\nMaps/level.bin")
        .route(&listing_url(21), "everest.yaml\nDialog/English.txt")
        .route(&download_url(11), body(11));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(11, "one.zip")]),
        catalog_mod(2, vec![mod_file(21, "two.zip")]),
    ]);

    for _ in 0..3 {
        let syncer = Syncer::new(catalog.clone(), client.clone(), dir.path(), Blacklist::default(), fast_config())
            .unwrap()
            .with_content_filter(ProbeCache::load(&cache_path).unwrap(), maps_only());
        let result = syncer.run(&CancellationToken::new()).await.unwrap();
        assert_eq!(result.synced.len(), 1);
    }

    assert_eq!(zip_names(dir.path()), vec!["one.zip"]);
    assert_eq!(client.hits(&listing_url(21)), 1);
    assert_eq!(client.hits(&download_url(21)), 0);
    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&cache_path).unwrap()).unwrap();
    assert_eq!(value["knownInvalidFileIds"]["21"]["isValid"], false);
    assert_eq!(value["knownInvalidFileIds"]["11"]["isValid"], true);
}

#[tokio::test]
async fn failed_probe_writes_no_decision() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let client = MockClient::new();
    client.route(&listing_url(11), "Maps/level.bin").fail_first(&listing_url(11), 4);
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config())
        .unwrap()
        .with_content_filter(ProbeCache::load(&cache_path).unwrap(), maps_only());
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(!result.fetched);
    assert_eq!(client.hits(&listing_url(11)), 4);
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn exhausted_download_is_reported_and_others_continue() {
    let dir = tempdir().unwrap();
    let client = MockClient::new();
    client
        .route(&download_url(11), body(11))
        .fail_first(&download_url(11), 100)
        .route(&download_url(21), body(21));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(11, "one.zip")]),
        catalog_mod(2, vec![mod_file(21, "two.zip")]),
    ]);

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), Blacklist::default(), fast_config()).unwrap();
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.fetched);
    assert!(!result.is_success());
    assert_eq!(client.hits(&download_url(11)), 4);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].url, download_url(11));
    assert_eq!(zip_names(dir.path()), vec!["two.zip"]);
}

#[tokio::test]
async fn artifacts_no_longer_listed_are_removed() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("one.zip"), body(11)).unwrap();
    std::fs::write(dir.path().join("gone.zip"), b"stale").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"keep me").unwrap();
    let client = MockClient::new();
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);

    let syncer = Syncer::new(catalog, client, dir.path(), Blacklist::default(), fast_config()).unwrap();
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(result.removed.len(), 1);
    assert!(result.removed[0].ends_with("gone.zip"));
    assert_eq!(zip_names(dir.path()), vec!["one.zip"]);
    assert!(dir.path().join("readme.txt").exists());
}

#[tokio::test]
async fn failed_fetch_leaves_directory_untouched() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("one.zip"), b"anything").unwrap();
    let catalog = StaticCatalog::new(Vec::new());
    let syncer = Syncer::new(catalog.clone(), MockClient::new(), dir.path(), Blacklist::default(), fast_config())
        .unwrap();

    let empty = syncer.run(&CancellationToken::new()).await.unwrap();
    catalog.fail();
    let failed = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(!empty.fetched);
    assert!(!failed.fetched);
    assert!(!failed.is_success());
    assert_eq!(zip_names(dir.path()), vec!["one.zip"]);
    assert!(!dir.path().join("modList.json").exists());
}

#[tokio::test]
async fn blacklist_excludes_mods_and_file_names() {
    let dir = tempdir().unwrap();
    let client = MockClient::new();
    client.route(&download_url(11), body(11)).route(&download_url(31), body(31));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(11, "one.zip"), mod_file(12, "one-nightly.zip")]),
        catalog_mod(2, vec![mod_file(21, "two.zip")]),
        catalog_mod(3, vec![mod_file(31, "three.zip")]),
    ]);
    let blacklist = Blacklist {
        banned_mods: [2].into_iter().collect(),
        banned_filenames: vec!["NIGHTLY".to_string()],
    };

    let syncer = Syncer::new(catalog, client.clone(), dir.path(), blacklist, fast_config()).unwrap();
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(zip_names(dir.path()), vec!["one.zip", "three.zip"]);
    assert_eq!(client.hits(&download_url(12)), 0);
    assert_eq!(client.hits(&download_url(21)), 0);
}

#[tokio::test]
async fn traversal_names_never_leave_the_directory() {
    let parent = tempdir().unwrap();
    let dir = parent.path().join("mods");
    let client = MockClient::new();
    client.route(&download_url(11), body(11)).route(&download_url(21), body(21));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(11, "../escape.zip")]),
        catalog_mod(2, vec![mod_file(21, "..")]),
    ]);

    let syncer = Syncer::new(catalog, client.clone(), &dir, Blacklist::default(), fast_config()).unwrap();
    let result = syncer.run(&CancellationToken::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.synced.len(), 1);
    assert_eq!(zip_names(&dir), vec![".._escape.zip"]);
    assert!(!parent.path().join("escape.zip").exists());
    assert_eq!(client.hits(&download_url(21)), 0);
}

#[tokio::test]
async fn cancelled_run_skips_reconciliation() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("stale.zip"), b"stale").unwrap();
    let catalog = StaticCatalog::new(vec![catalog_mod(1, vec![mod_file(11, "one.zip")])]);
    let syncer = Syncer::new(catalog, MockClient::new(), dir.path(), Blacklist::default(), fast_config()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = syncer.run(&cancel).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(dir.path().join("stale.zip").exists());
}

#[tokio::test]
async fn observer_sees_each_download() {
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, bool)>>);

    impl modsync_sync::SyncObserver for Recorder {
        fn download_finished(&self, _m: &Mod, file: &ModFile, succeeded: bool) {
            self.0.lock().unwrap().push((file.name.clone(), succeeded));
        }
    }

    let dir = tempdir().unwrap();
    let client = MockClient::new();
    client.route(&download_url(11), body(11));
    let catalog = StaticCatalog::new(vec![
        catalog_mod(1, vec![mod_file(11, "one.zip")]),
        catalog_mod(2, vec![mod_file(21, "two.zip")]),
    ]);
    let recorder = Arc::new(Recorder::default());

    let syncer = Syncer::new(catalog, client, dir.path(), Blacklist::default(), fast_config())
        .unwrap()
        .with_observer(recorder.clone());
    syncer.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![("one.zip".to_string(), true), ("two.zip".to_string(), false)]
    );
}
