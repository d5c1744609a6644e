use cms_sync::config::{RunMode, StoreLayout, SyncConfig};
use cms_sync::contract::MockContentApi;
use cms_sync::synchronise::synchronise;
use std::path::Path;
use tempfile::tempdir;

fn test_config(root: &Path) -> SyncConfig {
    SyncConfig {
        mode: RunMode::Development,
        base_url: "http://cms.test".to_string(),
        api_token: "test-token".to_string(),
        layout: StoreLayout {
            data_dir: root.join("data"),
            content_dir: root.join("content"),
            images_dir: root.join("static").join("images"),
        },
    }
}

const ABOUT_SNAPSHOT: &str =
    r#"{"data":{"title":"About Us","image":{"hash":"abc123","ext":".jpg","url":"/img/x.jpg"}}}"#;

#[tokio::test]
async fn test_singleton_with_image_transform_produces_local_media_path() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(|path: &str| {
        if path.starts_with("/about?") {
            Ok(ABOUT_SNAPSHOT.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });
    api.expect_fetch_media()
        .withf(|url: &str| url == "http://cms.test/img/x.jpg")
        .returning(|_| Ok(vec![0xFF, 0xD8, 0xFF]));

    let report = synchronise(&config, &api)
        .await
        .expect("synchronise should complete");

    let about_page = config.layout.content_dir.join("about.md");
    let page = std::fs::read_to_string(&about_page).expect("about.md should exist");
    assert!(
        page.contains("title: \"About Us\""),
        "frontmatter should carry the record title, got:\n{page}"
    );
    assert!(
        page.contains("image: \"/images/abc123.jpg\""),
        "image should resolve to the local media path, got:\n{page}"
    );
    assert!(
        config.layout.images_dir.join("abc123.jpg").exists(),
        "downloaded asset should land in the media store"
    );

    // Only the one successful entry produced a snapshot and a page.
    let about = report
        .entries
        .iter()
        .find(|e| e.key == "about")
        .expect("about entry in report");
    assert!(about.snapshot_written);
    assert_eq!(about.pages_written, 1);
    for entry in report.entries.iter().filter(|e| e.key != "about") {
        assert!(!entry.snapshot_written, "{} should have no snapshot", entry.key);
        assert_eq!(entry.pages_written, 0, "{} should have no pages", entry.key);
    }
}

#[tokio::test]
async fn test_collection_skips_slugless_item_and_renders_siblings() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let allerlei = r#"{
        "data": [
            {"id": 1, "slug": "bag-1", "title": "Bag One", "content": "A bag."},
            {"id": 2, "title": "No slug here"}
        ]
    }"#;

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(move |path: &str| {
        if path.starts_with("/products?filters[type][$eq]=Allerlei") {
            Ok(allerlei.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });

    let report = synchronise(&config, &api)
        .await
        .expect("synchronise should complete");

    let dir = config.layout.content_dir.join("allerlei");
    assert!(dir.join("_index.md").exists(), "index page should exist");
    assert!(dir.join("bag-1.md").exists(), "slugged detail page should exist");

    let pages: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(pages.len(), 2, "exactly index + one detail page: {pages:?}");

    let entry = report
        .entries
        .iter()
        .find(|e| e.key == "allerlei")
        .expect("allerlei entry in report");
    assert_eq!(entry.pages_written, 2);
    assert_eq!(entry.items_skipped, 1);

    let detail = std::fs::read_to_string(dir.join("bag-1.md")).unwrap();
    assert!(detail.contains("title: \"Bag One\""));
    assert!(detail.ends_with("A bag.\n"), "body should follow frontmatter");
}

#[tokio::test]
async fn test_empty_or_non_string_slug_is_skipped_like_a_missing_one() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let allerlei = r#"{
        "data": [
            {"id": 1, "slug": "bag-1", "title": "Bag One", "content": "A bag."},
            {"id": 7, "slug": "", "title": "Empty slug"},
            {"id": 8, "slug": 12, "title": "Numeric slug"}
        ]
    }"#;

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(move |path: &str| {
        if path.starts_with("/products?filters[type][$eq]=Allerlei") {
            Ok(allerlei.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });

    let report = synchronise(&config, &api)
        .await
        .expect("synchronise should complete");

    let dir = config.layout.content_dir.join("allerlei");
    assert!(dir.join("bag-1.md").exists());
    assert!(
        !dir.join(".md").exists(),
        "an empty slug must not produce a hidden page file"
    );

    let pages: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(
        pages.len(),
        2,
        "exactly index + the one usable detail page: {pages:?}"
    );

    let entry = report
        .entries
        .iter()
        .find(|e| e.key == "allerlei")
        .expect("allerlei entry in report");
    assert_eq!(entry.pages_written, 2);
    assert_eq!(entry.items_skipped, 2, "empty and numeric slugs both skip");
}

#[tokio::test]
async fn test_failed_media_download_falls_back_to_remote_url() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(|path: &str| {
        if path.starts_with("/about?") {
            Ok(ABOUT_SNAPSHOT.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });
    api.expect_fetch_media()
        .returning(|_| Err("HTTP error! Status: 500 Internal Server Error".into()));

    synchronise(&config, &api)
        .await
        .expect("synchronise should complete despite media failure");

    let page = std::fs::read_to_string(config.layout.content_dir.join("about.md")).unwrap();
    assert!(
        page.contains("image: \"http://cms.test/img/x.jpg\""),
        "failed download should degrade to the remote URL, got:\n{page}"
    );
    assert!(
        !config.layout.images_dir.join("abc123.jpg").exists(),
        "no partial file may remain after a failed download"
    );
}

#[tokio::test]
async fn test_refetch_is_idempotent_and_snapshots_are_byte_identical() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(|path: &str| {
        if path.starts_with("/imprint?") {
            Ok(r#"{"data":{"title":"Imprint","publishedAt":"2024-01-02T03:04:05.000Z"}}"#.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });

    synchronise(&config, &api).await.expect("first run");
    let snapshot_path = config.layout.data_dir.join("imprint.json");
    let first = std::fs::read(&snapshot_path).expect("snapshot after first run");

    synchronise(&config, &api).await.expect("second run");
    let second = std::fs::read(&snapshot_path).expect("snapshot after second run");

    assert_eq!(first, second, "identical remote data must give byte-identical snapshots");

    let files: Vec<_> = std::fs::read_dir(&config.layout.data_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["imprint.json"], "store holds exactly the fetched entries");
}

#[tokio::test]
async fn test_stale_snapshots_are_cleared_before_fetching() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    // A snapshot from a since-renamed entry must not survive the run.
    std::fs::create_dir_all(&config.layout.data_dir).unwrap();
    std::fs::write(config.layout.data_dir.join("stale.json"), b"{}").unwrap();

    let mut api = MockContentApi::new();
    api.expect_fetch_json()
        .returning(|_| Err("HTTP error! Status: 503 Service Unavailable".into()));

    let report = synchronise(&config, &api)
        .await
        .expect("synchronise completes even when every fetch fails");

    assert!(
        !config.layout.data_dir.join("stale.json").exists(),
        "stale snapshot must be cleared"
    );
    assert!(
        report.entries.iter().all(|e| !e.snapshot_written),
        "no entry should report a snapshot"
    );
}

#[tokio::test]
async fn test_fetch_failure_for_one_entry_does_not_block_others() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(|path: &str| {
        if path.starts_with("/privacy?") {
            Ok(r#"{"data":{"title":"Privacy","content":"Policy text."}}"#.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });

    let report = synchronise(&config, &api)
        .await
        .expect("synchronise should complete");

    assert!(config.layout.content_dir.join("privacy.md").exists());
    assert!(!config.layout.content_dir.join("about.md").exists());

    let privacy = report.entries.iter().find(|e| e.key == "privacy").unwrap();
    assert_eq!(privacy.pages_written, 1);
}

#[tokio::test]
async fn test_landing_singleton_uses_configured_output_file_name() {
    let root = tempdir().unwrap();
    let config = test_config(root.path());

    let mut api = MockContentApi::new();
    api.expect_fetch_json().returning(|path: &str| {
        if path.starts_with("/landing?") {
            Ok(r#"{"data":{"title":"Welcome","content":"Hello."}}"#.to_string())
        } else {
            Err("HTTP error! Status: 404 Not Found".into())
        }
    });

    synchronise(&config, &api)
        .await
        .expect("synchronise should complete");

    assert!(
        config.layout.content_dir.join("_index.md").exists(),
        "landing must render to its configured file name"
    );
    assert!(!config.layout.content_dir.join("landing.md").exists());
}
