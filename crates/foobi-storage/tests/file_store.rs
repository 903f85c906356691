//! File-backed persistence tests.

use std::sync::Arc;

use foobi_models::{Concept, Draft, SavedProgress, Scene, WizardScreen, WizardStep};
use foobi_storage::{FileStore, KeyValueStore, ProgressRepository, DEFAULT_PROGRESS_KEY};
use tokio_test::{assert_err, assert_ok};

fn concept() -> Concept {
    Concept {
        id: 2,
        title: "ストーリーテリング".to_string(),
        description: "物語性を重視した構成".to_string(),
        script: "script".to_string(),
        bgm: "シネマティック・オーケストラ".to_string(),
        scenes: vec![
            Scene::new(1, "導入シーン", "", 0, 7, ""),
            Scene::new(2, "展開", "", 7, 30, ""),
        ],
        media_files: Vec::new(),
    }
}

#[tokio::test]
async fn test_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut draft = Draft::new();
    draft.video_title = "新商品の魅力を伝える動画".to_string();
    draft.concepts = vec![concept()];
    let progress = SavedProgress {
        state: WizardScreen::ConceptEdit,
        step: WizardStep::Concept,
        draft,
        edited_concept: Some(concept()),
    };

    {
        let store = FileStore::open(dir.path()).await.unwrap();
        let repo = ProgressRepository::with_default_key(Arc::new(store));
        assert_ok!(repo.save(&progress).await);
    }

    let store = FileStore::open(dir.path()).await.unwrap();
    assert!(dir.path().join("foobi_progress.json").exists());
    let repo = ProgressRepository::with_default_key(Arc::new(store));
    assert_eq!(repo.load().await, Some(progress));
}

#[tokio::test]
async fn test_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let repo = ProgressRepository::with_default_key(store.clone());

    let mut first = SavedProgress {
        state: WizardScreen::VideoDetails,
        step: WizardStep::Details,
        draft: Draft::new(),
        edited_concept: None,
    };
    assert_ok!(repo.save(&first).await);

    first.state = WizardScreen::Concepts;
    first.step = WizardStep::Concept;
    assert_ok!(repo.save(&first).await);

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded.state, WizardScreen::Concepts);
    assert!(!dir.path().join("foobi_progress.json.tmp").exists());
}

#[tokio::test]
async fn test_truncated_file_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    store
        .put(DEFAULT_PROGRESS_KEY, "{\"state\":\"concepts\",\"step\":")
        .await
        .unwrap();

    let repo = ProgressRepository::with_default_key(store);
    assert!(repo.load().await.is_none());
    assert!(!dir.path().join("foobi_progress.json").exists());
}

#[tokio::test]
async fn test_open_fails_when_path_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "x").unwrap();

    assert_err!(FileStore::open(&blocker).await);
    assert_ok!(FileStore::open(dir.path().join("nested/store")).await);
}
