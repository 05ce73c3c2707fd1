//! Upload, move, and delete of files against both object store providers.

mod helpers;

use std::sync::Arc;

use bytes::Bytes;

use dossier::{AppConfig, Dossier, ErrorKind, RequestContext};
use dossier_core::traits::object_store::ObjectStore;
use dossier_service::CreateFolderRequest;
use dossier_storage::providers::LocalObjectStore;
use dossier_store::{MemoryNamespaceStore, NamespaceStore};

use helpers::TestApp;

#[tokio::test]
async fn test_upload_then_delete_round_trip() {
    let app = TestApp::new();
    app.mkdir(None, "Photos").await;

    let file = app.upload(Some("Photos"), "Façade nord.JPG").await;
    assert_eq!(file.media_type, "jpg");
    assert!(file.storage_key.starts_with("files/Photos/"));
    assert!(file.storage_key.ends_with("_Fa_ade_nord.JPG"));
    assert!(app.objects.exists(&file.storage_key).await.unwrap());

    app.dossier.files.delete_file(&app.ctx, file.id).await.unwrap();
    assert!(!app.objects.exists(&file.storage_key).await.unwrap());
    let err = app.dossier.files.get_file(file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_object_delete_failure_aborts_record_delete() {
    let app = TestApp::new();
    let file = app.upload(None, "keep.txt").await;

    app.objects.fail_deletes(true);
    let err = app
        .dossier
        .files
        .delete_file(&app.ctx, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Storage);
    assert_eq!(app.dossier.files.get_file(file.id).await.unwrap(), file);

    app.objects.fail_deletes(false);
    app.dossier.files.delete_file(&app.ctx, file.id).await.unwrap();
}

#[tokio::test]
async fn test_failed_record_insert_leaves_no_object() {
    let app = TestApp::new();
    app.store.fail_writes_after(0);

    let err = app
        .dossier
        .uploads
        .upload(&app.ctx, None, "lost.txt", Bytes::from("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_moved_file_follows_later_renames() {
    let app = TestApp::new();
    app.mkdir_p("A/B").await;
    let file = app.upload(None, "loose.txt").await;

    let moved = app
        .dossier
        .files
        .move_file(&app.ctx, file.id, Some("A/B"))
        .await
        .unwrap();
    assert_eq!(moved.container_path, "A/B");

    let a = app.folder("A").await;
    app.dossier
        .folders
        .rename_folder(&app.ctx, a.id, "Z")
        .await
        .unwrap();
    assert_eq!(
        app.dossier.files.get_file(file.id).await.unwrap().container_path,
        "Z/B"
    );
}

#[tokio::test]
async fn test_move_to_missing_folder_is_rejected() {
    let app = TestApp::new();
    let file = app.upload(None, "a.txt").await;

    let err = app
        .dossier
        .files
        .move_file(&app.ctx, file.id, Some("Nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_local_object_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let objects = LocalObjectStore::new(dir.path().to_str().unwrap())
        .await
        .unwrap();
    let store = MemoryNamespaceStore::new();
    let dossier = Dossier::with_stores(
        AppConfig::default(),
        Arc::new(store.clone()),
        Arc::new(objects.clone()),
    );
    let ctx = RequestContext::new("local-user");

    dossier
        .folders
        .create_folder(&ctx, CreateFolderRequest::new(None, "Plans"))
        .await
        .unwrap();
    let file = dossier
        .uploads
        .upload(&ctx, Some("Plans"), "rdc.dwg", Bytes::from_static(b"DWG"))
        .await
        .unwrap();
    assert!(file.url.starts_with("file://"));
    let on_disk = dir.path().join(&file.storage_key);
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"DWG");

    dossier.files.delete_file(&ctx, file.id).await.unwrap();
    assert!(!on_disk.exists());
    assert!(store.list_all_files().await.unwrap().is_empty());
}
