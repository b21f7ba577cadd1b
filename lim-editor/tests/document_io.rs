use lim_editor::{Document, DocumentError};
use std::fs;
use tempfile::TempDir;

#[test]
fn open_edit_save_round_trip() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("notes.txt");
    fs::write(&p, "draft  \n").unwrap();

    let mut doc = Document::open(&p).unwrap();
    assert_eq!(doc.title(), "Lim - notes.txt");
    assert_eq!(doc.text(), "draft  \n");
    assert!(!doc.is_dirty());

    doc.append_block("more");
    assert!(doc.is_dirty());
    doc.save().unwrap();
    assert!(!doc.is_dirty());

    // written exactly as held, no trimming
    assert_eq!(fs::read_to_string(&p).unwrap(), "draft  \nmore");
}

#[test]
fn save_as_binds_new_path_and_title() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("fresh.txt");

    let mut doc = Document::new();
    doc.set_text("hello");
    doc.save_as(&p).unwrap();

    assert_eq!(doc.path(), Some(p.as_path()));
    assert_eq!(doc.title(), "Lim - fresh.txt");
    assert_eq!(fs::read_to_string(&p).unwrap(), "hello");

    doc.set_text("hello again");
    doc.save().unwrap();
    assert_eq!(fs::read_to_string(&p).unwrap(), "hello again");
}

#[test]
fn save_overwrites_existing_file() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("over.txt");
    fs::write(&p, "a much longer original body").unwrap();

    let mut doc = Document::new();
    doc.set_text("short");
    doc.save_as(&p).unwrap();
    assert_eq!(fs::read_to_string(&p).unwrap(), "short");
}

#[test]
fn open_missing_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("absent.txt");
    match Document::open(&p) {
        Err(DocumentError::Io { path, .. }) => assert_eq!(path, p),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn save_into_missing_directory_fails_and_stays_dirty() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("no-such-dir").join("x.txt");

    let mut doc = Document::new();
    doc.set_text("x");
    assert!(doc.save_as(&p).is_err());
    assert!(doc.is_dirty());
    assert!(doc.path().is_none());
}
