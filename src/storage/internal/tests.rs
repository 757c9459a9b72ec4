use std::time::Duration;
use assert_fs::TempDir;
use tokio::io::AsyncReadExt;
use mocks::{Failures, MockEntry, StorageWrite, TestStorageIo, FROZEN_CLOCK};
use super::*;


const TEST_LIMIT: u64 = 16;

fn key(s: &str) -> NoteKey {
    s.parse().expect("valid key")
}

async fn make_storage(
    notes_dir: &str,
    io: TestStorageIo,
) -> Result<NoteStorageImpl<TestStorageIo>, StorageError> {
    NoteStorageImpl::new_internal(notes_dir.into(), TEST_LIMIT, io).await
}

async fn read_all(content: NoteContent) -> String {
    let mut reader = content.reader;
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await.expect("read failed");
    buf
}

#[tokio::test]
async fn create_storage_ok() {
    make_storage("/notes", TestStorageIo::new()).await
        .expect("storage creation failed");
}

#[tokio::test]
async fn create_storage_creates_notes_dir() {
    let io = TestStorageIo::new();
    io.insert("/data", MockEntry::Dir);
    let storage = make_storage("/data/notes", io).await
        .expect("storage creation failed");
    assert!(matches!(storage.io.entry("/data/notes"), Some(MockEntry::Dir)));
}

#[tokio::test]
async fn create_storage_data_dir_missing() {
    let err = make_storage("/missing/notes", TestStorageIo::new()).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::DataDirNotInitialized), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn create_storage_not_a_dir() {
    let io = TestStorageIo::new();
    io.insert("/a_file", MockEntry::File { contents: vec![], mtime: FROZEN_CLOCK });
    let err = make_storage("/a_file", io).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::DataDirNotInitialized), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn create_storage_metadata_fail() {
    let io = TestStorageIo::with_failures(Failures { metadata: true, ..Default::default() });
    let err = make_storage("/notes", io).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::Io(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn put_then_get() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let key = key("abc");
    let mtime = storage.put(&key, &mut &b"hello"[..]).await.unwrap();
    assert_eq!(mtime, FROZEN_CLOCK);

    let content = storage.get(&key).await.unwrap();
    assert_eq!(content.size, 5);
    assert_eq!(content.mtime, mtime);
    assert_eq!(read_all(content).await, "hello");
    assert_eq!(storage.stat(&key).await.unwrap(), mtime);
    assert!(storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn put_goes_through_tmp_file() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    storage.put(&key("abc"), &mut &b"hello"[..]).await.unwrap();
    assert_eq!(
        storage.io.events(),
        vec![
            StorageWrite::Write {
                path: "/notes/abc.tmp.tmp1".into(),
                data: b"hello".to_vec(),
            },
            StorageWrite::Rename {
                from: "/notes/abc.tmp.tmp1".into(),
                to: "/notes/abc".into(),
            },
        ],
    );
    assert_eq!(
        storage.io.paths(),
        vec![PathBuf::from("/"), "/notes".into(), "/notes/abc".into()],
    );
}

#[tokio::test]
async fn overwrite_bumps_mtime() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let key = key("abc");
    let first = storage.put(&key, &mut &b"one"[..]).await.unwrap();
    let second = storage.put(&key, &mut &b"two"[..]).await.unwrap();
    assert!(second > first);
    assert_eq!(storage.stat(&key).await.unwrap(), second);
    assert_eq!(read_all(storage.get(&key).await.unwrap()).await, "two");
}

#[tokio::test]
async fn overwrite_bumps_mtime_on_coarse_filesystem() {
    let io = TestStorageIo::with_failures(
        Failures { mtime_granularity: Some(Duration::from_secs(1)), ..Default::default() }
    );
    let storage = make_storage("/notes", io).await.unwrap();
    let key = key("abc");
    storage.put(&key, &mut &b"one"[..]).await.unwrap();
    let second = storage.put(&key, &mut &b"two"[..]).await.unwrap();
    assert_eq!(second, FROZEN_CLOCK + Duration::from_secs(1));

    let bumps = storage.io.events().into_iter()
        .filter(|e| matches!(e, StorageWrite::SetMtime { .. }))
        .count();
    assert_eq!(bumps, 3);
}

#[tokio::test]
async fn too_big_note_leaves_target_untouched() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let key = key("abc");
    storage.put(&key, &mut &b"small"[..]).await.unwrap();

    let big = vec![b'x'; TEST_LIMIT as usize + 1];
    let err = storage.put(&key, &mut &big[..]).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::TooBig), "wrong error type: {err:#?}");
    assert_eq!(read_all(storage.get(&key).await.unwrap()).await, "small");
    assert_eq!(
        storage.io.paths(),
        vec![PathBuf::from("/"), "/notes".into(), "/notes/abc".into()],
    );
}

#[tokio::test]
async fn note_at_limit_is_accepted() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let data = vec![b'x'; TEST_LIMIT as usize];
    storage.put(&key("abc"), &mut &data[..]).await.unwrap();
}

#[tokio::test]
async fn write_error_removes_tmp_file() {
    let io = TestStorageIo::with_failures(Failures { write: true, ..Default::default() });
    let storage = make_storage("/notes", io).await.unwrap();
    let err = storage.put(&key("abc"), &mut &b"hello"[..]).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::Io(_)), "wrong error type: {err:#?}");
    assert!(matches!(
        storage.io.events().last(),
        Some(StorageWrite::Remove { path }) if path == Path::new("/notes/abc.tmp.tmp1"),
    ));
    assert!(!storage.exists(&key("abc")).await.unwrap());
}

#[tokio::test]
async fn rename_error_removes_tmp_file() {
    let io = TestStorageIo::with_failures(Failures { rename: true, ..Default::default() });
    let storage = make_storage("/notes", io).await.unwrap();
    let err = storage.put(&key("abc"), &mut &b"hello"[..]).await
        .expect_err("should fail");
    assert!(matches!(err, StorageError::Io(_)), "wrong error type: {err:#?}");
    assert_eq!(
        storage.io.paths(),
        vec![PathBuf::from("/"), "/notes".into()],
    );
}

#[tokio::test]
async fn missing_note() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let key = key("nope");
    assert!(matches!(storage.stat(&key).await, Err(StorageError::NoteNotFound)));
    assert!(matches!(storage.get(&key).await, Err(StorageError::NoteNotFound)));
    assert!(matches!(storage.delete(&key).await, Err(StorageError::NoteNotFound)));
    assert!(!storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn delete_note() {
    let storage = make_storage("/notes", TestStorageIo::new()).await.unwrap();
    let key = key("abc");
    storage.put(&key, &mut &b"hello"[..]).await.unwrap();
    storage.delete(&key).await.unwrap();
    assert!(matches!(storage.get(&key).await, Err(StorageError::NoteNotFound)));
}

#[tokio::test]
async fn delete_error_is_reported() {
    let io = TestStorageIo::with_failures(Failures { remove: true, ..Default::default() });
    let storage = make_storage("/notes", io).await.unwrap();
    storage.io.insert("/notes/abc", MockEntry::File { contents: vec![], mtime: FROZEN_CLOCK });
    let err = storage.delete(&key("abc")).await.expect_err("should fail");
    assert!(matches!(err, StorageError::Io(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn real_filesystem_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let storage = NoteStorageImpl::new_internal(
        NoteStorage::get_notes_dir(tmp.path()),
        1024,
        ProductionNoteStorageIo::new(),
    ).await.unwrap();
    let key = key("real-key_1");

    let first = storage.put(&key, &mut &b"first"[..]).await.unwrap();
    let second = storage.put(&key, &mut &b"second"[..]).await.unwrap();
    assert!(second > first);

    let content = storage.get(&key).await.unwrap();
    assert_eq!(content.mtime, second);
    assert_eq!(read_all(content).await, "second");

    let leftovers: Vec<_> = std::fs::read_dir(NoteStorage::get_notes_dir(tmp.path()))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("real-key_1")]);

    storage.delete(&key).await.unwrap();
    assert!(!storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn real_filesystem_missing_data_dir() {
    let tmp = TempDir::new().unwrap();
    let err = NoteStorageImpl::new_internal(
        NoteStorage::get_notes_dir(&tmp.path().join("missing")),
        1024,
        ProductionNoteStorageIo::new(),
    ).await.expect_err("should fail");
    assert!(matches!(err, StorageError::DataDirNotInitialized), "wrong error type: {err:#?}");
}
