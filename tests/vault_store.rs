use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;
use totion::{save_note, CreateOutcome, NoteStore, VaultError, VaultStore};

fn vault() -> (TempDir, VaultStore) {
    let tmp = TempDir::new().unwrap();
    let store = VaultStore::open(tmp.path().join(".vault")).unwrap();
    (tmp, store)
}

fn listed_names(store: &VaultStore) -> BTreeSet<String> {
    store
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect()
}

#[test]
fn open_creates_missing_vault_with_parents() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("a/b/.vault");
    let store = VaultStore::open(&dir).unwrap();
    assert!(store.dir().is_dir());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }
}

#[test]
fn open_fails_when_path_is_a_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("not-a-dir");
    fs::write(&path, "x").unwrap();
    let err = VaultStore::open(&path).unwrap_err();
    assert!(matches!(err, VaultError::VaultUnavailable { .. }));
}

#[test]
fn listing_skips_directories_and_is_sorted() {
    let (_tmp, store) = vault();
    fs::write(store.dir().join("b.md"), "b").unwrap();
    fs::write(store.dir().join("a.md"), "a").unwrap();
    fs::create_dir(store.dir().join("sub")).unwrap();

    let names: Vec<String> = store.list_notes().unwrap().into_iter().map(|n| n.name).collect();
    assert_eq!(names, vec!["a.md".to_string(), "b.md".to_string()]);
}

#[test]
fn listing_a_removed_vault_is_unavailable() {
    let (_tmp, store) = vault();
    fs::remove_dir(store.dir()).unwrap();
    assert!(matches!(
        store.list_notes(),
        Err(VaultError::VaultUnavailable { .. })
    ));
}

#[test]
fn create_appends_extension_and_refuses_overwrite() {
    let (_tmp, store) = vault();
    match store.create_note("ideas").unwrap() {
        CreateOutcome::Created(handle) => {
            assert_eq!(handle.path(), store.dir().join("ideas.md"));
            save_note(handle, "original").map_err(|(_, e)| e).unwrap();
        }
        CreateOutcome::AlreadyExists => panic!("fresh vault should not collide"),
    }

    assert!(matches!(
        store.create_note("ideas").unwrap(),
        CreateOutcome::AlreadyExists
    ));
    assert_eq!(
        fs::read_to_string(store.dir().join("ideas.md")).unwrap(),
        "original"
    );
}

#[test]
fn create_rejects_names_that_leave_the_vault() {
    let (_tmp, store) = vault();
    assert!(matches!(
        store.create_note("../outside"),
        Err(VaultError::InvalidName(_))
    ));
    assert!(matches!(
        store.create_note("nested/name"),
        Err(VaultError::InvalidName(_))
    ));
}

#[test]
fn save_overwrites_shorter_content_completely() {
    let (_tmp, store) = vault();
    fs::write(store.dir().join("long.md"), "a much longer original body").unwrap();

    let (handle, content) = store.open_note("long.md").unwrap();
    assert_eq!(content, "a much longer original body");
    save_note(handle, "short").map_err(|(_, e)| e).unwrap();

    assert_eq!(
        fs::read_to_string(store.dir().join("long.md")).unwrap(),
        "short"
    );
}

#[test]
fn open_missing_note_is_read_failure() {
    let (_tmp, store) = vault();
    assert!(matches!(
        store.open_note("ghost.md"),
        Err(VaultError::NoteReadFailed { .. })
    ));
}

#[test]
fn open_non_utf8_note_is_read_failure() {
    let (_tmp, store) = vault();
    fs::write(store.dir().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();
    assert!(matches!(
        store.open_note("bin.md"),
        Err(VaultError::NoteReadFailed { .. })
    ));
}

#[test]
fn delete_removes_exactly_one() {
    let (_tmp, store) = vault();
    fs::write(store.dir().join("n.md"), "n").unwrap();
    fs::write(store.dir().join("m.md"), "keep").unwrap();

    store.delete_note("n.md").unwrap();

    assert_eq!(listed_names(&store), BTreeSet::from(["m.md".to_string()]));
    assert_eq!(fs::read_to_string(store.dir().join("m.md")).unwrap(), "keep");
}

#[test]
fn delete_missing_note_fails() {
    let (_tmp, store) = vault();
    assert!(matches!(
        store.delete_note("gone.md"),
        Err(VaultError::DeleteFailed { .. })
    ));
}

#[cfg(target_os = "linux")]
#[test]
fn listing_skips_names_that_are_not_utf8() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (_tmp, store) = vault();
    fs::write(store.dir().join(OsStr::from_bytes(b"caf\xe9.md")), "x").unwrap();
    fs::write(store.dir().join("plain.md"), "y").unwrap();

    assert_eq!(listed_names(&store), BTreeSet::from(["plain.md".to_string()]));
}

#[cfg(unix)]
#[test]
fn listed_backslash_names_can_be_opened_and_deleted() {
    let (_tmp, store) = vault();
    fs::write(store.dir().join("a\\b.md"), "slashy").unwrap();

    assert_eq!(listed_names(&store), BTreeSet::from(["a\\b.md".to_string()]));
    let (handle, content) = store.open_note("a\\b.md").unwrap();
    assert_eq!(content, "slashy");
    drop(handle);
    store.delete_note("a\\b.md").unwrap();
    assert!(listed_names(&store).is_empty());
}
