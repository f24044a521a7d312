use heirlooms::error::HeirloomError;
use heirlooms::model::HeirloomId;
use chrono::{DateTime, Utc};
use heirlooms::error::Result;
use heirlooms::store::allocator::IdAllocator;
use heirlooms::store::backend::StorageBackend;
use heirlooms::store::fs_backend::FsBackend;
use heirlooms::store::heirloom_store::HeirloomStore;
use heirlooms::store::FileStore;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn setup() -> (TempDir, FileStore) {
    let root = TempDir::new().unwrap();
    let store = HeirloomStore::with_backend(FsBackend::new(root.path().to_path_buf()));
    (root, store)
}

fn entries(root: &TempDir) -> usize {
    fs::read_dir(root.path()).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_full_lifecycle() {
    let (root, store) = setup();

    let id = store.create("grandmother's ring", b"PNG-bytes-A").unwrap();
    let n: u64 = id.as_str().parse().unwrap();
    assert!((10_000_000_000..=100_000_000_000).contains(&n));
    let h = store.read(&id).unwrap();
    assert_eq!(h.description, "grandmother's ring");
    assert_eq!(h.image, b"PNG-bytes-A");

    store.update(&id, "grandmother's ring, 1952", None).unwrap();
    let h = store.read(&id).unwrap();
    assert_eq!(h.description, "grandmother's ring, 1952");
    assert_eq!(h.image, b"PNG-bytes-A");

    store
        .update(&id, "grandmother's ring, 1952", Some(b"PNG-bytes-B".as_slice()))
        .unwrap();
    assert_eq!(store.read(&id).unwrap().image, b"PNG-bytes-B");

    store.delete(&id).unwrap();
    assert!(matches!(store.read(&id), Err(HeirloomError::NotFound(_))));
    assert!(!store.exists(&id));
    assert_eq!(entries(&root), 0);
}

#[test]
fn test_missing_id_mutations_touch_nothing() {
    let (root, store) = setup();
    let kept = store.create("quilt", b"q").unwrap();
    let missing: HeirloomId = "999999999999".parse().unwrap();

    assert!(matches!(
        store.update(&missing, "x", None),
        Err(HeirloomError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(&missing),
        Err(HeirloomError::NotFound(_))
    ));

    assert!(!root.path().join("999999999999").exists());
    assert_eq!(entries(&root), 1);
    assert_eq!(store.list().unwrap(), vec![kept]);
}

#[test]
fn test_exists_is_false_for_unknown_ids() {
    let (_root, store) = setup();
    assert!(!store.exists(&"4821093552".parse().unwrap()));
}

#[test]
fn test_list_is_sorted() {
    let root = TempDir::new().unwrap();
    let store = HeirloomStore::new(
        FsBackend::new(root.path().to_path_buf()),
        IdAllocator::new(1, 1000, 1000).unwrap(),
    );
    for i in 0..8 {
        store.create(&format!("item {}", i), b"img").unwrap();
    }
    let ids = store.list().unwrap();
    assert_eq!(ids.len(), 8);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_failed_create_leaves_nothing_behind() {
    let root = TempDir::new().unwrap();
    let records = root.path().join("records");
    // A file where the records root should be makes every reservation fail.
    fs::write(&records, "in the way").unwrap();
    let store = HeirloomStore::with_backend(FsBackend::new(records.clone()));

    let err = store.create("ring", b"PNG").unwrap_err();
    assert!(matches!(err, HeirloomError::StorageWrite { .. }));
    assert_eq!(fs::read_to_string(&records).unwrap(), "in the way");
}

/// Puts a non-empty directory where the image goes, so the real image
/// write fails on rename after the description is already on disk.
struct BlockedImage(FsBackend);

impl StorageBackend for BlockedImage {
    fn reserve(&self, id: &HeirloomId) -> Result<bool> {
        self.0.reserve(id)
    }
    fn discard(&self, id: &HeirloomId) -> Result<()> {
        self.0.discard(id)
    }
    fn record_exists(&self, id: &HeirloomId) -> bool {
        self.0.record_exists(id)
    }
    fn list_ids(&self) -> Result<Vec<HeirloomId>> {
        self.0.list_ids()
    }
    fn remove(&self, id: &HeirloomId) -> Result<()> {
        self.0.remove(id)
    }
    fn read_description(&self, id: &HeirloomId) -> Result<Option<String>> {
        self.0.read_description(id)
    }
    fn read_image(&self, id: &HeirloomId) -> Result<Option<Vec<u8>>> {
        self.0.read_image(id)
    }
    fn write_description(&self, id: &HeirloomId, description: &str) -> Result<()> {
        self.0.write_description(id, description)
    }
    fn write_image(&self, id: &HeirloomId, image: &[u8]) -> Result<()> {
        let blocker = self.0.image_path(id);
        fs::create_dir_all(blocker.join("in-the-way")).unwrap();
        self.0.write_image(id, image)
    }
    fn modified_at(&self, id: &HeirloomId) -> Result<Option<DateTime<Utc>>> {
        self.0.modified_at(id)
    }
    fn image_path(&self, id: &HeirloomId) -> PathBuf {
        self.0.image_path(id)
    }
}

#[test]
fn test_failed_image_write_removes_half_written_directory() {
    let root = TempDir::new().unwrap();
    let store = HeirloomStore::new(
        BlockedImage(FsBackend::new(root.path().to_path_buf())),
        IdAllocator::new(7, 7, 1).unwrap(),
    );

    let err = store.create("grandmother's ring", b"PNG-A").unwrap_err();
    assert!(matches!(err, HeirloomError::StorageWrite { .. }));
    assert!(!root.path().join("7").exists());
    assert_eq!(entries(&root), 0);
    assert!(store.list().unwrap().is_empty());

    // The id is free again
    let id: HeirloomId = "7".parse().unwrap();
    assert!(!store.exists(&id));
    assert!(store.backend().0.reserve(&id).unwrap());
}

#[test]
fn test_exhausted_space_is_reported() {
    let root = TempDir::new().unwrap();
    let store = HeirloomStore::new(
        FsBackend::new(root.path().to_path_buf()),
        IdAllocator::new(1, 2, 40).unwrap(),
    );
    store.create("a", b"a").unwrap();
    store.create("b", b"b").unwrap();

    let err = store.create("c", b"c").unwrap_err();
    assert!(matches!(
        err,
        HeirloomError::AllocationExhausted { attempts: 40 }
    ));
    assert_eq!(entries(&root), 2);
}

#[test]
fn test_concurrent_creates_never_share_an_id() {
    let root = TempDir::new().unwrap();
    // 64 slots, 32 records: plenty of collisions, never a shared id.
    let store = Arc::new(HeirloomStore::new(
        FsBackend::new(root.path().to_path_buf()),
        IdAllocator::new(1, 64, 10_000).unwrap(),
    ));

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..2)
                    .map(|i| {
                        let desc = format!("thread {} item {}", t, i);
                        let id = store.create(&desc, desc.as_bytes()).unwrap();
                        (id, desc)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let created: Vec<(HeirloomId, String)> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let unique: HashSet<_> = created.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(unique.len(), 32);
    assert_eq!(store.list().unwrap().len(), 32);

    // Nobody clobbered anybody
    for (id, desc) in &created {
        let h = store.read(id).unwrap();
        assert_eq!(&h.description, desc);
        assert_eq!(h.image, desc.as_bytes());
    }
}

#[test]
fn test_concurrent_update_and_delete_never_resurrect() {
    let (root, store) = setup();
    let store = Arc::new(store);
    let id = store.create("ring", b"PNG-A").unwrap();

    let updater = {
        let store = Arc::clone(&store);
        let id = id.clone();
        thread::spawn(move || {
            for i in 0..200 {
                match store.update(&id, &format!("rev {}", i), Some(b"PNG-B".as_slice())) {
                    Ok(()) | Err(HeirloomError::NotFound(_)) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        })
    };
    let deleter = {
        let store = Arc::clone(&store);
        let id = id.clone();
        thread::spawn(move || store.delete(&id))
    };

    updater.join().unwrap();
    deleter.join().unwrap().unwrap();

    assert!(!store.exists(&id));
    assert!(!root.path().join(id.as_str()).exists());
}
