use crate::error::Result;
use crate::model::HeirloomId;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Abstract interface for raw record I/O under one records root.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `HeirloomStore` handles the "what" (allocation, locking, lifecycle).
pub trait StorageBackend: Send + Sync {
    // --- Namespace ---

    /// Atomically claim the storage location for `id`.
    /// Returns Ok(false) if something already occupies it.
    fn reserve(&self, id: &HeirloomId) -> Result<bool>;

    /// Remove a location claimed by `reserve`, whatever it contains.
    /// Used to roll back a failed creation.
    fn discard(&self, id: &HeirloomId) -> Result<()>;

    /// True when the location exists and holds both artifacts.
    fn record_exists(&self, id: &HeirloomId) -> bool;

    /// All ids whose location holds both artifacts, in no particular order.
    fn list_ids(&self) -> Result<Vec<HeirloomId>>;

    /// Remove a record's location recursively.
    fn remove(&self, id: &HeirloomId) -> Result<()>;

    // --- Artifacts ---

    /// Returns Ok(None) if the artifact does not exist.
    fn read_description(&self, id: &HeirloomId) -> Result<Option<String>>;

    /// Returns Ok(None) if the artifact does not exist.
    fn read_image(&self, id: &HeirloomId) -> Result<Option<Vec<u8>>>;

    /// Overwrite the description of an existing location.
    /// MUST be atomic (e.g. write to tmp then rename) and MUST NOT create
    /// the location if it is gone.
    fn write_description(&self, id: &HeirloomId, description: &str) -> Result<()>;

    /// Overwrite the image of an existing location. Same rules as
    /// `write_description`.
    fn write_image(&self, id: &HeirloomId, image: &[u8]) -> Result<()>;

    // --- Metadata ---

    /// Most recent artifact modification time.
    fn modified_at(&self, id: &HeirloomId) -> Result<Option<DateTime<Utc>>>;

    /// Where the image artifact lives. For MemBackend, a virtual path.
    fn image_path(&self, id: &HeirloomId) -> PathBuf;
}
