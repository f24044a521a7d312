use super::allocator::IdAllocator;
use super::backend::StorageBackend;
use crate::error::{HeirloomError, Result};
use crate::model::{Heirloom, HeirloomId};
use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// The record store: sole authority over one records root.
///
/// Every operation that targets a single id runs under that id's advisory
/// lock, so an existence check and the mutation that depends on it cannot
/// interleave with another operation on the same record.
pub struct HeirloomStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    allocator: IdAllocator,
    locks: Mutex<HashMap<HeirloomId, Arc<Mutex<()>>>>,
}

impl<B: StorageBackend> HeirloomStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::new(backend, IdAllocator::default())
    }

    pub fn new(backend: B, allocator: IdAllocator) -> Self {
        Self {
            backend,
            allocator,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Allocate a fresh id and persist both artifacts under it.
    ///
    /// If either write fails the half-written location is removed before the
    /// error is returned.
    pub fn create(&self, description: &str, image: &[u8]) -> Result<HeirloomId> {
        let id = self
            .allocator
            .allocate(|candidate| self.backend.reserve(candidate))?;

        self.with_lock(&id, || {
            let written = self
                .backend
                .write_description(&id, description)
                .and_then(|_| self.backend.write_image(&id, image));
            if let Err(err) = written {
                warn!("creating heirloom {} failed, rolling back: {}", id, err);
                if let Err(discard_err) = self.backend.discard(&id) {
                    warn!("rollback of heirloom {} failed: {}", id, discard_err);
                }
                return Err(err);
            }
            Ok(())
        })?;

        info!("created heirloom {}", id);
        Ok(id)
    }

    pub fn read(&self, id: &HeirloomId) -> Result<Heirloom> {
        self.with_lock(id, || {
            self.ensure_exists(id)?;
            let description = self
                .backend
                .read_description(id)?
                .ok_or_else(|| HeirloomError::NotFound(id.clone()))?;
            let image = self
                .backend
                .read_image(id)?
                .ok_or_else(|| HeirloomError::NotFound(id.clone()))?;
            Ok(Heirloom {
                id: id.clone(),
                description,
                image,
            })
        })
    }

    /// Read only the description, without loading the image.
    pub fn description(&self, id: &HeirloomId) -> Result<String> {
        self.with_lock(id, || {
            self.ensure_exists(id)?;
            self.backend
                .read_description(id)?
                .ok_or_else(|| HeirloomError::NotFound(id.clone()))
        })
    }

    /// Read only the image.
    pub fn image(&self, id: &HeirloomId) -> Result<Vec<u8>> {
        self.with_lock(id, || {
            self.ensure_exists(id)?;
            self.backend
                .read_image(id)?
                .ok_or_else(|| HeirloomError::NotFound(id.clone()))
        })
    }

    /// Overwrite the description, and the image when `image` holds data.
    /// An absent or empty image keeps the stored one.
    pub fn update(&self, id: &HeirloomId, description: &str, image: Option<&[u8]>) -> Result<()> {
        self.with_lock(id, || {
            self.ensure_exists(id)?;
            self.backend.write_description(id, description)?;
            if let Some(image) = image.filter(|img| !img.is_empty()) {
                self.backend.write_image(id, image)?;
            }
            Ok(())
        })?;

        info!("updated heirloom {}", id);
        Ok(())
    }

    pub fn delete(&self, id: &HeirloomId) -> Result<()> {
        self.with_lock(id, || {
            self.ensure_exists(id)?;
            self.backend.remove(id)
        })?;

        info!("deleted heirloom {}", id);
        Ok(())
    }

    pub fn exists(&self, id: &HeirloomId) -> bool {
        self.backend.record_exists(id)
    }

    /// All current ids, sorted lexicographically.
    pub fn list(&self) -> Result<Vec<HeirloomId>> {
        let mut ids = self.backend.list_ids()?;
        ids.sort();
        Ok(ids)
    }

    pub fn image_path(&self, id: &HeirloomId) -> Result<PathBuf> {
        self.ensure_exists(id)?;
        Ok(self.backend.image_path(id))
    }

    pub fn modified_at(&self, id: &HeirloomId) -> Result<Option<DateTime<Utc>>> {
        self.backend.modified_at(id)
    }

    fn ensure_exists(&self, id: &HeirloomId) -> Result<()> {
        if self.backend.record_exists(id) {
            Ok(())
        } else {
            Err(HeirloomError::NotFound(id.clone()))
        }
    }

    fn with_lock<T, F>(&self, id: &HeirloomId, op: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let result = {
            let _guard = lock.lock();
            op()
        };

        // Every clone is taken and released under the map guard, so a count
        // of one means nobody else holds or waits on this id.
        let mut locks = self.locks.lock();
        drop(lock);
        if locks.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(id);
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn held_locks(&self) -> usize {
        self.locks.lock().len()
    }
}
