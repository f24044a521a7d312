use super::backend::StorageBackend;
use crate::error::{HeirloomError, Result};
use crate::model::HeirloomId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Default)]
struct MemRecord {
    description: Option<String>,
    image: Option<Vec<u8>>,
    mtime: Option<DateTime<Utc>>,
}

impl MemRecord {
    fn is_complete(&self) -> bool {
        self.description.is_some() && self.image.is_some()
    }
}

/// In-memory storage backend for testing.
///
/// A reserved id is an entry with no artifacts yet, mirroring an empty
/// record directory on disk.
#[derive(Default)]
pub struct MemBackend {
    records: Mutex<HashMap<HeirloomId, MemRecord>>,
    simulate_write_error: AtomicBool,
    simulate_image_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every artifact write fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make only image writes fail, so a creation dies between its two writes.
    pub fn set_simulate_image_write_error(&self, simulate: bool) {
        self.simulate_image_write_error
            .store(simulate, Ordering::SeqCst);
    }

    /// Number of occupied locations, complete or not.
    pub fn location_count(&self) -> usize {
        self.records.lock().len()
    }

    fn virtual_path(id: &HeirloomId, artifact: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}/{}", id, artifact))
    }

    fn simulated_error(id: &HeirloomId, artifact: &str) -> HeirloomError {
        HeirloomError::write(
            Self::virtual_path(id, artifact),
            io::Error::other("simulated write error"),
        )
    }

    fn write_with<F>(&self, id: &HeirloomId, artifact: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut MemRecord),
    {
        let mut records = self.records.lock();
        let record = records.get_mut(id).ok_or_else(|| {
            HeirloomError::write(
                Self::virtual_path(id, artifact),
                io::Error::from(io::ErrorKind::NotFound),
            )
        })?;
        apply(record);
        record.mtime = Some(Utc::now());
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn reserve(&self, id: &HeirloomId) -> Result<bool> {
        let mut records = self.records.lock();
        if records.contains_key(id) {
            return Ok(false);
        }
        records.insert(id.clone(), MemRecord::default());
        Ok(true)
    }

    fn discard(&self, id: &HeirloomId) -> Result<()> {
        self.records.lock().remove(id);
        Ok(())
    }

    fn record_exists(&self, id: &HeirloomId) -> bool {
        self.records
            .lock()
            .get(id)
            .is_some_and(MemRecord::is_complete)
    }

    fn list_ids(&self) -> Result<Vec<HeirloomId>> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|(_, r)| r.is_complete())
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn remove(&self, id: &HeirloomId) -> Result<()> {
        if self.records.lock().remove(id).is_none() {
            return Err(HeirloomError::write(
                Self::virtual_path(id, ""),
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }
        Ok(())
    }

    fn read_description(&self, id: &HeirloomId) -> Result<Option<String>> {
        Ok(self
            .records
            .lock()
            .get(id)
            .and_then(|r| r.description.clone()))
    }

    fn read_image(&self, id: &HeirloomId) -> Result<Option<Vec<u8>>> {
        Ok(self.records.lock().get(id).and_then(|r| r.image.clone()))
    }

    fn write_description(&self, id: &HeirloomId, description: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(Self::simulated_error(id, "description"));
        }
        self.write_with(id, "description", |r| {
            r.description = Some(description.to_string())
        })
    }

    fn write_image(&self, id: &HeirloomId, image: &[u8]) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst)
            || self.simulate_image_write_error.load(Ordering::SeqCst)
        {
            return Err(Self::simulated_error(id, "image"));
        }
        self.write_with(id, "image", |r| r.image = Some(image.to_vec()))
    }

    fn modified_at(&self, id: &HeirloomId) -> Result<Option<DateTime<Utc>>> {
        Ok(self.records.lock().get(id).and_then(|r| r.mtime))
    }

    fn image_path(&self, id: &HeirloomId) -> PathBuf {
        Self::virtual_path(id, "image")
    }
}
