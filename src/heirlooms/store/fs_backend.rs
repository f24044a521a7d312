use super::backend::StorageBackend;
use crate::error::{HeirloomError, Result};
use crate::model::HeirloomId;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DESCRIPTION_FILE: &str = "description";
pub const IMAGE_FILE: &str = "image";

/// Filesystem backend: one directory per record under `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_dir(&self, id: &HeirloomId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| HeirloomError::write(&self.root, e))?;
        }
        Ok(())
    }

    fn read_artifact(&self, id: &HeirloomId, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.record_dir(id).join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HeirloomError::read(path, e)),
        }
    }

    fn write_artifact(&self, id: &HeirloomId, name: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.record_dir(id);
        let target = dir.join(name);

        // Atomic write. The tmp file lives inside the record directory so a
        // missing directory fails here instead of being recreated.
        let tmp = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(HeirloomError::write(target, e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(HeirloomError::write(target, e));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn reserve(&self, id: &HeirloomId) -> Result<bool> {
        self.ensure_root()?;
        let dir = self.record_dir(id);
        match fs::create_dir(&dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(HeirloomError::write(dir, e)),
        }
    }

    fn discard(&self, id: &HeirloomId) -> Result<()> {
        let dir = self.record_dir(id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HeirloomError::write(dir, e)),
        }
    }

    fn record_exists(&self, id: &HeirloomId) -> bool {
        let dir = self.record_dir(id);
        dir.is_dir() && dir.join(DESCRIPTION_FILE).is_file() && dir.join(IMAGE_FILE).is_file()
    }

    fn list_ids(&self) -> Result<Vec<HeirloomId>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|e| HeirloomError::read(&self.root, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| HeirloomError::read(&self.root, e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Ok(id) = name.parse::<HeirloomId>() else {
                debug!("skipping non-record entry {:?} under records root", name);
                continue;
            };
            if self.record_exists(&id) {
                ids.push(id);
            } else if entry.path().is_dir() {
                warn!("record directory {} is missing an artifact", id);
            }
        }
        Ok(ids)
    }

    fn remove(&self, id: &HeirloomId) -> Result<()> {
        let dir = self.record_dir(id);

        // Take the record out of the namespace in one step, then clean up.
        let trash = self.root.join(format!(".trash-{}-{}", id, Uuid::new_v4()));
        match fs::rename(&dir, &trash) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HeirloomError::NotFound(id.clone()));
            }
            Err(e) => return Err(HeirloomError::write(&dir, e)),
        }
        fs::remove_dir_all(&trash).map_err(|e| HeirloomError::write(&trash, e))?;
        Ok(())
    }

    fn read_description(&self, id: &HeirloomId) -> Result<Option<String>> {
        match self.read_artifact(id, DESCRIPTION_FILE)? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                HeirloomError::read(
                    self.record_dir(id).join(DESCRIPTION_FILE),
                    std::io::Error::new(ErrorKind::InvalidData, e),
                )
            }),
            None => Ok(None),
        }
    }

    fn read_image(&self, id: &HeirloomId) -> Result<Option<Vec<u8>>> {
        self.read_artifact(id, IMAGE_FILE)
    }

    fn write_description(&self, id: &HeirloomId, description: &str) -> Result<()> {
        self.write_artifact(id, DESCRIPTION_FILE, description.as_bytes())
    }

    fn write_image(&self, id: &HeirloomId, image: &[u8]) -> Result<()> {
        self.write_artifact(id, IMAGE_FILE, image)
    }

    fn modified_at(&self, id: &HeirloomId) -> Result<Option<DateTime<Utc>>> {
        let dir = self.record_dir(id);
        let mut latest: Option<DateTime<Utc>> = None;
        for name in [DESCRIPTION_FILE, IMAGE_FILE] {
            let path = dir.join(name);
            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(HeirloomError::read(path, e)),
            };
            if let Ok(modified) = meta.modified() {
                let modified: DateTime<Utc> = modified.into();
                latest = Some(latest.map_or(modified, |l| l.max(modified)));
            }
        }
        Ok(latest)
    }

    fn image_path(&self, id: &HeirloomId) -> PathBuf {
        self.record_dir(id).join(IMAGE_FILE)
    }
}
