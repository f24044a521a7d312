//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every heirloom operation, whatever client drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Gates** operations behind the shared credentials, when configured
//! - **Normalizes inputs** (raw id strings → validated `HeirloomId`s)
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Business logic belongs in `commands/*.rs`; I/O and presentation belong in
//! the client.
//!
//! ## Generic Over StorageBackend
//!
//! `HeirloomApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `HeirloomApi<FsBackend>`
//! - Testing: `HeirloomApi<MemBackend>`

use crate::auth::Credentials;
use crate::commands;
use crate::error::{HeirloomError, Result};
use crate::model::HeirloomId;
use crate::store::backend::StorageBackend;
use crate::store::heirloom_store::HeirloomStore;

pub struct HeirloomApi<B: StorageBackend> {
    store: HeirloomStore<B>,
    credentials: Option<Credentials>,
}

impl<B: StorageBackend> HeirloomApi<B> {
    pub fn new(store: HeirloomStore<B>) -> Self {
        Self {
            store,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Check the caller against the shared credentials.
    /// Always passes when no credentials are configured.
    pub fn authorize(&self, username: Option<&str>, password: Option<&str>) -> Result<()> {
        match &self.credentials {
            None => Ok(()),
            Some(creds) => match (username, password) {
                (Some(user), Some(pass)) => creds.verify(user, pass),
                _ => Err(HeirloomError::Unauthorized),
            },
        }
    }

    pub fn create_heirloom(
        &self,
        description: Option<String>,
        image: Option<Vec<u8>>,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, description, image)
    }

    pub fn view_heirloom(&self, id: &str) -> Result<commands::CmdResult> {
        let id = parse_id(Some(id))?;
        commands::view::run(&self.store, &id)
    }

    /// Every field is optional at this boundary so that a missing one is
    /// reported as invalid input rather than rejected by the client.
    pub fn edit_heirloom(
        &self,
        id: Option<&str>,
        description: Option<String>,
        image: Option<Vec<u8>>,
    ) -> Result<commands::CmdResult> {
        let id = parse_id(id)?;
        let description = description
            .ok_or_else(|| HeirloomError::InvalidInput("description is required".into()))?;
        commands::update::run(
            &self.store,
            commands::HeirloomUpdate::new(id, description, image),
        )
    }

    pub fn delete_heirloom(&self, id: &str) -> Result<commands::CmdResult> {
        let id = parse_id(Some(id))?;
        commands::delete::run(&self.store, &id)
    }

    pub fn list_heirlooms(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn fetch_image(&self, id: &str) -> Result<commands::CmdResult> {
        let id = parse_id(Some(id))?;
        commands::image::run(&self.store, &id)
    }

    pub fn search_heirlooms(&self, term: &str) -> Result<commands::CmdResult> {
        commands::search::run(term)
    }

    pub fn store(&self) -> &HeirloomStore<B> {
        &self.store
    }
}

fn parse_id(raw: Option<&str>) -> Result<HeirloomId> {
    raw.ok_or_else(|| HeirloomError::InvalidInput("id is required".into()))?
        .trim()
        .parse()
}

pub use crate::commands::{CmdMessage, CmdResult, HeirloomUpdate, MessageLevel};
