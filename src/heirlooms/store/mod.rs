//! # Storage Layer
//!
//! This module owns the on-disk record namespace.
//!
//! ## Layering
//!
//! - [`backend::StorageBackend`]: raw artifact I/O for one records root.
//!   - [`fs_backend::FsBackend`]: production, one directory per record.
//!   - [`mem_backend::MemBackend`]: in-memory, for tests. Can simulate
//!     write failures.
//! - [`allocator::IdAllocator`]: draws random numeric ids and hands them to
//!   the backend's atomic `reserve`, with a bounded number of attempts.
//! - [`heirloom_store::HeirloomStore`]: the record store. Lifecycle rules
//!   (existence checks, partial update, rollback) and per-id locking live
//!   here, on top of any backend.
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! <records-root>/
//! ├── 4821093552/
//! │   ├── description     # UTF-8 text
//! │   └── image           # raw image bytes
//! └── 7310025518/
//!     ├── description
//!     └── image
//! ```
//!
//! A directory holding both artifacts is the sole criterion for "record
//! exists". Hidden entries (`.`-prefixed) are transient staging or trash and
//! are never reported.

pub mod allocator;
pub mod backend;
pub mod fs_backend;
pub mod heirloom_store;
pub mod mem_backend;

use fs_backend::FsBackend;
use heirloom_store::HeirloomStore;

/// The production store.
pub type FileStore = HeirloomStore<FsBackend>;
