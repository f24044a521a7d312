//! # Heirlooms Architecture
//!
//! Heirlooms is a **client-agnostic record store**. Each heirloom is a text
//! description plus one image, kept as a directory on disk. The library owns
//! the records; the bundled command-line client is just one way to drive it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client Layer (main.rs + args.rs)                           │
//! │  - Parses arguments, reads image files, prints results      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Credential gate, id parsing, dispatch                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Required-field validation, result shaping                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - HeirloomStore: lifecycle, per-id locking, rollback       │
//! │  - IdAllocator: bounded random allocation                   │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Lifecycle
//!
//! A record is either absent or present. `create` moves a fresh id from
//! absent to present, `update` keeps it present (and fails with `NotFound`
//! on an absent id), `delete` moves it back to absent. Ids are never reused
//! while present, and a failed creation leaves nothing behind.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>`. It never writes to stdout/stderr and never exits the
//! process, so the same core can sit behind an HTTP server as easily as
//! behind the CLI.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`store`]: Record store, id allocation and storage backends
//! - [`model`]: Core data types (`Heirloom`, `HeirloomId`)
//! - [`config`]: Layered configuration
//! - [`auth`]: Shared credentials
//! - [`logging`]: Logger bootstrap for clients
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
