//! Injection database core
//!
//! Version resolution, update application and profile lookup over injected
//! transport and file-system capabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Downloader  │────▶│   Service    │◀────│  FileSystem  │
//! │ (transport)  │     │(check/update)│     │  (storage)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │   Archive    │
//!                      │ (zip extract)│
//!                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`service`]: Update check, update application and profile lookup
//! - [`layout`]: On-disk and remote path derivation
//! - [`types`]: Version descriptor and profile records
//! - [`json`]: Lenient JSON codec for descriptor and profile files
//! - [`downloader`]: Transport trait; [`downloaders`] holds the HTTP implementation
//! - [`file_system`]: Storage trait; [`file_systems`] holds the OS and in-memory implementations
//! - [`archive`]: Zip extraction through a file system
//! - [`hash`]: MD5 digest of executable content
//! - [`error`]: Error types

pub mod archive;
pub mod downloader;
pub mod downloaders;
pub mod error;
pub mod file_system;
pub mod file_systems;
pub mod hash;
pub mod json;
pub mod layout;
pub mod service;
pub mod types;
