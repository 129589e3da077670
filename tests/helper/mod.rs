//! Shared integration test utilities

#![allow(dead_code, unused_imports)]

pub mod archive;
pub mod downloader;

pub use archive::{VALID_EXE_NAME, VALID_MD5, build_database_zip, version_json};
pub use downloader::StaticDownloader;
