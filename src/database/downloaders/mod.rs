//! Downloader implementations

pub mod http;

pub use http::HttpFileDownloader;
