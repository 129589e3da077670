//! Versioned injection profile database client
//!
//! Checks a remote static host for newer releases of the executable
//! injection profile database, installs them into a directory-per-version
//! layout next to the application, and answers profile lookups against the
//! currently active version.

pub mod config;
pub mod database;
pub mod logging;
