//! Update check, update application and profile lookup
//!
//! The current-version marker is the single source of truth for which
//! installed database is active. Updates only ever add a version directory
//! and then overwrite the marker as their final step, so a failed update
//! leaves the previous version active.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::database::archive::extract_zip_to_directory;
use crate::database::downloader::FileDownloader;
use crate::database::error::DatabaseError;
use crate::database::file_system::FileSystem;
use crate::database::hash::compute_md5;
use crate::database::json;
use crate::database::layout::{DatabaseLayout, RemoteLayout};
use crate::database::types::{DatabaseVersion, ExecutableProfile};

/// How an available remote version relates to the installed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Installed database is the same or newer
    UpToDate,
    /// A newer database exists but needs a newer API than the installed one
    RequiresSoftwareUpdate,
    /// The remote version should be installed
    Available,
}

/// Decide whether `latest` should replace `current`
///
/// Comparison is numeric. Equal database versions never update. The API
/// gate only applies when a marker with an API version is installed, so a
/// first install always proceeds.
pub fn resolve_update(
    current: Option<&DatabaseVersion>,
    latest_db_version: u32,
    latest_api_version: u32,
) -> UpdateDecision {
    let current_db = current.and_then(|c| c.db_version);
    if current_db.is_some_and(|db| db >= latest_db_version) {
        return UpdateDecision::UpToDate;
    }

    let current_api = current.and_then(|c| c.api_version);
    if current_api.is_some_and(|api| api < latest_api_version) {
        return UpdateDecision::RequiresSoftwareUpdate;
    }

    UpdateDecision::Available
}

/// Result of [`InjectionDatabaseService::update_database`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The version was extracted and the marker now holds this descriptor
    Installed(DatabaseVersion),
    /// The archive could not be downloaded; nothing was written
    DownloadFailed,
}

pub struct InjectionDatabaseService {
    downloader: Arc<dyn FileDownloader>,
    file_system: Arc<dyn FileSystem>,
    layout: DatabaseLayout,
    remote: RemoteLayout,
}

impl InjectionDatabaseService {
    pub fn new(
        downloader: Arc<dyn FileDownloader>,
        file_system: Arc<dyn FileSystem>,
        layout: DatabaseLayout,
        settings: &Settings,
    ) -> Self {
        Self {
            downloader,
            file_system,
            layout,
            remote: RemoteLayout::new(&settings.source_server_db_path),
        }
    }

    pub fn layout(&self) -> &DatabaseLayout {
        &self.layout
    }

    fn ensure_not_cancelled(cancel: Option<&CancellationToken>) -> Result<(), DatabaseError> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(DatabaseError::Cancelled);
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, DatabaseError> {
        let text = self.file_system.read_to_string(path).await?;
        json::from_str(&text).map_err(|source| DatabaseError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the current-version marker
    ///
    /// # Returns
    /// * `Ok(None)` - No database has been installed
    /// * `Ok(Some(version))` - The active descriptor, possibly with unset fields
    pub async fn current_version(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<DatabaseVersion>, DatabaseError> {
        Self::ensure_not_cancelled(cancel)?;

        let path = self.layout.current_version_file();
        if !self.file_system.exists(&path).await {
            debug!("Current database version marker not found: {:?}", path);
            return Ok(None);
        }

        self.read_json(&path).await.map(Some)
    }

    /// Checks the source host for a newer compatible database
    ///
    /// Never writes anything. Transport failures and incomplete remote
    /// descriptors are logged and reported as `Ok(None)`.
    pub async fn check_for_update(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<DatabaseVersion>, DatabaseError> {
        let current = self.current_version(cancel).await?;
        Self::ensure_not_cancelled(cancel)?;

        let url = self.remote.latest_version_url();
        let download = match self.downloader.download_text(&url).await {
            Ok(download) if download.is_success() => download,
            Ok(download) => {
                error!(
                    "Failed to get latest version from server ({}): {}",
                    download.status, url
                );
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to get latest version from server {}: {}", url, e);
                return Ok(None);
            }
        };

        let latest = match json::from_str::<DatabaseVersion>(&download.content) {
            Ok(latest) => latest,
            Err(e) => {
                error!("Failed to read latest version file {}: {}", url, e);
                return Ok(None);
            }
        };

        let (Some(latest_db), Some(latest_api)) = (latest.db_version, latest.api_version) else {
            error!("Latest version file is missing DbVersion or ApiVersion: {}", url);
            return Ok(None);
        };

        match resolve_update(current.as_ref(), latest_db, latest_api) {
            UpdateDecision::UpToDate => {
                debug!(
                    "Injection database already up-to-date (current: {:?}, latest: {})",
                    current.and_then(|c| c.db_version),
                    latest_db
                );
                Ok(None)
            }
            UpdateDecision::RequiresSoftwareUpdate => {
                warn!(
                    "Latest injection database (db={}, api={}) requires a software update",
                    latest_db, latest_api
                );
                Ok(None)
            }
            UpdateDecision::Available => {
                info!("Injection database update available: {}", latest);
                Ok(Some(latest))
            }
        }
    }

    /// Downloads and activates `target`
    ///
    /// Steps: download the archive, ensure the version directory, stage the
    /// archive under the database root, extract it, then copy the extracted
    /// `version.json` over the current-version marker. Cancellation is
    /// checked before each step. A failure after the download leaves the
    /// partially written version directory in place for a retry to reuse;
    /// the marker is untouched until the last step.
    ///
    /// # Errors
    /// * `DatabaseError::InvalidArgument` - `target` has no database version
    /// * `DatabaseError::Json` - The extracted `version.json` is malformed
    /// * `DatabaseError::VersionMismatch` - The extracted `version.json` names another version
    pub async fn update_database(
        &self,
        target: &DatabaseVersion,
        cancel: Option<&CancellationToken>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        let Some(version) = target.db_version else {
            return Err(DatabaseError::InvalidArgument(
                "target DbVersion is required".to_string(),
            ));
        };

        Self::ensure_not_cancelled(cancel)?;
        let url = self.remote.database_archive_url(version);
        info!("Downloading injection database {} from {}", version, url);

        let download = match self.downloader.download_bytes(&url).await {
            Ok(download) if download.is_success() => download,
            Ok(download) => {
                error!(
                    "Failed to download database zip ({}): {}",
                    download.status, url
                );
                return Ok(UpdateOutcome::DownloadFailed);
            }
            Err(e) => {
                error!("Failed to download database zip {}: {}", url, e);
                return Ok(UpdateOutcome::DownloadFailed);
            }
        };

        Self::ensure_not_cancelled(cancel)?;
        let database_dir = self.layout.database_dir(version);
        if !self.file_system.exists(&database_dir).await {
            self.file_system.create_dir_all(&database_dir).await?;
        }

        let staging = self.layout.staging_archive(version);
        self.file_system.write(&staging, &download.content).await?;
        debug!("Staged {} bytes at {:?}", download.content.len(), staging);

        Self::ensure_not_cancelled(cancel)?;
        let extracted =
            extract_zip_to_directory(self.file_system.as_ref(), &staging, &database_dir).await?;
        info!("Extracted {} files into {:?}", extracted, database_dir);

        // The marker must only ever name a readable descriptor for `version`
        let version_file = self.layout.version_file(version);
        let installed: DatabaseVersion = self.read_json(&version_file).await?;
        if installed.db_version != Some(version) {
            error!(
                "Extracted version file {:?} does not match database {}: {}",
                version_file, version, installed
            );
            return Err(DatabaseError::VersionMismatch {
                expected: version,
                found: installed.db_version,
            });
        }

        Self::ensure_not_cancelled(cancel)?;
        self.file_system
            .copy(&version_file, &self.layout.current_version_file())
            .await?;

        info!("Injection database activated: {}", installed);
        Ok(UpdateOutcome::Installed(installed))
    }

    /// Looks up the profile for an executable in the active database
    ///
    /// Returns `Ok(None)` when no database is installed, the marker has no
    /// database version, or no profile exists for `(file_name, md5)`.
    pub async fn find_exe_profile(
        &self,
        file_name: &str,
        md5: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<ExecutableProfile>, DatabaseError> {
        let Some(current) = self.current_version(cancel).await? else {
            return Ok(None);
        };

        let Some(db_version) = current.db_version else {
            error!("Current database version marker has no database version specified");
            return Ok(None);
        };

        Self::ensure_not_cancelled(cancel)?;
        let path = self.layout.exe_profile_file(db_version, file_name, md5);
        if !self.file_system.exists(&path).await {
            debug!("Exe profile not found: {:?}", path);
            return Ok(None);
        }

        self.read_json(&path).await.map(Some)
    }

    /// Hashes the executable at `exe_path` and looks up its profile
    pub async fn find_exe_profile_for_file(
        &self,
        exe_path: &Path,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<ExecutableProfile>, DatabaseError> {
        let file_name = exe_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                DatabaseError::InvalidArgument(format!(
                    "executable path has no valid file name: {:?}",
                    exe_path
                ))
            })?;

        let md5 = compute_md5(exe_path).await?;
        debug!("Computed MD5 {} for {:?}", md5, exe_path);

        self.find_exe_profile(file_name, &md5, cancel).await
    }
}
