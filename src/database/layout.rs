//! On-disk and remote path derivation
//!
//! ```text
//! <root>/current.json
//! <root>/<version>/version.json
//! <root>/<version>/ExeProfiles/<name>.<md5>.json
//! <root>/<version>.zip                     (staging copy of the download)
//!
//! <source>/latest.json
//! <source>/<version>.zip
//! ```

use std::path::{Path, PathBuf};

pub const CURRENT_VERSION_FILE_NAME: &str = "current.json";
pub const VERSION_FILE_NAME: &str = "version.json";
pub const EXE_PROFILES_DIR_NAME: &str = "ExeProfiles";
pub const LATEST_VERSION_FILE_NAME: &str = "latest.json";

/// Paths of an installed database rooted at a fixed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLayout {
    root: PathBuf,
}

impl DatabaseLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The marker naming the active database version
    pub fn current_version_file(&self) -> PathBuf {
        self.root.join(CURRENT_VERSION_FILE_NAME)
    }

    pub fn database_dir(&self, version: u32) -> PathBuf {
        self.root.join(version.to_string())
    }

    pub fn version_file(&self, version: u32) -> PathBuf {
        self.database_dir(version).join(VERSION_FILE_NAME)
    }

    pub fn exe_profile_file(&self, version: u32, exe_name: &str, md5: &str) -> PathBuf {
        self.database_dir(version)
            .join(EXE_PROFILES_DIR_NAME)
            .join(format!("{exe_name}.{md5}.json"))
    }

    /// Where a downloaded archive is written before extraction
    pub fn staging_archive(&self, version: u32) -> PathBuf {
        self.root.join(format!("{version}.zip"))
    }
}

/// URLs on the static host serving database releases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    source: String,
}

impl RemoteLayout {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }

    pub fn latest_version_url(&self) -> String {
        format!(
            "{}/{}",
            self.source.trim_end_matches('/'),
            LATEST_VERSION_FILE_NAME
        )
    }

    pub fn database_archive_url(&self, version: u32) -> String {
        format!("{}/{}.zip", self.source.trim_matches('/'), version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn database_layout_derives_version_paths() {
        let layout = DatabaseLayout::new("/app/InjectionDatabase");

        assert_eq!(
            layout.current_version_file(),
            PathBuf::from("/app/InjectionDatabase/current.json")
        );
        assert_eq!(
            layout.version_file(42),
            PathBuf::from("/app/InjectionDatabase/42/version.json")
        );
        assert_eq!(
            layout.staging_archive(42),
            PathBuf::from("/app/InjectionDatabase/42.zip")
        );
    }

    #[test]
    fn exe_profile_file_joins_name_and_hash() {
        let layout = DatabaseLayout::new("/db");

        assert_eq!(
            layout.exe_profile_file(7, "game.exe", "ABCDEF"),
            PathBuf::from("/db/7/ExeProfiles/game.exe.ABCDEF.json")
        );
    }

    #[rstest]
    #[case("https://example.com/db", "https://example.com/db/latest.json")]
    #[case("https://example.com/db/", "https://example.com/db/latest.json")]
    #[case("https://example.com/db//", "https://example.com/db/latest.json")]
    fn latest_version_url_trims_trailing_slashes(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(RemoteLayout::new(source).latest_version_url(), expected);
    }

    #[rstest]
    #[case("https://example.com/db", "https://example.com/db/99.zip")]
    #[case("https://example.com/db/", "https://example.com/db/99.zip")]
    fn database_archive_url_appends_version_zip(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(RemoteLayout::new(source).database_archive_url(99), expected);
    }
}
