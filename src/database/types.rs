//! Version descriptor and profile records
//!
//! Field names are written in PascalCase and read case-insensitively through
//! [`crate::database::json`], which lowercases every incoming key before the
//! typed pass. The `deserialize` renames below are those lowercased keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version descriptor stored in `current.json`, `<version>/version.json` and
/// the remote `latest.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct DatabaseVersion {
    /// Database version. Incremented when a new set of profiles is released.
    #[serde(rename(deserialize = "dbversion"))]
    pub db_version: Option<u32>,

    /// Data-format compatibility epoch. Incremented when a database format
    /// change breaks older software.
    #[serde(rename(deserialize = "apiversion"))]
    pub api_version: Option<u32>,
}

impl DatabaseVersion {
    pub fn new(db_version: u32, api_version: u32) -> Self {
        Self {
            db_version: Some(db_version),
            api_version: Some(api_version),
        }
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(value: Option<u32>) -> String {
            value.map_or_else(|| "unset".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "db={} api={}",
            field(self.db_version),
            field(self.api_version)
        )
    }
}

/// Profile for one executable, keyed on disk by file name and MD5 digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct ExecutableProfile {
    #[serde(rename(deserialize = "apiversion"))]
    pub api_version: Option<u32>,

    #[serde(rename(deserialize = "md5"))]
    pub md5: Option<String>,

    #[serde(rename(deserialize = "game"))]
    pub game: Option<String>,

    #[serde(rename(deserialize = "injectionprofiles"))]
    pub injection_profiles: Option<Vec<InjectionProfile>>,
}

/// Patch region metadata. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct InjectionProfile {
    #[serde(rename(deserialize = "datafile"))]
    pub data_file: Option<String>,
    #[serde(rename(deserialize = "primaryoffset"))]
    pub primary_offset: Option<u64>,
    #[serde(rename(deserialize = "primarysize"))]
    pub primary_size: Option<u64>,
    #[serde(rename(deserialize = "secondaryoffset"))]
    pub secondary_offset: Option<u64>,
    #[serde(rename(deserialize = "secondarysize"))]
    pub secondary_size: Option<u64>,

    #[serde(rename(deserialize = "rvaofprimarysizetoupdate"))]
    pub rva_of_primary_size_to_update: Option<u64>,
    #[serde(rename(deserialize = "rvaofsecondarysizetoupdate"))]
    pub rva_of_secondary_size_to_update: Option<u64>,
    #[serde(rename(deserialize = "rvaofinstructionforprimary"))]
    pub rva_of_instruction_for_primary: Option<u64>,
    #[serde(rename(deserialize = "rvaofinstructionforsecondary"))]
    pub rva_of_instruction_for_secondary: Option<u64>,
}
