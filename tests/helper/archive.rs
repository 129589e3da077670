//! Database archive fixtures

use std::io::{Cursor, Write};

use injection_db::database::json;
use injection_db::database::types::{DatabaseVersion, ExecutableProfile};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const VALID_EXE_NAME: &str = "valid.exe";
pub const VALID_MD5: &str = "52fbf080a8760e5bd9f2341781785c78";

pub fn version_json(db: u32, api: u32) -> String {
    json::to_string_pretty(&DatabaseVersion::new(db, api)).unwrap()
}

/// Builds a zip laid out like an installed version directory, holding one
/// profile for `valid.exe` whose game is `game`.
pub fn build_database_zip(db: u32, api: u32, game: &str) -> Vec<u8> {
    let profile = ExecutableProfile {
        api_version: Some(api),
        md5: Some(VALID_MD5.to_string()),
        game: Some(game.to_string()),
        injection_profiles: None,
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("version.json", options).unwrap();
    writer.write_all(version_json(db, api).as_bytes()).unwrap();

    writer.add_directory("ExeProfiles/", options).unwrap();
    writer
        .start_file(
            format!("ExeProfiles/{VALID_EXE_NAME}.{VALID_MD5}.json"),
            options,
        )
        .unwrap();
    writer
        .write_all(json::to_string_pretty(&profile).unwrap().as_bytes())
        .unwrap();

    writer.finish().unwrap().into_inner()
}
