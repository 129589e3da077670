//! Zip extraction through a [`FileSystem`]

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::database::error::ArchiveError;
use crate::database::file_system::FileSystem;

const MAX_PREALLOCATED_ENTRY_SIZE: u64 = 1024 * 1024;

enum Entry {
    Dir(PathBuf),
    File(PathBuf, Vec<u8>),
}

/// Decodes every entry up front so no zip reader is held across an await
fn read_entries(bytes: Vec<u8>) -> Result<Vec<Entry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(relative) = file.enclosed_name() else {
            warn!("Skipping archive entry outside destination: {}", file.name());
            continue;
        };

        if file.is_dir() {
            entries.push(Entry::Dir(relative));
        } else {
            // Declared sizes come from the archive header and are not trusted
            let capacity = file.size().min(MAX_PREALLOCATED_ENTRY_SIZE) as usize;
            let mut contents = Vec::with_capacity(capacity);
            file.read_to_end(&mut contents)?;
            entries.push(Entry::File(relative, contents));
        }
    }

    Ok(entries)
}

/// Extracts the zip at `archive_path` into `output_dir`
///
/// Parent directories are created as needed and existing files are
/// overwritten. Returns the number of files written.
pub async fn extract_zip_to_directory(
    fs: &dyn FileSystem,
    archive_path: &Path,
    output_dir: &Path,
) -> Result<usize, ArchiveError> {
    let bytes = fs.read(archive_path).await?;
    let entries = read_entries(bytes)?;

    let mut written = 0;
    for entry in entries {
        match entry {
            Entry::Dir(relative) => {
                fs.create_dir_all(&output_dir.join(relative)).await?;
            }
            Entry::File(relative, contents) => {
                let path = output_dir.join(relative);
                if let Some(parent) = path.parent() {
                    if !fs.exists(parent).await {
                        fs.create_dir_all(parent).await?;
                    }
                }
                fs.write(&path, &contents).await?;
                written += 1;
            }
        }
    }

    debug!(
        "Extracted {} files from {:?} into {:?}",
        written, archive_path, output_dir
    );
    Ok(written)
}
