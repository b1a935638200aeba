//! Registry file discovery and path checks.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{AbrError, AbrFiles, AbrResult};

/// File name prefixes of the three master files, in tier order.
pub const PREFECTURE_PREFIX: &str = "mt_pref";
/// See [`PREFECTURE_PREFIX`].
pub const CITY_PREFIX: &str = "mt_city";
/// See [`PREFECTURE_PREFIX`].
pub const TOWN_PREFIX: &str = "mt_town";

/// Discovers the master files in a registry download directory.
///
/// Matches `mt_pref*.csv`, `mt_city*.csv` and `mt_town*.csv`, ignoring case.
/// When a prefix matches several files the first in name order wins, so
/// `mt_town_all.csv` is preferred over per-prefecture extracts such as
/// `mt_town_pref01.csv`. Tiers without a file are left unset.
///
/// # Errors
/// Fails when the directory does not exist or holds none of the three files.
pub fn discover_abr_files<P: AsRef<Path>>(path: P) -> AbrResult<AbrFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(AbrError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            entries.push(entry.path());
        }
    }
    entries.sort();

    let mut files = AbrFiles::new();
    for entry in entries {
        let Some(filename) = entry.file_name().map(|f| f.to_string_lossy().to_lowercase()) else {
            continue;
        };

        if !filename.ends_with(".csv") {
            continue;
        }

        let slot = if filename.starts_with(PREFECTURE_PREFIX) {
            &mut files.prefecture_file
        } else if filename.starts_with(CITY_PREFIX) {
            &mut files.city_file
        } else if filename.starts_with(TOWN_PREFIX) {
            &mut files.town_file
        } else {
            continue;
        };
        slot.get_or_insert(entry);
    }

    if !files.has_any() {
        return Err(AbrError::RequiredFileMissing {
            file_type: files.missing_files().join(", "),
            directory: path.display().to_string(),
        });
    }

    Ok(files)
}

/// Checks a configured file set before import.
///
/// Every configured path must be an existing regular file, and no file may
/// be configured for two tiers.
pub fn validate_files(files: &AbrFiles) -> AbrResult<()> {
    if !files.has_any() {
        return Err(AbrError::Config("no registry file is configured".to_string()));
    }

    let mut seen: Vec<(&'static str, PathBuf)> = Vec::new();
    for (tier, path) in files.present() {
        if path.is_dir() {
            return Err(AbrError::Config(format!(
                "{tier} path is a directory: {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(AbrError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let canonical = fs::canonicalize(path)?;
        if let Some((other, _)) = seen.iter().find(|(_, p)| *p == canonical) {
            return Err(AbrError::Config(format!(
                "{tier} file is the same as the {other} file: {}",
                path.display()
            )));
        }
        seen.push((tier, canonical));
    }

    Ok(())
}
