//! # abr-importer
//!
//! Loads the Address Base Registry master files into an [`AddressStore`].
//!
//! Configuration comes from the environment:
//!
//! | variable | meaning |
//! |---|---|
//! | `ABR_DATA_DIR` | directory to discover `mt_pref*`, `mt_city*`, `mt_town*` in |
//! | `ABR_PREF_FILE` | prefecture file, overriding discovery |
//! | `ABR_CITY_FILE` | city file, overriding discovery |
//! | `ABR_TOWN_FILE` | town file, overriding discovery |
//! | `ABR_STRICT_HEADERS` | `1` or `true` to check header names |
//!
//! Tiers with no file are skipped.

#![warn(missing_docs)]

use std::path::PathBuf;

use abr_loader::{
    discover_abr_files, import_parallel, validate_files, AbrError, AbrFiles, AddressStore,
    LoaderConfig, MasterRepository,
};
use thiserror::Error;

/// Environment variable naming the data directory.
pub const DATA_DIR_VAR: &str = "ABR_DATA_DIR";
/// Environment variable naming the prefecture file.
pub const PREF_FILE_VAR: &str = "ABR_PREF_FILE";
/// Environment variable naming the city file.
pub const CITY_FILE_VAR: &str = "ABR_CITY_FILE";
/// Environment variable naming the town file.
pub const TOWN_FILE_VAR: &str = "ABR_TOWN_FILE";
/// Environment variable enabling strict header checks.
pub const STRICT_HEADERS_VAR: &str = "ABR_STRICT_HEADERS";

/// Errors from the importer.
#[derive(Error, Debug)]
pub enum ImporterError {
    /// Reading, validating or storing the masters failed.
    #[error(transparent)]
    Loader(#[from] AbrError),

    /// The environment does not name any input.
    #[error("no input configured: set ABR_DATA_DIR or one of ABR_PREF_FILE, ABR_CITY_FILE, ABR_TOWN_FILE")]
    NoInput,

    /// A variable holds a value that cannot be used.
    #[error("invalid value for {var}: '{value}'")]
    InvalidVar {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Result type for importer operations.
pub type ImporterResult<T> = Result<T, ImporterError>;

/// Importer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImporterConfig {
    /// Directory to discover master files in.
    pub data_dir: Option<PathBuf>,
    /// Explicit prefecture file.
    pub pref_file: Option<PathBuf>,
    /// Explicit city file.
    pub city_file: Option<PathBuf>,
    /// Explicit town file.
    pub town_file: Option<PathBuf>,
    /// Check header names as well as their count.
    pub strict_headers: bool,
}

impl ImporterConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> ImporterResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> ImporterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |var: &str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        let strict_headers = match lookup(STRICT_HEADERS_VAR) {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ImporterError::InvalidVar {
                var: STRICT_HEADERS_VAR,
                value,
            })?,
        };

        Ok(Self {
            data_dir: path(DATA_DIR_VAR),
            pref_file: path(PREF_FILE_VAR),
            city_file: path(CITY_FILE_VAR),
            town_file: path(TOWN_FILE_VAR),
            strict_headers,
        })
    }

    /// The loader settings for this configuration.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            strict_headers: self.strict_headers,
            ..LoaderConfig::default()
        }
    }

    /// Resolves the master files: discovery in the data directory first,
    /// then the explicit per-tier files on top.
    pub fn resolve_files(&self) -> ImporterResult<AbrFiles> {
        let mut files = match &self.data_dir {
            Some(dir) => discover_abr_files(dir)?,
            None => AbrFiles::new(),
        };

        if let Some(path) = &self.pref_file {
            files.prefecture_file = Some(path.clone());
        }
        if let Some(path) = &self.city_file {
            files.city_file = Some(path.clone());
        }
        if let Some(path) = &self.town_file {
            files.town_file = Some(path.clone());
        }

        if !files.has_any() {
            return Err(ImporterError::NoInput);
        }
        validate_files(&files)?;
        Ok(files)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Runs one import into `store`.
///
/// The store is only changed when every configured tier imported cleanly.
pub fn run(config: &ImporterConfig, store: &mut AddressStore) -> ImporterResult<()> {
    let files = config.resolve_files()?;
    for (tier, path) in files.present() {
        tracing::info!(tier, path = %path.display(), "importing");
    }

    let batch = import_parallel(&files, &config.loader_config())?;
    store.replace_all(batch)?;

    tracing::info!(
        prefectures = store.prefecture_count(),
        cities = store.city_count(),
        towns = store.town_count(),
        "import complete"
    );
    Ok(())
}
