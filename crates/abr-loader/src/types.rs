//! Loader-specific types for registry file processing.

use std::path::PathBuf;

use abr_types::MasterError;
use thiserror::Error;

/// Errors that can occur while reading and importing registry files.
#[derive(Error, Debug)]
pub enum AbrError {
    /// I/O error reading a registry file.
    #[error("IO error reading registry file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A row failed record validation.
    #[error("line {line}: {source}")]
    Master {
        /// 1-based line number of the row in its file.
        line: u64,
        /// The validation failure.
        #[source]
        source: MasterError,
    },

    /// A store refused a batch whose tier breaks a collection rule.
    #[error("{tier} batch rejected: {source}")]
    Rejected {
        /// The tier whose records were refused.
        tier: &'static str,
        /// The collection failure.
        #[source]
        source: MasterError,
    },

    /// A date column did not hold a `YYYY-MM-DD` calendar date.
    #[error("line {line}: invalid date in column {column}: '{value}'")]
    InvalidDate {
        /// Name of the date column.
        column: &'static str,
        /// 1-based line number of the row in its file.
        line: u64,
        /// The rejected value.
        value: String,
    },

    /// Missing required column in a registry file.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// The name of the missing column.
        column: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// No registry master file was found in a directory.
    #[error("Required registry file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// The kinds of file that were missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// The tier stopped because a sibling tier failed first.
    #[error("{tier} import cancelled after another tier failed")]
    Cancelled {
        /// The tier that stopped.
        tier: &'static str,
    },

    /// The import was configured inconsistently.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AbrError {
    /// Wraps a record validation failure with the line it came from.
    pub fn master(line: u64, source: MasterError) -> Self {
        Self::Master { line, source }
    }

    /// Returns true for the error a tier reports when it was stopped by a
    /// sibling tier's failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type for loader operations.
pub type AbrResult<T> = Result<T, AbrError>;

/// Configuration for registry file parsing.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Require header names to match the tier's column names exactly.
    /// When false only the column count is checked.
    pub strict_headers: bool,
    /// Validate the rows of a tier on the rayon pool.
    pub parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict_headers: false,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl LoaderConfig {
    /// A configuration that checks header names as well as their count.
    pub fn strict() -> Self {
        Self {
            strict_headers: true,
            ..Self::default()
        }
    }
}

/// Statistics from parsing one registry file.
#[derive(Debug, Clone, Default)]
pub struct ParseStats {
    /// Data rows read from the file.
    pub rows_read: usize,
    /// Rows skipped because every cell was blank.
    pub blank_rows: usize,
    /// Time taken to read and validate the file in milliseconds.
    pub parse_time_ms: u64,
}

impl ParseStats {
    /// Rows that produced a record.
    pub fn records(&self) -> usize {
        self.rows_read - self.blank_rows
    }
}

/// The master files of one registry import. A tier without a file is
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct AbrFiles {
    /// Path to the prefecture master (`mt_pref`).
    pub prefecture_file: Option<PathBuf>,
    /// Path to the city master (`mt_city`).
    pub city_file: Option<PathBuf>,
    /// Path to the town master (`mt_town`).
    pub town_file: Option<PathBuf>,
}

impl AbrFiles {
    /// Creates a new empty AbrFiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if at least one tier has a file.
    pub fn has_any(&self) -> bool {
        self.prefecture_file.is_some() || self.city_file.is_some() || self.town_file.is_some()
    }

    /// Returns the tiers that have no file.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.prefecture_file.is_none() {
            missing.push("mt_pref");
        }
        if self.city_file.is_none() {
            missing.push("mt_city");
        }
        if self.town_file.is_none() {
            missing.push("mt_town");
        }
        missing
    }

    /// The configured files paired with their tier names.
    pub fn present(&self) -> Vec<(&'static str, &PathBuf)> {
        [
            ("mt_pref", self.prefecture_file.as_ref()),
            ("mt_city", self.city_file.as_ref()),
            ("mt_town", self.town_file.as_ref()),
        ]
        .into_iter()
        .filter_map(|(tier, path)| path.map(|p| (tier, p)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_config_default() {
        let config = LoaderConfig::default();
        assert!(!config.strict_headers);
        assert_eq!(config.parallel, cfg!(feature = "parallel"));
        assert!(LoaderConfig::strict().strict_headers);
    }

    #[test]
    fn test_parse_stats_records() {
        let stats = ParseStats {
            rows_read: 10,
            blank_rows: 3,
            ..Default::default()
        };
        assert_eq!(stats.records(), 7);
    }

    #[test]
    fn test_abr_files_missing() {
        let mut files = AbrFiles::new();
        assert!(!files.has_any());
        assert_eq!(files.missing_files(), vec!["mt_pref", "mt_city", "mt_town"]);

        files.city_file = Some(PathBuf::from("mt_city_all.csv"));
        assert!(files.has_any());
        assert_eq!(files.missing_files(), vec!["mt_pref", "mt_town"]);
        assert_eq!(files.present().len(), 1);
        assert_eq!(files.present()[0].0, "mt_city");
    }

    #[test]
    fn test_master_error_carries_line() {
        let err = AbrError::master(
            7,
            MasterError::DuplicateKey {
                key: "011002".to_string(),
            },
        );
        assert_eq!(err.to_string(), "line 7: [011002] this key is duplicated");
        assert!(!err.is_cancelled());
        assert!(AbrError::Cancelled { tier: "mt_town" }.is_cancelled());
    }

    #[test]
    fn test_rejected_batch_has_no_line() {
        let err = AbrError::Rejected {
            tier: "mt_pref",
            source: MasterError::DuplicateKey {
                key: "011002".to_string(),
            },
        };
        assert_eq!(err.to_string(), "mt_pref batch rejected: [011002] this key is duplicated");
    }
}
