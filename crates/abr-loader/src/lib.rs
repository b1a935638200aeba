//! # abr-loader
//!
//! Reader and importer for Address Base Registry master files.
//!
//! The registry publishes its masters as comma-separated files with one
//! header line: `mt_pref_all.csv` (prefectures), `mt_city_all.csv`
//! (municipalities) and `mt_town_all.csv` (towns). This crate reads them,
//! folds the width of code and romanized columns with NFKC, builds every row
//! into a validated [`abr_types`] record and rejects duplicate keys.
//!
//! The three tiers import concurrently with [`import_parallel`]; the first
//! failing tier stops the others. An [`AddressStore`] then takes the whole
//! batch at once.
//!
//! ## Features
//!
//! - `parallel` (default): build rows and import tiers on the rayon pool.
//!
//! ## Usage
//!
//! ```ignore
//! use abr_loader::{discover_abr_files, import_parallel, AddressStore, LoaderConfig, MasterRepository};
//!
//! let files = discover_abr_files("data/abr")?;
//! let batch = import_parallel(&files, &LoaderConfig::default())?;
//!
//! let mut store = AddressStore::new();
//! store.replace_all(batch)?;
//! println!("{} towns", store.town_count());
//! ```

#![warn(missing_docs)]

pub mod city;
pub mod import;
pub mod loader;
pub mod parser;
pub mod prefecture;
pub mod store;
pub mod town;
pub mod types;

// Re-export abr-types for convenience
pub use abr_types;

pub use city::parse_city_file;
pub use import::{import_parallel, import_sequential, ImportBatch};
pub use loader::{discover_abr_files, validate_files};
pub use parser::{parse, parse_file, AbrParser, AbrRecord, Column, Parsed, Row, Width};
pub use prefecture::parse_prefecture_file;
pub use store::{AddressStore, MasterRepository};
pub use town::parse_town_file;
pub use types::{AbrError, AbrFiles, AbrResult, LoaderConfig, ParseStats};
