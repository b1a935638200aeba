//! Fan-out import of the three master tiers.
//!
//! Each tier is parsed and validated on its own; the first tier to fail
//! raises a shared flag that the other tiers check on every row, so a bad
//! file stops the whole import promptly.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use abr_types::{CityRecord, PrefectureRecord, TownRecord};

use crate::parser::{parse_file_cancellable, AbrRecord};
#[cfg(feature = "parallel")]
use crate::types::AbrError;
use crate::types::{AbrFiles, AbrResult, LoaderConfig};

/// The validated records of one import. A tier without a file is `None`.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    /// Prefecture records, if a prefecture file was configured.
    pub prefectures: Option<Vec<PrefectureRecord>>,
    /// City records, if a city file was configured.
    pub cities: Option<Vec<CityRecord>>,
    /// Town records, if a town file was configured.
    pub towns: Option<Vec<TownRecord>>,
}

impl ImportBatch {
    /// Returns true if no tier was imported.
    pub fn is_empty(&self) -> bool {
        self.prefectures.is_none() && self.cities.is_none() && self.towns.is_none()
    }

    /// Record counts per tier; a skipped tier counts zero.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.prefectures.as_ref().map_or(0, Vec::len),
            self.cities.as_ref().map_or(0, Vec::len),
            self.towns.as_ref().map_or(0, Vec::len),
        )
    }
}

/// Imports every configured tier concurrently.
///
/// The tiers run under nested `rayon::join`. When one fails the others stop
/// with [`AbrError::Cancelled`], and the error returned is the first one that
/// is not a cancellation.
///
/// # Example
///
/// ```ignore
/// let files = discover_abr_files("data/abr")?;
/// let batch = import_parallel(&files, &LoaderConfig::default())?;
/// store.replace_all(batch)?;
/// ```
#[cfg(feature = "parallel")]
pub fn import_parallel(files: &AbrFiles, config: &LoaderConfig) -> AbrResult<ImportBatch> {
    let cancel = AtomicBool::new(false);

    let ((prefectures, cities), towns) = rayon::join(
        || {
            rayon::join(
                || run_tier::<PrefectureRecord>(files.prefecture_file.as_deref(), config, &cancel),
                || run_tier::<CityRecord>(files.city_file.as_deref(), config, &cancel),
            )
        },
        || run_tier::<TownRecord>(files.town_file.as_deref(), config, &cancel),
    );

    collect_batch(prefectures, cities, towns)
}

/// Imports every configured tier concurrently.
///
/// Without the `parallel` feature this is [`import_sequential`].
#[cfg(not(feature = "parallel"))]
pub fn import_parallel(files: &AbrFiles, config: &LoaderConfig) -> AbrResult<ImportBatch> {
    import_sequential(files, config)
}

/// Imports the configured tiers one after another, stopping at the first
/// failure.
pub fn import_sequential(files: &AbrFiles, config: &LoaderConfig) -> AbrResult<ImportBatch> {
    let cancel = AtomicBool::new(false);
    Ok(ImportBatch {
        prefectures: run_tier(files.prefecture_file.as_deref(), config, &cancel)?,
        cities: run_tier(files.city_file.as_deref(), config, &cancel)?,
        towns: run_tier(files.town_file.as_deref(), config, &cancel)?,
    })
}

fn run_tier<T: AbrRecord>(
    path: Option<&Path>,
    config: &LoaderConfig,
    cancel: &AtomicBool,
) -> AbrResult<Option<Vec<T>>> {
    let Some(path) = path else {
        tracing::debug!(tier = T::TIER, "no file configured, skipping");
        return Ok(None);
    };

    match parse_file_cancellable::<T, _>(path, config, cancel) {
        Ok(parsed) => Ok(Some(parsed.records)),
        Err(e) if e.is_cancelled() => {
            tracing::warn!(tier = T::TIER, "abandoned after another tier failed");
            Err(e)
        }
        Err(e) => {
            cancel.store(true, Ordering::Relaxed);
            Err(e)
        }
    }
}

#[cfg(feature = "parallel")]
/// Assembles the batch, or picks the first failure that is not a
/// cancellation, in tier order.
fn collect_batch(
    prefectures: AbrResult<Option<Vec<PrefectureRecord>>>,
    cities: AbrResult<Option<Vec<CityRecord>>>,
    towns: AbrResult<Option<Vec<TownRecord>>>,
) -> AbrResult<ImportBatch> {
    match (prefectures, cities, towns) {
        (Ok(prefectures), Ok(cities), Ok(towns)) => Ok(ImportBatch {
            prefectures,
            cities,
            towns,
        }),
        (p, c, t) => Err(first_failure([p.err(), c.err(), t.err()].into_iter().flatten())
            .unwrap_or(AbrError::Cancelled { tier: "import" })),
    }
}

#[cfg(feature = "parallel")]
fn first_failure(errors: impl IntoIterator<Item = AbrError>) -> Option<AbrError> {
    let mut cancelled = None;
    for err in errors {
        if !err.is_cancelled() {
            return Some(err);
        }
        cancelled.get_or_insert(err);
    }
    cancelled
}
