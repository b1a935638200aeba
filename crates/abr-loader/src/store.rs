//! In-memory address master store.
//!
//! The store is the persistence boundary of an import: a
//! [`MasterRepository`] receives a whole [`ImportBatch`] and replaces every
//! tier present in it, or nothing at all.
//!
//! ```ignore
//! let mut store = AddressStore::new();
//! store.replace_all(import_parallel(&files, &LoaderConfig::default())?)?;
//!
//! let chiyoda = store.get_city("131016");
//! let blocks = store.towns_in("131016");
//! ```

use std::collections::HashMap;
use std::fmt;

use abr_types::{ensure_unique_keys, CityRecord, Keyed, PrefectureRecord, TownRecord};

use crate::import::ImportBatch;
use crate::parser::AbrRecord;
use crate::types::{AbrError, AbrResult};

/// A destination for imported master records.
pub trait MasterRepository {
    /// Clears and refills every tier present in `batch`. Tiers that are
    /// `None` are left as they are. On error nothing is changed.
    fn replace_all(&mut self, batch: ImportBatch) -> AbrResult<()>;
}

/// In-memory store of the three master tiers.
///
/// Prefectures and cities are indexed by region code, towns by their
/// composite key with a secondary index by region code.
#[derive(Default, Clone)]
pub struct AddressStore {
    prefectures: HashMap<String, PrefectureRecord>,
    cities: HashMap<String, CityRecord>,
    towns: HashMap<String, TownRecord>,
    /// Town keys per region code, in import order.
    towns_by_region: HashMap<String, Vec<String>>,
}

impl fmt::Debug for AddressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressStore")
            .field("prefectures", &self.prefectures.len())
            .field("cities", &self.cities.len())
            .field("towns", &self.towns.len())
            .finish()
    }
}

impl AddressStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a prefecture by region code.
    pub fn get_prefecture(&self, region_code: &str) -> Option<&PrefectureRecord> {
        self.prefectures.get(region_code)
    }

    /// Looks up a city by region code.
    pub fn get_city(&self, region_code: &str) -> Option<&CityRecord> {
        self.cities.get(region_code)
    }

    /// Looks up a town by its composite key.
    pub fn get_town(&self, key: &str) -> Option<&TownRecord> {
        self.towns.get(key)
    }

    /// Towns of one municipality, in import order.
    pub fn towns_in(&self, region_code: &str) -> Vec<&TownRecord> {
        self.towns_by_region
            .get(region_code)
            .map(|keys| keys.iter().filter_map(|key| self.towns.get(key)).collect())
            .unwrap_or_default()
    }

    /// Cities whose region code starts with a 2-digit prefecture code.
    pub fn cities_in(&self, prefecture_code: &str) -> Vec<&CityRecord> {
        let mut cities: Vec<&CityRecord> = self
            .cities
            .values()
            .filter(|city| city.prefecture_code() == prefecture_code)
            .collect();
        cities.sort_by(|a, b| a.region_code().cmp(b.region_code()));
        cities
    }

    /// Returns the number of prefectures.
    pub fn prefecture_count(&self) -> usize {
        self.prefectures.len()
    }

    /// Returns the number of cities.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Returns the number of towns.
    pub fn town_count(&self) -> usize {
        self.towns.len()
    }

    /// Returns true if no tier holds any record.
    pub fn is_empty(&self) -> bool {
        self.prefectures.is_empty() && self.cities.is_empty() && self.towns.is_empty()
    }
}

impl MasterRepository for AddressStore {
    fn replace_all(&mut self, batch: ImportBatch) -> AbrResult<()> {
        // Check every tier before touching any of them
        check_tier::<PrefectureRecord>(batch.prefectures.as_deref())?;
        check_tier::<CityRecord>(batch.cities.as_deref())?;
        check_tier::<TownRecord>(batch.towns.as_deref())?;

        if let Some(prefectures) = batch.prefectures {
            self.prefectures = index_by_key(prefectures);
        }
        if let Some(cities) = batch.cities {
            self.cities = index_by_key(cities);
        }
        if let Some(towns) = batch.towns {
            let mut by_region: HashMap<String, Vec<String>> = HashMap::new();
            for town in &towns {
                by_region
                    .entry(town.region_code().to_string())
                    .or_default()
                    .push(town.key().to_string());
            }
            self.towns = index_by_key(towns);
            self.towns_by_region = by_region;
        }

        tracing::debug!(store = ?self, "store contents replaced");
        Ok(())
    }
}

fn check_tier<T: AbrRecord>(records: Option<&[T]>) -> AbrResult<()> {
    match records {
        Some(records) => ensure_unique_keys(records)
            .map_err(|source| AbrError::Rejected { tier: T::TIER, source }),
        None => Ok(()),
    }
}

fn index_by_key<T: Keyed>(records: Vec<T>) -> HashMap<String, T> {
    records
        .into_iter()
        .map(|record| (record.key().to_string(), record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use abr_types::{CityBuilder, MasterError, PrefectureBuilder, TownBuilder};
    use chrono::NaiveDate;

    fn make_pref(region: &str, name: &str) -> PrefectureRecord {
        PrefectureBuilder::new(Some(region), Some(name)).unwrap().build().unwrap()
    }

    fn make_city(region: &str, name: &str) -> CityRecord {
        CityBuilder::new(Some(region), Some("東京都"), Some(name))
            .unwrap()
            .build()
            .unwrap()
    }

    fn make_town(region: &str, major: u16) -> TownRecord {
        let block_id = format!("{major:04}000");
        TownBuilder::new(
            Some(region),
            Some(&block_id),
            Some("1"),
            Some("東京都"),
            Some("千代田区"),
            Some("0"),
            NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
        )
        .unwrap()
        .major_area(Some("丸の内"))
        .unwrap()
        .build()
        .unwrap()
    }

    fn make_batch() -> ImportBatch {
        ImportBatch {
            prefectures: Some(vec![make_pref("130001", "東京都")]),
            cities: Some(vec![make_city("131016", "千代田区"), make_city("131024", "中央区")]),
            towns: Some(vec![
                make_town("131016", 2),
                make_town("131016", 1),
                make_town("131024", 1),
            ]),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AddressStore::new();
        assert!(store.is_empty());
        assert_eq!(
            format!("{store:?}"),
            "AddressStore { prefectures: 0, cities: 0, towns: 0 }"
        );
    }

    #[test]
    fn test_replace_all_and_lookups() {
        let mut store = AddressStore::new();
        store.replace_all(make_batch()).unwrap();

        assert_eq!(store.prefecture_count(), 1);
        assert_eq!(store.city_count(), 2);
        assert_eq!(store.town_count(), 3);
        assert_eq!(store.get_prefecture("130001").unwrap().pref(), "東京都");
        assert_eq!(store.get_city("131024").unwrap().city(), "中央区");
        assert!(store.get_town("131016-0001000-0-20200401").is_some());

        let chiyoda: Vec<&str> = store.towns_in("131016").iter().map(|t| t.block_id()).collect();
        assert_eq!(chiyoda, vec!["0002000", "0001000"]);
        assert!(store.towns_in("999999").is_empty());

        let tokyo: Vec<&str> = store.cities_in("13").iter().map(|c| c.region_code()).collect();
        assert_eq!(tokyo, vec!["131016", "131024"]);
    }

    #[test]
    fn test_absent_tier_is_kept() {
        let mut store = AddressStore::new();
        store.replace_all(make_batch()).unwrap();

        store
            .replace_all(ImportBatch {
                cities: Some(vec![make_city("131016", "千代田区")]),
                ..ImportBatch::default()
            })
            .unwrap();

        assert_eq!(store.prefecture_count(), 1);
        assert_eq!(store.city_count(), 1);
        assert_eq!(store.town_count(), 3);
    }

    #[test]
    fn test_failing_batch_changes_nothing() {
        let mut store = AddressStore::new();
        store.replace_all(make_batch()).unwrap();

        let err = store
            .replace_all(ImportBatch {
                prefectures: Some(vec![make_pref("010006", "北海道")]),
                cities: None,
                towns: Some(vec![make_town("131016", 1), make_town("131016", 1)]),
            })
            .unwrap_err();

        match err {
            AbrError::Rejected { tier, source } => {
                assert_eq!(tier, "mt_town");
                assert!(matches!(source, MasterError::DuplicateKey { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.get_prefecture("130001").is_some());
        assert!(store.get_prefecture("010006").is_none());
        assert_eq!(store.town_count(), 3);
    }
}
