//! City master records (mt_city).
//!
//! One record per municipality-level region code: cities, towns, villages
//! and the wards of designated cities.

use chrono::NaiveDate;

use crate::builder::required;
use crate::collection::Keyed;
use crate::error::{MasterError, MasterResult};
use crate::fields;
use crate::overrides;

/// An unvalidated city row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityFields {
    /// `lg_code`
    pub region_code: String,
    /// `pref`
    pub pref: String,
    /// `pref_kana`
    pub pref_kana: Option<String>,
    /// `pref_roma`
    pub pref_roma: Option<String>,
    /// `county`
    pub county: Option<String>,
    /// `county_kana`
    pub county_kana: Option<String>,
    /// `county_roma`
    pub county_roma: Option<String>,
    /// `city`
    pub city: String,
    /// `city_kana`
    pub city_kana: Option<String>,
    /// `city_roma`
    pub city_roma: Option<String>,
    /// `ward`
    pub ward: Option<String>,
    /// `ward_kana`
    pub ward_kana: Option<String>,
    /// `ward_roma`
    pub ward_roma: Option<String>,
    /// `efct_date`
    pub effective_date: Option<NaiveDate>,
    /// `ablt_date`
    pub abolition_date: Option<NaiveDate>,
    /// `remarks`
    pub remarks: Option<String>,
}

/// A validated city record, keyed by its region code.
///
/// Romanized county, city and ward names must carry their administrative
/// suffix (`-gun`, `-shi`/`-machi`/..., `-ku`).
///
/// # Examples
///
/// ```
/// use abr_types::CityBuilder;
///
/// let record = CityBuilder::new(Some("131016"), Some("東京都"), Some("千代田区"))
///     .unwrap()
///     .city_roma(Some("Chiyoda-ku"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(record.key(), "131016");
/// assert_eq!(record.city_roma(), Some("Chiyoda-ku"));
/// assert!(!record.has_county());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CityFields", into = "CityFields")
)]
pub struct CityRecord {
    region_code: String,
    pref: String,
    pref_kana: Option<String>,
    pref_roma: Option<String>,
    county: Option<String>,
    county_kana: Option<String>,
    county_roma: Option<String>,
    city: String,
    city_kana: Option<String>,
    city_roma: Option<String>,
    ward: Option<String>,
    ward_kana: Option<String>,
    ward_roma: Option<String>,
    effective_date: Option<NaiveDate>,
    abolition_date: Option<NaiveDate>,
    remarks: Option<String>,
}

impl CityRecord {
    /// The record key, which is the region code.
    pub fn key(&self) -> &str {
        &self.region_code
    }

    /// 6-digit region code.
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// The 2-digit prefecture part of the region code.
    pub fn prefecture_code(&self) -> &str {
        &self.region_code[..2]
    }

    /// Prefecture name.
    pub fn pref(&self) -> &str {
        &self.pref
    }

    /// Prefecture name in katakana.
    pub fn pref_kana(&self) -> Option<&str> {
        self.pref_kana.as_deref()
    }

    /// Romanized prefecture name.
    pub fn pref_roma(&self) -> Option<&str> {
        self.pref_roma.as_deref()
    }

    /// County (郡) name.
    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    /// County name in katakana.
    pub fn county_kana(&self) -> Option<&str> {
        self.county_kana.as_deref()
    }

    /// Romanized county name.
    pub fn county_roma(&self) -> Option<&str> {
        self.county_roma.as_deref()
    }

    /// Returns true if the municipality belongs to a county.
    pub fn has_county(&self) -> bool {
        self.county.is_some()
    }

    /// City name.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// City name in katakana.
    pub fn city_kana(&self) -> Option<&str> {
        self.city_kana.as_deref()
    }

    /// Romanized city name.
    pub fn city_roma(&self) -> Option<&str> {
        self.city_roma.as_deref()
    }

    /// Ward (政令市の区) name.
    pub fn ward(&self) -> Option<&str> {
        self.ward.as_deref()
    }

    /// Ward name in katakana.
    pub fn ward_kana(&self) -> Option<&str> {
        self.ward_kana.as_deref()
    }

    /// Romanized ward name.
    pub fn ward_roma(&self) -> Option<&str> {
        self.ward_roma.as_deref()
    }

    /// Date the record took effect.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    /// Date the record was abolished.
    pub fn abolition_date(&self) -> Option<NaiveDate> {
        self.abolition_date
    }

    /// Free-text remarks.
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Copies the record into its unvalidated row shape.
    pub fn to_fields(&self) -> CityFields {
        self.clone().into()
    }

    /// Rebuilds the record through the builder, re-running every check.
    pub fn revalidated(&self) -> MasterResult<Self> {
        Self::try_from(self.to_fields())
    }
}

impl Keyed for CityRecord {
    fn key(&self) -> &str {
        &self.region_code
    }
}

impl From<CityRecord> for CityFields {
    fn from(record: CityRecord) -> Self {
        Self {
            region_code: record.region_code,
            pref: record.pref,
            pref_kana: record.pref_kana,
            pref_roma: record.pref_roma,
            county: record.county,
            county_kana: record.county_kana,
            county_roma: record.county_roma,
            city: record.city,
            city_kana: record.city_kana,
            city_roma: record.city_roma,
            ward: record.ward,
            ward_kana: record.ward_kana,
            ward_roma: record.ward_roma,
            effective_date: record.effective_date,
            abolition_date: record.abolition_date,
            remarks: record.remarks,
        }
    }
}

impl TryFrom<CityFields> for CityRecord {
    type Error = MasterError;

    fn try_from(source: CityFields) -> MasterResult<Self> {
        CityBuilder::new(
            Some(&source.region_code),
            Some(&source.pref),
            Some(&source.city),
        )?
        .pref_kana(source.pref_kana.as_deref())?
        .pref_roma(source.pref_roma.as_deref())?
        .county(source.county.as_deref())?
        .county_kana(source.county_kana.as_deref())?
        .county_roma(source.county_roma.as_deref())?
        .city_kana(source.city_kana.as_deref())?
        .city_roma(source.city_roma.as_deref())?
        .ward(source.ward.as_deref())?
        .ward_kana(source.ward_kana.as_deref())?
        .ward_roma(source.ward_roma.as_deref())?
        .remarks(source.remarks.as_deref())?
        .effective_date(source.effective_date)
        .abolition_date(source.abolition_date)
        .build()
    }
}

/// Builds a [`CityRecord`], validating each field as it is set.
#[derive(Debug, Clone)]
pub struct CityBuilder {
    key: String,
    region_code: String,
    pref: String,
    pref_kana: Option<String>,
    pref_roma: Option<String>,
    county: Option<String>,
    county_kana: Option<String>,
    county_roma: Option<String>,
    city: String,
    city_kana: Option<String>,
    city_roma: Option<String>,
    ward: Option<String>,
    ward_kana: Option<String>,
    ward_roma: Option<String>,
    effective_date: Option<NaiveDate>,
    abolition_date: Option<NaiveDate>,
    remarks: Option<String>,
}

impl CityBuilder {
    /// Starts a record from its mandatory fields.
    pub fn new(
        region_code: Option<&str>,
        pref: Option<&str>,
        city: Option<&str>,
    ) -> MasterResult<Self> {
        let key = region_code.unwrap_or_default().to_owned();
        let region_code = required(&fields::REGION_CODE, region_code, &key)?;
        let pref = required(&fields::PREF, pref, &key)?;
        let city = required(&fields::CITY, city, &key)?;

        Ok(Self {
            key,
            region_code,
            pref,
            pref_kana: None,
            pref_roma: None,
            county: None,
            county_kana: None,
            county_roma: None,
            city,
            city_kana: None,
            city_roma: None,
            ward: None,
            ward_kana: None,
            ward_roma: None,
            effective_date: None,
            abolition_date: None,
            remarks: None,
        })
    }

    text_setters! {
        pref_kana => PREF_KANA,
        pref_roma => PREF_ROMA,
        county => COUNTY,
        county_kana => COUNTY_KANA,
        county_roma => COUNTY_ROMA,
        city_kana => CITY_KANA,
        ward => WARD,
        ward_kana => WARD_KANA,
        ward_roma => WARD_ROMA,
        remarks => REMARKS,
    }

    /// Validates and sets `city_roma`, honouring the per-region exceptions.
    pub fn city_roma(mut self, value: Option<&str>) -> MasterResult<Self> {
        overrides::validate_field(&fields::CITY_ROMA, value, &self.key, &self.region_code, None)?;
        self.city_roma = value.map(str::to_owned);
        Ok(self)
    }

    date_setters!(effective_date, abolition_date);

    /// Finishes the record.
    pub fn build(self) -> MasterResult<CityRecord> {
        Ok(CityRecord {
            region_code: self.region_code,
            pref: self.pref,
            pref_kana: self.pref_kana,
            pref_roma: self.pref_roma,
            county: self.county,
            county_kana: self.county_kana,
            county_roma: self.county_roma,
            city: self.city,
            city_kana: self.city_kana,
            city_roma: self.city_roma,
            ward: self.ward,
            ward_kana: self.ward_kana,
            ward_roma: self.ward_roma,
            effective_date: self.effective_date,
            abolition_date: self.abolition_date,
            remarks: self.remarks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_builder(region_code: &str) -> CityBuilder {
        CityBuilder::new(Some(region_code), Some("山梨県"), Some("市川三郷町")).unwrap()
    }

    fn make_fields() -> CityFields {
        CityFields {
            region_code: "011029".to_string(),
            pref: "北海道".to_string(),
            pref_kana: Some("ホッカイドウ".to_string()),
            pref_roma: Some("Hokkaido".to_string()),
            city: "札幌市".to_string(),
            city_kana: Some("サッポロシ".to_string()),
            city_roma: Some("Sapporo-shi".to_string()),
            ward: Some("北区".to_string()),
            ward_kana: Some("キタク".to_string()),
            ward_roma: Some("Kita-ku".to_string()),
            effective_date: NaiveDate::from_ymd_opt(1972, 4, 1),
            ..CityFields::default()
        }
    }

    #[test]
    fn test_suffix_exception_applies_to_exact_region_only() {
        let record = make_builder("193461")
            .city_roma(Some("Ichikawamisato-"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(record.city_roma(), Some("Ichikawamisato-"));

        let err = make_builder("193462")
            .city_roma(Some("Ichikawamisato-"))
            .unwrap_err();
        assert!(matches!(err, MasterError::MissingSuffix { field: "city_roma", .. }));
    }

    #[test]
    fn test_exception_keeps_character_class() {
        let err = make_builder("193461").city_roma(Some("市川三郷")).unwrap_err();
        assert!(matches!(err, MasterError::OutOfRange { field: "city_roma", .. }));
    }

    #[test]
    fn test_county_fields_use_their_own_rules() {
        let builder = make_builder("193461")
            .county(Some("西八代郡"))
            .unwrap()
            .county_kana(Some("ニシヤツシログン"))
            .unwrap()
            .county_roma(Some("Nishiyatsushiro-gun"))
            .unwrap();
        let record = builder.build().unwrap();
        assert!(record.has_county());

        let err = make_builder("193461").county_roma(Some("Nishiyatsushiro")).unwrap_err();
        assert!(matches!(err, MasterError::MissingSuffix { field: "county_roma", .. }));
    }

    #[test]
    fn test_ward_roma_requires_ku() {
        let err = make_builder("011029").ward_roma(Some("Kita")).unwrap_err();
        assert!(matches!(err, MasterError::MissingSuffix { field: "ward_roma", .. }));
    }

    #[test]
    fn test_city_is_mandatory() {
        let err = CityBuilder::new(Some("011029"), Some("北海道"), None).unwrap_err();
        assert!(matches!(err, MasterError::NotNull { field: "city", .. }));
        assert_eq!(err.to_string(), "[011029:city] value is mandatory but was empty");
    }

    #[test]
    fn test_copy_constructor_preserves_every_field() {
        let record = CityRecord::try_from(make_fields()).unwrap();
        assert_eq!(record.prefecture_code(), "01");
        assert_eq!(record.to_fields(), make_fields());
        assert_eq!(record.revalidated().unwrap(), record);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_runs_validation() {
        let mut fields = make_fields();
        fields.city_roma = Some("Sapporo".to_string());
        let json = serde_json::to_string(&fields).unwrap();
        let err = serde_json::from_str::<CityRecord>(&json).unwrap_err();
        assert!(err.to_string().contains("city_roma"));
    }
}
