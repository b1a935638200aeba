//! Prefecture master records (mt_pref).

use chrono::NaiveDate;

use crate::builder::required;
use crate::collection::Keyed;
use crate::error::{MasterError, MasterResult};
use crate::fields;

/// An unvalidated prefecture row.
///
/// This is the shape records serialize to and are rebuilt from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefectureFields {
    /// `lg_code`
    pub region_code: String,
    /// `pref`
    pub pref: String,
    /// `pref_kana`
    pub pref_kana: Option<String>,
    /// `pref_roma`
    pub pref_roma: Option<String>,
    /// `efct_date`
    pub effective_date: Option<NaiveDate>,
    /// `ablt_date`
    pub abolition_date: Option<NaiveDate>,
    /// `remarks`
    pub remarks: Option<String>,
}

/// A validated prefecture record, keyed by its region code.
///
/// # Examples
///
/// ```
/// use abr_types::PrefectureBuilder;
///
/// let record = PrefectureBuilder::new(Some("011011"), Some("北海道"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(record.key(), "011011");
/// assert_eq!(record.pref(), "北海道");
/// assert_eq!(record.pref_kana(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PrefectureFields", into = "PrefectureFields")
)]
pub struct PrefectureRecord {
    region_code: String,
    pref: String,
    pref_kana: Option<String>,
    pref_roma: Option<String>,
    effective_date: Option<NaiveDate>,
    abolition_date: Option<NaiveDate>,
    remarks: Option<String>,
}

impl PrefectureRecord {
    /// The record key, which is the region code.
    pub fn key(&self) -> &str {
        &self.region_code
    }

    /// 6-digit region code.
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// Prefecture name.
    pub fn pref(&self) -> &str {
        &self.pref
    }

    /// Prefecture name in full-width katakana.
    pub fn pref_kana(&self) -> Option<&str> {
        self.pref_kana.as_deref()
    }

    /// Romanized prefecture name.
    pub fn pref_roma(&self) -> Option<&str> {
        self.pref_roma.as_deref()
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
    pub fn to_fields(&self) -> PrefectureFields {
        self.clone().into()
    }

    /// Rebuilds the record through the builder, re-running every check.
    pub fn revalidated(&self) -> MasterResult<Self> {
        Self::try_from(self.to_fields())
    }
}

impl Keyed for PrefectureRecord {
    fn key(&self) -> &str {
        &self.region_code
    }
}

impl From<PrefectureRecord> for PrefectureFields {
    fn from(record: PrefectureRecord) -> Self {
        Self {
            region_code: record.region_code,
            pref: record.pref,
            pref_kana: record.pref_kana,
            pref_roma: record.pref_roma,
            effective_date: record.effective_date,
            abolition_date: record.abolition_date,
            remarks: record.remarks,
        }
    }
}

impl TryFrom<PrefectureFields> for PrefectureRecord {
    type Error = MasterError;

    fn try_from(source: PrefectureFields) -> MasterResult<Self> {
        PrefectureBuilder::new(Some(&source.region_code), Some(&source.pref))?
            .pref_kana(source.pref_kana.as_deref())?
            .pref_roma(source.pref_roma.as_deref())?
            .remarks(source.remarks.as_deref())?
            .effective_date(source.effective_date)
            .abolition_date(source.abolition_date)
            .build()
    }
}

/// Builds a [`PrefectureRecord`], validating each field as it is set.
#[derive(Debug, Clone)]
pub struct PrefectureBuilder {
    key: String,
    region_code: String,
    pref: String,
    pref_kana: Option<String>,
    pref_roma: Option<String>,
    effective_date: Option<NaiveDate>,
    abolition_date: Option<NaiveDate>,
    remarks: Option<String>,
}

impl PrefectureBuilder {
    /// Starts a record from its mandatory fields.
    pub fn new(region_code: Option<&str>, pref: Option<&str>) -> MasterResult<Self> {
        let key = region_code.unwrap_or_default().to_owned();
        let region_code = required(&fields::REGION_CODE, region_code, &key)?;
        let pref = required(&fields::PREF, pref, &key)?;

        Ok(Self {
            key,
            region_code,
            pref,
            pref_kana: None,
            pref_roma: None,
            effective_date: None,
            abolition_date: None,
            remarks: None,
        })
    }

    text_setters! {
        pref_kana => PREF_KANA,
        pref_roma => PREF_ROMA,
        remarks => REMARKS,
    }

    date_setters!(effective_date, abolition_date);

    /// Finishes the record.
    pub fn build(self) -> MasterResult<PrefectureRecord> {
        Ok(PrefectureRecord {
            region_code: self.region_code,
            pref: self.pref,
            pref_kana: self.pref_kana,
            pref_roma: self.pref_roma,
            effective_date: self.effective_date,
            abolition_date: self.abolition_date,
            remarks: self.remarks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fields() -> PrefectureFields {
        PrefectureFields {
            region_code: "130001".to_string(),
            pref: "東京都".to_string(),
            pref_kana: Some("トウキョウト".to_string()),
            pref_roma: Some("Tokyo".to_string()),
            effective_date: NaiveDate::from_ymd_opt(1947, 4, 17),
            abolition_date: None,
            remarks: None,
        }
    }

    #[test]
    fn test_minimal_record() {
        let record = PrefectureBuilder::new(Some("011011"), Some("北海道"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(record.region_code(), "011011");
        assert_eq!(record.pref_roma(), None);
        assert_eq!(record.effective_date(), None);
    }

    #[test]
    fn test_pref_name_is_validated() {
        let err = PrefectureBuilder::new(Some("011011"), None).unwrap_err();
        assert!(matches!(err, MasterError::NotNull { field: "pref", .. }));

        let err = PrefectureBuilder::new(Some("011011"), Some("北海道北海道北海道北海道"))
            .unwrap_err();
        assert!(matches!(err, MasterError::Length { field: "pref", .. }));
    }

    #[test]
    fn test_region_code_must_be_ascii_digits() {
        let err = PrefectureBuilder::new(Some("０１１０１１"), Some("北海道")).unwrap_err();
        assert!(matches!(err, MasterError::OutOfRange { field: "lg_code", .. }));
        assert_eq!(err.key(), "０１１０１１");
    }

    #[test]
    fn test_setter_rejects_half_width_kana() {
        let err = PrefectureBuilder::new(Some("011011"), Some("北海道"))
            .unwrap()
            .pref_kana(Some("ﾎｯｶｲﾄﾞｳ"))
            .unwrap_err();
        assert!(matches!(err, MasterError::OutOfRange { field: "pref_kana", .. }));
    }

    #[test]
    fn test_copy_constructor_preserves_every_field() {
        let record = PrefectureRecord::try_from(make_fields()).unwrap();
        assert_eq!(record.to_fields(), make_fields());
        assert_eq!(record.revalidated().unwrap(), record);
    }

    #[test]
    fn test_copy_constructor_rejects_bad_source() {
        let mut fields = make_fields();
        fields.pref_roma = Some("東京".to_string());
        assert!(PrefectureRecord::try_from(fields).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_runs_validation() {
        let json = serde_json::to_string(&make_fields()).unwrap();
        let record: PrefectureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.pref_kana(), Some("トウキョウト"));

        let mut bad = make_fields();
        bad.region_code = "1300".to_string();
        let json = serde_json::to_string(&bad).unwrap();
        assert!(serde_json::from_str::<PrefectureRecord>(&json).is_err());
    }
}
