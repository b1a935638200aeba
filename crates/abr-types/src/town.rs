//! Town master records (mt_town).
//!
//! A town record describes one major area (大字・町), numbered block (丁目)
//! or sub-block (小字) of a municipality. Besides the per-field grammar,
//! [`TownBuilder::build`] checks that the block identifier, the block-type
//! code and the subdivision fields agree (see [`crate::relation`]).

use chrono::NaiveDate;

use crate::block_id::BlockId;
use crate::builder::required;
use crate::collection::Keyed;
use crate::enums::{
    BlockType, CodeSet, MajorAreaAlias, Numbering, ResidentialDisplay, ResidentialDisplayMethod,
    Source, Status, SubBlockAlias,
};
use crate::error::{MasterError, MasterResult};
use crate::fields;
use crate::overrides;
use crate::relation;

/// Builds the composite town key `{region}-{block_id}-{flag}-{yyyymmdd}`.
///
/// # Examples
///
/// ```
/// use abr_types::town_key;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
/// assert_eq!(town_key("131016", "0001001", "1", date), "131016-0001001-1-20200401");
/// ```
pub fn town_key(
    region_code: &str,
    block_id: &str,
    residential_display: &str,
    effective_date: NaiveDate,
) -> String {
    format!(
        "{}-{}-{}-{}",
        region_code,
        block_id,
        residential_display,
        effective_date.format("%Y%m%d")
    )
}

/// An unvalidated town row. Coded fields hold their raw codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TownFields {
    /// `lg_code`
    pub region_code: String,
    /// `machiaza_id`
    pub block_id: String,
    /// `machiaza_type`
    pub block_type: String,
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
    /// `oaza_cho`
    pub major_area: Option<String>,
    /// `oaza_cho_kana`
    pub major_area_kana: Option<String>,
    /// `oaza_cho_roma`
    pub major_area_roma: Option<String>,
    /// `chome`
    pub numbered_block: Option<String>,
    /// `chome_kana`
    pub numbered_block_kana: Option<String>,
    /// `chome_number`
    pub numbered_block_number: Option<String>,
    /// `koaza`
    pub sub_block: Option<String>,
    /// `koaza_kana`
    pub sub_block_kana: Option<String>,
    /// `koaza_roma`
    pub sub_block_roma: Option<String>,
    /// `machiaza_dist`
    pub area_discriminator: Option<String>,
    /// `rsdt_addr_flg`
    pub residential_display: String,
    /// `rsdt_addr_mtd_code`
    pub residential_display_method: Option<String>,
    /// `oaza_cho_aka_flg`
    pub major_area_alias: Option<String>,
    /// `koaza_aka_code`
    pub sub_block_alias: Option<String>,
    /// `oaza_cho_gsi_uncmn`
    pub major_area_uncommon: Option<String>,
    /// `koaza_gsi_uncmn`
    pub sub_block_uncommon: Option<String>,
    /// `status_flg`
    pub status: Option<String>,
    /// `wake_num_flg`
    pub numbering: Option<String>,
    /// `efct_date`
    pub effective_date: NaiveDate,
    /// `ablt_date`
    pub abolition_date: Option<NaiveDate>,
    /// `src_code`
    pub source: Option<String>,
    /// `post_code`
    pub post_code: Option<String>,
    /// `remarks`
    pub remarks: Option<String>,
}

/// A validated town record.
///
/// # Examples
///
/// ```
/// use abr_types::{BlockType, Subdivision, TownBuilder};
/// use chrono::NaiveDate;
///
/// let effective = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
/// let town = TownBuilder::new(
///     Some("131016"),
///     Some("0001001"),
///     Some("2"),
///     Some("東京都"),
///     Some("千代田区"),
///     Some("1"),
///     effective,
/// )
/// .and_then(|b| b.major_area(Some("丸の内")))
/// .and_then(|b| b.numbered_block(Some("一丁目")))
/// .and_then(|b| b.numbered_block_kana(Some("１チョウメ")))
/// .and_then(|b| b.numbered_block_number(Some("01")))
/// .and_then(|b| b.build())
/// .unwrap();
///
/// assert_eq!(town.key(), "131016-0001001-1-20200401");
/// assert_eq!(town.block_type(), BlockType::NumberedBlock);
/// assert_eq!(town.decoded_block_id().subdivision(), Subdivision::NumberedBlock);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TownFields", into = "TownFields")
)]
pub struct TownRecord {
    key: String,
    region_code: String,
    block_id: String,
    block: BlockId,
    block_type: BlockType,
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
    major_area: Option<String>,
    major_area_kana: Option<String>,
    major_area_roma: Option<String>,
    numbered_block: Option<String>,
    numbered_block_kana: Option<String>,
    numbered_block_number: Option<String>,
    sub_block: Option<String>,
    sub_block_kana: Option<String>,
    sub_block_roma: Option<String>,
    area_discriminator: Option<String>,
    residential_display: ResidentialDisplay,
    residential_display_method: Option<ResidentialDisplayMethod>,
    major_area_alias: Option<MajorAreaAlias>,
    sub_block_alias: Option<SubBlockAlias>,
    major_area_uncommon: Option<String>,
    sub_block_uncommon: Option<String>,
    status: Option<Status>,
    numbering: Option<Numbering>,
    effective_date: NaiveDate,
    abolition_date: Option<NaiveDate>,
    source: Option<Source>,
    post_code: Option<String>,
    remarks: Option<String>,
}

impl TownRecord {
    /// Composite key `{region}-{block_id}-{flag}-{yyyymmdd}`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 6-digit region code of the municipality.
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// 7-digit block identifier.
    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    /// The block identifier split into its sub-codes.
    pub fn decoded_block_id(&self) -> BlockId {
        self.block
    }

    /// Block-type classification.
    pub fn block_type(&self) -> BlockType {
        self.block_type
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

    /// County name.
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

    /// Ward name.
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

    /// Major-area (大字・町) name.
    pub fn major_area(&self) -> Option<&str> {
        self.major_area.as_deref()
    }

    /// Major-area name in katakana.
    pub fn major_area_kana(&self) -> Option<&str> {
        self.major_area_kana.as_deref()
    }

    /// Romanized major-area name.
    pub fn major_area_roma(&self) -> Option<&str> {
        self.major_area_roma.as_deref()
    }

    /// Numbered-block (丁目) name.
    pub fn numbered_block(&self) -> Option<&str> {
        self.numbered_block.as_deref()
    }

    /// Numbered-block name in katakana.
    pub fn numbered_block_kana(&self) -> Option<&str> {
        self.numbered_block_kana.as_deref()
    }

    /// Numbered-block number as written, e.g. `"01"`.
    pub fn numbered_block_number(&self) -> Option<&str> {
        self.numbered_block_number.as_deref()
    }

    /// Sub-block (小字) name.
    pub fn sub_block(&self) -> Option<&str> {
        self.sub_block.as_deref()
    }

    /// Sub-block name in katakana.
    pub fn sub_block_kana(&self) -> Option<&str> {
        self.sub_block_kana.as_deref()
    }

    /// Romanized sub-block name.
    pub fn sub_block_roma(&self) -> Option<&str> {
        self.sub_block_roma.as_deref()
    }

    /// Distinguishes towns of the same name within a municipality.
    pub fn area_discriminator(&self) -> Option<&str> {
        self.area_discriminator.as_deref()
    }

    /// Residential-display flag.
    pub fn residential_display(&self) -> ResidentialDisplay {
        self.residential_display
    }

    /// Residential-display method.
    pub fn residential_display_method(&self) -> Option<ResidentialDisplayMethod> {
        self.residential_display_method
    }

    /// Major-area alias flag.
    pub fn major_area_alias(&self) -> Option<MajorAreaAlias> {
        self.major_area_alias
    }

    /// Sub-block alias code.
    pub fn sub_block_alias(&self) -> Option<SubBlockAlias> {
        self.sub_block_alias
    }

    /// Uncommon-character marker of the major-area name.
    pub fn major_area_uncommon(&self) -> Option<&str> {
        self.major_area_uncommon.as_deref()
    }

    /// Uncommon-character marker of the sub-block name.
    pub fn sub_block_uncommon(&self) -> Option<&str> {
        self.sub_block_uncommon.as_deref()
    }

    /// Status flag.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Numbering flag.
    pub fn numbering(&self) -> Option<Numbering> {
        self.numbering
    }

    /// Date the record took effect.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Date the record was abolished.
    pub fn abolition_date(&self) -> Option<NaiveDate> {
        self.abolition_date
    }

    /// Provenance of the record.
    pub fn source(&self) -> Option<Source> {
        self.source
    }

    /// Postal codes.
    pub fn post_code(&self) -> Option<&str> {
        self.post_code.as_deref()
    }

    /// Free-text remarks.
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Returns true if the record is still in force.
    pub fn is_current(&self) -> bool {
        self.abolition_date.is_none()
    }

    /// Copies the record into its unvalidated row shape.
    pub fn to_fields(&self) -> TownFields {
        self.clone().into()
    }

    /// Rebuilds the record through the builder, re-running every check.
    pub fn revalidated(&self) -> MasterResult<Self> {
        Self::try_from(self.to_fields())
    }
}

impl Keyed for TownRecord {
    fn key(&self) -> &str {
        &self.key
    }
}

impl From<TownRecord> for TownFields {
    fn from(record: TownRecord) -> Self {
        Self {
            region_code: record.region_code,
            block_id: record.block_id,
            block_type: record.block_type.code().to_string(),
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
            major_area: record.major_area,
            major_area_kana: record.major_area_kana,
            major_area_roma: record.major_area_roma,
            numbered_block: record.numbered_block,
            numbered_block_kana: record.numbered_block_kana,
            numbered_block_number: record.numbered_block_number,
            sub_block: record.sub_block,
            sub_block_kana: record.sub_block_kana,
            sub_block_roma: record.sub_block_roma,
            area_discriminator: record.area_discriminator,
            residential_display: record.residential_display.code().to_string(),
            residential_display_method: code_text(record.residential_display_method),
            major_area_alias: code_text(record.major_area_alias),
            sub_block_alias: code_text(record.sub_block_alias),
            major_area_uncommon: record.major_area_uncommon,
            sub_block_uncommon: record.sub_block_uncommon,
            status: code_text(record.status),
            numbering: code_text(record.numbering),
            effective_date: record.effective_date,
            abolition_date: record.abolition_date,
            source: code_text(record.source),
            post_code: record.post_code,
            remarks: record.remarks,
        }
    }
}

fn code_text<T: CodeSet>(value: Option<T>) -> Option<String> {
    value.map(|v| v.code().to_string())
}

impl TryFrom<TownFields> for TownRecord {
    type Error = MasterError;

    fn try_from(source: TownFields) -> MasterResult<Self> {
        TownBuilder::new(
            Some(&source.region_code),
            Some(&source.block_id),
            Some(&source.block_type),
            Some(&source.pref),
            Some(&source.city),
            Some(&source.residential_display),
            source.effective_date,
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
        .major_area(source.major_area.as_deref())?
        .major_area_kana(source.major_area_kana.as_deref())?
        .major_area_roma(source.major_area_roma.as_deref())?
        .numbered_block(source.numbered_block.as_deref())?
        .numbered_block_kana(source.numbered_block_kana.as_deref())?
        .numbered_block_number(source.numbered_block_number.as_deref())?
        .sub_block(source.sub_block.as_deref())?
        .sub_block_kana(source.sub_block_kana.as_deref())?
        .sub_block_roma(source.sub_block_roma.as_deref())?
        .area_discriminator(source.area_discriminator.as_deref())?
        .residential_display_method(source.residential_display_method.as_deref())?
        .major_area_alias(source.major_area_alias.as_deref())?
        .sub_block_alias(source.sub_block_alias.as_deref())?
        .major_area_uncommon(source.major_area_uncommon.as_deref())?
        .sub_block_uncommon(source.sub_block_uncommon.as_deref())?
        .status(source.status.as_deref())?
        .numbering(source.numbering.as_deref())?
        .source(source.source.as_deref())?
        .post_code(source.post_code.as_deref())?
        .remarks(source.remarks.as_deref())?
        .abolition_date(source.abolition_date)
        .build()
    }
}

/// Builds a [`TownRecord`].
///
/// Fields are validated as they are set; [`build`](Self::build) then runs
/// the cross-field rules.
#[derive(Debug, Clone)]
pub struct TownBuilder {
    key: String,
    region_code: String,
    block_id: String,
    block: BlockId,
    block_type: BlockType,
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
    major_area: Option<String>,
    major_area_kana: Option<String>,
    major_area_roma: Option<String>,
    numbered_block: Option<String>,
    numbered_block_kana: Option<String>,
    numbered_block_number: Option<String>,
    sub_block: Option<String>,
    sub_block_kana: Option<String>,
    sub_block_roma: Option<String>,
    area_discriminator: Option<String>,
    residential_display: ResidentialDisplay,
    residential_display_method: Option<ResidentialDisplayMethod>,
    major_area_alias: Option<MajorAreaAlias>,
    sub_block_alias: Option<SubBlockAlias>,
    major_area_uncommon: Option<String>,
    sub_block_uncommon: Option<String>,
    status: Option<Status>,
    numbering: Option<Numbering>,
    effective_date: NaiveDate,
    abolition_date: Option<NaiveDate>,
    source: Option<Source>,
    post_code: Option<String>,
    remarks: Option<String>,
}

impl TownBuilder {
    /// Starts a record from its mandatory fields.
    ///
    /// The key is formed from the raw values first so that every diagnostic,
    /// including those for the key fields themselves, names the record.
    pub fn new(
        region_code: Option<&str>,
        block_id: Option<&str>,
        block_type: Option<&str>,
        pref: Option<&str>,
        city: Option<&str>,
        residential_display: Option<&str>,
        effective_date: NaiveDate,
    ) -> MasterResult<Self> {
        let key = town_key(
            region_code.unwrap_or_default(),
            block_id.unwrap_or_default(),
            residential_display.unwrap_or_default(),
            effective_date,
        );

        let region_code = required(&fields::REGION_CODE, region_code, &key)?;
        let block_id = required(&fields::BLOCK_ID, block_id, &key)?;
        let block = BlockId::decode(&block_id, &key)?;
        let block_type = required(&fields::BLOCK_TYPE, block_type, &key)?;
        let block_type = BlockType::parse(&block_type, fields::BLOCK_TYPE.name, &key)?;
        let pref = required(&fields::PREF, pref, &key)?;
        let city = required(&fields::CITY, city, &key)?;
        let residential_display =
            required(&fields::RESIDENTIAL_DISPLAY, residential_display, &key)?;
        let residential_display = ResidentialDisplay::parse(
            &residential_display,
            fields::RESIDENTIAL_DISPLAY.name,
            &key,
        )?;

        Ok(Self {
            key,
            region_code,
            block_id,
            block,
            block_type,
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
            major_area: None,
            major_area_kana: None,
            major_area_roma: None,
            numbered_block: None,
            numbered_block_kana: None,
            numbered_block_number: None,
            sub_block: None,
            sub_block_kana: None,
            sub_block_roma: None,
            area_discriminator: None,
            residential_display,
            residential_display_method: None,
            major_area_alias: None,
            sub_block_alias: None,
            major_area_uncommon: None,
            sub_block_uncommon: None,
            status: None,
            numbering: None,
            effective_date,
            abolition_date: None,
            source: None,
            post_code: None,
            remarks: None,
        })
    }

    /// The composite key of the record being built.
    pub fn key(&self) -> &str {
        &self.key
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
        major_area => MAJOR_AREA,
        major_area_kana => MAJOR_AREA_KANA,
        major_area_roma => MAJOR_AREA_ROMA,
        numbered_block => NUMBERED_BLOCK,
        numbered_block_kana => NUMBERED_BLOCK_KANA,
        numbered_block_number => NUMBERED_BLOCK_NUMBER,
        sub_block => SUB_BLOCK,
        sub_block_roma => SUB_BLOCK_ROMA,
        area_discriminator => AREA_DISCRIMINATOR,
        major_area_uncommon => MAJOR_AREA_UNCOMMON,
        sub_block_uncommon => SUB_BLOCK_UNCOMMON,
        post_code => POST_CODE,
        remarks => REMARKS,
    }

    code_setters! {
        residential_display_method => RESIDENTIAL_DISPLAY_METHOD as ResidentialDisplayMethod,
        major_area_alias => MAJOR_AREA_ALIAS as MajorAreaAlias,
        sub_block_alias => SUB_BLOCK_ALIAS as SubBlockAlias,
        status => STATUS as Status,
        numbering => NUMBERING as Numbering,
        source => SOURCE as Source,
    }

    /// Validates and sets `city_roma`, honouring the per-region exceptions.
    pub fn city_roma(mut self, value: Option<&str>) -> MasterResult<Self> {
        overrides::validate_field(
            &fields::CITY_ROMA,
            value,
            &self.key,
            &self.region_code,
            Some(&self.block_id),
        )?;
        self.city_roma = value.map(str::to_owned);
        Ok(self)
    }

    /// Validates and sets `sub_block_kana`, honouring the per-block exceptions.
    pub fn sub_block_kana(mut self, value: Option<&str>) -> MasterResult<Self> {
        overrides::validate_field(
            &fields::SUB_BLOCK_KANA,
            value,
            &self.key,
            &self.region_code,
            Some(&self.block_id),
        )?;
        self.sub_block_kana = value.map(str::to_owned);
        Ok(self)
    }

    date_setters!(abolition_date);

    /// Finishes the record and checks the cross-field rules.
    pub fn build(self) -> MasterResult<TownRecord> {
        let town = TownRecord {
            key: self.key,
            region_code: self.region_code,
            block_id: self.block_id,
            block: self.block,
            block_type: self.block_type,
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
            major_area: self.major_area,
            major_area_kana: self.major_area_kana,
            major_area_roma: self.major_area_roma,
            numbered_block: self.numbered_block,
            numbered_block_kana: self.numbered_block_kana,
            numbered_block_number: self.numbered_block_number,
            sub_block: self.sub_block,
            sub_block_kana: self.sub_block_kana,
            sub_block_roma: self.sub_block_roma,
            area_discriminator: self.area_discriminator,
            residential_display: self.residential_display,
            residential_display_method: self.residential_display_method,
            major_area_alias: self.major_area_alias,
            sub_block_alias: self.sub_block_alias,
            major_area_uncommon: self.major_area_uncommon,
            sub_block_uncommon: self.sub_block_uncommon,
            status: self.status,
            numbering: self.numbering,
            effective_date: self.effective_date,
            abolition_date: self.abolition_date,
            source: self.source,
            post_code: self.post_code,
            remarks: self.remarks,
        };
        relation::validate_town(&town)?;
        Ok(town)
    }
}
