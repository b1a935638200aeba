//! Town master (`mt_town`) rows.
//!
//! The town file carries the whole address hierarchy of a block. Its
//! effective date is mandatory because it is part of the record key.

use std::path::Path;

use abr_types::{fields, TownBuilder, TownRecord};

use crate::parser::{parse_file, AbrRecord, Column, Row};
use crate::types::{AbrResult, LoaderConfig};

impl AbrRecord for TownRecord {
    const TIER: &'static str = "mt_town";

    const COLUMNS: &'static [Column] = &[
        Column::nfkc(fields::REGION_CODE.name).required(),
        Column::nfkc(fields::BLOCK_ID.name).required(),
        Column::nfkc(fields::BLOCK_TYPE.name).required(),
        Column::verbatim(fields::PREF.name).required(),
        Column::verbatim(fields::PREF_KANA.name),
        Column::nfkc(fields::PREF_ROMA.name),
        Column::verbatim(fields::COUNTY.name),
        Column::verbatim(fields::COUNTY_KANA.name),
        Column::nfkc(fields::COUNTY_ROMA.name),
        Column::verbatim(fields::CITY.name).required(),
        Column::verbatim(fields::CITY_KANA.name),
        Column::nfkc(fields::CITY_ROMA.name),
        Column::verbatim(fields::WARD.name),
        Column::verbatim(fields::WARD_KANA.name),
        Column::nfkc(fields::WARD_ROMA.name),
        Column::verbatim(fields::MAJOR_AREA.name),
        Column::verbatim(fields::MAJOR_AREA_KANA.name),
        Column::nfkc(fields::MAJOR_AREA_ROMA.name),
        Column::verbatim(fields::NUMBERED_BLOCK.name),
        Column::verbatim(fields::NUMBERED_BLOCK_KANA.name),
        Column::nfkc(fields::NUMBERED_BLOCK_NUMBER.name),
        Column::verbatim(fields::SUB_BLOCK.name),
        Column::verbatim(fields::SUB_BLOCK_KANA.name),
        Column::nfkc(fields::SUB_BLOCK_ROMA.name),
        Column::verbatim(fields::AREA_DISCRIMINATOR.name),
        Column::nfkc(fields::RESIDENTIAL_DISPLAY.name).required(),
        Column::nfkc(fields::RESIDENTIAL_DISPLAY_METHOD.name),
        Column::nfkc(fields::MAJOR_AREA_ALIAS.name),
        Column::nfkc(fields::SUB_BLOCK_ALIAS.name),
        Column::nfkc(fields::MAJOR_AREA_UNCOMMON.name),
        Column::nfkc(fields::SUB_BLOCK_UNCOMMON.name),
        Column::nfkc(fields::STATUS.name),
        Column::nfkc(fields::NUMBERING.name),
        Column::nfkc(fields::EFFECTIVE_DATE),
        Column::nfkc(fields::ABOLITION_DATE),
        Column::nfkc(fields::SOURCE.name),
        Column::nfkc(fields::POST_CODE.name),
        Column::verbatim(fields::REMARKS.name),
    ];

    fn from_row(row: &Row) -> AbrResult<Self> {
        let effective_date = row.required_date(33)?;
        let abolition_date = row.date(34)?;

        row.build(|row| {
            TownBuilder::new(
                row.get(0),
                row.get(1),
                row.get(2),
                row.get(3),
                row.get(9),
                row.get(25),
                effective_date,
            )?
            .pref_kana(row.get(4))?
            .pref_roma(row.get(5))?
            .county(row.get(6))?
            .county_kana(row.get(7))?
            .county_roma(row.get(8))?
            .city_kana(row.get(10))?
            .city_roma(row.get(11))?
            .ward(row.get(12))?
            .ward_kana(row.get(13))?
            .ward_roma(row.get(14))?
            .major_area(row.get(15))?
            .major_area_kana(row.get(16))?
            .major_area_roma(row.get(17))?
            .numbered_block(row.get(18))?
            .numbered_block_kana(row.get(19))?
            .numbered_block_number(row.get(20))?
            .sub_block(row.get(21))?
            .sub_block_kana(row.get(22))?
            .sub_block_roma(row.get(23))?
            .area_discriminator(row.get(24))?
            .residential_display_method(row.get(26))?
            .major_area_alias(row.get(27))?
            .sub_block_alias(row.get(28))?
            .major_area_uncommon(row.get(29))?
            .sub_block_uncommon(row.get(30))?
            .status(row.get(31))?
            .numbering(row.get(32))?
            .abolition_date(abolition_date)
            .source(row.get(35))?
            .post_code(row.get(36))?
            .remarks(row.get(37))?
            .build()
        })
    }
}

/// Parses a town master file.
///
/// # Example
///
/// ```ignore
/// let towns = parse_town_file("mt_town_all.csv", &LoaderConfig::default())?;
/// let current = towns.iter().filter(|t| t.is_current()).count();
/// ```
pub fn parse_town_file<P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> AbrResult<Vec<TownRecord>> {
    Ok(parse_file::<TownRecord, _>(path, config)?.records)
}
