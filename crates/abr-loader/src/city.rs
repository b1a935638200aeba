//! City master (`mt_city`) rows.

use std::path::Path;

use abr_types::{fields, CityBuilder, CityRecord};

use crate::parser::{parse_file, AbrRecord, Column, Row};
use crate::types::{AbrResult, LoaderConfig};

impl AbrRecord for CityRecord {
    const TIER: &'static str = "mt_city";

    const COLUMNS: &'static [Column] = &[
        Column::nfkc(fields::REGION_CODE.name).required(),
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
        Column::nfkc(fields::EFFECTIVE_DATE),
        Column::nfkc(fields::ABOLITION_DATE),
        Column::verbatim(fields::REMARKS.name),
    ];

    fn from_row(row: &Row) -> AbrResult<Self> {
        let effective_date = row.date(13)?;
        let abolition_date = row.date(14)?;

        row.build(|row| {
            CityBuilder::new(row.get(0), row.get(1), row.get(7))?
                .pref_kana(row.get(2))?
                .pref_roma(row.get(3))?
                .county(row.get(4))?
                .county_kana(row.get(5))?
                .county_roma(row.get(6))?
                .city_kana(row.get(8))?
                .city_roma(row.get(9))?
                .ward(row.get(10))?
                .ward_kana(row.get(11))?
                .ward_roma(row.get(12))?
                .effective_date(effective_date)
                .abolition_date(abolition_date)
                .remarks(row.get(15))?
                .build()
        })
    }
}

/// Parses a city master file.
///
/// # Example
///
/// ```ignore
/// let cities = parse_city_file("mt_city_all.csv", &LoaderConfig::default())?;
/// ```
pub fn parse_city_file<P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> AbrResult<Vec<CityRecord>> {
    Ok(parse_file::<CityRecord, _>(path, config)?.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbrError;
    use abr_types::MasterError;
    use csv::StringRecord;
    use std::io::Write;

    const HEADER: &str = "lg_code,pref,pref_kana,pref_roma,county,county_kana,county_roma,city,city_kana,city_roma,ward,ward_kana,ward_roma,efct_date,ablt_date,remarks";

    fn make_row(fields: &[&str]) -> Row {
        let record = StringRecord::from(fields.to_vec());
        Row::new(&record, 5, CityRecord::COLUMNS).unwrap()
    }

    #[test]
    fn test_parse_ward_row() {
        let row = make_row(&[
            "011029", "北海道", "ホッカイドウ", "Hokkaido", "", "", "", "札幌市", "サッポロシ",
            "Sapporo-shi", "北区", "キタク", "Kita-ku", "1972-04-01", "", "",
        ]);
        let city = CityRecord::from_row(&row).unwrap();
        assert_eq!(city.key(), "011029");
        assert_eq!(city.prefecture_code(), "01");
        assert_eq!(city.ward(), Some("北区"));
        assert!(!city.has_county());
    }

    #[test]
    fn test_parse_county_row() {
        let row = make_row(&[
            "013030", "北海道", "ホッカイドウ", "Hokkaido", "石狩郡", "イシカリグン",
            "Ｉｓｈｉｋａｒｉ－ｇｕｎ", "当別町", "トウベツチョウ", "Tobetsu-cho", "", "", "",
            "", "", "",
        ]);
        let city = CityRecord::from_row(&row).unwrap();
        assert!(city.has_county());
        assert_eq!(city.county_roma(), Some("Ishikari-gun"));
        assert_eq!(city.effective_date(), None);
    }

    #[test]
    fn test_city_roma_exception_survives_parsing() {
        let row = make_row(&[
            "193461", "山梨県", "", "", "西八代郡", "", "", "市川三郷町", "", "Ichikawamisato-",
            "", "", "", "", "", "",
        ]);
        assert!(CityRecord::from_row(&row).is_ok());
    }

    #[test]
    fn test_ward_suffix_error_carries_line() {
        let row = make_row(&[
            "011029", "北海道", "", "", "", "", "", "札幌市", "", "", "北区", "", "Kita", "",
            "", "",
        ]);
        match CityRecord::from_row(&row).unwrap_err() {
            AbrError::Master { line, source } => {
                assert_eq!(line, 5);
                assert!(matches!(source, MasterError::MissingSuffix { field: "ward_roma", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_pref_and_city_are_empty_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "011011,,,,,,,,,,,,,,,").unwrap();
        file.flush().unwrap();

        let cities = parse_city_file(file.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].pref(), "");
        assert_eq!(cities[0].city(), "");
        assert_eq!(cities[0].city_kana(), None);
        assert_eq!(cities[0].ward(), None);
    }

    #[test]
    fn test_parse_city_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(
            file,
            "011002,北海道,ホッカイドウ,Hokkaido,,,,札幌市,サッポロシ,Sapporo-shi,,,,1922-08-01,,"
        )
        .unwrap();
        writeln!(
            file,
            "011011,北海道,ホッカイドウ,Hokkaido,,,,札幌市,サッポロシ,Sapporo-shi,中央区,チュウオウク,Chuo-ku,1972-04-01,,"
        )
        .unwrap();
        file.flush().unwrap();

        let cities = parse_city_file(file.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].ward_roma(), Some("Chuo-ku"));
    }
}
