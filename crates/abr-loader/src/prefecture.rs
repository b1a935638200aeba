//! Prefecture master (`mt_pref`) rows.

use std::path::Path;

use abr_types::{fields, PrefectureBuilder, PrefectureRecord};

use crate::parser::{parse_file, AbrRecord, Column, Row};
use crate::types::{AbrResult, LoaderConfig};

impl AbrRecord for PrefectureRecord {
    const TIER: &'static str = "mt_pref";

    const COLUMNS: &'static [Column] = &[
        Column::nfkc(fields::REGION_CODE.name).required(),
        Column::verbatim(fields::PREF.name).required(),
        Column::verbatim(fields::PREF_KANA.name),
        Column::nfkc(fields::PREF_ROMA.name),
        Column::nfkc(fields::EFFECTIVE_DATE),
        Column::nfkc(fields::ABOLITION_DATE),
        Column::verbatim(fields::REMARKS.name),
    ];

    fn from_row(row: &Row) -> AbrResult<Self> {
        let effective_date = row.date(4)?;
        let abolition_date = row.date(5)?;

        row.build(|row| {
            PrefectureBuilder::new(row.get(0), row.get(1))?
                .pref_kana(row.get(2))?
                .pref_roma(row.get(3))?
                .effective_date(effective_date)
                .abolition_date(abolition_date)
                .remarks(row.get(6))?
                .build()
        })
    }
}

/// Parses a prefecture master file.
///
/// # Example
///
/// ```ignore
/// let prefectures = parse_prefecture_file("mt_pref_all.csv", &LoaderConfig::default())?;
/// ```
pub fn parse_prefecture_file<P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> AbrResult<Vec<PrefectureRecord>> {
    Ok(parse_file::<PrefectureRecord, _>(path, config)?.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbrError;
    use abr_types::MasterError;
    use chrono::NaiveDate;
    use csv::StringRecord;
    use std::io::Write;

    fn make_record(fields: &[&str]) -> StringRecord {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field);
        }
        record
    }

    fn make_row(fields: &[&str]) -> Row {
        Row::new(&make_record(fields), 2, PrefectureRecord::COLUMNS).unwrap()
    }

    #[test]
    fn test_parse_prefecture_row() {
        let row = make_row(&[
            "010006",
            "北海道",
            "ホッカイドウ",
            "Hokkaido",
            "1947-04-17",
            "",
            "",
        ]);
        let pref = PrefectureRecord::from_row(&row).unwrap();
        assert_eq!(pref.key(), "010006");
        assert_eq!(pref.pref(), "北海道");
        assert_eq!(pref.pref_kana(), Some("ホッカイドウ"));
        assert_eq!(pref.effective_date(), NaiveDate::from_ymd_opt(1947, 4, 17));
        assert_eq!(pref.abolition_date(), None);
        assert_eq!(pref.remarks(), None);
    }

    #[test]
    fn test_codes_and_roma_are_width_folded() {
        let row = make_row(&["０１０００６", "北海道", "", "Ｈｏｋｋａｉｄｏ", "", "", ""]);
        let pref = PrefectureRecord::from_row(&row).unwrap();
        assert_eq!(pref.region_code(), "010006");
        assert_eq!(pref.pref_roma(), Some("Hokkaido"));
    }

    #[test]
    fn test_bad_date_names_column() {
        let row = make_row(&["010006", "北海道", "", "", "1947/04/17", "", ""]);
        let err = PrefectureRecord::from_row(&row).unwrap_err();
        assert!(matches!(
            err,
            AbrError::InvalidDate {
                column: "efct_date",
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_name_is_kept_as_empty_text() {
        let row = make_row(&["010006", "", "", "", "", "", ""]);
        let pref = PrefectureRecord::from_row(&row).unwrap();
        assert_eq!(pref.pref(), "");
        assert_eq!(pref.pref_kana(), None);
    }

    #[test]
    fn test_blank_region_code_fails_its_length() {
        let row = make_row(&["", "北海道", "", "", "", "", ""]);
        let err = PrefectureRecord::from_row(&row).unwrap_err();
        match err {
            AbrError::Master { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(source, MasterError::Length { field: "lg_code", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_prefecture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lg_code,pref,pref_kana,pref_roma,efct_date,ablt_date,remarks").unwrap();
        writeln!(file, "010006,北海道,ホッカイドウ,Hokkaido,1947-04-17,,").unwrap();
        writeln!(file, "020001,青森県,アオモリケン,Aomori,1947-04-17,,").unwrap();
        file.flush().unwrap();

        let prefectures = parse_prefecture_file(file.path(), &LoaderConfig::strict()).unwrap();
        assert_eq!(prefectures.len(), 2);
        assert_eq!(prefectures[1].pref(), "青森県");
    }
}
