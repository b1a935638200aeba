//! Grammar rows for every registry column.
//!
//! The same row is used by every tier that carries the column, so a
//! prefecture name is checked identically in the prefecture, city and town
//! builders.

use crate::grammar::{CharClass, FieldRule, Structure};

use CharClass::{Alphabet, Any, Digit, FullWidth, Nullable, Symbol};

const KANA: &[CharClass] = &[Nullable, FullWidth];
const ROMA: &[CharClass] = &[Nullable, Alphabet, Symbol];
const ROMA_WITH_DIGITS: &[CharClass] = &[Nullable, Digit, Alphabet, Symbol];
const OPTIONAL_TEXT: &[CharClass] = &[Nullable, Any];
const OPTIONAL_DIGITS: &[CharClass] = &[Nullable, Digit];

const fn rule(
    name: &'static str,
    classes: &'static [CharClass],
    min: usize,
    max: usize,
) -> FieldRule {
    FieldRule {
        name,
        classes,
        min,
        max,
        structure: None,
    }
}

const fn structured(
    name: &'static str,
    classes: &'static [CharClass],
    min: usize,
    max: usize,
    structure: Structure,
) -> FieldRule {
    FieldRule {
        name,
        classes,
        min,
        max,
        structure: Some(structure),
    }
}

/// Suffixes accepted on a romanized county name.
pub const COUNTY_SUFFIXES: &[&str] = &["-gun"];
/// Suffixes accepted on a romanized city name.
pub const CITY_SUFFIXES: &[&str] = &["-shi", "-ku", "-machi", "-cho", "-mura", "-son"];
/// Suffixes accepted on a romanized ward name.
pub const WARD_SUFFIXES: &[&str] = &["-ku"];
/// Tokens one of which a numbered-block name must contain.
pub const CHOME_TOKENS: &[&str] = &["丁目", "丁"];
/// Tokens one of which a numbered-block reading must contain.
pub const CHOME_KANA_TOKENS: &[&str] = &["チョウメ", "チョウ"];

/// 全国地方公共団体コード
pub const REGION_CODE: FieldRule = rule("lg_code", &[Digit], 6, 6);
/// 町字ID
pub const BLOCK_ID: FieldRule = rule("machiaza_id", &[Digit], 7, 7);
/// 町字区分コード
pub const BLOCK_TYPE: FieldRule = rule("machiaza_type", &[Digit], 1, 1);

/// `pref` column.
pub const PREF: FieldRule = rule("pref", &[Any], 0, 10);
/// `pref_kana` column.
pub const PREF_KANA: FieldRule = rule("pref_kana", KANA, 0, 50);
/// `pref_roma` column.
pub const PREF_ROMA: FieldRule = rule("pref_roma", ROMA, 0, 50);

/// `county` column.
pub const COUNTY: FieldRule = rule("county", OPTIONAL_TEXT, 0, 24);
/// `county_kana` column.
pub const COUNTY_KANA: FieldRule = rule("county_kana", KANA, 0, 50);
/// `county_roma` column.
pub const COUNTY_ROMA: FieldRule =
    structured("county_roma", ROMA, 0, 100, Structure::Suffix(COUNTY_SUFFIXES));

/// `city` column.
pub const CITY: FieldRule = rule("city", &[Any], 0, 24);
/// `city_kana` column.
pub const CITY_KANA: FieldRule = rule("city_kana", KANA, 0, 50);
/// `city_roma` column.
pub const CITY_ROMA: FieldRule =
    structured("city_roma", ROMA, 0, 100, Structure::Suffix(CITY_SUFFIXES));

/// `ward` column.
pub const WARD: FieldRule = rule("ward", OPTIONAL_TEXT, 0, 24);
/// `ward_kana` column.
pub const WARD_KANA: FieldRule = rule("ward_kana", KANA, 0, 50);
/// `ward_roma` column.
pub const WARD_ROMA: FieldRule =
    structured("ward_roma", ROMA, 0, 100, Structure::Suffix(WARD_SUFFIXES));

/// 大字・町
pub const MAJOR_AREA: FieldRule = rule("oaza_cho", OPTIONAL_TEXT, 0, 120);
/// `oaza_cho_kana` column.
pub const MAJOR_AREA_KANA: FieldRule = rule("oaza_cho_kana", KANA, 0, 240);
/// `oaza_cho_roma` column.
pub const MAJOR_AREA_ROMA: FieldRule = rule("oaza_cho_roma", ROMA_WITH_DIGITS, 0, 180);

/// 丁目
pub const NUMBERED_BLOCK: FieldRule =
    structured("chome", OPTIONAL_TEXT, 0, 32, Structure::Contains(CHOME_TOKENS));
/// `chome_kana` column.
pub const NUMBERED_BLOCK_KANA: FieldRule =
    structured("chome_kana", KANA, 0, 50, Structure::Contains(CHOME_KANA_TOKENS));
/// `chome_number` column.
pub const NUMBERED_BLOCK_NUMBER: FieldRule = rule("chome_number", OPTIONAL_DIGITS, 0, 2);

/// 小字
pub const SUB_BLOCK: FieldRule = rule("koaza", OPTIONAL_TEXT, 0, 120);
/// `koaza_kana` column.
pub const SUB_BLOCK_KANA: FieldRule = rule("koaza_kana", KANA, 0, 240);
/// `koaza_roma` column.
pub const SUB_BLOCK_ROMA: FieldRule = rule("koaza_roma", ROMA_WITH_DIGITS, 0, 180);

/// 同一町字識別情報
pub const AREA_DISCRIMINATOR: FieldRule = rule("machiaza_dist", OPTIONAL_TEXT, 0, 120);

/// `rsdt_addr_flg` column.
pub const RESIDENTIAL_DISPLAY: FieldRule = rule("rsdt_addr_flg", &[Digit], 1, 1);
/// `rsdt_addr_mtd_code` column.
pub const RESIDENTIAL_DISPLAY_METHOD: FieldRule = rule("rsdt_addr_mtd_code", OPTIONAL_DIGITS, 0, 1);
/// `oaza_cho_aka_flg` column.
pub const MAJOR_AREA_ALIAS: FieldRule = rule("oaza_cho_aka_flg", OPTIONAL_DIGITS, 0, 1);
/// `koaza_aka_code` column.
pub const SUB_BLOCK_ALIAS: FieldRule = rule("koaza_aka_code", OPTIONAL_DIGITS, 0, 1);
/// `oaza_cho_gsi_uncmn` column.
pub const MAJOR_AREA_UNCOMMON: FieldRule = rule("oaza_cho_gsi_uncmn", OPTIONAL_TEXT, 0, 50);
/// `koaza_gsi_uncmn` column.
pub const SUB_BLOCK_UNCOMMON: FieldRule = rule("koaza_gsi_uncmn", OPTIONAL_TEXT, 0, 50);
/// `status_flg` column.
pub const STATUS: FieldRule = rule("status_flg", OPTIONAL_DIGITS, 0, 1);
/// `wake_num_flg` column.
pub const NUMBERING: FieldRule = rule("wake_num_flg", OPTIONAL_DIGITS, 0, 1);
/// `src_code` column.
pub const SOURCE: FieldRule = rule("src_code", OPTIONAL_DIGITS, 0, 2);
/// `post_code` column.
pub const POST_CODE: FieldRule = rule("post_code", &[Nullable, Digit, Symbol], 0, 80);
/// `remarks` column.
pub const REMARKS: FieldRule = rule("remarks", OPTIONAL_TEXT, 0, 256);

/// `efct_date` column. Dates carry no text grammar.
pub const EFFECTIVE_DATE: &str = "efct_date";
/// `ablt_date` column.
pub const ABOLITION_DATE: &str = "ablt_date";
