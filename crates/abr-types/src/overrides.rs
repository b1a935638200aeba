//! Per-record exceptions for known upstream data defects.
//!
//! Each entry names an exact key and the alternative check applied to one
//! field. The lookup runs before the general rule; keys that are not listed
//! get the field's full grammar.

use crate::error::MasterResult;
use crate::fields;
use crate::grammar::FieldRule;

/// How a field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Character class, length and structural predicate.
    Full,
    /// Character class and length; the structural predicate is skipped.
    SkipStructure,
    /// Length only.
    LengthOnly,
}

impl Strategy {
    /// Applies the strategy to `rule`.
    pub fn apply(self, rule: &FieldRule, value: Option<&str>, key: &str) -> MasterResult<()> {
        match self {
            Self::Full => rule.validate(value, key),
            Self::SkipStructure => rule.validate_base(value, key),
            Self::LengthOnly => rule.validate_length(value, key),
        }
    }
}

/// Key an override is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKey {
    /// A region code.
    Region(&'static str),
    /// A region code and block identifier pair.
    Block(&'static str, &'static str),
}

impl OverrideKey {
    fn matches(self, region_code: &str, block_id: Option<&str>) -> bool {
        match self {
            Self::Region(region) => region == region_code,
            Self::Block(region, block) => region == region_code && Some(block) == block_id,
        }
    }
}

/// One table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override {
    /// Record the entry applies to.
    pub key: OverrideKey,
    /// Column name of the affected field.
    pub field: &'static str,
    /// Check used instead of the full grammar.
    pub strategy: Strategy,
}

/// Known exceptions.
pub const OVERRIDES: &[Override] = &[
    // 山梨県西八代郡市川三郷町: romanized name registered as "Ichikawamisato-".
    Override {
        key: OverrideKey::Region("193461"),
        field: fields::CITY_ROMA.name,
        strategy: Strategy::SkipStructure,
    },
    // 栃木県宇都宮市上田下: koaza_kana holds kanji.
    Override {
        key: OverrideKey::Block("092011", "0000230"),
        field: fields::SUB_BLOCK_KANA.name,
        strategy: Strategy::LengthOnly,
    },
];

/// Returns the strategy for a field of the given record.
pub fn strategy_for(field: &str, region_code: &str, block_id: Option<&str>) -> Strategy {
    OVERRIDES
        .iter()
        .find(|o| o.field == field && o.key.matches(region_code, block_id))
        .map_or(Strategy::Full, |o| o.strategy)
}

/// Validates `value` against `rule`, honouring any override for the record.
pub fn validate_field(
    rule: &FieldRule,
    value: Option<&str>,
    key: &str,
    region_code: &str,
    block_id: Option<&str>,
) -> MasterResult<()> {
    strategy_for(rule.name, region_code, block_id).apply(rule, value, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MasterError;

    #[test]
    fn test_city_roma_override_matches_region_only() {
        assert_eq!(
            strategy_for("city_roma", "193461", None),
            Strategy::SkipStructure
        );
        assert_eq!(
            strategy_for("city_roma", "193461", Some("0001001")),
            Strategy::SkipStructure
        );
        assert_eq!(strategy_for("city_roma", "193462", None), Strategy::Full);
        assert_eq!(strategy_for("ward_roma", "193461", None), Strategy::Full);
    }

    #[test]
    fn test_sub_block_kana_override_needs_both_parts() {
        assert_eq!(
            strategy_for("koaza_kana", "092011", Some("0000230")),
            Strategy::LengthOnly
        );
        assert_eq!(
            strategy_for("koaza_kana", "092011", Some("0000231")),
            Strategy::Full
        );
        assert_eq!(strategy_for("koaza_kana", "092011", None), Strategy::Full);
    }

    #[test]
    fn test_skip_structure_still_checks_class() {
        let rule = &fields::CITY_ROMA;
        assert!(validate_field(rule, Some("Ichikawamisato-"), "193461", "193461", None).is_ok());
        assert!(matches!(
            validate_field(rule, Some("市川三郷町"), "193461", "193461", None),
            Err(MasterError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_field(rule, Some("Ichikawamisato-"), "193462", "193462", None),
            Err(MasterError::MissingSuffix { .. })
        ));
    }

    #[test]
    fn test_length_only_still_checks_length() {
        let rule = &fields::SUB_BLOCK_KANA;
        let key = "092011-0000230-0-20200101";
        assert!(validate_field(rule, Some("ｺｱｻﾞ1"), key, "092011", Some("0000230")).is_ok());
        let long = "ア".repeat(241);
        assert!(matches!(
            validate_field(rule, Some(&long), key, "092011", Some("0000230")),
            Err(MasterError::Length { .. })
        ));
    }
}
