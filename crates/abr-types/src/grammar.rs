//! Field grammar: character classes, length bounds and structural rules.
//!
//! A field's grammar is a [`FieldRule`]: a set of allowed [`CharClass`]es
//! (which includes the `Nullable` flag), an inclusive length range, and an
//! optional [`Structure`] predicate evaluated only once the base checks pass
//! on a non-null value.
//!
//! # Examples
//!
//! ```
//! use abr_types::grammar::{validate_chars, validate_length, CharClass};
//!
//! assert!(validate_chars(Some("011011"), &[CharClass::Digit], "lg_code", "011011").is_ok());
//! // Full-width digits are not ASCII digits.
//! assert!(validate_chars(Some("０１"), &[CharClass::Digit], "lg_code", "01").is_err());
//! assert!(validate_length(None, 0, 10, "pref", "011011").is_ok());
//! assert!(validate_length(None, 1, 1, "rsdt_addr_flg", "011011").is_err());
//! ```

use crate::error::{MasterError, MasterResult};

/// A character class accepted by a field.
///
/// Listing several classes accepts a character matching any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// The field may be absent. Without this flag an absent value is an error.
    Nullable,
    /// ASCII digits `0-9`.
    Digit,
    /// ASCII letters `A-Z`, `a-z`.
    Alphabet,
    /// ASCII punctuation, symbols and the space.
    Symbol,
    /// Full-width kana, CJK punctuation and full-width forms.
    FullWidth,
    /// Any character; range checking is skipped.
    Any,
}

const DIGIT: &[(char, char)] = &[('\u{0030}', '\u{0039}')];
const ALPHABET: &[(char, char)] = &[('\u{0041}', '\u{005A}'), ('\u{0061}', '\u{007A}')];
const SYMBOL: &[(char, char)] = &[
    ('\u{0020}', '\u{002F}'),
    ('\u{003A}', '\u{0040}'),
    ('\u{005B}', '\u{0060}'),
    ('\u{007B}', '\u{007E}'),
];
const FULL_WIDTH: &[(char, char)] = &[
    ('\u{3000}', '\u{303F}'),
    ('\u{3099}', '\u{30FF}'),
    ('\u{FF01}', '\u{FF5E}'),
];

impl CharClass {
    fn ranges(self) -> &'static [(char, char)] {
        match self {
            Self::Digit => DIGIT,
            Self::Alphabet => ALPHABET,
            Self::Symbol => SYMBOL,
            Self::FullWidth => FULL_WIDTH,
            Self::Nullable | Self::Any => &[],
        }
    }

    /// Returns true if `c` belongs to this class.
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Any => true,
            _ => self.ranges().iter().any(|&(lo, hi)| lo <= c && c <= hi),
        }
    }
}

/// Checks the character classes of a value.
///
/// An absent value passes only when `classes` contains [`CharClass::Nullable`];
/// a present value passes when [`CharClass::Any`] is listed or every character
/// belongs to one of the listed classes.
pub fn validate_chars(
    value: Option<&str>,
    classes: &[CharClass],
    field: &'static str,
    key: &str,
) -> MasterResult<()> {
    let Some(value) = value else {
        if classes.contains(&CharClass::Nullable) {
            return Ok(());
        }
        return Err(MasterError::NotNull {
            key: key.to_string(),
            field,
        });
    };

    if classes.contains(&CharClass::Any) {
        return Ok(());
    }

    let in_range = value
        .chars()
        .all(|c| classes.iter().any(|class| class.contains(c)));
    if in_range {
        Ok(())
    } else {
        Err(MasterError::OutOfRange {
            key: key.to_string(),
            field,
        })
    }
}

/// Checks that a value's length in characters lies within `min..=max`.
///
/// An absent value counts as length 0.
pub fn validate_length(
    value: Option<&str>,
    min: usize,
    max: usize,
    field: &'static str,
    key: &str,
) -> MasterResult<()> {
    let len = value.map_or(0, |v| v.chars().count());
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(MasterError::Length {
            key: key.to_string(),
            field,
            min,
            max,
        })
    }
}

/// A structural predicate layered on top of the class and length checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// The value must end with one of the suffixes.
    Suffix(&'static [&'static str]),
    /// The value must contain one of the tokens.
    Contains(&'static [&'static str]),
}

impl Structure {
    fn check(self, value: &str, field: &'static str, key: &str) -> MasterResult<()> {
        match self {
            Self::Suffix(suffixes) => {
                if suffixes.iter().any(|s| value.ends_with(s)) {
                    Ok(())
                } else {
                    Err(MasterError::MissingSuffix {
                        key: key.to_string(),
                        field,
                        suffixes,
                    })
                }
            }
            Self::Contains(tokens) => {
                if tokens.iter().any(|t| value.contains(t)) {
                    Ok(())
                } else {
                    Err(MasterError::MissingToken {
                        key: key.to_string(),
                        field,
                        tokens,
                    })
                }
            }
        }
    }
}

/// The complete grammar of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Column name reported in diagnostics.
    pub name: &'static str,
    /// Allowed character classes, including the nullable flag.
    pub classes: &'static [CharClass],
    /// Minimum length in characters.
    pub min: usize,
    /// Maximum length in characters.
    pub max: usize,
    /// Additional structural predicate.
    pub structure: Option<Structure>,
}

impl FieldRule {
    /// Returns true if the field accepts an absent value.
    pub fn is_nullable(&self) -> bool {
        self.classes.contains(&CharClass::Nullable)
    }

    /// Runs the class, length and structural checks in that order.
    pub fn validate(&self, value: Option<&str>, key: &str) -> MasterResult<()> {
        self.validate_base(value, key)?;
        match (value, self.structure) {
            (Some(v), Some(structure)) => structure.check(v, self.name, key),
            _ => Ok(()),
        }
    }

    /// Runs the class and length checks only.
    pub fn validate_base(&self, value: Option<&str>, key: &str) -> MasterResult<()> {
        validate_chars(value, self.classes, self.name, key)?;
        self.validate_length(value, key)
    }

    /// Runs the length check only.
    pub fn validate_length(&self, value: Option<&str>, key: &str) -> MasterResult<()> {
        validate_length(value, self.min, self.max, self.name, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "011011";

    #[test]
    fn test_digit_class_rejects_full_width_digits() {
        assert!(validate_chars(Some("0123456789"), &[CharClass::Digit], "f", KEY).is_ok());
        let err = validate_chars(Some("１２"), &[CharClass::Digit], "f", KEY).unwrap_err();
        assert!(matches!(err, MasterError::OutOfRange { field: "f", .. }));
    }

    #[test]
    fn test_symbol_class_covers_ascii_punctuation() {
        let classes = &[CharClass::Symbol];
        assert!(validate_chars(Some(" !/:@[`{~-"), classes, "f", KEY).is_ok());
        assert!(validate_chars(Some("X"), classes, "f", KEY).is_err());
        assert!(validate_chars(Some("a"), classes, "f", KEY).is_err());
    }

    #[test]
    fn test_full_width_class() {
        let classes = &[CharClass::FullWidth];
        assert!(validate_chars(Some("ホッカイドウ"), classes, "f", KEY).is_ok());
        assert!(validate_chars(Some("１チョウメ"), classes, "f", KEY).is_ok());
        assert!(validate_chars(Some("　ー"), classes, "f", KEY).is_ok());
        // Hiragana and kanji are outside the class.
        assert!(validate_chars(Some("ほっかいどう"), classes, "f", KEY).is_err());
        assert!(validate_chars(Some("北海道"), classes, "f", KEY).is_err());
        // Half-width kana too.
        assert!(validate_chars(Some("ﾎｯｶｲﾄﾞｳ"), classes, "f", KEY).is_err());
    }

    #[test]
    fn test_classes_combine_as_union() {
        let classes = &[CharClass::Alphabet, CharClass::Symbol];
        assert!(validate_chars(Some("Sapporo-shi"), classes, "f", KEY).is_ok());
        assert!(validate_chars(Some("Route 1"), classes, "f", KEY).is_err());
    }

    #[test]
    fn test_null_handling() {
        let err = validate_chars(None, &[CharClass::Any], "pref", KEY).unwrap_err();
        assert!(matches!(err, MasterError::NotNull { field: "pref", .. }));
        assert!(validate_chars(None, &[CharClass::Nullable, CharClass::Digit], "f", KEY).is_ok());
    }

    #[test]
    fn test_any_short_circuits() {
        assert!(validate_chars(Some("北海道 ﾎｯｶｲﾄﾞｳ"), &[CharClass::Any], "f", KEY).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(validate_length(Some("北海道"), 0, 3, "f", KEY).is_ok());
        assert!(validate_length(Some("北海道x"), 0, 3, "f", KEY).is_err());
        assert!(validate_length(Some(""), 1, 3, "f", KEY).is_err());
        assert!(validate_length(None, 0, 0, "f", KEY).is_ok());
    }

    #[test]
    fn test_structure_runs_after_base_checks() {
        let rule = FieldRule {
            name: "ward_roma",
            classes: &[CharClass::Nullable, CharClass::Alphabet, CharClass::Symbol],
            min: 0,
            max: 100,
            structure: Some(Structure::Suffix(&["-ku"])),
        };
        assert!(rule.validate(Some("Chuo-ku"), KEY).is_ok());
        assert!(rule.validate(None, KEY).is_ok());
        assert!(matches!(
            rule.validate(Some("Chuo"), KEY),
            Err(MasterError::MissingSuffix { .. })
        ));
        // A class violation wins over the suffix rule.
        assert!(matches!(
            rule.validate(Some("中央"), KEY),
            Err(MasterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_contains_structure() {
        let rule = FieldRule {
            name: "chome",
            classes: &[CharClass::Nullable, CharClass::Any],
            min: 0,
            max: 32,
            structure: Some(Structure::Contains(&["丁目", "丁"])),
        };
        assert!(rule.validate(Some("一丁目"), KEY).is_ok());
        assert!(rule.validate(Some("三丁"), KEY).is_ok());
        assert!(matches!(
            rule.validate(Some("一番町"), KEY),
            Err(MasterError::MissingToken { field: "chome", .. })
        ));
    }
}
