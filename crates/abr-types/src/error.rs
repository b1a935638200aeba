//! Validation errors raised while building master records.
//!
//! Every variant carries the key of the record under construction and the
//! name of the offending field. The `Display` text is the diagnostic shown to
//! the operator, prefixed with `[key:field]`.

use thiserror::Error;

/// Errors produced by the field grammar, the town relational rules and the
/// collection validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MasterError {
    /// A mandatory field was absent.
    #[error("[{key}:{field}] value is mandatory but was empty")]
    NotNull {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
    },

    /// The value contains a character outside the field's allowed classes.
    #[error("[{key}:{field}] value contains characters outside the allowed range")]
    OutOfRange {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
    },

    /// The value is shorter or longer than the field allows.
    #[error("[{key}:{field}] length is outside the allowed range {min}..={max}")]
    Length {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// Minimum length in characters.
        min: usize,
        /// Maximum length in characters.
        max: usize,
    },

    /// A romanized name does not end with an administrative suffix.
    #[error("[{key}:{field}] value must end with one of {suffixes:?}")]
    MissingSuffix {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// Accepted suffixes.
        suffixes: &'static [&'static str],
    },

    /// A value does not contain any of its required tokens.
    #[error("[{key}:{field}] value must contain one of {tokens:?}")]
    MissingToken {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// Accepted tokens.
        tokens: &'static [&'static str],
    },

    /// A coded field holds a code outside its enumeration.
    #[error("[{key}:{field}] code '{value}' is not one of {expected:?}")]
    UnknownCode {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The rejected code.
        value: String,
        /// Every accepted code.
        expected: &'static [&'static str],
    },

    /// The block identifier and the major-area fields disagree.
    #[error("[{key}:{field}] block id '{block_id}' does not agree with the major-area fields")]
    MajorAreaMismatch {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The block identifier.
        block_id: String,
    },

    /// The block identifier and the numbered-block / sub-block fields disagree.
    #[error(
        "[{key}:{field}] block id '{block_id}' does not agree with the major-area, numbered-block and sub-block fields"
    )]
    SubdivisionMismatch {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The block identifier.
        block_id: String,
    },

    /// The block-type code and the numbered-block / sub-block fields disagree.
    #[error(
        "[{key}:{field}] block type '{block_type}' does not agree with the numbered-block and sub-block fields"
    )]
    BlockTypeMismatch {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The block-type code.
        block_type: String,
    },

    /// The Kyoto street-name alias was used outside a Kyoto sub-block.
    #[error("[{key}:{field}] alias code '{code}' only applies to sub-blocks in Kyoto prefecture")]
    KyotoStreetName {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The alias code.
        code: String,
    },

    /// The major-area uncommon-character marker requires a major-area name.
    #[error("[{key}:{field}] marker '{marker}' requires a major-area name")]
    MajorAreaUncommon {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The marker value.
        marker: String,
    },

    /// The sub-block uncommon-character marker and the sub-block name disagree.
    #[error("[{key}:{field}] marker {marker:?} does not agree with the sub-block name")]
    SubBlockUncommon {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The marker value, absent when the marker was empty.
        marker: Option<String>,
    },

    /// Two records of the same tier share a key.
    #[error("[{key}] this key is duplicated")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// A block identifier that is not seven ASCII digits reached the decoder.
    #[error("[{key}:{field}] block id '{value}' cannot be decoded")]
    MalformedBlockId {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The raw identifier.
        value: String,
    },

    /// The decoder classified a block sub-code as both numbered block and
    /// sub-block. The ranges are disjoint, so this signals a defect in the
    /// decoder rather than bad input.
    #[error("[{key}:{field}] block id '{value}' decoded to a contradictory classification")]
    ContradictoryBlockId {
        /// Key of the record being built.
        key: String,
        /// Name of the field.
        field: &'static str,
        /// The raw identifier.
        value: String,
    },
}

impl MasterError {
    /// Returns the key of the record the error was raised for.
    pub fn key(&self) -> &str {
        match self {
            Self::NotNull { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::Length { key, .. }
            | Self::MissingSuffix { key, .. }
            | Self::MissingToken { key, .. }
            | Self::UnknownCode { key, .. }
            | Self::MajorAreaMismatch { key, .. }
            | Self::SubdivisionMismatch { key, .. }
            | Self::BlockTypeMismatch { key, .. }
            | Self::KyotoStreetName { key, .. }
            | Self::MajorAreaUncommon { key, .. }
            | Self::SubBlockUncommon { key, .. }
            | Self::DuplicateKey { key }
            | Self::MalformedBlockId { key, .. }
            | Self::ContradictoryBlockId { key, .. } => key,
        }
    }

    /// Returns the offending field, or `None` for collection-level errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotNull { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Length { field, .. }
            | Self::MissingSuffix { field, .. }
            | Self::MissingToken { field, .. }
            | Self::UnknownCode { field, .. }
            | Self::MajorAreaMismatch { field, .. }
            | Self::SubdivisionMismatch { field, .. }
            | Self::BlockTypeMismatch { field, .. }
            | Self::KyotoStreetName { field, .. }
            | Self::MajorAreaUncommon { field, .. }
            | Self::SubBlockUncommon { field, .. }
            | Self::MalformedBlockId { field, .. }
            | Self::ContradictoryBlockId { field, .. } => Some(field),
            Self::DuplicateKey { .. } => None,
        }
    }

    /// Returns true for errors that indicate a logic defect rather than bad data.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::ContradictoryBlockId { .. })
    }
}

/// Result type for record construction.
pub type MasterResult<T> = Result<T, MasterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_embeds_key_and_field() {
        let err = MasterError::NotNull {
            key: "011011".to_string(),
            field: "pref",
        };
        assert_eq!(err.to_string(), "[011011:pref] value is mandatory but was empty");
        assert_eq!(err.key(), "011011");
        assert_eq!(err.field(), Some("pref"));
    }

    #[test]
    fn test_duplicate_key_has_no_field() {
        let err = MasterError::DuplicateKey {
            key: "011011".to_string(),
        };
        assert_eq!(err.to_string(), "[011011] this key is duplicated");
        assert_eq!(err.field(), None);
        assert!(!err.is_defect());
    }
}
