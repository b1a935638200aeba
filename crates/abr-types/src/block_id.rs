//! Decoding of the seven-digit town block identifier (町字ID).
//!
//! The first four digits are the major-area sub-code and the last three the
//! block sub-code. A major-area sub-code of 1 or more means the town has a
//! major area; the block sub-code partitions into none (0), numbered block
//! (1..=100) and sub-block (101..=999).
//!
//! # Examples
//!
//! ```
//! use abr_types::{BlockId, Subdivision};
//!
//! let id = BlockId::decode("0001002", "key").unwrap();
//! assert!(id.has_major_area());
//! assert_eq!(id.subdivision(), Subdivision::NumberedBlock);
//!
//! let id = BlockId::decode("0000101", "key").unwrap();
//! assert!(!id.has_major_area());
//! assert_eq!(id.subdivision(), Subdivision::SubBlock);
//! ```

use std::fmt;

use crate::error::{MasterError, MasterResult};
use crate::fields;

/// Block sub-codes at or below this value are numbered blocks.
pub const NUMBERED_BLOCK_MAX: u16 = 100;

/// Classification of the block sub-code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdivision {
    /// Block sub-code 0.
    None,
    /// Block sub-code 1..=100 (丁目).
    NumberedBlock,
    /// Block sub-code 101..=999 (小字).
    SubBlock,
}

/// A decoded block identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    major_code: u16,
    block_code: u16,
    subdivision: Subdivision,
}

impl BlockId {
    /// Decodes a seven-digit identifier.
    ///
    /// `key` is only used for error reporting. Anything other than exactly
    /// seven ASCII digits fails with [`MasterError::MalformedBlockId`].
    pub fn decode(value: &str, key: &str) -> MasterResult<Self> {
        let bytes = value.as_bytes();
        if bytes.len() != 7 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(MasterError::MalformedBlockId {
                key: key.to_string(),
                field: fields::BLOCK_ID.name,
                value: value.to_string(),
            });
        }

        let major_code = digits(&bytes[..4]);
        let block_code = digits(&bytes[4..]);

        let is_numbered = (1..=NUMBERED_BLOCK_MAX).contains(&block_code);
        let is_sub_block = block_code > NUMBERED_BLOCK_MAX;
        let subdivision = match (is_numbered, is_sub_block) {
            (false, false) => Subdivision::None,
            (true, false) => Subdivision::NumberedBlock,
            (false, true) => Subdivision::SubBlock,
            (true, true) => {
                return Err(MasterError::ContradictoryBlockId {
                    key: key.to_string(),
                    field: fields::BLOCK_ID.name,
                    value: value.to_string(),
                })
            }
        };

        Ok(Self {
            major_code,
            block_code,
            subdivision,
        })
    }

    /// The four-digit major-area sub-code.
    pub fn major_code(&self) -> u16 {
        self.major_code
    }

    /// The three-digit block sub-code.
    pub fn block_code(&self) -> u16 {
        self.block_code
    }

    /// Returns true if the identifier designates a major area.
    pub fn has_major_area(&self) -> bool {
        self.major_code >= 1
    }

    /// Classification of the block sub-code.
    pub fn subdivision(&self) -> Subdivision {
        self.subdivision
    }

    /// Returns true for a numbered block (丁目).
    pub fn is_numbered_block(&self) -> bool {
        self.subdivision == Subdivision::NumberedBlock
    }

    /// Returns true for a sub-block (小字).
    pub fn is_sub_block(&self) -> bool {
        self.subdivision == Subdivision::SubBlock
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:03}", self.major_code, self.block_code)
    }
}

fn digits(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decoding_is_total_and_partitions(major in 0u16..10000, block in 0u16..1000) {
            let raw = format!("{major:04}{block:03}");
            let id = BlockId::decode(&raw, "k").unwrap();

            prop_assert_eq!(id.has_major_area(), major >= 1);
            let expected = match block {
                0 => Subdivision::None,
                1..=100 => Subdivision::NumberedBlock,
                _ => Subdivision::SubBlock,
            };
            prop_assert_eq!(id.subdivision(), expected);
            prop_assert_eq!(id.to_string(), raw);
        }
    }
}
