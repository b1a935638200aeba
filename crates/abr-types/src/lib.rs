//! # abr-types
//!
//! Validated master records for the Japanese Address Base Registry
//! (アドレス・ベース・レジストリ).
//!
//! The registry ships three tiers of master data: prefectures (`mt_pref`),
//! municipalities (`mt_city`) and towns (`mt_town`). This crate turns one
//! row of any tier into an immutable record that is guaranteed to satisfy
//! the registry's field grammar and, for towns, the agreement between the
//! block identifier, the block-type code and the subdivision fields.
//!
//! Records are only produced by their builders. Every setter checks its
//! value immediately and `build()` runs the cross-field rules, so an invalid
//! record can never be observed.
//!
//! ## Features
//!
//! - `serde` (default): serialization support. Records serialize as their
//!   `*Fields` row shape and are re-validated on deserialization.
//!
//! ## Usage
//!
//! ```rust
//! use abr_types::{CityBuilder, MasterError};
//!
//! let city = CityBuilder::new(Some("011002"), Some("北海道"), Some("札幌市"))?
//!     .city_kana(Some("サッポロシ"))?
//!     .city_roma(Some("Sapporo-shi"))?
//!     .build()?;
//! assert_eq!(city.key(), "011002");
//!
//! let err = CityBuilder::new(Some("011002"), Some("北海道"), Some("札幌市"))?
//!     .city_roma(Some("Sapporo"))
//!     .unwrap_err();
//! assert!(matches!(err, MasterError::MissingSuffix { .. }));
//! # Ok::<(), MasterError>(())
//! ```

#![warn(missing_docs)]

#[macro_use]
mod builder;

mod block_id;
mod city;
mod collection;
mod enums;
mod error;
pub mod fields;
pub mod grammar;
pub mod overrides;
mod prefecture;
pub mod relation;
mod town;

// Re-export all public types at crate root
pub use block_id::{BlockId, Subdivision, NUMBERED_BLOCK_MAX};
pub use city::{CityBuilder, CityFields, CityRecord};
pub use collection::{ensure_unique_keys, Keyed};
pub use enums::{
    BlockType, CodeSet, MajorAreaAlias, Numbering, ResidentialDisplay, ResidentialDisplayMethod,
    Source, Status, SubBlockAlias,
};
pub use error::{MasterError, MasterResult};
pub use prefecture::{PrefectureBuilder, PrefectureFields, PrefectureRecord};
pub use town::{town_key, TownBuilder, TownFields, TownRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _ = BlockType::SubBlock;
        let _ = Subdivision::NumberedBlock;
        let _ = grammar::CharClass::FullWidth;
        assert_eq!(fields::REGION_CODE.name, "lg_code");
        assert_eq!(overrides::OVERRIDES.len(), 2);
    }

    #[test]
    fn test_records_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrefectureRecord>();
        assert_send_sync::<CityRecord>();
        assert_send_sync::<TownRecord>();
        assert_send_sync::<MasterError>();
    }
}
