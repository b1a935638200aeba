//! Cross-field rules for town records.
//!
//! The block identifier, the block-type code and the presence of the
//! major-area, numbered-block and sub-block fields describe the same
//! hierarchy and must agree. Readings and romanizations of the major area
//! and of sub-blocks are often missing upstream, so their presence is only
//! required where noted; their absence is still enforced where the
//! hierarchy has no such level.

use crate::block_id::Subdivision;
use crate::enums::{BlockType, SubBlockAlias};
use crate::error::{MasterError, MasterResult};
use crate::fields;
use crate::town::TownRecord;

/// Region-code prefix of Kyoto prefecture.
pub const KYOTO_PREFIX: &str = "26";

/// Marker value meaning "no uncommon characters".
pub const NO_UNCOMMON_CHARS: &str = "0";

/// Runs every rule in order and returns the first violation.
pub fn validate_town(town: &TownRecord) -> MasterResult<()> {
    block_id_and_major_area(town)?;
    block_id_and_subdivisions(town)?;
    block_type_and_subdivisions(town)?;
    kyoto_street_name(town)?;
    major_area_uncommon(town)?;
    sub_block_uncommon(town)
}

#[derive(Clone, Copy)]
struct Presence {
    major_area: bool,
    major_area_reading: bool,
    numbered_block: bool,
    numbered_block_none: bool,
    sub_block: bool,
    sub_block_none: bool,
}

impl Presence {
    fn of(town: &TownRecord) -> Self {
        let numbered = [
            town.numbered_block(),
            town.numbered_block_kana(),
            town.numbered_block_number(),
        ];
        let sub = [town.sub_block(), town.sub_block_kana(), town.sub_block_roma()];
        Self {
            major_area: town.major_area().is_some(),
            major_area_reading: town.major_area_kana().is_some()
                || town.major_area_roma().is_some(),
            numbered_block: numbered.iter().all(Option::is_some),
            numbered_block_none: numbered.iter().all(Option::is_none),
            sub_block: town.sub_block().is_some(),
            sub_block_none: sub.iter().all(Option::is_none),
        }
    }

    fn no_major_area(self) -> bool {
        !self.major_area && !self.major_area_reading
    }

    fn only_numbered_block(self) -> bool {
        self.numbered_block && self.sub_block_none
    }

    fn only_sub_block(self) -> bool {
        self.numbered_block_none && self.sub_block
    }

    fn no_subdivision(self) -> bool {
        self.numbered_block_none && self.sub_block_none
    }
}

fn block_id_and_major_area(town: &TownRecord) -> MasterResult<()> {
    let p = Presence::of(town);
    let valid = if town.decoded_block_id().has_major_area() {
        p.major_area
    } else {
        p.no_major_area()
    };
    if valid {
        return Ok(());
    }
    Err(MasterError::MajorAreaMismatch {
        key: town.key().to_string(),
        field: fields::BLOCK_ID.name,
        block_id: town.block_id().to_string(),
    })
}

fn block_id_and_subdivisions(town: &TownRecord) -> MasterResult<()> {
    let p = Presence::of(town);
    let id = town.decoded_block_id();
    let valid = match (id.has_major_area(), id.subdivision()) {
        (true, Subdivision::NumberedBlock) => p.major_area && p.only_numbered_block(),
        (true, Subdivision::SubBlock) => p.major_area && p.only_sub_block(),
        (true, Subdivision::None) => p.major_area && p.no_subdivision(),
        (false, Subdivision::NumberedBlock) => p.no_major_area() && p.only_numbered_block(),
        (false, Subdivision::SubBlock) => !p.major_area && p.only_sub_block(),
        (false, Subdivision::None) => p.no_major_area() && p.no_subdivision(),
    };
    if valid {
        return Ok(());
    }
    Err(MasterError::SubdivisionMismatch {
        key: town.key().to_string(),
        field: fields::BLOCK_ID.name,
        block_id: town.block_id().to_string(),
    })
}

fn block_type_and_subdivisions(town: &TownRecord) -> MasterResult<()> {
    let p = Presence::of(town);
    let valid = match town.block_type() {
        BlockType::NumberedBlock => p.only_numbered_block(),
        BlockType::SubBlock => p.only_sub_block(),
        BlockType::MajorArea | BlockType::None | BlockType::Street => p.no_subdivision(),
    };
    if valid {
        return Ok(());
    }
    Err(MasterError::BlockTypeMismatch {
        key: town.key().to_string(),
        field: fields::BLOCK_TYPE.name,
        block_type: town.block_type().code().to_string(),
    })
}

fn kyoto_street_name(town: &TownRecord) -> MasterResult<()> {
    if town.sub_block_alias() != Some(SubBlockAlias::KyotoStreet) {
        return Ok(());
    }
    let valid = town.region_code().starts_with(KYOTO_PREFIX)
        && town.decoded_block_id().is_sub_block()
        && town.block_type() == BlockType::SubBlock;
    if valid {
        return Ok(());
    }
    Err(MasterError::KyotoStreetName {
        key: town.key().to_string(),
        field: fields::SUB_BLOCK_ALIAS.name,
        code: SubBlockAlias::KyotoStreet.code().to_string(),
    })
}

fn major_area_uncommon(town: &TownRecord) -> MasterResult<()> {
    // Absent markers are common even where a major area exists.
    match town.major_area_uncommon() {
        None | Some(NO_UNCOMMON_CHARS) => Ok(()),
        Some(_) if town.major_area().is_some() => Ok(()),
        Some(marker) => Err(MasterError::MajorAreaUncommon {
            key: town.key().to_string(),
            field: fields::MAJOR_AREA_UNCOMMON.name,
            marker: marker.to_string(),
        }),
    }
}

fn sub_block_uncommon(town: &TownRecord) -> MasterResult<()> {
    let valid = match town.sub_block_uncommon() {
        None => town.sub_block().is_none(),
        Some(NO_UNCOMMON_CHARS) => true,
        Some(_) => town.sub_block().is_some(),
    };
    if valid {
        return Ok(());
    }
    Err(MasterError::SubBlockUncommon {
        key: town.key().to_string(),
        field: fields::SUB_BLOCK_UNCOMMON.name,
        marker: town.sub_block_uncommon().map(str::to_owned),
    })
}
