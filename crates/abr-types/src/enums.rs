//! Address Base Registry coded values.
//!
//! The registry stores flags and classifications as short numeric codes.
//! Each enum here is a closed set with a total `from_code` lookup; an
//! unmatched code is rejected by the builders as an [`UnknownCode`] error.
//!
//! [`UnknownCode`]: crate::MasterError::UnknownCode

use crate::error::{MasterError, MasterResult};

/// A closed set of codes mapped to enum variants.
pub trait CodeSet: Sized + Copy + 'static {
    /// Every accepted code, in declaration order.
    const CODES: &'static [&'static str];

    /// Looks up the variant for a code.
    fn from_code(code: &str) -> Option<Self>;

    /// Returns the code for this variant.
    fn code(self) -> &'static str;

    /// Looks up a code, turning a miss into an `UnknownCode` error.
    fn parse(code: &str, field: &'static str, key: &str) -> MasterResult<Self> {
        Self::from_code(code).ok_or_else(|| MasterError::UnknownCode {
            key: key.to_string(),
            field,
            value: code.to_string(),
            expected: Self::CODES,
        })
    }
}

macro_rules! code_set {
    ($ty:ty) => {
        impl CodeSet for $ty {
            const CODES: &'static [&'static str] = <$ty>::CODES;

            fn from_code(code: &str) -> Option<Self> {
                <$ty>::from_code(code)
            }

            fn code(self) -> &'static str {
                <$ty>::code(self)
            }
        }
    };
}

/// Classification of a town record (町字区分).
///
/// # Examples
///
/// ```
/// use abr_types::BlockType;
///
/// assert_eq!(BlockType::from_code("2"), Some(BlockType::NumberedBlock));
/// assert_eq!(BlockType::SubBlock.code(), "3");
/// assert_eq!(BlockType::from_code("9"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    /// Major area (大字・町).
    MajorArea,
    /// Numbered block (丁目).
    NumberedBlock,
    /// Sub-block (小字).
    SubBlock,
    /// No major area, numbered block or sub-block.
    None,
    /// Road name under street-based residential display.
    Street,
}

impl BlockType {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["1", "2", "3", "4", "5"];

    /// Creates a BlockType from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::MajorArea),
            "2" => Some(Self::NumberedBlock),
            "3" => Some(Self::SubBlock),
            "4" => Some(Self::None),
            "5" => Some(Self::Street),
            _ => None,
        }
    }

    /// Returns the code for this block type.
    pub fn code(self) -> &'static str {
        match self {
            Self::MajorArea => "1",
            Self::NumberedBlock => "2",
            Self::SubBlock => "3",
            Self::None => "4",
            Self::Street => "5",
        }
    }
}

code_set!(BlockType);

/// Whether residential display is in force for the area (住居表示フラグ).
///
/// # Examples
///
/// ```
/// use abr_types::ResidentialDisplay;
///
/// let flag = ResidentialDisplay::from_code("1").unwrap();
/// assert!(flag.is_implemented());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResidentialDisplay {
    /// Lot-number addressing only.
    NotImplemented,
    /// Residential display implemented.
    Implemented,
}

impl ResidentialDisplay {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1"];

    /// Creates a ResidentialDisplay from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::NotImplemented),
            "1" => Some(Self::Implemented),
            _ => None,
        }
    }

    /// Returns the code for this flag.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotImplemented => "0",
            Self::Implemented => "1",
        }
    }

    /// Returns true if residential display is in force.
    pub fn is_implemented(self) -> bool {
        self == Self::Implemented
    }
}

code_set!(ResidentialDisplay);

/// Residential display scheme (住居表示方式コード).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResidentialDisplayMethod {
    /// Not residential display.
    None,
    /// Street-based scheme.
    Street,
    /// Block-based scheme.
    Block,
}

impl ResidentialDisplayMethod {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1", "2"];

    /// Creates a ResidentialDisplayMethod from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::None),
            "1" => Some(Self::Street),
            "2" => Some(Self::Block),
            _ => None,
        }
    }

    /// Returns the code for this method.
    pub fn code(self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Street => "1",
            Self::Block => "2",
        }
    }
}

code_set!(ResidentialDisplayMethod);

/// Whether the major-area name is a commonly used alias (大字・町_通称フラグ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MajorAreaAlias {
    /// Official name.
    NotAlias,
    /// The name recorded is an alias.
    Alias,
}

impl MajorAreaAlias {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1"];

    /// Creates a MajorAreaAlias from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::NotAlias),
            "1" => Some(Self::Alias),
            _ => None,
        }
    }

    /// Returns the code for this flag.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotAlias => "0",
            Self::Alias => "1",
        }
    }

    /// Returns true if the name is an alias.
    pub fn is_alias(self) -> bool {
        self == Self::Alias
    }
}

code_set!(MajorAreaAlias);

/// Kind of alias recorded as the sub-block name (小字_通称コード).
///
/// # Examples
///
/// ```
/// use abr_types::SubBlockAlias;
///
/// assert_eq!(SubBlockAlias::from_code("2"), Some(SubBlockAlias::KyotoStreet));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubBlockAlias {
    /// Official name.
    NotAlias,
    /// The sub-block name is an alias.
    Alias,
    /// The sub-block name is a Kyoto street name (通り名).
    KyotoStreet,
    /// The alias comes from the national base map's place names.
    General,
}

impl SubBlockAlias {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1", "2", "3"];

    /// Creates a SubBlockAlias from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::NotAlias),
            "1" => Some(Self::Alias),
            "2" => Some(Self::KyotoStreet),
            "3" => Some(Self::General),
            _ => None,
        }
    }

    /// Returns the code for this alias kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotAlias => "0",
            Self::Alias => "1",
            Self::KyotoStreet => "2",
            Self::General => "3",
        }
    }
}

code_set!(SubBlockAlias);

/// Confirmation status of the record (状態フラグ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Awaiting confirmation by the local government.
    Pending,
    /// A town or aza under the Local Autonomy Act.
    Approved,
    /// Not a town or aza under the Local Autonomy Act.
    Rejected,
    /// Unknown.
    Unknown,
}

impl Status {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1", "2", "3"];

    /// Creates a Status from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Pending),
            "1" => Some(Self::Approved),
            "2" => Some(Self::Rejected),
            "3" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Returns the code for this status.
    pub fn code(self) -> &'static str {
        match self {
            Self::Pending => "0",
            Self::Approved => "1",
            Self::Rejected => "2",
            Self::Unknown => "3",
        }
    }
}

code_set!(Status);

/// Land-registry numbering state (起番フラグ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Numbering {
    /// Not registered.
    Unregistered,
    /// Lot numbers are assigned under this name.
    Applied,
    /// Lot numbers are not assigned under this name.
    NotApplied,
}

impl Numbering {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1", "2"];

    /// Creates a Numbering from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Unregistered),
            "1" => Some(Self::Applied),
            "2" => Some(Self::NotApplied),
            _ => None,
        }
    }

    /// Returns the code for this flag.
    pub fn code(self) -> &'static str {
        match self {
            Self::Unregistered => "0",
            Self::Applied => "1",
            Self::NotApplied => "2",
        }
    }
}

code_set!(Numbering);

/// Provenance of the record (原典資料コード).
///
/// # Examples
///
/// ```
/// use abr_types::Source;
///
/// let source = Source::from_code("12").unwrap();
/// assert!(source.is_national_survey());
/// assert!(!Source::LocalGovernment.is_national_survey());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Source {
    /// Other material.
    Other,
    /// Local government material.
    LocalGovernment,
    /// National location reference data, other material.
    SurveyOther,
    /// National location reference data, local government material.
    SurveyLocalGovernment,
    /// National location reference data at block level.
    SurveyBlock,
    /// National location reference data from 1:2500 topographic maps.
    SurveyTopographic,
}

impl Source {
    /// Every accepted code.
    pub const CODES: &'static [&'static str] = &["0", "1", "10", "11", "12", "13"];

    /// Creates a Source from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Other),
            "1" => Some(Self::LocalGovernment),
            "10" => Some(Self::SurveyOther),
            "11" => Some(Self::SurveyLocalGovernment),
            "12" => Some(Self::SurveyBlock),
            "13" => Some(Self::SurveyTopographic),
            _ => None,
        }
    }

    /// Returns the code for this source.
    pub fn code(self) -> &'static str {
        match self {
            Self::Other => "0",
            Self::LocalGovernment => "1",
            Self::SurveyOther => "10",
            Self::SurveyLocalGovernment => "11",
            Self::SurveyBlock => "12",
            Self::SurveyTopographic => "13",
        }
    }

    /// Returns true if the record comes from the national location reference data.
    pub fn is_national_survey(self) -> bool {
        matches!(
            self,
            Self::SurveyOther
                | Self::SurveyLocalGovernment
                | Self::SurveyBlock
                | Self::SurveyTopographic
        )
    }
}

code_set!(Source);
