//! Tissue-class codes of FreeSurfer's cortical ribbon volume.
//!
//! `mri/ribbon.mgz` tags each voxel with a code from the FreeSurfer color
//! lookup table. Only five codes occur in it; the two cortex codes select the
//! voxels that receive surface labels.
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Tissue class of a voxel in a cortical ribbon volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum TissueClass {
    /// Background.
    Unknown = 0,
    /// Left-Cerebral-White-Matter.
    LeftWhiteMatter = 2,
    /// Left-Cerebral-Cortex.
    LeftCortex = 3,
    /// Right-Cerebral-White-Matter.
    RightWhiteMatter = 41,
    /// Right-Cerebral-Cortex.
    RightCortex = 42,
}

impl TissueClass {
    /// Decode a raw voxel value, if it is one of the ribbon codes.
    pub fn from_code(code: i32) -> Option<Self> {
        TissueClass::from_i32(code)
    }

    /// The raw voxel value of this class.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// The hemisphere this class belongs to, if any.
    pub fn hemisphere(self) -> Option<Hemisphere> {
        match self {
            TissueClass::LeftWhiteMatter | TissueClass::LeftCortex => Some(Hemisphere::Left),
            TissueClass::RightWhiteMatter | TissueClass::RightCortex => Some(Hemisphere::Right),
            TissueClass::Unknown => None,
        }
    }
}

/// One half of the cerebral cortex.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Hemisphere {
    /// Left hemisphere (`lh.*` files).
    Left,
    /// Right hemisphere (`rh.*` files).
    Right,
}

impl Hemisphere {
    /// Ribbon class holding this hemisphere's cortex.
    pub fn cortex(self) -> TissueClass {
        match self {
            Hemisphere::Left => TissueClass::LeftCortex,
            Hemisphere::Right => TissueClass::RightCortex,
        }
    }

    /// FreeSurfer file prefix for this hemisphere.
    pub fn prefix(self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }
}
