use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// ResolutionTier is the target capture resolution of a video stream. Tiers are
/// totally ordered from lowest to highest and the order drives simulcast
/// ladder generation.
#[derive(
    Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Qvga,
    Vga,
    Shd,
    #[default]
    Hd,
    Fhd,
    Qhd,
}

/// ResolutionProfile is the capture size and encoder budget of a tier.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolutionProfile {
    pub width: u32,
    pub height: u32,
    /// max_bitrate in bits per second
    pub max_bitrate: u64,
    pub max_framerate: f64,
}

const RESOLUTION_TIER_QVGA_STR: &str = "qvga";
const RESOLUTION_TIER_VGA_STR: &str = "vga";
const RESOLUTION_TIER_SHD_STR: &str = "shd";
const RESOLUTION_TIER_HD_STR: &str = "hd";
const RESOLUTION_TIER_FHD_STR: &str = "fhd";
const RESOLUTION_TIER_QHD_STR: &str = "qhd";

impl ResolutionTier {
    /// ALL lists every tier from lowest to highest.
    pub const ALL: [ResolutionTier; 6] = [
        ResolutionTier::Qvga,
        ResolutionTier::Vga,
        ResolutionTier::Shd,
        ResolutionTier::Hd,
        ResolutionTier::Fhd,
        ResolutionTier::Qhd,
    ];

    /// index is the position of the tier in `ResolutionTier::ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<ResolutionTier> {
        Self::ALL.get(index).copied()
    }

    /// lower returns the tier `steps` below this one, if there is one
    pub fn lower(&self, steps: usize) -> Option<ResolutionTier> {
        self.index()
            .checked_sub(steps)
            .and_then(ResolutionTier::from_index)
    }

    pub fn profile(&self) -> ResolutionProfile {
        let (width, height, max_bitrate, max_framerate) = match *self {
            ResolutionTier::Qvga => (320, 240, 150_000, 15.0),
            ResolutionTier::Vga => (640, 480, 500_000, 30.0),
            ResolutionTier::Shd => (960, 540, 1_200_000, 30.0),
            ResolutionTier::Hd => (1280, 720, 2_500_000, 30.0),
            ResolutionTier::Fhd => (1920, 1080, 4_000_000, 30.0),
            ResolutionTier::Qhd => (2560, 1440, 8_000_000, 30.0),
        };

        ResolutionProfile {
            width,
            height,
            max_bitrate,
            max_framerate,
        }
    }
}

impl FromStr for ResolutionTier {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            RESOLUTION_TIER_QVGA_STR => Ok(ResolutionTier::Qvga),
            RESOLUTION_TIER_VGA_STR => Ok(ResolutionTier::Vga),
            RESOLUTION_TIER_SHD_STR => Ok(ResolutionTier::Shd),
            RESOLUTION_TIER_HD_STR => Ok(ResolutionTier::Hd),
            RESOLUTION_TIER_FHD_STR => Ok(ResolutionTier::Fhd),
            RESOLUTION_TIER_QHD_STR => Ok(ResolutionTier::Qhd),
            _ => Err(Error::ErrInvalidResolutionTier(raw.to_owned())),
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            ResolutionTier::Qvga => RESOLUTION_TIER_QVGA_STR,
            ResolutionTier::Vga => RESOLUTION_TIER_VGA_STR,
            ResolutionTier::Shd => RESOLUTION_TIER_SHD_STR,
            ResolutionTier::Hd => RESOLUTION_TIER_HD_STR,
            ResolutionTier::Fhd => RESOLUTION_TIER_FHD_STR,
            ResolutionTier::Qhd => RESOLUTION_TIER_QHD_STR,
        };
        write!(f, "{s}")
    }
}
