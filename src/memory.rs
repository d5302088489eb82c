//! Memory area designators for the FINS protocol.
//!
//! A frame carries the memory area as a single designator byte. Any byte can
//! be used directly; [`MemoryArea`] names the common ones.
//!
//! | Area | Description | Word code | Bit code |
//! |------|-------------|:---------:|:--------:|
//! | CIO | Core I/O - inputs, outputs, internal relays | `0xB0` | `0x30` |
//! | WR | Work area - temporary work bits/words | `0xB1` | `0x31` |
//! | HR | Holding area - retentive bits/words | `0xB2` | `0x32` |
//! | DM | Data Memory - numeric data storage | `0x82` | - |
//! | AR | Auxiliary Relay - system status/control | `0xB3` | `0x33` |
//!
//! # Example
//!
//! ```
//! use fins_frame::MemoryArea;
//!
//! assert_eq!(u8::from(MemoryArea::DM), 0x82);
//! assert_eq!(MemoryArea::CIO.bit_code().unwrap(), 0x30);
//! assert!(MemoryArea::DM.bit_code().is_err());
//! ```

use crate::error::{FinsError, Result};

/// Named memory areas of Omron controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryArea {
    /// CIO (Core I/O) area - general purpose I/O and internal relays.
    CIO,
    /// WR (Work) area - work bits/words.
    WR,
    /// HR (Holding) area - holding bits/words that retain values.
    HR,
    /// DM (Data Memory) area - word-only data storage.
    DM,
    /// AR (Auxiliary Relay) area - system status and control bits/words.
    AR,
}

impl MemoryArea {
    /// Returns the designator byte for word access to this area.
    pub fn word_code(self) -> u8 {
        match self {
            MemoryArea::CIO => 0xB0,
            MemoryArea::WR => 0xB1,
            MemoryArea::HR => 0xB2,
            MemoryArea::DM => 0x82,
            MemoryArea::AR => 0xB3,
        }
    }

    /// Returns the designator byte for bit access to this area.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::InvalidAddress` for the DM area, which has no bit
    /// designator.
    pub fn bit_code(self) -> Result<u8> {
        match self {
            MemoryArea::CIO => Ok(0x30),
            MemoryArea::WR => Ok(0x31),
            MemoryArea::HR => Ok(0x32),
            MemoryArea::DM => Err(FinsError::invalid_address(
                "DM area does not support bit access",
            )),
            MemoryArea::AR => Ok(0x33),
        }
    }

    /// Looks up the named area for a word or bit designator byte.
    ///
    /// Returns `None` for designators that have no name here.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0xB0 | 0x30 => Some(MemoryArea::CIO),
            0xB1 | 0x31 => Some(MemoryArea::WR),
            0xB2 | 0x32 => Some(MemoryArea::HR),
            0x82 => Some(MemoryArea::DM),
            0xB3 | 0x33 => Some(MemoryArea::AR),
            _ => None,
        }
    }
}

impl From<MemoryArea> for u8 {
    fn from(area: MemoryArea) -> Self {
        area.word_code()
    }
}

impl std::fmt::Display for MemoryArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryArea::CIO => write!(f, "CIO"),
            MemoryArea::WR => write!(f, "WR"),
            MemoryArea::HR => write!(f, "HR"),
            MemoryArea::DM => write!(f, "DM"),
            MemoryArea::AR => write!(f, "AR"),
        }
    }
}
