//! Encoder configuration.
//!
//! [`EncoderConfig`] holds what the short-form entry points do not take as
//! arguments: the addressing fields, the validation policy and whether the
//! ICF/RSV control bytes are emitted.
//!
//! # Example
//!
//! ```
//! use fins_frame::{EncoderConfig, NodeAddress, Validation};
//!
//! let config = EncoderConfig::new()
//!     .with_destination(NodeAddress::new(0, 10, 0))
//!     .with_source(NodeAddress::new(0, 1, 0))
//!     .with_sid(0x05)
//!     .with_validation(Validation::Permissive);
//!
//! assert_eq!(config.addressing.da1, 10);
//! assert_eq!(config.addressing.sid, 0x05);
//! ```

use crate::header::{FinsHeader, NodeAddress};

/// How strictly commands are checked before they are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Validation {
    /// Out-of-range addresses and values, empty writes and mixed read/write
    /// fields are rejected with an error.
    #[default]
    Strict,
    /// Inputs are passed through: wide values are truncated to their low bits,
    /// out-of-range BCD values are packed with plain arithmetic and extraneous
    /// fields are ignored.
    ///
    /// Combined with [`EncoderConfig::with_control_bytes`] this reproduces the
    /// frames of older FINS stacks byte for byte.
    Permissive,
}

impl Validation {
    /// Returns whether this is [`Validation::Strict`].
    pub fn is_strict(self) -> bool {
        matches!(self, Validation::Strict)
    }
}

/// Configuration for a [`FrameEncoder`](crate::FrameEncoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderConfig {
    /// Addressing fields used by the short-form read and write commands.
    pub addressing: FinsHeader,
    /// Validation policy.
    pub validation: Validation,
    /// Emit ICF `0x80` and RSV `0x00` before the addressing fields of every
    /// non-connect frame. Off by default.
    pub control_bytes: bool,
}

impl EncoderConfig {
    /// Creates a configuration with default addressing, strict validation and
    /// no control bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all addressing fields.
    pub fn with_addressing(mut self, addressing: FinsHeader) -> Self {
        self.addressing = addressing;
        self
    }

    /// Sets the destination network/node/unit.
    pub fn with_destination(mut self, destination: NodeAddress) -> Self {
        self.addressing.dna = destination.network;
        self.addressing.da1 = destination.node;
        self.addressing.da2 = destination.unit;
        self
    }

    /// Sets the source network/node/unit.
    pub fn with_source(mut self, source: NodeAddress) -> Self {
        self.addressing.sna = source.network;
        self.addressing.sa1 = source.node;
        self.addressing.sa2 = source.unit;
        self
    }

    /// Sets the permissible gateway count (default is 2).
    pub fn with_gateway_count(mut self, gct: u8) -> Self {
        self.addressing.gct = gct;
        self
    }

    /// Sets the source ID.
    pub fn with_sid(mut self, sid: u8) -> Self {
        self.addressing.sid = sid;
        self
    }

    /// Sets the validation policy (default is [`Validation::Strict`]).
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::{EncoderConfig, Validation};
    ///
    /// let config = EncoderConfig::new().with_validation(Validation::Permissive);
    /// assert!(!config.validation.is_strict());
    /// ```
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Enables or disables the ICF/RSV control bytes.
    ///
    /// When enabled, `80 00` is written right after the command-class marker
    /// and every later field shifts by two bytes. Connect frames are not
    /// affected.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::{EncoderConfig, FrameEncoder, MemoryRef};
    ///
    /// let encoder = FrameEncoder::new(EncoderConfig::new().with_control_bytes(true));
    /// let frame = encoder.read_memory(MemoryRef::word(0x82, 0), 1)?;
    /// assert_eq!(&frame.as_bytes()[16..18], &[0x80, 0x00]);
    /// assert_eq!(frame.len(), 34);
    /// # Ok::<(), fins_frame::FinsError>(())
    /// ```
    pub fn with_control_bytes(mut self, enabled: bool) -> Self {
        self.control_bytes = enabled;
        self
    }
}
