//! Command descriptions and boundary validation.
//!
//! A [`Command`] is the logical description of what a frame should do. It is
//! a tagged variant: each kind carries only the fields it needs.
//!
//! - [`Command::Connect`] - session handshake, no fields
//! - [`Command::ReadMemory`] - read `length` words from a memory area
//! - [`Command::WriteMemory`] - write values to a memory area
//! - [`Command::Generic`] - fully custom read or write, including the
//!   addressing fields
//!
//! Commands are turned into bytes by [`FrameEncoder`](crate::FrameEncoder),
//! which first checks them against the configured [`Validation`] policy.
//!
//! # Example
//!
//! ```
//! use fins_frame::{Command, MemoryArea, MemoryRef, ValueEncoding};
//!
//! let read = Command::ReadMemory {
//!     memory: MemoryRef::word(MemoryArea::DM, 100),
//!     length: 10,
//! };
//! let write = Command::WriteMemory {
//!     memory: MemoryRef::word(0x82, 200),
//!     values: vec![1234, 5678],
//!     encoding: ValueEncoding::Bcd,
//! };
//! assert_eq!(read.kind().to_string(), "read-memory");
//! assert_eq!(write.kind().to_string(), "write-memory");
//! ```

use tracing::warn;

use crate::config::Validation;
use crate::error::{FinsError, Result};
use crate::header::FinsHeader;
use crate::utils::BCD_WORD_MAX;

/// Memory area command code (MRC).
pub(crate) const MRC_MEMORY_AREA: u8 = 0x01;
/// Memory area read sub-code (SRC).
pub(crate) const SRC_MEMORY_READ: u8 = 0x01;
/// Memory area write sub-code (SRC).
pub(crate) const SRC_MEMORY_WRITE: u8 = 0x02;

/// Command-class marker of a connect frame.
pub const COMMAND_CLASS_CONNECT: [u8; 8] = [0x00; 8];
/// Command-class marker of every other frame.
pub const COMMAND_CLASS_GENERIC: [u8; 8] = [0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00];

/// Highest bit offset inside a 16-bit word.
pub const MAX_BIT_OFFSET: u8 = 15;

/// The kind of a command, selecting the command-class marker and payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    /// Session handshake.
    Connect,
    /// Memory area read.
    ReadMemory,
    /// Memory area write.
    WriteMemory,
    /// Fully custom read or write.
    Generic,
}

impl CommandKind {
    /// Returns the 8-byte command-class marker for this kind.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::CommandKind;
    ///
    /// assert_eq!(CommandKind::Connect.command_class(), [0; 8]);
    /// assert_eq!(CommandKind::ReadMemory.command_class()[3], 0x02);
    /// ```
    pub fn command_class(self) -> [u8; 8] {
        match self {
            CommandKind::Connect => COMMAND_CLASS_CONNECT,
            CommandKind::ReadMemory | CommandKind::WriteMemory | CommandKind::Generic => {
                COMMAND_CLASS_GENERIC
            }
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Connect => write!(f, "connect"),
            CommandKind::ReadMemory => write!(f, "read-memory"),
            CommandKind::WriteMemory => write!(f, "write-memory"),
            CommandKind::Generic => write!(f, "generic"),
        }
    }
}

/// How written values are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueEncoding {
    /// Raw 16-bit big-endian words.
    #[default]
    Hex,
    /// Packed binary-coded-decimal words (0-9999 per word).
    Bcd,
}

/// Location of the memory a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRef {
    /// Memory area designator byte.
    pub area: u8,
    /// Register (word) address. Encoded as 16 bits on the wire.
    pub address: u32,
    /// Bit offset inside the word, 0 for whole-word access.
    pub bit: u8,
}

impl MemoryRef {
    /// Creates a whole-word reference (bit = 0).
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::{MemoryArea, MemoryRef};
    ///
    /// let memory = MemoryRef::word(MemoryArea::DM, 100);
    /// assert_eq!(memory.area, 0x82);
    /// assert_eq!(memory.bit, 0);
    /// ```
    pub fn word(area: impl Into<u8>, address: u32) -> Self {
        Self {
            area: area.into(),
            address,
            bit: 0,
        }
    }

    /// Creates a bit-level reference.
    ///
    /// The bit offset is checked when the frame is encoded.
    pub fn bit(area: impl Into<u8>, address: u32, bit: u8) -> Self {
        Self {
            area: area.into(),
            address,
            bit,
        }
    }

    /// Returns whether this reference addresses a single bit.
    pub fn is_bit_access(&self) -> bool {
        self.bit != 0
    }
}

/// Memory operation of a [`GenericCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Memory area read (`01 01`).
    Read,
    /// Memory area write (`01 02`).
    Write,
}

impl Operation {
    /// Returns the 2-byte command code.
    pub fn command_code(self) -> [u8; 2] {
        match self {
            Operation::Read => [MRC_MEMORY_AREA, SRC_MEMORY_READ],
            Operation::Write => [MRC_MEMORY_AREA, SRC_MEMORY_WRITE],
        }
    }
}

/// A fully custom memory command.
///
/// Unlike the other command kinds it carries its own addressing fields and
/// accepts any combination of read and write fields. Which combinations are
/// accepted depends on the encoder's [`Validation`] policy.
///
/// A generic command is always a memory read or write: [`Operation`] has no
/// connect case, so a connect frame cannot be built through this type.
/// Connect frames carry no addressing or memory fields to customize; use
/// [`Command::Connect`] for them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericCommand {
    /// Read or write.
    pub operation: Operation,
    /// The 8 addressing fields.
    pub header: FinsHeader,
    /// Target memory.
    pub memory: MemoryRef,
    /// Number of words to read. Only meaningful for reads.
    pub length: Option<u16>,
    /// Values to write. Only meaningful for writes.
    pub values: Option<Vec<u32>>,
    /// Encoding of the written values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoding: ValueEncoding,
}

impl GenericCommand {
    /// Creates a custom read command.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::{FinsHeader, GenericCommand, MemoryRef, NodeAddress, Operation};
    ///
    /// let header = FinsHeader::new(NodeAddress::new(0, 10, 0), NodeAddress::new(0, 1, 0), 7);
    /// let cmd = GenericCommand::read(header, MemoryRef::word(0x82, 100), 4);
    /// assert_eq!(cmd.operation, Operation::Read);
    /// assert_eq!(cmd.length, Some(4));
    /// ```
    pub fn read(header: FinsHeader, memory: MemoryRef, length: u16) -> Self {
        Self {
            operation: Operation::Read,
            header,
            memory,
            length: Some(length),
            values: None,
            encoding: ValueEncoding::Hex,
        }
    }

    /// Creates a custom write command.
    pub fn write(
        header: FinsHeader,
        memory: MemoryRef,
        values: Vec<u32>,
        encoding: ValueEncoding,
    ) -> Self {
        Self {
            operation: Operation::Write,
            header,
            memory,
            length: None,
            values: Some(values),
            encoding,
        }
    }
}

/// Logical description of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Command {
    /// Session handshake.
    Connect,
    /// Memory area read with the encoder's default addressing.
    ReadMemory {
        /// Target memory.
        memory: MemoryRef,
        /// Number of words to read.
        length: u16,
    },
    /// Memory area write with the encoder's default addressing.
    WriteMemory {
        /// Target memory.
        memory: MemoryRef,
        /// Values to write, in order.
        values: Vec<u32>,
        /// Encoding of the values.
        #[cfg_attr(feature = "serde", serde(default))]
        encoding: ValueEncoding,
    },
    /// Fully custom read or write.
    Generic(GenericCommand),
}

impl Command {
    /// Returns the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Connect => CommandKind::Connect,
            Command::ReadMemory { .. } => CommandKind::ReadMemory,
            Command::WriteMemory { .. } => CommandKind::WriteMemory,
            Command::Generic(_) => CommandKind::Generic,
        }
    }

    /// Checks the command against `validation` and resolves it to the payload
    /// that will be written, using `addressing` where the command has none.
    pub(crate) fn resolve(
        &self,
        addressing: FinsHeader,
        validation: Validation,
    ) -> Result<Payload<'_>> {
        match self {
            Command::Connect => Ok(Payload::Connect),
            Command::ReadMemory { memory, length } => {
                check_memory(memory, validation)?;
                Ok(Payload::Read {
                    header: addressing,
                    memory: *memory,
                    length: *length,
                })
            }
            Command::WriteMemory {
                memory,
                values,
                encoding,
            } => {
                check_memory(memory, validation)?;
                check_values(memory, values, *encoding, validation)?;
                Ok(Payload::Write {
                    header: addressing,
                    memory: *memory,
                    values,
                    encoding: *encoding,
                })
            }
            Command::Generic(cmd) => resolve_generic(cmd, validation),
        }
    }
}

/// A command after validation, ready to be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Payload<'a> {
    Connect,
    Read {
        header: FinsHeader,
        memory: MemoryRef,
        length: u16,
    },
    Write {
        header: FinsHeader,
        memory: MemoryRef,
        values: &'a [u32],
        encoding: ValueEncoding,
    },
}

fn resolve_generic(cmd: &GenericCommand, validation: Validation) -> Result<Payload<'_>> {
    check_memory(&cmd.memory, validation)?;

    match cmd.operation {
        Operation::Read => {
            if cmd.values.is_some() && validation.is_strict() {
                return Err(FinsError::inconsistent_parameters(
                    "values supplied for a read command",
                ));
            }
            let length = match cmd.length {
                Some(length) => length,
                None if validation.is_strict() => {
                    return Err(FinsError::inconsistent_parameters(
                        "read command requires a length",
                    ))
                }
                None => 0,
            };
            Ok(Payload::Read {
                header: cmd.header,
                memory: cmd.memory,
                length,
            })
        }
        Operation::Write => {
            if cmd.length.is_some() && validation.is_strict() {
                return Err(FinsError::inconsistent_parameters(
                    "length supplied for a write command",
                ));
            }
            let values = cmd.values.as_deref().unwrap_or(&[]);
            check_values(&cmd.memory, values, cmd.encoding, validation)?;
            Ok(Payload::Write {
                header: cmd.header,
                memory: cmd.memory,
                values,
                encoding: cmd.encoding,
            })
        }
    }
}

fn check_memory(memory: &MemoryRef, validation: Validation) -> Result<()> {
    if memory.address > u32::from(u16::MAX) {
        if validation.is_strict() {
            return Err(FinsError::invalid_address(format!(
                "register address {} exceeds 0xFFFF",
                memory.address
            )));
        }
        warn!(
            address = memory.address,
            "register address truncated to 16 bits"
        );
    }
    if memory.bit > MAX_BIT_OFFSET && validation.is_strict() {
        return Err(FinsError::invalid_address(format!(
            "bit offset {} exceeds {}",
            memory.bit, MAX_BIT_OFFSET
        )));
    }
    Ok(())
}

fn check_values(
    memory: &MemoryRef,
    values: &[u32],
    encoding: ValueEncoding,
    validation: Validation,
) -> Result<()> {
    if values.is_empty() {
        if validation.is_strict() {
            return Err(FinsError::EmptyValueSet);
        }
        warn!("write command encoded with an empty value set");
    }
    if values.len() > usize::from(u16::MAX) {
        if validation.is_strict() {
            return Err(FinsError::invalid_value_range(
                values.len() as u64,
                "a write carries at most 65535 values",
            ));
        }
        warn!(count = values.len(), "value count truncated to 16 bits");
    }

    let (limit, reason) = value_limit(memory, encoding);
    if let Some(&value) = values.iter().find(|&&value| value > limit) {
        if validation.is_strict() {
            return Err(FinsError::invalid_value_range(value, reason));
        }
        warn!(value, limit, "value truncated to fit its encoding");
    }
    Ok(())
}

/// Largest value each encoding can carry for this memory reference.
fn value_limit(memory: &MemoryRef, encoding: ValueEncoding) -> (u32, &'static str) {
    match encoding {
        ValueEncoding::Hex => (u32::from(u16::MAX), "hex words hold 0-65535"),
        ValueEncoding::Bcd if memory.is_bit_access() => (
            u32::from(u8::MAX),
            "bit-level values are written as single bytes",
        ),
        ValueEncoding::Bcd => (BCD_WORD_MAX, "BCD words hold 0-9999"),
    }
}
