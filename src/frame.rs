//! Frame assembly.
//!
//! Every frame is built by the same pipeline in [`FrameEncoder::encode`]:
//!
//! 1. the `FINS` magic,
//! 2. a 4-byte length placeholder,
//! 3. the 8-byte command-class marker of the command kind,
//! 4. the addressing fields and memory payload, or the connect payload,
//! 5. the length field patched to `frame length - 8`.
//!
//! # Wire layout
//!
//! | Offset | Bytes | Meaning |
//! |--------|-------|---------|
//! | 0-3 | `46 49 4e 53` | `"FINS"` |
//! | 4-7 | u32 BE | length of everything after offset 8 |
//! | 8-15 | 8 | command-class marker |
//! | 16-23 | 8 | GCT DNA DA1 DA2 SNA SA1 SA2 SID (non-connect) |
//! | 24-25 | 2 | command code (`01 01` read, `01 02` write) |
//! | 26 | 1 | memory area |
//! | 27-28 | 2 | register address |
//! | 29 | 1 | bit offset |
//! | 30-31 | 2 | read length or value count |
//! | 32.. | n | encoded values (write only) |
//!
//! A connect frame ends after the command-class marker with 4 zero bytes.
//!
//! With [`EncoderConfig::with_control_bytes`] every non-connect frame also
//! carries the ICF/RSV pair `80 00` between the marker and the addressing
//! fields, moving everything from offset 16 onwards two bytes to the right.
//!
//! # Example
//!
//! ```
//! use fins_frame::{Frame, MemoryRef, ValueEncoding};
//!
//! let frame = Frame::write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Bcd)?;
//! assert_eq!(&frame.as_bytes()[..4], b"FINS");
//! assert_eq!(frame.length_field() as usize, frame.len() - 8);
//! assert_eq!(&frame.as_bytes()[32..], &[0x12, 0x34]);
//! # Ok::<(), fins_frame::FinsError>(())
//! ```

use tracing::{debug, trace};

use crate::command::{
    Command, CommandKind, GenericCommand, MemoryRef, Operation, Payload, ValueEncoding,
};
use crate::config::EncoderConfig;
use crate::error::Result;
use crate::header::{FinsHeader, CONTROL_BYTES, FINS_HEADER_SIZE};
use crate::utils::{format_hex_bytes, to_bcd_words, to_word, to_words};

/// Magic bytes every frame starts with.
pub const FINS_MAGIC: [u8; 4] = *b"FINS";

/// Byte range of the big-endian length field.
pub const LENGTH_FIELD: std::ops::Range<usize> = 4..8;

/// Bytes before the part counted by the length field.
pub const FRAME_PREFIX_SIZE: usize = 8;

/// Payload of a connect frame.
pub const CONNECT_PAYLOAD: [u8; 4] = [0x00; 4];

/// Offset of the command-class marker.
const COMMAND_CLASS_OFFSET: usize = 8;
/// Offset of the addressing fields in non-connect frames without control bytes.
const ADDRESSING_OFFSET: usize = 16;
/// Offset of the command code in non-connect frames without control bytes.
const COMMAND_CODE_OFFSET: usize = ADDRESSING_OFFSET + FINS_HEADER_SIZE;
/// Command code, area, address, bit and length/count.
const MEMORY_COMMAND_SIZE: usize = 2 + 1 + 2 + 1 + 2;

/// Size of a connect frame in bytes.
pub const CONNECT_FRAME_SIZE: usize = COMMAND_CLASS_OFFSET + 8 + CONNECT_PAYLOAD.len();

/// Size of a memory command frame before any written values, without
/// control bytes.
pub const MEMORY_FRAME_SIZE: usize = COMMAND_CODE_OFFSET + MEMORY_COMMAND_SIZE;

/// A complete, immutable FINS frame.
///
/// Frames are only created by the encoder and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: Vec<u8>,
    kind: CommandKind,
    control_bytes: bool,
}

impl Frame {
    /// Builds a connect frame.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::Frame;
    ///
    /// let frame = Frame::connect();
    /// assert_eq!(frame.len(), 20);
    /// assert_eq!(frame.length_field(), 12);
    /// ```
    pub fn connect() -> Self {
        FrameEncoder::default().connect()
    }

    /// Builds a memory read frame with default addressing.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::InvalidAddress` if the register address exceeds
    /// 16 bits or the bit offset exceeds 15.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::{Frame, MemoryArea, MemoryRef};
    ///
    /// let frame = Frame::read_memory(MemoryRef::word(MemoryArea::DM, 100), 1)?;
    /// assert_eq!(&frame.as_bytes()[24..], &[0x01, 0x01, 0x82, 0x00, 0x64, 0x00, 0x00, 0x01]);
    /// # Ok::<(), fins_frame::FinsError>(())
    /// ```
    pub fn read_memory(memory: MemoryRef, length: u16) -> Result<Self> {
        FrameEncoder::default().read_memory(memory, length)
    }

    /// Builds a memory write frame with default addressing.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is out of range, `values` is empty, or
    /// a value does not fit the requested encoding.
    pub fn write_memory(
        memory: MemoryRef,
        values: &[u32],
        encoding: ValueEncoding,
    ) -> Result<Self> {
        FrameEncoder::default().write_memory(memory, values, encoding)
    }

    /// Builds a fully custom frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails strict validation.
    pub fn generic(command: GenericCommand) -> Result<Self> {
        FrameEncoder::default().generic(command)
    }

    /// Returns the frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the frame bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Consumes the frame and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the total frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the frame has no bytes. Encoded frames never do.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the kind of command this frame encodes.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Returns whether the ICF/RSV control bytes precede the addressing fields.
    ///
    /// Always `false` for a connect frame.
    pub fn has_control_bytes(&self) -> bool {
        self.control_bytes
    }

    /// Returns the value of the length field at offsets 4-7.
    pub fn length_field(&self) -> u32 {
        let mut field = [0u8; 4];
        field.copy_from_slice(&self.bytes[LENGTH_FIELD]);
        u32::from_be_bytes(field)
    }

    /// Returns the addressing fields, or `None` for a connect frame.
    pub fn addressing(&self) -> Option<FinsHeader> {
        if self.kind == CommandKind::Connect {
            return None;
        }
        FinsHeader::from_bytes(&self.bytes[self.addressing_offset()..]).ok()
    }

    /// Returns the 2-byte command code, or `None` for a connect frame.
    pub fn command_code(&self) -> Option<[u8; 2]> {
        if self.kind == CommandKind::Connect {
            return None;
        }
        let offset = self.addressing_offset() + FINS_HEADER_SIZE;
        let code = self.bytes.get(offset..offset + 2)?;
        Some([code[0], code[1]])
    }

    fn addressing_offset(&self) -> usize {
        if self.control_bytes {
            ADDRESSING_OFFSET + CONTROL_BYTES.len()
        } else {
            ADDRESSING_OFFSET
        }
    }

    /// Formats the frame as space-separated lowercase hex followed by its length.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::Frame;
    ///
    /// assert_eq!(
    ///     Frame::connect().to_hex_string(),
    ///     "46 49 4e 53 00 00 00 0c 00 00 00 00 00 00 00 00 00 00 00 00 (length: 20)"
    /// );
    /// ```
    pub fn to_hex_string(&self) -> String {
        format_hex_bytes(&self.bytes)
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.bytes
    }
}

/// Encodes [`Command`]s into [`Frame`]s under one [`EncoderConfig`].
///
/// The encoder holds no mutable state; one instance can be shared freely
/// between threads.
///
/// # Example
///
/// ```
/// use fins_frame::{EncoderConfig, FrameEncoder, MemoryRef, NodeAddress};
///
/// let encoder = FrameEncoder::new(
///     EncoderConfig::new()
///         .with_destination(NodeAddress::new(0, 10, 0))
///         .with_source(NodeAddress::new(0, 1, 0)),
/// );
///
/// let frame = encoder.read_memory(MemoryRef::word(0x82, 100), 10)?;
/// assert_eq!(frame.addressing().unwrap().da1, 10);
/// # Ok::<(), fins_frame::FinsError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEncoder {
    config: EncoderConfig,
}

impl FrameEncoder {
    /// Creates an encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes a command.
    ///
    /// The command is checked against the configured validation policy before
    /// anything is written. On error no frame is produced.
    ///
    /// # Errors
    ///
    /// See [`FinsError`](crate::FinsError) for the conditions checked under
    /// [`Validation::Strict`](crate::Validation::Strict).
    pub fn encode(&self, command: &Command) -> Result<Frame> {
        let payload = command.resolve(self.config.addressing, self.config.validation)?;
        Ok(assemble(command.kind(), payload, self.config.control_bytes))
    }

    /// Builds a connect frame.
    pub fn connect(&self) -> Frame {
        assemble(CommandKind::Connect, Payload::Connect, false)
    }

    /// Builds a memory read frame using the configured addressing.
    pub fn read_memory(&self, memory: MemoryRef, length: u16) -> Result<Frame> {
        self.encode(&Command::ReadMemory { memory, length })
    }

    /// Builds a memory write frame using the configured addressing.
    pub fn write_memory(
        &self,
        memory: MemoryRef,
        values: &[u32],
        encoding: ValueEncoding,
    ) -> Result<Frame> {
        self.encode(&Command::WriteMemory {
            memory,
            values: values.to_vec(),
            encoding,
        })
    }

    /// Builds a fully custom frame. The configured addressing is not used.
    pub fn generic(&self, command: GenericCommand) -> Result<Frame> {
        self.encode(&Command::Generic(command))
    }
}

fn frame_size(payload: &Payload<'_>, control_bytes: bool) -> usize {
    let control = if control_bytes { CONTROL_BYTES.len() } else { 0 };
    match payload {
        Payload::Connect => CONNECT_FRAME_SIZE,
        Payload::Read { .. } => MEMORY_FRAME_SIZE + control,
        Payload::Write {
            memory,
            values,
            encoding,
            ..
        } => {
            let width = match encoding {
                ValueEncoding::Bcd if memory.is_bit_access() => 1,
                ValueEncoding::Hex | ValueEncoding::Bcd => 2,
            };
            MEMORY_FRAME_SIZE + control + values.len() * width
        }
    }
}

fn assemble(kind: CommandKind, payload: Payload<'_>, control_bytes: bool) -> Frame {
    // Connect frames have no addressing block to prefix.
    let control_bytes = control_bytes && !matches!(payload, Payload::Connect);
    let mut bytes = Vec::with_capacity(frame_size(&payload, control_bytes));
    bytes.extend_from_slice(&FINS_MAGIC);
    bytes.extend_from_slice(&[0x00; 4]);
    bytes.extend_from_slice(&kind.command_class());
    if control_bytes {
        bytes.extend_from_slice(&CONTROL_BYTES);
    }

    match payload {
        Payload::Connect => bytes.extend_from_slice(&CONNECT_PAYLOAD),
        Payload::Read {
            header,
            memory,
            length,
        } => {
            put_memory_command(&mut bytes, header, Operation::Read, &memory);
            bytes.extend_from_slice(&to_word(u32::from(length)));
        }
        Payload::Write {
            header,
            memory,
            values,
            encoding,
        } => {
            put_memory_command(&mut bytes, header, Operation::Write, &memory);
            bytes.extend_from_slice(&to_word(values.len() as u32));
            match encoding {
                ValueEncoding::Hex => bytes.extend_from_slice(&to_words(values)),
                // Bit-level memory takes one raw byte per value; BCD packing
                // only applies to whole words.
                ValueEncoding::Bcd if memory.is_bit_access() => {
                    bytes.extend(values.iter().map(|&value| value as u8))
                }
                ValueEncoding::Bcd => bytes.extend_from_slice(&to_bcd_words(values)),
            }
        }
    }

    patch_length(&mut bytes);

    let frame = Frame {
        bytes,
        kind,
        control_bytes,
    };
    debug!(kind = %kind, len = frame.len(), "encoded FINS frame");
    trace!(frame = %frame, "frame bytes");
    frame
}

fn put_memory_command(
    bytes: &mut Vec<u8>,
    header: FinsHeader,
    operation: Operation,
    memory: &MemoryRef,
) {
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&operation.command_code());
    bytes.push(memory.area);
    bytes.extend_from_slice(&to_word(memory.address));
    bytes.push(memory.bit);
}

/// Writes `len - 8` into the length field. Must run after the last append.
fn patch_length(bytes: &mut [u8]) {
    let length = (bytes.len() - FRAME_PREFIX_SIZE) as u32;
    bytes[LENGTH_FIELD].copy_from_slice(&length.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::COMMAND_CLASS_GENERIC;
    use crate::config::Validation;
    use crate::error::FinsError;
    use crate::header::NodeAddress;
    use crate::memory::MemoryArea;

    fn hex_frame(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str.replace(' ', "")).unwrap()
    }

    fn permissive() -> FrameEncoder {
        FrameEncoder::new(EncoderConfig::new().with_validation(Validation::Permissive))
    }

    fn with_control_bytes() -> FrameEncoder {
        FrameEncoder::new(EncoderConfig::new().with_control_bytes(true))
    }

    fn assert_well_formed(frame: &Frame) {
        assert_eq!(&frame.as_bytes()[..4], &[0x46, 0x49, 0x4E, 0x53]);
        assert_eq!(frame.length_field() as usize, frame.len() - 8);
    }

    #[test]
    fn test_connect_frame() {
        let frame = Frame::connect();

        assert_eq!(
            frame.as_bytes(),
            hex_frame("46494e53 0000000c 0000000000000000 00000000").as_slice()
        );
        assert_eq!(frame.len(), CONNECT_FRAME_SIZE);
        assert_eq!(frame.kind(), CommandKind::Connect);
        assert!(frame.as_bytes()[8..].iter().all(|&b| b == 0));
        assert_eq!(frame.addressing(), None);
        assert_eq!(frame.command_code(), None);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_read_memory_frame() {
        let frame = Frame::read_memory(MemoryRef::word(0x82, 100), 1).unwrap();
        let bytes = frame.as_bytes();

        // Magic (4) + Length (4) + Class (8) + Addressing (8) + Command (8) = 32 bytes
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x18]);
        assert_eq!(&bytes[8..16], &COMMAND_CLASS_GENERIC);

        // Default addressing
        assert_eq!(&bytes[16..24], &[0x02, 0, 0, 0, 0, 0, 0, 0]);

        // Command code
        assert_eq!(&bytes[24..26], &[0x01, 0x01]);

        // Area, address (100 = 0x0064), bit, length
        assert_eq!(&bytes[26..], &[0x82, 0x00, 0x64, 0x00, 0x00, 0x01]);

        assert_eq!(frame.kind(), CommandKind::ReadMemory);
        assert_eq!(frame.command_code(), Some([0x01, 0x01]));
        assert_eq!(frame.addressing(), Some(FinsHeader::default()));
        assert_well_formed(&frame);
    }

    #[test]
    fn test_read_memory_bit_frame() {
        let area = MemoryArea::CIO.bit_code().unwrap();
        let frame = Frame::read_memory(MemoryRef::bit(area, 0x1234, 5), 1).unwrap();

        assert_eq!(
            &frame.as_bytes()[24..],
            &[0x01, 0x01, 0x30, 0x12, 0x34, 0x05, 0x00, 0x01]
        );
    }

    #[test]
    fn test_write_memory_bcd_frame() {
        let frame =
            Frame::write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Bcd).unwrap();

        assert_eq!(
            frame.as_bytes(),
            hex_frame(
                "46494e53 0000001a 0000000200000000 0200000000000000 \
                 0102 82 0000 00 0001 1234"
            )
            .as_slice()
        );
        assert_eq!(frame.kind(), CommandKind::WriteMemory);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_write_memory_hex_frame() {
        let frame =
            Frame::write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Hex).unwrap();

        assert_eq!(frame.len(), 34);
        assert_eq!(&frame.as_bytes()[24..26], &[0x01, 0x02]);
        assert_eq!(&frame.as_bytes()[30..32], &[0x00, 0x01]);
        assert_eq!(&frame.as_bytes()[32..], &[0x04, 0xD2]);
    }

    #[test]
    fn test_write_memory_multiple_values_keep_order() {
        let frame = Frame::write_memory(
            MemoryRef::word(MemoryArea::DM, 200),
            &[0x1234, 0x5678, 0x9ABC],
            ValueEncoding::default(),
        )
        .unwrap();

        assert_eq!(&frame.as_bytes()[26..29], &[0x82, 0x00, 0xC8]);
        assert_eq!(&frame.as_bytes()[30..32], &[0x00, 0x03]);
        assert_eq!(
            &frame.as_bytes()[32..],
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]
        );
        assert_well_formed(&frame);
    }

    #[test]
    fn test_write_bit_bcd_emits_raw_bytes() {
        let frame = Frame::write_memory(
            MemoryRef::bit(0x30, 10, 3),
            &[1, 0, 12],
            ValueEncoding::Bcd,
        )
        .unwrap();
        let bytes = frame.as_bytes();

        assert_eq!(bytes.len(), MEMORY_FRAME_SIZE + 3);
        assert_eq!(&bytes[26..30], &[0x30, 0x00, 0x0A, 0x03]);
        assert_eq!(&bytes[30..32], &[0x00, 0x03]);
        // 12 stays 0x0C; packed BCD would have produced 0x12
        assert_eq!(&bytes[32..], &[0x01, 0x00, 0x0C]);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_write_bit_hex_still_emits_words() {
        let frame =
            Frame::write_memory(MemoryRef::bit(0x30, 10, 3), &[1], ValueEncoding::Hex).unwrap();
        assert_eq!(&frame.as_bytes()[32..], &[0x00, 0x01]);
    }

    #[test]
    fn test_generic_frame_uses_its_own_addressing() {
        let header = FinsHeader {
            gct: 0x07,
            dna: 0x01,
            da1: 0x0A,
            da2: 0x00,
            sna: 0x02,
            sa1: 0x01,
            sa2: 0x00,
            sid: 0x42,
        };
        let frame = FrameEncoder::new(EncoderConfig::new().with_sid(0x99))
            .generic(GenericCommand::write(
                header,
                MemoryRef::word(0xB1, 5),
                vec![42],
                ValueEncoding::Bcd,
            ))
            .unwrap();

        assert_eq!(frame.kind(), CommandKind::Generic);
        assert_eq!(&frame.as_bytes()[8..16], &COMMAND_CLASS_GENERIC);
        assert_eq!(frame.addressing(), Some(header));
        assert_eq!(
            &frame.as_bytes()[24..],
            &[0x01, 0x02, 0xB1, 0x00, 0x05, 0x00, 0x00, 0x01, 0x00, 0x42]
        );
        assert_well_formed(&frame);
    }

    #[test]
    fn test_generic_read_matches_short_form() {
        let short = Frame::read_memory(MemoryRef::word(0x82, 100), 3).unwrap();
        let generic = Frame::generic(GenericCommand::read(
            FinsHeader::default(),
            MemoryRef::word(0x82, 100),
            3,
        ))
        .unwrap();

        assert_eq!(short.as_bytes(), generic.as_bytes());
        assert_ne!(short.kind(), generic.kind());
    }

    #[test]
    fn test_encoder_addressing_applies_to_short_forms() {
        let encoder = FrameEncoder::new(
            EncoderConfig::new()
                .with_destination(NodeAddress::new(0, 10, 0))
                .with_source(NodeAddress::new(0, 1, 0))
                .with_sid(0x05),
        );
        let frame = encoder.read_memory(MemoryRef::word(0x82, 0), 1).unwrap();
        assert_eq!(
            &frame.as_bytes()[16..24],
            &[0x02, 0x00, 0x0A, 0x00, 0x00, 0x01, 0x00, 0x05]
        );

        // Connect frames carry no addressing at all
        assert_eq!(encoder.connect(), Frame::connect());
    }

    #[test]
    fn test_strict_errors_produce_no_frame() {
        assert!(matches!(
            Frame::read_memory(MemoryRef::word(0x82, 70_000), 1),
            Err(FinsError::InvalidAddress { .. })
        ));
        assert_eq!(
            Frame::write_memory(MemoryRef::word(0x82, 0), &[], ValueEncoding::Hex),
            Err(FinsError::EmptyValueSet)
        );
        assert!(matches!(
            Frame::write_memory(MemoryRef::word(0x82, 0), &[10_000], ValueEncoding::Bcd),
            Err(FinsError::InvalidValueRange { value: 10_000, .. })
        ));
    }

    #[test]
    fn test_permissive_truncates_address() {
        let frame = permissive()
            .read_memory(MemoryRef::word(0x82, 0x1_0064), 1)
            .unwrap();
        assert_eq!(&frame.as_bytes()[27..29], &[0x00, 0x64]);
    }

    #[test]
    fn test_permissive_packs_out_of_range_bcd() {
        let frame = permissive()
            .write_memory(MemoryRef::word(0x82, 0), &[10_000], ValueEncoding::Bcd)
            .unwrap();
        assert_eq!(&frame.as_bytes()[32..], &[0xA0, 0x00]);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_permissive_empty_write() {
        let frame = permissive()
            .write_memory(MemoryRef::word(0x82, 0), &[], ValueEncoding::Hex)
            .unwrap();
        assert_eq!(frame.len(), MEMORY_FRAME_SIZE);
        assert_eq!(&frame.as_bytes()[30..32], &[0x00, 0x00]);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_permissive_bit_level_values_truncate_to_a_byte() {
        let frame = permissive()
            .write_memory(MemoryRef::bit(0x30, 0, 1), &[0x1FF], ValueEncoding::Bcd)
            .unwrap();
        assert_eq!(&frame.as_bytes()[32..], &[0xFF]);
    }

    #[test]
    fn test_permissive_truncates_hex_value() {
        let frame = permissive()
            .write_memory(MemoryRef::word(0x82, 0), &[0x1_2345], ValueEncoding::Hex)
            .unwrap();
        assert_eq!(&frame.as_bytes()[30..], &[0x00, 0x01, 0x23, 0x45]);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_strict_rejects_more_than_65535_values() {
        let values = vec![0u32; 65_536];
        assert!(matches!(
            Frame::write_memory(MemoryRef::word(0x82, 0), &values, ValueEncoding::Hex),
            Err(FinsError::InvalidValueRange { value: 65_536, .. })
        ));
    }

    #[test]
    fn test_permissive_truncates_value_count() {
        let values = vec![7u32; 65_537];
        let frame = permissive()
            .write_memory(MemoryRef::word(0x82, 0), &values, ValueEncoding::Hex)
            .unwrap();

        // The count wraps to 1, every value is still written
        assert_eq!(&frame.as_bytes()[30..32], &[0x00, 0x01]);
        assert_eq!(frame.len(), MEMORY_FRAME_SIZE + 2 * 65_537);
        assert_eq!(&frame.as_bytes()[32..34], &[0x00, 0x07]);
        assert_well_formed(&frame);
    }

    #[test]
    fn test_frame_size_matches_encoded_length() {
        let commands = [
            Command::Connect,
            Command::ReadMemory {
                memory: MemoryRef::word(0x82, 0),
                length: 4,
            },
            Command::WriteMemory {
                memory: MemoryRef::word(0x82, 0),
                values: vec![1, 2, 3, 4],
                encoding: ValueEncoding::Bcd,
            },
            Command::WriteMemory {
                memory: MemoryRef::bit(0x30, 0, 1),
                values: vec![1, 0, 1],
                encoding: ValueEncoding::Bcd,
            },
        ];

        for control_bytes in [false, true] {
            let encoder = FrameEncoder::new(EncoderConfig::new().with_control_bytes(control_bytes));
            for command in &commands {
                let payload = command
                    .resolve(FinsHeader::default(), Validation::Strict)
                    .unwrap();
                let control = control_bytes && command.kind() != CommandKind::Connect;
                let frame = encoder.encode(command).unwrap();
                assert_eq!(frame.len(), frame_size(&payload, control));
            }
        }
    }

    #[test]
    fn test_permissive_with_control_bytes_matches_legacy_frame() {
        let encoder = FrameEncoder::new(
            EncoderConfig::new()
                .with_validation(Validation::Permissive)
                .with_control_bytes(true),
        );
        let frame = encoder
            .write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Bcd)
            .unwrap();

        assert_eq!(
            frame.as_bytes(),
            hex_frame(
                "46494e53 0000001c 0000000200000000 8000 0200000000000000 \
                 0102 82 0000 00 0001 1234"
            )
            .as_slice()
        );
        assert_eq!(frame.len(), 36);
        assert!(frame.has_control_bytes());
        assert_well_formed(&frame);
    }

    #[test]
    fn test_control_bytes_shift_accessors() {
        let header = FinsHeader::new(NodeAddress::new(0, 10, 0), NodeAddress::new(0, 1, 0), 7);
        let encoder = FrameEncoder::new(
            EncoderConfig::new()
                .with_addressing(header)
                .with_control_bytes(true),
        );
        let frame = encoder.read_memory(MemoryRef::word(0x82, 100), 1).unwrap();
        let bytes = frame.as_bytes();

        assert_eq!(bytes.len(), MEMORY_FRAME_SIZE + 2);
        assert_eq!(frame.length_field(), 0x1A);
        assert_eq!(&bytes[16..18], &CONTROL_BYTES);
        assert_eq!(&bytes[18..26], &header.to_bytes());
        assert_eq!(
            &bytes[26..],
            &[0x01, 0x01, 0x82, 0x00, 0x64, 0x00, 0x00, 0x01]
        );
        assert_eq!(frame.addressing(), Some(header));
        assert_eq!(frame.command_code(), Some([0x01, 0x01]));
        assert_well_formed(&frame);
    }

    #[test]
    fn test_control_bytes_with_write_values() {
        let frame = with_control_bytes()
            .write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Hex)
            .unwrap();
        assert_eq!(frame.len(), 36);
        assert_eq!(frame.command_code(), Some([0x01, 0x02]));
        assert_eq!(&frame.as_bytes()[34..], &[0x04, 0xD2]);
    }

    #[test]
    fn test_control_bytes_leave_connect_untouched() {
        let encoder = with_control_bytes();
        assert_eq!(encoder.connect(), Frame::connect());
        let frame = encoder.encode(&Command::Connect).unwrap();
        assert_eq!(frame.len(), CONNECT_FRAME_SIZE);
        assert!(!frame.has_control_bytes());
        assert_eq!(frame.addressing(), None);
    }

    #[test]
    fn test_length_field_for_every_kind() {
        let frames = [
            Frame::connect(),
            Frame::read_memory(MemoryRef::word(0x82, 1), 10).unwrap(),
            Frame::write_memory(MemoryRef::word(0x82, 1), &[1, 2], ValueEncoding::Hex).unwrap(),
            Frame::generic(GenericCommand::read(
                FinsHeader::default(),
                MemoryRef::word(0xB0, 1),
                1,
            ))
            .unwrap(),
        ];
        for frame in &frames {
            assert_well_formed(frame);
        }
    }

    #[test]
    fn test_display_and_hex_string() {
        let frame = Frame::read_memory(MemoryRef::word(0x82, 100), 1).unwrap();
        let text = frame.to_string();

        assert_eq!(text, frame.to_hex_string());
        assert!(text.starts_with("46 49 4e 53 00 00 00 18 00 00 00 02"));
        assert!(text.ends_with("01 01 82 00 64 00 00 01 (length: 32)"));
    }

    #[test]
    fn test_byte_accessors_agree() {
        let frame = Frame::connect();
        let slice: &[u8] = frame.as_ref();
        assert_eq!(slice, frame.as_bytes());
        assert_eq!(frame.to_vec(), frame.as_bytes());
        assert!(!frame.is_empty());
        let bytes: Vec<u8> = frame.clone().into();
        assert_eq!(bytes, frame.into_bytes());
    }

    #[test]
    fn test_frames_built_concurrently_are_identical() {
        let encoder = FrameEncoder::default();
        let expected = encoder
            .write_memory(MemoryRef::word(0x82, 7), &[1, 2, 3], ValueEncoding::Bcd)
            .unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        encoder
                            .write_memory(MemoryRef::word(0x82, 7), &[1, 2, 3], ValueEncoding::Bcd)
                            .unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
