//! # FINS Frame Encoder
//!
//! Builds command frames for the Omron FINS/TCP protocol (Factory Interface
//! Network Service), used to read and write memory on programmable controllers.
//!
//! This is an **encoder-only** library: no sockets, no response parsing, no
//! retries. Each call turns one logical command into one byte sequence that a
//! transport of your choice can send as-is.
//!
//! ## Features
//!
//! - **Deterministic** — the same command always yields the same bytes
//! - **Type-safe** — commands are a tagged enum, each kind carrying only its fields
//! - **No panics** — all errors returned as `Result<T, FinsError>`
//! - **Two value encodings** — raw 16-bit words or packed BCD words
//! - **Strict or permissive** — reject out-of-range inputs, or truncate them
//!   exactly as the wire format would
//!
//! ## Quick Start
//!
//! ```
//! use fins_frame::{Frame, MemoryArea, MemoryRef, ValueEncoding};
//!
//! fn main() -> fins_frame::Result<()> {
//!     // Session handshake
//!     let connect = Frame::connect();
//!     assert_eq!(connect.len(), 20);
//!
//!     // Read 1 word from D100
//!     let read = Frame::read_memory(MemoryRef::word(MemoryArea::DM, 100), 1)?;
//!     assert_eq!(read.command_code(), Some([0x01, 0x01]));
//!
//!     // Write 1234 to D0 as a BCD word
//!     let write = Frame::write_memory(MemoryRef::word(0x82, 0), &[1234], ValueEncoding::Bcd)?;
//!     assert_eq!(&write.as_bytes()[32..], &[0x12, 0x34]);
//!
//!     println!("{}", write);
//!     Ok(())
//! }
//! ```
//!
//! ## Frame Layout
//!
//! | Offset | Bytes | Meaning |
//! |--------|-------|---------|
//! | 0-3 | 4 | `"FINS"` |
//! | 4-7 | 4 | big-endian length of everything after offset 8 |
//! | 8-15 | 8 | command-class marker (all zero for connect) |
//! | 16-23 | 8 | addressing: GCT DNA DA1 DA2 SNA SA1 SA2 SID |
//! | 24-25 | 2 | command code: `01 01` read, `01 02` write |
//! | 26 | 1 | memory area designator |
//! | 27-28 | 2 | register address |
//! | 29 | 1 | bit offset (0 = whole word) |
//! | 30-31 | 2 | read length, or number of written values |
//! | 32.. | n | written values (hex words, BCD words, or one byte each for bit writes) |
//!
//! A connect frame stops after the marker with 4 zero bytes. With control
//! bytes enabled, `80 00` sits at offsets 16-17 and every later field moves
//! two bytes to the right.
//!
//! ## Custom Addressing
//!
//! ```
//! use fins_frame::{EncoderConfig, FrameEncoder, MemoryRef, NodeAddress};
//!
//! let encoder = FrameEncoder::new(
//!     EncoderConfig::new()
//!         .with_destination(NodeAddress::new(0, 10, 0))
//!         .with_source(NodeAddress::new(0, 1, 0))
//!         .with_sid(0x01),
//! );
//!
//! let frame = encoder.read_memory(MemoryRef::word(0x82, 100), 10)?;
//! # Ok::<(), fins_frame::FinsError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use fins_frame::{Frame, FinsError, MemoryRef, ValueEncoding};
//!
//! match Frame::write_memory(MemoryRef::word(0x82, 0), &[12_345], ValueEncoding::Bcd) {
//!     Ok(frame) => println!("{}", frame),
//!     Err(FinsError::InvalidValueRange { value, reason }) => {
//!         println!("cannot encode {}: {}", value, reason);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! With [`Validation::Permissive`] the same call succeeds and packs the value
//! with plain arithmetic instead. Older FINS stacks also write the ICF/RSV
//! control bytes `80 00` before the addressing fields; enable them with
//! [`EncoderConfig::with_control_bytes`] to reproduce those frames byte for
//! byte.
//!
//! ## Logging
//!
//! Encoding events are emitted through [`tracing`](https://docs.rs/tracing):
//! `debug` per frame, `trace` with the hex dump, `warn` whenever permissive
//! validation truncates an input. Install any subscriber to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod command;
mod config;
mod error;
mod frame;
mod header;
mod memory;
pub mod utils;

// Public re-exports
pub use command::{
    Command, CommandKind, GenericCommand, MemoryRef, Operation, ValueEncoding,
    COMMAND_CLASS_CONNECT, COMMAND_CLASS_GENERIC, MAX_BIT_OFFSET,
};
pub use config::{EncoderConfig, Validation};
pub use error::{FinsError, Result};
pub use frame::{
    Frame, FrameEncoder, CONNECT_FRAME_SIZE, CONNECT_PAYLOAD, FINS_MAGIC, FRAME_PREFIX_SIZE,
    LENGTH_FIELD, MEMORY_FRAME_SIZE,
};
pub use header::{
    FinsHeader, NodeAddress, CONTROL_BYTES, DEFAULT_DA1, DEFAULT_DA2, DEFAULT_DNA, DEFAULT_GCT,
    DEFAULT_SA1, DEFAULT_SA2, DEFAULT_SID, DEFAULT_SNA, FINS_HEADER_SIZE, ICF_COMMAND, RSV,
};
pub use memory::MemoryArea;
