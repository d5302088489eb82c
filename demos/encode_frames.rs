//! Example: Building FINS frames
//!
//! Run with: cargo run --example encode_frames
//!
//! This example demonstrates:
//! - The connect handshake frame
//! - Word reads and writes with default addressing
//! - BCD and bit-level writes
//! - Custom addressing and permissive validation
//! - The ICF/RSV control bytes expected by older FINS stacks

use fins_frame::{
    EncoderConfig, FinsHeader, Frame, FrameEncoder, GenericCommand, MemoryArea, MemoryRef,
    NodeAddress, Validation, ValueEncoding,
};

fn main() -> fins_frame::Result<()> {
    // =========================================================================
    // Handshake
    // =========================================================================

    println!("=== Connect ===\n");
    println!("{}", Frame::connect());

    // =========================================================================
    // Default addressing
    // =========================================================================

    println!("\n=== Read / Write ===\n");

    let read = Frame::read_memory(MemoryRef::word(MemoryArea::DM, 100), 10)?;
    println!("read DM100 x10:   {}", read);

    let write = Frame::write_memory(
        MemoryRef::word(MemoryArea::DM, 200),
        &[0x1234, 0x5678],
        ValueEncoding::Hex,
    )?;
    println!("write DM200 hex:  {}", write);

    let bcd = Frame::write_memory(
        MemoryRef::word(MemoryArea::DM, 0),
        &[1234],
        ValueEncoding::Bcd,
    )?;
    println!("write DM0 bcd:    {}", bcd);

    let bit = Frame::write_memory(
        MemoryRef::bit(MemoryArea::CIO.bit_code()?, 0, 5),
        &[1],
        ValueEncoding::Bcd,
    )?;
    println!("write CIO0.05:    {}", bit);

    // =========================================================================
    // Custom addressing
    // =========================================================================

    println!("\n=== Custom addressing ===\n");

    let encoder = FrameEncoder::new(
        EncoderConfig::new()
            .with_destination(NodeAddress::new(0, 10, 0))
            .with_source(NodeAddress::new(0, 1, 0))
            .with_sid(0x01),
    );
    let hr = encoder.read_memory(MemoryRef::word(MemoryArea::HR, 0), 4)?;
    println!("{}", hr);

    let header = FinsHeader::new(NodeAddress::new(1, 20, 0), NodeAddress::new(2, 30, 0), 0x7F);
    let generic = Frame::generic(GenericCommand::write(
        header,
        MemoryRef::word(MemoryArea::WR, 3),
        vec![9999],
        ValueEncoding::Bcd,
    ))?;
    println!("{}", generic);

    // =========================================================================
    // Strict vs permissive
    // =========================================================================

    println!("\n=== Validation ===\n");

    let strict = Frame::write_memory(
        MemoryRef::word(MemoryArea::DM, 0),
        &[12_345],
        ValueEncoding::Bcd,
    );
    match strict {
        Ok(frame) => println!("strict:     {}", frame),
        Err(e) => println!("strict:     {}", e),
    }

    let permissive =
        FrameEncoder::new(EncoderConfig::new().with_validation(Validation::Permissive));
    let frame = permissive.write_memory(
        MemoryRef::word(MemoryArea::DM, 0),
        &[12_345],
        ValueEncoding::Bcd,
    )?;
    println!("permissive: {}", frame);

    // =========================================================================
    // Control bytes
    // =========================================================================

    println!("\n=== Control bytes ===\n");

    let legacy = FrameEncoder::new(
        EncoderConfig::new()
            .with_validation(Validation::Permissive)
            .with_control_bytes(true),
    );
    let frame = legacy.write_memory(
        MemoryRef::word(MemoryArea::DM, 0),
        &[1234],
        ValueEncoding::Bcd,
    )?;
    println!("legacy:     {}", frame);

    Ok(())
}
