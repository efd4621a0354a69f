//! A library for reading Zelda 64 instrument banks ("audiobanks").
//!
//! Ocarina of Time and Majora's Mask store instruments, drums, and sound effects
//! in instrument banks referenced by an entry in the audiobank table.
//! Struct documentation contains the corresponding type from the decompilation projects
//! where appropriate.
//!
//! # Getting Started
//! A bank is decoded from its table entry and the bank bytes.
//! The table entry may be the full 0x10 bytes or the truncated 0x08 bytes
//! used by custom music files.
//!
//! ```rust no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table_entry = std::fs::read("bank.meta")?;
//! let bank_data = std::fs::read("bank.zbank")?;
//!
//! let bank = z64bank::bank::Bank::from_bytes(&table_entry, &bank_data)?;
//! println!("{bank:#?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! Each structure in the bank is a Rust type with a [binrw] derive or a hand written [BinRead] impl.
//! All values are big endian.
//! Pointers are absolute offsets into the bank data where 0 indicates no value.
//! Every non null pointer is followed eagerly, so a [TunedSample](tuned_sample::TunedSample)
//! always owns its own copy of the [Sample](sample::Sample) even if other
//! tuned samples point to the same offset.
//! Bank structures only ever point "down" to envelopes, samples, loops, and books,
//! so following pointers always terminates.
//!
//! Decoding is read only and does not validate anything beyond what is needed to find the data.
//! Encoding banks is not supported.
use std::{
    any::type_name,
    io::{Cursor, Read, Seek, SeekFrom},
};

use binrw::{BinRead, BinResult, Endian};
use log::trace;

use crate::error::DecodeError;

pub mod bank;
pub mod codec;
pub mod drum;
pub mod envelope;
pub mod error;
pub mod instrument;
pub mod metadata;
pub mod sample;
pub mod tuned_sample;
pub mod vadpcm;

/// The size in bytes of a pointer field regardless of whether it is null.
pub const POINTER_SIZE: u64 = 4;

/// A structure that can be decoded from any offset in a bank.
pub trait Record: for<'a> BinRead<Args<'a> = ()> {
    /// The size in bytes of the fixed fields.
    /// Variable length records only count their header.
    const SIZE: u64;

    /// The alignment of the end of the structure when placed in a bank.
    /// This only matters for placement and has no effect on decoding.
    const ALIGNMENT: u64 = 1;

    /// The total size with padding for [ALIGNMENT](Record::ALIGNMENT).
    fn byte_size() -> u64 {
        round_up(Self::SIZE, Self::ALIGNMENT)
    }
}

/// Decode a single `T` starting at `offset` in `bytes`.
///
/// Pointers in `T` are resolved as offsets into the same `bytes`.
pub fn read_record<T: Record>(bytes: &[u8], offset: u64) -> Result<T, DecodeError> {
    check_range(bytes.len() as u64, offset, T::SIZE, short_type_name::<T>())?;

    let mut reader = Cursor::new(bytes);
    reader.set_position(offset);
    T::read_options(&mut reader, Endian::Big, ()).map_err(DecodeError::from_binrw)
}

/// Round `x` up to the next multiple of `n`.
pub const fn round_up(x: u64, n: u64) -> u64 {
    if n <= 1 {
        x
    } else {
        x.div_ceil(n) * n
    }
}

fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

pub(crate) fn check_range(
    len: u64,
    offset: u64,
    width: u64,
    type_name: &'static str,
) -> Result<(), DecodeError> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(()),
        _ => Err(DecodeError::OutOfBounds {
            offset,
            width,
            len,
            type_name,
        }),
    }
}

/// Fail with [DecodeError::OutOfBounds] if `width` bytes at `offset` go past the end of `reader`.
pub(crate) fn check_bounds<R: Seek>(
    reader: &mut R,
    offset: u64,
    width: u64,
    type_name: &'static str,
) -> BinResult<()> {
    let len = stream_len(reader)?;
    check_range(len, offset, width, type_name).map_err(|e| custom_error(offset, e))
}

pub(crate) fn stream_len<R: Seek>(reader: &mut R) -> BinResult<u64> {
    let saved_pos = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(saved_pos))?;
    Ok(len)
}

/// Wrap `err` so it survives the trip through binrw intact.
pub(crate) fn custom_error(pos: u64, err: DecodeError) -> binrw::Error {
    binrw::Error::Custom {
        pos,
        err: Box::new(err),
    }
}

fn parse_opt_ptr32<T, R>(reader: &mut R, endian: Endian, _args: ()) -> BinResult<Option<T>>
where
    T: Record,
    R: Read + Seek,
{
    // Offset 0 is the only null value.
    let offset = u32::read_options(reader, endian, ())?;
    if offset > 0 {
        let value = parse_ptr(offset as u64, reader, endian)?;
        Ok(Some(value))
    } else {
        Ok(None)
    }
}

fn parse_ptr<T, R>(offset: u64, reader: &mut R, endian: Endian) -> BinResult<T>
where
    T: Record,
    R: Read + Seek,
{
    // Read a value pointed to by an absolute offset.
    let saved_pos = reader.stream_position()?;

    check_bounds(reader, offset, T::SIZE, short_type_name::<T>())?;

    reader.seek(SeekFrom::Start(offset))?;
    trace!("{}: {:?}", type_name::<T>(), offset);
    let value = T::read_options(reader, endian, ())?;
    reader.seek(SeekFrom::Start(saved_pos))?;

    Ok(value)
}
