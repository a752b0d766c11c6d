//! Function for reading TIFF tags

use std::io::{Read, Seek};

use super::stream::{EndianReader, SmartReader};
use super::Limits;
use crate::tags::{Tag, Type};
use crate::TiffResult;

/// One decoded entry of an Image File Directory.
///
/// An entry consists of four fields:
///
/// Tag   2 bytes
/// Type  2 bytes
/// Count 4 bytes
/// Value 4 bytes either a pointer the value itself
///
/// The values are widened to `u32`. Rationals keep their numerators in `values` and their
/// denominators in `denominators`. An entry whose values could not be fetched has an empty
/// value list and is treated as absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub tag: Tag,
    pub type_: Type,
    pub count: u32,
    pub values: Vec<u32>,
    pub denominators: Vec<u32>,
}

impl Entry {
    /// The primary scalar value.
    pub fn value(&self) -> Option<u32> {
        self.values.first().copied()
    }

    /// The primary rational value as numerator and denominator.
    pub fn rational(&self) -> Option<(u32, u32)> {
        Some((self.value()?, self.denominators.first().copied()?))
    }

    pub fn is_absent(&self) -> bool {
        self.values.is_empty()
    }
}

/// Why the values of an entry were dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dropped {
    OutOfBounds { offset: u32, bytes: u64 },
    TooLarge { bytes: u64 },
}

/// Width of the elements of a type with a known layout, and how many fit the 4-byte slot.
fn layout(type_: Type) -> Option<(u64, u32)> {
    match type_ {
        Type::BYTE | Type::ASCII => Some((1, 4)),
        Type::SHORT => Some((2, 2)),
        Type::LONG => Some((4, 1)),
        // Never inline.
        Type::RATIONAL => Some((8, 0)),
        _ => None,
    }
}

/// Reads one IFD entry at the current position.
///
/// On return the stream is positioned exactly 12 bytes past where the entry started, no matter
/// how many offset indirections were followed.
pub(crate) fn read_entry<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    limits: &Limits,
) -> TiffResult<Entry> {
    let tag = Tag::from_u16_exhaustive(reader.read_u16()?);
    let type_ = Type::from_u16_exhaustive(reader.read_u16()?);
    let count = reader.read_u32()?;
    let mut slot = [0u8; 4];
    reader.read_exact(&mut slot)?;
    let end = reader.position()?;

    let mut entry = Entry {
        tag,
        type_,
        count,
        values: Vec::new(),
        denominators: Vec::new(),
    };

    let Some((width, inline)) = layout(type_) else {
        // No layout known, take the slot as a single raw value.
        entry.values.push(reader.fix_u32(u32::from_ne_bytes(slot)));
        return Ok(entry);
    };

    if count <= inline {
        entry.values = decode_values(reader, type_, &slot, count);
        return Ok(entry);
    }

    let offset = reader.fix_u32(u32::from_ne_bytes(slot));
    match read_indirect(reader, limits, type_, width, offset, count)? {
        Ok((values, denominators)) => {
            entry.values = values;
            entry.denominators = denominators;
        }
        Err(Dropped::OutOfBounds { offset, bytes }) => {
            tracing::debug!("Dropping {tag:?}: {bytes} bytes at offset {offset} exceed the file");
        }
        Err(Dropped::TooLarge { bytes }) => {
            tracing::debug!("Dropping {tag:?}: {bytes} bytes exceed the IFD value limit");
        }
    }

    reader.goto_offset(end)?;
    Ok(entry)
}

/// Fetch `count` values from `offset`, or the reason they are not available.
fn read_indirect<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    limits: &Limits,
    type_: Type,
    width: u64,
    offset: u32,
    count: u32,
) -> TiffResult<Result<(Vec<u32>, Vec<u32>), Dropped>> {
    let bytes = u64::from(count) * width;

    if u64::from(offset) + bytes > reader.len() {
        return Ok(Err(Dropped::OutOfBounds { offset, bytes }));
    }

    let len = match usize::try_from(bytes) {
        Ok(len) if len <= limits.ifd_value_size => len,
        _ => return Ok(Err(Dropped::TooLarge { bytes })),
    };

    reader.goto_offset(offset.into())?;
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;

    if type_ == Type::RATIONAL {
        let pairs = decode_values(reader, Type::LONG, &data, count.saturating_mul(2));
        let (numerators, denominators) = pairs.chunks_exact(2).map(|p| (p[0], p[1])).unzip();
        return Ok(Ok((numerators, denominators)));
    }

    Ok(Ok((decode_values(reader, type_, &data, count), Vec::new())))
}

/// Decode the first `count` elements of `type_` from raw file-ordered bytes.
fn decode_values<R: Read>(
    reader: &SmartReader<R>,
    type_: Type,
    data: &[u8],
    count: u32,
) -> Vec<u32> {
    let count = count as usize;
    match type_ {
        Type::SHORT => data
            .chunks_exact(2)
            .take(count)
            .map(|c| u32::from(reader.fix_u16(u16::from_ne_bytes([c[0], c[1]]))))
            .collect(),
        Type::LONG => data
            .chunks_exact(4)
            .take(count)
            .map(|c| reader.fix_u32(u32::from_ne_bytes([c[0], c[1], c[2], c[3]])))
            .collect(),
        _ => data.iter().take(count).map(|&b| u32::from(b)).collect(),
    }
}
