//! Byte order detection and swapping

/// Byte order of a TIFF file or of the running host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Not detected yet, or neither of the canonical layouts.
    #[default]
    Unknown,
    /// big endian byte order
    BigEndian,
    /// little endian byte order
    LittleEndian,
}

impl ByteOrder {
    /// Detect the byte order of the running host by looking at the in-memory layout of a known
    /// integer.
    pub fn host() -> Self {
        match 1u32.to_ne_bytes() {
            [0, 0, 0, 1] => ByteOrder::BigEndian,
            [1, 0, 0, 0] => ByteOrder::LittleEndian,
            _ => ByteOrder::Unknown,
        }
    }

    /// Parse the two byte order marker at the start of a TIFF file.
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            b"II" => Some(ByteOrder::LittleEndian),
            b"MM" => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Given a buffer of `width`-byte elements stored in this byte order, convert them to the
    /// `to` byte order in-place.
    ///
    /// If the length of the buffer is not divisible by the element width, the trailing bytes are
    /// left untouched.
    pub fn convert(self, width: EndianBytes, buffer: &mut [u8], to: ByteOrder) {
        if self == to {
            return;
        }

        match width {
            EndianBytes::One => {
                // No change needed
            }
            EndianBytes::Two => {
                for chunk in buffer.chunks_exact_mut(2) {
                    let value = swap16(u16::from_ne_bytes([chunk[0], chunk[1]]));
                    chunk.copy_from_slice(&value.to_ne_bytes());
                }
            }
            EndianBytes::Four => {
                for chunk in buffer.chunks_exact_mut(4) {
                    let mut n = [0u8; 4];
                    n.copy_from_slice(chunk);
                    chunk.copy_from_slice(&swap32(u32::from_ne_bytes(n)).to_ne_bytes());
                }
            }
            EndianBytes::Eight => {
                for chunk in buffer.chunks_exact_mut(8) {
                    let mut n = [0u8; 8];
                    n.copy_from_slice(chunk);
                    chunk.copy_from_slice(&swap64(u64::from_ne_bytes(n)).to_ne_bytes());
                }
            }
        }
    }
}

/// The size of individual byte-order corrected elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndianBytes {
    One,
    Two,
    Four,
    Eight,
}

impl EndianBytes {
    /// The element width for a sample of `bits` bits, if it is a whole power-of-two byte count.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(EndianBytes::One),
            16 => Some(EndianBytes::Two),
            32 => Some(EndianBytes::Four),
            64 => Some(EndianBytes::Eight),
            _ => None,
        }
    }

    /// Width of one element in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            EndianBytes::One => 1,
            EndianBytes::Two => 2,
            EndianBytes::Four => 4,
            EndianBytes::Eight => 8,
        }
    }
}

/// Reverse the bytes of a 16-bit value.
#[inline]
pub fn swap16(n: u16) -> u16 {
    (n >> 8) | (n << 8)
}

/// Reverse the bytes of a 32-bit value.
#[inline]
pub fn swap32(n: u32) -> u32 {
    ((n & 0x0000_00FF) << 24)
        | ((n & 0x0000_FF00) << 8)
        | ((n & 0x00FF_0000) >> 8)
        | ((n & 0xFF00_0000) >> 24)
}

/// Reverse the bytes of a 64-bit value.
#[inline]
pub fn swap64(n: u64) -> u64 {
    ((n & 0x0000_0000_0000_00FF) << 56)
        | ((n & 0x0000_0000_0000_FF00) << 40)
        | ((n & 0x0000_0000_00FF_0000) << 24)
        | ((n & 0x0000_0000_FF00_0000) << 8)
        | ((n & 0x0000_00FF_0000_0000) >> 8)
        | ((n & 0x0000_FF00_0000_0000) >> 24)
        | ((n & 0x00FF_0000_0000_0000) >> 40)
        | ((n & 0xFF00_0000_0000_0000) >> 56)
}
