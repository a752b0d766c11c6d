//! A minimal in-memory TIFF writer for building test fixtures.
//!
//! Files are laid out as header, then per image its out-of-line values followed by its IFD, and
//! finally all strip data. Truncating a file therefore only ever cuts into strips.
#![allow(dead_code)]

use rawtiff::ByteOrder;

pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
pub const IMAGE_DESCRIPTION: u16 = 270;
pub const STRIP_OFFSETS: u16 = 273;
pub const ORIENTATION: u16 = 274;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
pub const X_RESOLUTION: u16 = 282;
pub const Y_RESOLUTION: u16 = 283;
pub const PLANAR_CONFIGURATION: u16 = 284;
pub const RESOLUTION_UNIT: u16 = 296;
pub const TILE_WIDTH: u16 = 322;
pub const EXTRA_SAMPLES: u16 = 338;
pub const SAMPLE_FORMAT: u16 = 339;

#[derive(Clone, Debug)]
pub enum Value {
    Short(Vec<u16>),
    Long(Vec<u32>),
    /// Written with a terminating NUL.
    Ascii(String),
    Rational(Vec<(u32, u32)>),
    /// An entry written exactly as given.
    Raw { type_: u16, count: u32, slot: [u8; 4] },
}

#[derive(Clone, Debug, Default)]
pub struct Image {
    fields: Vec<(u16, Value)>,
    strips: Vec<Vec<u8>>,
    byte_counts: Option<Vec<u32>>,
}

impl Image {
    /// An uncompressed image with uniform bits per sample and no strips yet.
    pub fn new(width: u32, height: u32, bits: u16, samples: u16) -> Image {
        let photometric = if samples >= 3 { 2 } else { 1 };
        Image::default()
            .field(IMAGE_WIDTH, Value::Long(vec![width]))
            .field(IMAGE_LENGTH, Value::Long(vec![height]))
            .field(BITS_PER_SAMPLE, Value::Short(vec![bits; samples.into()]))
            .field(SAMPLES_PER_PIXEL, Value::Short(vec![samples]))
            .field(COMPRESSION, Value::Short(vec![1]))
            .field(PHOTOMETRIC_INTERPRETATION, Value::Short(vec![photometric]))
    }

    /// Set a field, replacing an earlier value of the same tag.
    pub fn field(mut self, tag: u16, value: Value) -> Image {
        self.fields.retain(|(t, _)| *t != tag);
        self.fields.push((tag, value));
        self
    }

    pub fn without(mut self, tag: u16) -> Image {
        self.fields.retain(|(t, _)| *t != tag);
        self
    }

    pub fn planar(self) -> Image {
        self.field(PLANAR_CONFIGURATION, Value::Short(vec![2]))
    }

    /// Split `data` into strips of `strip_len` bytes, the last one possibly shorter.
    pub fn strips(mut self, data: &[u8], strip_len: usize) -> Image {
        self.strips = data.chunks(strip_len).map(<[u8]>::to_vec).collect();
        self
    }

    /// Declare byte counts different from the actual strip lengths.
    pub fn byte_counts(mut self, counts: Vec<u32>) -> Image {
        self.byte_counts = Some(counts);
        self
    }

    fn entries(&self, strip_base: u32) -> Vec<(u16, Value)> {
        let mut entries = self.fields.clone();
        let has = |tag| self.fields.iter().any(|(t, _)| *t == tag);

        if !self.strips.is_empty() {
            if !has(STRIP_OFFSETS) {
                let mut offset = strip_base;
                let offsets = self
                    .strips
                    .iter()
                    .map(|s| {
                        let at = offset;
                        offset += s.len() as u32;
                        at
                    })
                    .collect();
                entries.push((STRIP_OFFSETS, Value::Long(offsets)));
            }
            if !has(STRIP_BYTE_COUNTS) {
                let counts = self
                    .byte_counts
                    .clone()
                    .unwrap_or_else(|| self.strips.iter().map(|s| s.len() as u32).collect());
                entries.push((STRIP_BYTE_COUNTS, Value::Long(counts)));
            }
        }

        entries.sort_by_key(|(tag, _)| *tag);
        entries
    }

    fn strip_len(&self) -> u32 {
        self.strips.iter().map(|s| s.len() as u32).sum()
    }
}

/// A written file together with the positions needed to tamper with it.
pub struct Tiff {
    pub data: Vec<u8>,
    pub ifds: Vec<u32>,
    order: ByteOrder,
    last_next: usize,
}

impl Tiff {
    /// Make the last IFD link to `offset` instead of ending the chain.
    pub fn link_last_to(&mut self, offset: u32) {
        let bytes = u32_bytes(self.order, offset);
        self.data[self.last_next..self.last_next + 4].copy_from_slice(&bytes);
    }

    /// Drop the last `n` bytes of the file.
    pub fn truncate_by(&mut self, n: usize) {
        let len = self.data.len() - n;
        self.data.truncate(len);
    }

    pub fn cursor(&self) -> std::io::Cursor<Vec<u8>> {
        std::io::Cursor::new(self.data.clone())
    }
}

fn u16_bytes(order: ByteOrder, v: u16) -> [u8; 2] {
    match order {
        ByteOrder::BigEndian => v.to_be_bytes(),
        _ => v.to_le_bytes(),
    }
}

fn u32_bytes(order: ByteOrder, v: u32) -> [u8; 4] {
    match order {
        ByteOrder::BigEndian => v.to_be_bytes(),
        _ => v.to_le_bytes(),
    }
}

/// The type, count and payload of a value. `None` for raw entries.
fn payload(order: ByteOrder, value: &Value) -> Option<(u16, u32, Vec<u8>)> {
    Some(match value {
        Value::Short(v) => (
            3,
            v.len() as u32,
            v.iter().flat_map(|&x| u16_bytes(order, x)).collect(),
        ),
        Value::Long(v) => (
            4,
            v.len() as u32,
            v.iter().flat_map(|&x| u32_bytes(order, x)).collect(),
        ),
        Value::Ascii(s) => {
            let mut bytes = s.as_bytes().to_vec();
            bytes.push(0);
            (2, bytes.len() as u32, bytes)
        }
        Value::Rational(v) => (
            5,
            v.len() as u32,
            v.iter()
                .flat_map(|&(n, d)| {
                    let mut pair = u32_bytes(order, n).to_vec();
                    pair.extend_from_slice(&u32_bytes(order, d));
                    pair
                })
                .collect(),
        ),
        Value::Raw { .. } => return None,
    })
}

fn is_inline(type_: u16, payload: &[u8]) -> bool {
    type_ != 5 && payload.len() <= 4
}

/// Bytes of out-of-line values, each padded to a word boundary, plus the IFD itself.
fn directory_len(order: ByteOrder, entries: &[(u16, Value)]) -> u32 {
    let blobs: usize = entries
        .iter()
        .filter_map(|(_, v)| payload(order, v))
        .filter(|(t, _, p)| !is_inline(*t, p))
        .map(|(_, _, p)| p.len() + p.len() % 2)
        .sum();
    (blobs + 2 + 12 * entries.len() + 4) as u32
}

/// Write `images` as a TIFF file in the given byte order.
pub fn build(order: ByteOrder, images: &[Image]) -> Tiff {
    // First pass: where does the strip data start.
    let metadata_len: u32 = 8 + images
        .iter()
        .map(|image| directory_len(order, &image.entries(0)))
        .sum::<u32>();

    let mut strip_base = metadata_len;
    let mut bases = Vec::new();
    for image in images {
        bases.push(strip_base);
        strip_base += image.strip_len();
    }

    let mut data = match order {
        ByteOrder::BigEndian => b"MM".to_vec(),
        _ => b"II".to_vec(),
    };
    data.extend_from_slice(&u16_bytes(order, 42));
    let mut pending_next = data.len();
    data.extend_from_slice(&[0; 4]);

    let mut ifds = Vec::new();
    for (image, &base) in images.iter().zip(&bases) {
        let entries = image.entries(base);

        let mut encoded = Vec::new();
        for (tag, value) in &entries {
            let (type_, count, slot) = match payload(order, value) {
                None => match value {
                    Value::Raw { type_, count, slot } => (*type_, *count, *slot),
                    _ => unreachable!(),
                },
                Some((type_, count, bytes)) if is_inline(type_, &bytes) => {
                    let mut slot = [0u8; 4];
                    slot[..bytes.len()].copy_from_slice(&bytes);
                    (type_, count, slot)
                }
                Some((type_, count, bytes)) => {
                    let at = data.len() as u32;
                    data.extend_from_slice(&bytes);
                    if bytes.len() % 2 == 1 {
                        data.push(0);
                    }
                    (type_, count, u32_bytes(order, at))
                }
            };
            encoded.push((*tag, type_, count, slot));
        }

        let ifd = data.len() as u32;
        data[pending_next..pending_next + 4].copy_from_slice(&u32_bytes(order, ifd));
        ifds.push(ifd);

        data.extend_from_slice(&u16_bytes(order, encoded.len() as u16));
        for (tag, type_, count, slot) in encoded {
            data.extend_from_slice(&u16_bytes(order, tag));
            data.extend_from_slice(&u16_bytes(order, type_));
            data.extend_from_slice(&u32_bytes(order, count));
            data.extend_from_slice(&slot);
        }
        pending_next = data.len();
        data.extend_from_slice(&[0; 4]);
    }

    assert_eq!(data.len() as u32, metadata_len);
    for image in images {
        for strip in &image.strips {
            data.extend_from_slice(strip);
        }
    }

    Tiff {
        data,
        ifds,
        order,
        last_next: pending_next,
    }
}

/// Encode sample values at the given width in the given byte order.
pub fn encode(order: ByteOrder, bits: u16, values: &[u64]) -> Vec<u8> {
    let mut out = Vec::new();
    for &v in values {
        let bytes = match bits {
            8 => vec![v as u8],
            16 => u16_bytes(order, v as u16).to_vec(),
            32 => u32_bytes(order, v as u32).to_vec(),
            64 => match order {
                ByteOrder::BigEndian => v.to_be_bytes().to_vec(),
                _ => v.to_le_bytes().to_vec(),
            },
            _ => panic!("unsupported width {bits}"),
        };
        out.extend_from_slice(&bytes);
    }
    out
}

/// Interleave planes pixel by pixel.
pub fn interleave(planes: &[Vec<u64>]) -> Vec<u64> {
    let pixels = planes[0].len();
    (0..pixels)
        .flat_map(|i| planes.iter().map(move |p| p[i]))
        .collect()
}

/// Distinct values that use every byte of a `bits` wide sample.
pub fn pattern(plane: u64, pixels: usize, bits: u16) -> Vec<u64> {
    let mask = if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    (0..pixels as u64)
        .map(|i| (0x0102_0304_0506_0708u64.wrapping_mul(i + 1) ^ (plane << 4) ^ i) & mask)
        .collect()
}
