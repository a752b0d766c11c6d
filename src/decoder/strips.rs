//! Reconstruction of one sample plane from strip-organized pixel data

use std::io::{Read, Seek};
use std::ops::Range;

use super::image::Frame;
use super::stream::{EndianReader, SmartReader};
use super::Limits;
use crate::byte_order::EndianBytes;
use crate::tags::{
    CompressionMethod, Orientation, PhotometricInterpretation, PlanarConfiguration, SampleFormat,
};
use crate::{TiffError, TiffResult};

/// The raw value of one sample, stored at the width the image declares.
///
/// The decoder does not interpret sign or floating point, see [`SampleValue::to_f64`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl SampleValue {
    /// The raw bits, zero-extended.
    pub fn as_u64(self) -> u64 {
        match self {
            SampleValue::U8(v) => v.into(),
            SampleValue::U16(v) => v.into(),
            SampleValue::U32(v) => v.into(),
            SampleValue::U64(v) => v,
        }
    }

    /// Reinterpret the raw bits according to the sample format of the image.
    ///
    /// Returns `None` for formats or widths without a numeric meaning, such as 8-bit floats or
    /// `Void` samples.
    pub fn to_f64(self, format: SampleFormat) -> Option<f64> {
        match (format, self) {
            (SampleFormat::Uint, v) => Some(v.as_u64() as f64),
            (SampleFormat::Int, SampleValue::U8(v)) => Some((v as i8).into()),
            (SampleFormat::Int, SampleValue::U16(v)) => Some((v as i16).into()),
            (SampleFormat::Int, SampleValue::U32(v)) => Some((v as i32).into()),
            (SampleFormat::Int, SampleValue::U64(v)) => Some(v as i64 as f64),
            (SampleFormat::IEEEFP, SampleValue::U16(v)) => Some(half::f16::from_bits(v).to_f64()),
            (SampleFormat::IEEEFP, SampleValue::U32(v)) => Some(f32::from_bits(v).into()),
            (SampleFormat::IEEEFP, SampleValue::U64(v)) => Some(f64::from_bits(v)),
            _ => None,
        }
    }
}

/// The samples of one plane of a frame, in row-major order.
///
/// Strips that could not be read completely leave zeros in their place and are listed in
/// `lost_strips`. Bytes of the plane the strip table does not reach at all are zero as well and
/// counted in `missing_bytes`. The values are returned regardless so the caller may decide
/// whether partial data is acceptable.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleData {
    pub values: Vec<SampleValue>,
    pub lost_strips: Vec<usize>,
    pub missing_bytes: u64,
}

impl SampleData {
    pub fn is_complete(&self) -> bool {
        self.lost_strips.is_empty() && self.missing_bytes == 0
    }

    /// `Err(StripDataLost)` if any strip was short or the strips do not cover the plane.
    pub fn status(&self) -> TiffResult<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(TiffError::StripDataLost)
        }
    }
}

/// The raw bytes of one plane in file byte order, and what could not be filled.
struct Plane {
    buffer: Vec<u8>,
    lost_strips: Vec<usize>,
    missing_bytes: u64,
}

/// One contiguous read from a strip into the output buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripRead {
    pub strip: usize,
    /// Absolute position in the file.
    pub file_offset: u64,
    /// Position in the output buffer.
    pub output_offset: u64,
    pub len: u64,
}

/// Intersection of two half-open byte ranges, if it is not empty.
pub fn overlap(a: &Range<u64>, b: &Range<u64>) -> Option<Range<u64>> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (start < end).then_some(start..end)
}

/// Plan the reads that fill `window` of the logical byte space formed by concatenating all
/// strips in order.
pub fn plan_strip_reads(
    window: Range<u64>,
    strip_offsets: &[u32],
    strip_byte_counts: &[u32],
) -> Vec<StripRead> {
    let mut reads = Vec::new();
    let mut cursor = 0u64;

    for (strip, (&offset, &byte_count)) in strip_offsets.iter().zip(strip_byte_counts).enumerate() {
        if cursor >= window.end {
            break;
        }

        let span = cursor..cursor + u64::from(byte_count);
        if let Some(hit) = overlap(&window, &span) {
            reads.push(StripRead {
                strip,
                file_offset: u64::from(offset) + (hit.start - span.start),
                output_offset: hit.start - window.start,
                len: hit.end - hit.start,
            });
        }

        cursor = span.end;
    }

    reads
}

/// Extract sample `sample` of every pixel in `frame`.
///
/// The stream position is restored before returning.
pub(crate) fn extract<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    frame: &Frame,
    sample: u16,
    limits: &Limits,
) -> TiffResult<SampleData> {
    let width = check_frame(frame, sample)?;
    let plane_bytes = frame.plane_bytes().ok_or(TiffError::InvalidImageSize)?;
    let plane_len = usize::try_from(plane_bytes).map_err(|_| TiffError::InvalidImageSize)?;
    if plane_len > limits.decoding_buffer_size {
        return Err(TiffError::LimitsExceeded);
    }

    let position = reader.position()?;
    let extracted = if frame.samples_per_pixel == 1
        || frame.planar_configuration == PlanarConfiguration::Planar
    {
        read_planar(reader, frame, sample, plane_len)
    } else {
        read_chunky(reader, frame, sample, width, plane_len)
    };
    reader.goto_offset(position)?;
    let Plane {
        mut buffer,
        lost_strips,
        missing_bytes,
    } = extracted?;

    if !lost_strips.is_empty() {
        tracing::warn!("Strips {lost_strips:?} ended early, returning partial data");
    }
    if missing_bytes > 0 {
        tracing::warn!("Strips cover the plane only partially, {missing_bytes} bytes are missing");
    }

    reader
        .byte_order()
        .convert(width, &mut buffer, reader.host_byte_order());

    Ok(SampleData {
        values: materialize(&buffer, width),
        lost_strips,
        missing_bytes,
    })
}

/// Check everything the extraction depends on, in order, and return the element width.
fn check_frame(frame: &Frame, sample: u16) -> TiffResult<EndianBytes> {
    if frame.compression != CompressionMethod::None {
        return Err(TiffError::CompressionNotSupport);
    }
    if frame.tiled {
        return Err(TiffError::TiledNotSupport);
    }
    if frame.orientation != Orientation::TopLeft {
        return Err(TiffError::OrientationNotSupport);
    }
    if frame.photometric_interpretation == PhotometricInterpretation::RGBPalette {
        return Err(TiffError::PhotometricInterpretationNotSupport);
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(TiffError::InvalidImageSize);
    }
    let width = EndianBytes::from_bits(frame.bits_per_sample).ok_or(TiffError::InvalidBitPerSample)?;
    if sample >= frame.samples_per_pixel {
        return Err(TiffError::SampleIndexOutOfRange);
    }
    if frame.strip_offsets.is_empty()
        || frame.strip_offsets.len() != frame.strip_byte_counts.len()
        || frame.strip_offsets.len() != frame.strip_count as usize
    {
        return Err(TiffError::InconsistentStripTable);
    }
    if frame.samples_per_pixel > 1
        && !matches!(
            frame.planar_configuration,
            PlanarConfiguration::Chunky | PlanarConfiguration::Planar
        )
    {
        return Err(TiffError::FormatNotSupport);
    }

    Ok(width)
}

/// Each sample owns whole strips: read the window of the requested plane.
fn read_planar<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    frame: &Frame,
    sample: u16,
    plane_len: usize,
) -> TiffResult<Plane> {
    let plane_bytes = plane_len as u64;
    let start = u64::from(sample) * plane_bytes;
    let window = start..start + plane_bytes;

    let mut buffer = vec![0u8; plane_len];
    let mut lost_strips = Vec::new();
    let mut covered = 0;

    for read in plan_strip_reads(window, &frame.strip_offsets, &frame.strip_byte_counts) {
        // Both fit the buffer since the read lies inside the window.
        let output = read.output_offset as usize..(read.output_offset + read.len) as usize;
        covered += read.len;

        reader.goto_offset(read.file_offset)?;
        if reader.read_up_to(&mut buffer[output.clone()])? != output.len() {
            lost_strips.push(read.strip);
        }
    }

    Ok(Plane {
        buffer,
        lost_strips,
        missing_bytes: plane_bytes - covered,
    })
}

/// Samples are interleaved within each strip: pick every `samples_per_pixel`th element.
fn read_chunky<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    frame: &Frame,
    sample: u16,
    width: EndianBytes,
    plane_len: usize,
) -> TiffResult<Plane> {
    let bytes_per_sample = width.byte_len();
    let stride = bytes_per_sample * usize::from(frame.samples_per_pixel);
    let first = usize::from(sample) * bytes_per_sample;

    let mut buffer = vec![0u8; plane_len];
    let mut lost_strips = Vec::new();
    let mut output = 0;
    let mut strip_data = Vec::new();

    for (strip, (&offset, &byte_count)) in frame
        .strip_offsets
        .iter()
        .zip(&frame.strip_byte_counts)
        .enumerate()
    {
        if output >= plane_len {
            break;
        }

        // Never allocate for more than the file can hold.
        let available = reader.len().saturating_sub(offset.into());
        let declared = u64::from(byte_count);
        let len = declared.min(available) as usize;
        if len > strip_data.len() {
            strip_data.resize(len, 0);
        }

        reader.goto_offset(offset.into())?;
        let got = reader.read_up_to(&mut strip_data[..len])?;
        if (got as u64) < declared {
            lost_strips.push(strip);
        }

        // The output advances over the declared strip, samples past the end of the file stay zero.
        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
        let mut at = first;
        while at.saturating_add(bytes_per_sample) <= declared
            && output + bytes_per_sample <= plane_len
        {
            if at + bytes_per_sample <= got {
                buffer[output..output + bytes_per_sample]
                    .copy_from_slice(&strip_data[at..at + bytes_per_sample]);
            }
            output += bytes_per_sample;
            at += stride;
        }
    }

    Ok(Plane {
        buffer,
        lost_strips,
        missing_bytes: (plane_len - output) as u64,
    })
}

/// Turn a host-ordered buffer into sample values of the given width.
fn materialize(buffer: &[u8], width: EndianBytes) -> Vec<SampleValue> {
    match width {
        EndianBytes::One => buffer.iter().map(|&b| SampleValue::U8(b)).collect(),
        EndianBytes::Two => buffer
            .chunks_exact(2)
            .map(|c| SampleValue::U16(u16::from_ne_bytes([c[0], c[1]])))
            .collect(),
        EndianBytes::Four => buffer
            .chunks_exact(4)
            .map(|c| SampleValue::U32(u32::from_ne_bytes([c[0], c[1], c[2], c[3]])))
            .collect(),
        EndianBytes::Eight => buffer
            .chunks_exact(8)
            .map(|c| {
                let mut n = [0u8; 8];
                n.copy_from_slice(c);
                SampleValue::U64(u64::from_ne_bytes(n))
            })
            .collect(),
    }
}
