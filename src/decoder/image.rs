use super::ifd::Entry;
use crate::tags::{
    CompressionMethod, ExtraSamples, FillOrder, Orientation, PhotometricInterpretation,
    PlanarConfiguration, ResolutionUnit, SampleFormat, Tag,
};

/// Horizontal and vertical resolution in pixels per [`ResolutionUnit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub x: f32,
    pub y: f32,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution { x: 1.0, y: 1.0 }
    }
}

/// The decoded metadata of one image in the file.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub compression: CompressionMethod,

    pub samples_per_pixel: u16,
    pub bits_per_sample: u32,
    pub planar_configuration: PlanarConfiguration,
    pub sample_format: SampleFormat,
    pub extra_samples: Vec<ExtraSamples>,

    pub orientation: Orientation,
    pub fill_order: FillOrder,

    pub resolution_unit: ResolutionUnit,
    pub resolution: Resolution,

    pub photometric_interpretation: PhotometricInterpretation,
    pub tiled: bool,

    pub rows_per_strip: u32,
    pub strip_count: u32,
    pub strip_offsets: Vec<u32>,
    pub strip_byte_counts: Vec<u32>,

    pub description: String,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            width: 0,
            height: 0,
            compression: CompressionMethod::None,
            samples_per_pixel: 1,
            bits_per_sample: 0,
            planar_configuration: PlanarConfiguration::Chunky,
            sample_format: SampleFormat::Uint,
            extra_samples: Vec::new(),
            orientation: Orientation::TopLeft,
            fill_order: FillOrder::MsbToLsb,
            resolution_unit: ResolutionUnit::None,
            resolution: Resolution::default(),
            photometric_interpretation: PhotometricInterpretation::BlackIsZero,
            tiled: false,
            rows_per_strip: 0,
            strip_count: 0,
            strip_offsets: Vec::new(),
            strip_byte_counts: Vec::new(),
            description: String::new(),
        }
    }
}

/// A problem with one entry that does not stop the rest of the directory from decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntryIssue {
    MultiSampleSize,
}

impl Frame {
    /// Update the field an entry describes. Unknown tags and absent entries leave the frame
    /// untouched.
    pub(crate) fn apply(&mut self, entry: &Entry) -> Option<EntryIssue> {
        let Some(value) = entry.value() else {
            if !matches!(entry.tag, Tag::Unknown(_)) {
                tracing::debug!("{:?} has no usable value, keeping default", entry.tag);
            }
            return None;
        };

        match entry.tag {
            Tag::ImageWidth => self.width = value,
            // Height is the image length.
            Tag::ImageLength => self.height = value,
            Tag::BitsPerSample => {
                self.bits_per_sample = value;
                if entry.values.iter().any(|&v| v != value) {
                    return Some(EntryIssue::MultiSampleSize);
                }
            }
            Tag::Compression => {
                self.compression = CompressionMethod::from_u16_exhaustive(short(value))
            }
            Tag::PhotometricInterpretation => {
                self.photometric_interpretation =
                    PhotometricInterpretation::from_u16_exhaustive(short(value))
            }
            Tag::FillOrder => self.fill_order = FillOrder::from_u16_exhaustive(short(value)),
            Tag::ImageDescription => {
                let mut description: String =
                    entry.values.iter().map(|&c| char::from(c as u8)).collect();
                // Strings may be null-terminated.
                if let Some(first) = description.find('\0') {
                    description.truncate(first);
                }
                self.description = description;
            }
            Tag::StripOffsets => {
                self.strip_count = entry.count;
                self.strip_offsets = entry.values.clone();
            }
            Tag::StripByteCounts => {
                self.strip_count = entry.count;
                self.strip_byte_counts = entry.values.clone();
            }
            Tag::Orientation => self.orientation = Orientation::from_u16_exhaustive(short(value)),
            Tag::SamplesPerPixel => self.samples_per_pixel = short(value),
            Tag::RowsPerStrip => self.rows_per_strip = value,
            Tag::XResolution => {
                if let Some(x) = ratio(entry) {
                    self.resolution.x = x;
                }
            }
            Tag::YResolution => {
                if let Some(y) = ratio(entry) {
                    self.resolution.y = y;
                }
            }
            Tag::PlanarConfiguration => {
                self.planar_configuration = PlanarConfiguration::from_u16_exhaustive(short(value))
            }
            Tag::ResolutionUnit => {
                self.resolution_unit = ResolutionUnit::from_u16_exhaustive(short(value))
            }
            Tag::TileWidth | Tag::TileLength | Tag::TileOffsets | Tag::TileByteCounts => {
                self.tiled = true
            }
            Tag::ExtraSamples => {
                self.extra_samples = entry
                    .values
                    .iter()
                    .map(|&v| ExtraSamples::from_u16_exhaustive(short(v)))
                    .collect()
            }
            Tag::SampleFormat => {
                self.sample_format = SampleFormat::from_u16_exhaustive(short(value))
            }
            Tag::Unknown(_) => {}
        }

        None
    }

    /// Bytes one sample plane occupies: `width * height * bits_per_sample / 8`.
    pub fn plane_bytes(&self) -> Option<u64> {
        u64::from(self.width)
            .checked_mul(u64::from(self.height))?
            .checked_mul(u64::from(self.bits_per_sample / 8))
    }
}

/// Narrow a field value to `u16`. Values that do not fit become `u16::MAX`, which no
/// enumeration names.
fn short(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn ratio(entry: &Entry) -> Option<f32> {
    match entry.rational()? {
        (_, 0) => {
            tracing::debug!("{:?} has a zero denominator, keeping default", entry.tag);
            None
        }
        (numerator, denominator) => Some(numerator as f32 / denominator as f32),
    }
}
