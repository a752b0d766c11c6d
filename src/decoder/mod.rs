use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use self::navigator::{count_chain, FrameNavigator};
use self::stream::{EndianReader, SmartReader};
use crate::byte_order::ByteOrder;
use crate::tags::{
    CompressionMethod, ExtraSamples, FillOrder, Orientation, PhotometricInterpretation,
    PlanarConfiguration, ResolutionUnit, SampleFormat,
};
use crate::{TiffError, TiffResult};

mod cycles;
pub mod ifd;
mod image;
mod navigator;
mod stream;
pub mod strips;

pub use self::image::{Frame, Resolution};
pub use self::strips::{SampleData, SampleValue};

/// Decoding limits
#[derive(Clone, Debug)]
pub struct Limits {
    /// The maximum size of the sample buffer of one plane in bytes, the default is 256MiB.
    pub decoding_buffer_size: usize,
    /// The maximum size of any ifd value in bytes, the default is
    /// 1MiB. Larger values are dropped and the tag is treated as absent.
    pub ifd_value_size: usize,
    /// The purpose of this is to prevent all the fields of the struct from
    /// being public, as this would make adding new fields a major version
    /// bump.
    _non_exhaustive: (),
}

impl Limits {
    /// A configuration that does not impose any limits.
    ///
    /// Note that this configuration is likely to crash on excessively large images since,
    /// naturally, the machine running the program does not have infinite memory.
    pub fn unlimited() -> Limits {
        Limits {
            decoding_buffer_size: usize::MAX,
            ifd_value_size: usize::MAX,
            _non_exhaustive: (),
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            decoding_buffer_size: 256 * 1024 * 1024,
            ifd_value_size: 1024 * 1024,
            _non_exhaustive: (),
        }
    }
}

/// A decoding session over one TIFF stream.
///
/// The reader is created unopened. [`Reader::open`] parses the header and the first directory,
/// after which the accessors describe the current frame.
///
/// ```no_run
/// # fn main() -> rawtiff::TiffResult<()> {
/// let mut reader = rawtiff::decoder::Reader::from_path("scan.tif")?;
/// reader.open()?;
/// let red = reader.get_sample_data(0)?;
/// red.status()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reader<R>
where
    R: Read + Seek,
{
    reader: SmartReader<R>,
    limits: Limits,
    first_ifd: u32,
    navigator: FrameNavigator,
    frame: Frame,
    good: bool,
}

impl Reader<BufReader<File>> {
    /// Create a reader for the file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let file = File::open(path).map_err(TiffError::OpenFileFailed)?;
        Ok(Reader::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> Reader<R> {
    pub fn new(r: R) -> Reader<R> {
        Reader {
            reader: SmartReader::wrap(r),
            limits: Limits::default(),
            first_ifd: 0,
            navigator: FrameNavigator::default(),
            frame: Frame::default(),
            good: false,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Reader<R> {
        self.limits = limits;
        self
    }

    /// Parse the header and decode the first frame.
    pub fn open(&mut self) -> TiffResult<()> {
        self.good = false;
        self.reader.measure()?;
        self.read_header()?;
        self.navigator.start(self.first_ifd);
        self.next_frame()
    }

    fn read_header(&mut self) -> TiffResult<()> {
        let mut marker = [0u8; 2];
        if self.reader.read_up_to(&mut marker)? != marker.len() {
            return Err(TiffError::InvalidTiffByteOrder);
        }
        self.reader.byte_order =
            ByteOrder::from_marker(marker).ok_or(TiffError::InvalidTiffByteOrder)?;

        let mut magic = [0u8; 2];
        if self.reader.read_up_to(&mut magic)? != magic.len() {
            return Err(TiffError::InvalidTiffMagicNumber);
        }
        if self.reader.fix_u16(u16::from_ne_bytes(magic)) != 42 {
            return Err(TiffError::InvalidTiffMagicNumber);
        }

        self.first_ifd = self.reader.read_u32()?;
        tracing::debug!(
            "{:?} TIFF, first IFD at offset {}",
            self.reader.byte_order,
            self.first_ifd
        );
        Ok(())
    }

    /// Replace the current frame with the one the chain points to.
    fn next_frame(&mut self) -> TiffResult<()> {
        let decoded = match self.navigator.advance(&mut self.reader, &self.limits) {
            Ok(decoded) => decoded,
            // The current frame stays valid at the end of the chain.
            Err(TiffError::NoMoreImagesInTiff) => return Err(TiffError::NoMoreImagesInTiff),
            Err(err) => {
                self.good = false;
                return Err(err);
            }
        };

        self.frame = decoded.frame;
        match decoded.issue {
            Some(issue) => {
                self.good = false;
                Err(issue)
            }
            None => {
                self.good = true;
                Ok(())
            }
        }
    }

    /// Whether the current frame was decoded successfully.
    pub fn good(&self) -> bool {
        self.good
    }

    pub fn has_next_frame(&self) -> bool {
        self.good && self.navigator.has_more(self.reader.len())
    }

    /// Advance to the next frame in the file.
    ///
    /// Returns `NoMoreImagesInTiff` at the end of the chain, in which case the current frame
    /// stays available. A frame that failed to decode can be skipped this way.
    pub fn read_next_frame(&mut self) -> TiffResult<()> {
        self.next_frame()
    }

    /// Number of frames in the file, counted without decoding their directories.
    pub fn count_frames(&mut self) -> TiffResult<u32> {
        if !self.good {
            return Err(TiffError::ReaderIsNotGoodYet);
        }
        count_chain(&mut self.reader, self.first_ifd)
    }

    /// Extract sample `sample` of every pixel of the current frame in row-major order.
    pub fn get_sample_data(&mut self, sample: u16) -> TiffResult<SampleData> {
        if !self.good {
            return Err(TiffError::ReaderIsNotGoodYet);
        }
        strips::extract(&mut self.reader, &self.frame, sample, &self.limits)
    }

    /// The metadata of the current frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    pub fn image_description(&self) -> &str {
        &self.frame.description
    }

    pub fn resolution(&self) -> Resolution {
        self.frame.resolution
    }

    pub fn resolution_unit(&self) -> ResolutionUnit {
        self.frame.resolution_unit
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.frame.bits_per_sample
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.frame.samples_per_pixel
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.frame.sample_format
    }

    pub fn compression(&self) -> CompressionMethod {
        self.frame.compression
    }

    pub fn photometric_interpretation(&self) -> PhotometricInterpretation {
        self.frame.photometric_interpretation
    }

    pub fn planar_configuration(&self) -> PlanarConfiguration {
        self.frame.planar_configuration
    }

    pub fn orientation(&self) -> Orientation {
        self.frame.orientation
    }

    pub fn fill_order(&self) -> FillOrder {
        self.frame.fill_order
    }

    pub fn rows_per_strip(&self) -> u32 {
        self.frame.rows_per_strip
    }

    pub fn strip_count(&self) -> u32 {
        self.frame.strip_count
    }

    pub fn is_tiled(&self) -> bool {
        self.frame.tiled
    }

    pub fn extra_samples(&self) -> &[ExtraSamples] {
        &self.frame.extra_samples
    }

    /// Byte order of the file, `Unknown` until the header was read.
    pub fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
