use std::io;

use quick_error::quick_error;

quick_error! {
    /// Tiff error kinds.
    ///
    /// The taxonomy is flat: every condition the decoder can report is one variant here.
    /// Successful operations are `Ok(..)`.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum TiffError {
        /// The image uses a layout the decoder does not understand.
        FormatNotSupport {
            display("The Decoder does not support this image layout")
        }
        /// Pixel data is compressed. Only uncompressed strips can be read.
        CompressionNotSupport {
            display("The Decoder does not support compressed image data")
        }
        /// The image is organized in tiles rather than strips.
        TiledNotSupport {
            display("The Decoder does not support tiled images")
        }
        /// The image orientation is not the standard top-left one.
        OrientationNotSupport {
            display("The Decoder does not support non-standard orientations")
        }
        /// The image is palette-indexed.
        PhotometricInterpretationNotSupport {
            display("The Decoder does not support palette color images")
        }
        /// BitsPerSample lists differing values for the samples of a pixel.
        MultiSampleSizeNotSupport {
            display("The Decoder does not support differing bits per sample")
        }

        /// Width or height is zero, or the image is too large to address.
        InvalidImageSize {
            display("Image dimensions are invalid")
        }
        /// BitsPerSample is not one of 8, 16, 32 or 64.
        InvalidBitPerSample {
            display("Bits per sample must be one of 8, 16, 32 or 64")
        }
        /// The file does not start with `II` or `MM`.
        InvalidTiffByteOrder {
            display("TIFF byte order marker not found")
        }
        /// The magic number following the byte order marker is not 42.
        InvalidTiffMagicNumber {
            display("TIFF magic number is invalid")
        }
        /// StripOffsets and StripByteCounts are missing or disagree in length.
        InconsistentStripTable {
            display("Strip offsets and strip byte counts are missing or inconsistent")
        }
        /// The requested sample index is not below SamplesPerPixel.
        SampleIndexOutOfRange {
            display("Requested sample index exceeds the samples per pixel")
        }

        /// The IFD chain has no further image.
        NoMoreImagesInTiff {
            display("There are no more images in the TIFF file")
        }

        /// At least one strip could not be read completely.
        StripDataLost {
            display("Strip data was lost while reading")
        }
        /// The file could not be opened.
        OpenFileFailed(err: io::Error) {
            display("Failed to open file: {}", err)
            source(err)
        }
        /// The underlying stream failed outside of strip reads.
        IoError(err: io::Error) {
            from()
            display("{}", err)
            source(err)
        }

        /// No frame has been decoded successfully yet.
        ReaderIsNotGoodYet {
            display("The reader has not decoded a valid frame")
        }

        /// The configured limits were exceeded.
        LimitsExceeded {
            display("The Decoder limits are exceeded")
        }
    }
}

/// Result of an image decoding process
pub type TiffResult<T> = Result<T, TiffError>;
