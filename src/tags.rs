/// Declares a field value enum that is stored on disk as a `u16`.
///
/// Every enum gets a catch-all `Unknown` variant since any value outside the table may appear in
/// a file. Values are matched directly, so the enums carry no discriminants.
macro_rules! tags {
    {
        // Permit arbitrary meta items, which include documentation.
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident(u16) unknown(#[$unknown_meta:meta] $unknown:ident) {
            // Each of the `Name = Val,` permitting documentation.
            $($(#[$ident_attr:meta])* $tag:ident = $val:expr,)*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[non_exhaustive]
        $vis enum $name {
            $($(#[$ident_attr])* $tag,)*
            #[$unknown_meta]
            Unknown(u16),
        }

        impl $name {
            /// The variant for `n`, if it is one of the named values.
            #[inline(always)]
            pub const fn from_u16(n: u16) -> Option<Self> {
                match n {
                    $( $val => Some($name::$tag), )*
                    _ => None,
                }
            }

            #[inline(always)]
            pub const fn from_u16_exhaustive($unknown: u16) -> Self {
                match Self::from_u16($unknown) {
                    Some(v) => v,
                    None => $name::Unknown($unknown),
                }
            }

            #[inline(always)]
            pub const fn to_u16(&self) -> u16 {
                match *self {
                    $( $name::$tag => $val, )*
                    $name::Unknown($unknown) => $unknown,
                }
            }
        }
    };
}

// Note: only the tags the decoder acts upon are named, everything else is `Unknown`.
tags! {
/// TIFF tags
pub enum Tag(u16) unknown(
    /// A private or extension tag
    unknown
) {
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    PhotometricInterpretation = 262,
    FillOrder = 266,
    ImageDescription = 270,
    StripOffsets = 273,
    Orientation = 274,
    SamplesPerPixel = 277,
    RowsPerStrip = 278,
    StripByteCounts = 279,
    XResolution = 282,
    YResolution = 283,
    PlanarConfiguration = 284,
    ResolutionUnit = 296,
    TileWidth = 322,
    TileLength = 323,
    TileOffsets = 324,
    TileByteCounts = 325,
    ExtraSamples = 338,
    SampleFormat = 339,
}
}

tags! {
/// The type of an IFD entry (a 2 byte field).
pub enum Type(u16) unknown(
    /// A type this decoder has no layout for
    unknown
) {
    /// 8-bit unsigned integer
    BYTE = 1,
    /// 8-bit byte that contains a 7-bit ASCII code; the last byte must be zero
    ASCII = 2,
    /// 16-bit unsigned integer
    SHORT = 3,
    /// 32-bit unsigned integer
    LONG = 4,
    /// Fraction stored as two 32-bit unsigned integers
    RATIONAL = 5,
    /// 8-bit signed integer
    SBYTE = 6,
    /// 8-bit byte that may contain anything, depending on the field
    UNDEFINED = 7,
    /// 16-bit signed integer
    SSHORT = 8,
    /// 32-bit signed integer
    SLONG = 9,
    /// Fraction stored as two 32-bit signed integers
    SRATIONAL = 10,
    /// 32-bit IEEE floating point
    FLOAT = 11,
    /// 64-bit IEEE floating point
    DOUBLE = 12,
}
}

tags! {
/// See [TIFF compression tags](https://www.awaresystems.be/imaging/tiff/tifftags/compression.html)
/// for reference.
pub enum CompressionMethod(u16) unknown(
    /// A custom compression method
    unknown
) {
    None = 1,
    Huffman = 2,
    Fax3 = 3,
    Fax4 = 4,
    LZW = 5,
    JPEG = 6,
    // "Extended JPEG" or "new JPEG" style
    ModernJPEG = 7,
    Deflate = 8,
    OldDeflate = 0x80B2,
    PackBits = 0x8005,
}
}

tags! {
pub enum PhotometricInterpretation(u16) unknown(
    /// An interpretation outside of baseline and the common extensions
    unknown
) {
    WhiteIsZero = 0,
    BlackIsZero = 1,
    RGB = 2,
    RGBPalette = 3,
    TransparencyMask = 4,
    CMYK = 5,
    YCbCr = 6,
    CIELab = 8,
}
}

tags! {
pub enum PlanarConfiguration(u16) unknown(
    /// Neither chunky nor planar
    unknown
) {
    Chunky = 1,
    Planar = 2,
}
}

tags! {
/// Type to represent resolution units
pub enum ResolutionUnit(u16) unknown(
    /// An undefined unit
    unknown
) {
    None = 1,
    Inch = 2,
    Centimeter = 3,
}
}

tags! {
pub enum SampleFormat(u16) unknown(
    /// An unknown extension sample format
    unknown
) {
    Uint = 1,
    Int = 2,
    IEEEFP = 3,
    Void = 4,
}
}

tags! {
pub enum ExtraSamples(u16) unknown(
    /// A value outside of the three defined associations
    unknown
) {
    /// There is no specified association between the sample and the image.
    Unspecified = 0,
    /// The sample is associated alpha, i.e. pre-multiplied color.
    AssociatedAlpha = 1,
    /// The sample is unassociated alpha such as a mask. There might be more than one such sample.
    UnassociatedAlpha = 2,
}
}

tags! {
/// Placement of the 0th row and column relative to the visual image.
pub enum Orientation(u16) unknown(
    /// A value outside of the eight defined orientations
    unknown
) {
    /// Row 0 at the top, column 0 at the left. The only orientation samples can be read in.
    TopLeft = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomLeft = 4,
    LeftTop = 5,
    RightTop = 6,
    RightBottom = 7,
    LeftBottom = 8,
}
}

tags! {
/// Logical order of bits within a byte.
pub enum FillOrder(u16) unknown(
    /// A value outside of the two defined orders
    unknown
) {
    /// Lower column values are stored in the higher-order bits of the byte.
    MsbToLsb = 1,
    /// Lower column values are stored in the lower-order bits of the byte.
    LsbToMsb = 2,
}
}
