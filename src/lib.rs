//! Decoding of raw samples from TIFF images
//!
//! TIFF (Tagged Image File Format) stores one or more images, each described by an Image File
//! Directory. This crate walks the directory chain, exposes the metadata of each frame and
//! extracts the raw sample values of uncompressed, strip-organized pixel data. Planar and
//! chunky layouts are supported in either byte order.
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

pub mod byte_order;
pub mod decoder;
mod error;
pub mod tags;

pub use self::byte_order::ByteOrder;
pub use self::error::{TiffError, TiffResult};
