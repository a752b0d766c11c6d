//! All IO functionality needed for TIFF decoding

use std::io::{self, Read, Seek, SeekFrom};

use crate::byte_order::{swap16, swap32, ByteOrder};

/// Reader that is aware of the byte order.
///
/// Multi-byte fields are read in host layout and swapped when the file was written in the
/// opposite order.
pub trait EndianReader: Read {
    /// Byte order the data was written in
    fn byte_order(&self) -> ByteOrder;

    /// Byte order of the running host
    fn host_byte_order(&self) -> ByteOrder;

    #[inline(always)]
    fn needs_swap(&self) -> bool {
        self.byte_order() != self.host_byte_order()
    }

    #[inline(always)]
    fn read_u16(&mut self) -> Result<u16, io::Error> {
        let mut n = [0u8; 2];
        self.read_exact(&mut n)?;
        Ok(self.fix_u16(u16::from_ne_bytes(n)))
    }

    #[inline(always)]
    fn read_u32(&mut self) -> Result<u32, io::Error> {
        let mut n = [0u8; 4];
        self.read_exact(&mut n)?;
        Ok(self.fix_u32(u32::from_ne_bytes(n)))
    }

    #[inline(always)]
    fn fix_u16(&self, n: u16) -> u16 {
        if self.needs_swap() {
            swap16(n)
        } else {
            n
        }
    }

    #[inline(always)]
    fn fix_u32(&self, n: u32) -> u32 {
        if self.needs_swap() {
            swap32(n)
        } else {
            n
        }
    }
}

/// Reader that is aware of the byte order and of the total length of the stream.
#[derive(Debug)]
pub struct SmartReader<R> {
    reader: R,
    pub byte_order: ByteOrder,
    host_byte_order: ByteOrder,
    len: u64,
}

impl<R> SmartReader<R> {
    /// Wraps a reader. The file byte order stays unknown until the header is parsed.
    pub fn wrap(reader: R) -> SmartReader<R> {
        SmartReader {
            reader,
            byte_order: ByteOrder::Unknown,
            host_byte_order: ByteOrder::host(),
            len: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Total length of the stream in bytes, as measured by [`Self::measure`].
    pub fn len(&self) -> u64 {
        self.len
    }
}

impl<R: Read + Seek> SmartReader<R> {
    /// Determine the length of the stream and rewind to its start.
    pub fn measure(&mut self) -> io::Result<u64> {
        self.len = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(0))?;
        Ok(self.len)
    }

    pub fn goto_offset(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.reader.stream_position()
    }

    /// Read as many bytes as are available into `buf`, stopping early only at the end of the
    /// stream. Returns the number of bytes read.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> EndianReader for SmartReader<R> {
    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline(always)]
    fn host_byte_order(&self) -> ByteOrder {
        self.host_byte_order
    }
}

impl<R: Read> Read for SmartReader<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Seek> Seek for SmartReader<R> {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}
