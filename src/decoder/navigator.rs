use std::io::{Read, Seek};

use super::cycles::IfdCycles;
use super::ifd::read_entry;
use super::image::{EntryIssue, Frame};
use super::stream::{EndianReader, SmartReader};
use super::Limits;
use crate::{TiffError, TiffResult};

/// Size of one directory entry in classic TIFF.
const ENTRY_LEN: u64 = 12;

/// A frame together with the worst soft issue met while decoding its directory.
#[derive(Debug)]
pub(crate) struct DecodedFrame {
    pub frame: Frame,
    pub issue: Option<TiffError>,
}

/// Walks the chain of Image File Directories.
///
/// The navigator is `Chained` while the stored next-IFD offset is nonzero, in bounds and not a
/// directory that was already decoded. Otherwise it is exhausted.
#[derive(Debug, Default)]
pub(crate) struct FrameNavigator {
    next_ifd: u32,
    cycles: IfdCycles,
}

impl FrameNavigator {
    /// Start over at the first directory of a file.
    pub fn start(&mut self, first_ifd: u32) {
        self.next_ifd = first_ifd;
        self.cycles.clear();
    }

    /// Whether there is another directory the chain points to.
    pub fn has_more(&self, file_len: u64) -> bool {
        self.next_ifd > 0
            && u64::from(self.next_ifd) < file_len
            && !self.cycles.closes_cycle(self.next_ifd)
    }

    fn is_chained(&self, file_len: u64) -> bool {
        // The entry count must be readable.
        self.has_more(file_len) && u64::from(self.next_ifd) + 2 < file_len
    }

    /// Decode the directory the chain points to into a fresh [`Frame`].
    ///
    /// Leaves the stream positioned right after the next-IFD offset of that directory.
    pub fn advance<R: Read + Seek>(
        &mut self,
        reader: &mut SmartReader<R>,
        limits: &Limits,
    ) -> TiffResult<DecodedFrame> {
        if !self.is_chained(reader.len()) {
            if self.cycles.closes_cycle(self.next_ifd) {
                tracing::warn!("IFD at offset {} was already visited", self.next_ifd);
            } else if self.next_ifd != 0 {
                tracing::debug!("IFD at offset {} is truncated", self.next_ifd);
            }
            // Exhausted for good.
            self.next_ifd = 0;
            return Err(TiffError::NoMoreImagesInTiff);
        }

        let start = self.next_ifd;
        self.cycles.visit(start);

        reader.goto_offset(start.into())?;
        let entry_count = reader.read_u16()?;
        tracing::debug!("Reading {entry_count} entries of IFD at offset {start}");

        let mut frame = Frame::default();
        let mut issue = None;
        for _ in 0..entry_count {
            let entry = read_entry(reader, limits)?;
            if let Some(EntryIssue::MultiSampleSize) = frame.apply(&entry) {
                issue = Some(TiffError::MultiSampleSizeNotSupport);
            }
        }

        reader.goto_offset(u64::from(start) + 2 + ENTRY_LEN * u64::from(entry_count))?;
        self.next_ifd = reader.read_u32()?;

        tracing::debug!(
            "Decoded frame {}x{}, {} samples of {} bits, {} strips, next IFD at {}",
            frame.width,
            frame.height,
            frame.samples_per_pixel,
            frame.bits_per_sample,
            frame.strip_count,
            self.next_ifd
        );

        Ok(DecodedFrame { frame, issue })
    }
}

/// Count the directories chained from `first_ifd` by reading only their entry counts and next
/// offsets. The stream position is restored afterwards.
pub(crate) fn count_chain<R: Read + Seek>(
    reader: &mut SmartReader<R>,
    first_ifd: u32,
) -> TiffResult<u32> {
    let position = reader.position()?;
    let counted = walk_chain(reader, first_ifd);
    reader.goto_offset(position)?;
    counted
}

fn walk_chain<R: Read + Seek>(reader: &mut SmartReader<R>, first_ifd: u32) -> TiffResult<u32> {
    let mut cycles = IfdCycles::new();
    let mut frames = 0;
    let mut next = first_ifd;

    while next > 0 && u64::from(next) + 2 < reader.len() {
        if !cycles.visit(next) {
            tracing::warn!("IFD at offset {next} was already visited");
            break;
        }

        reader.goto_offset(next.into())?;
        let entry_count = reader.read_u16()?;
        reader.goto_offset(u64::from(next) + 2 + ENTRY_LEN * u64::from(entry_count))?;
        next = reader.read_u32()?;
        frames += 1;
    }

    Ok(frames)
}
