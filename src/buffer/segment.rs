//! Segmented buffer bounding the size of any single allocation

use crate::buffer::GapBuffer;
use crate::constants::buffer::{GAP_INCREMENT, MAX_SEGMENT_SIZE, NEW_SEGMENT_SIZE};
use crate::error::Result;
use log::{debug, trace};

/// A logical position resolved to a segment and an offset within it
struct SegmentPos {
    index: usize,
    offset: usize,
}

/// A chain of gap buffers, each holding at most
/// [`MAX_SEGMENT_SIZE`] stored bytes.
///
/// Large documents never require one large free region: edits touch a
/// single segment, and inserts that overflow a segment split it and chain
/// in fresh ones. The chain is kept in document order and is never empty;
/// a segment emptied by a delete is pruned unless it is the sole segment
/// left.
///
/// Logical offsets run across all segments. A logical offset on a segment
/// boundary is ambiguous: insertion resolves it to the end of the earlier
/// segment, retrieval to the start of the later one.
pub struct SegmentedBuffer {
    segments: Vec<GapBuffer>,
    length: usize,
    point: usize,
}

impl SegmentedBuffer {
    /// Create an empty segmented buffer with a default-sized first segment
    pub fn new() -> Result<Self> {
        Self::with_capacity(GAP_INCREMENT)
    }

    /// Create an empty segmented buffer whose first segment has `capacity`
    /// bytes of storage.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            segments: vec![GapBuffer::new(capacity)?],
            length: 0,
            point: 0,
        })
    }

    /// Total number of stored bytes across all segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if the buffer stores no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The logical edit point
    #[must_use]
    pub fn point(&self) -> usize {
        self.point
    }

    /// Move the logical edit point.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    pub fn set_point(&mut self, point: usize) {
        assert!(point <= self.length, "point {point} out of bounds");
        self.point = point;
    }

    /// Number of segments in the chain
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Stored byte counts of the segments, in chain order
    pub fn segment_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().map(GapBuffer::len)
    }

    /// Resolve a logical offset to the earliest segment containing it
    fn resolve(&self, point: usize) -> SegmentPos {
        debug_assert!(point <= self.length);

        let mut consumed = 0;

        for (index, seg) in self.segments.iter().enumerate() {
            let seg_length = seg.len();
            if consumed + seg_length >= point {
                return SegmentPos {
                    index,
                    offset: point - consumed,
                };
            }
            consumed += seg_length;
        }

        SegmentPos {
            index: self.segments.len() - 1,
            offset: self.segments[self.segments.len() - 1].len(),
        }
    }

    /// Insert into one segment, honoring the per-segment size cap.
    /// Returns the number of bytes actually inserted.
    fn segment_insert(seg: &mut GapBuffer, offset: usize, s: &[u8]) -> Result<usize> {
        let room = MAX_SEGMENT_SIZE - seg.len();

        if s.is_empty() || room == 0 {
            return Ok(0);
        }

        let byte_num = room.min(s.len());
        seg.set_point(offset);
        seg.insert(&s[..byte_num])?;

        Ok(byte_num)
    }

    /// Delete from one segment, clamped to its end. Returns the number of
    /// bytes actually deleted.
    fn segment_delete(seg: &mut GapBuffer, offset: usize, byte_num: usize) -> usize {
        let available = seg.len() - offset;

        if byte_num == 0 || available == 0 {
            return 0;
        }

        let byte_num = byte_num.min(available);
        seg.set_point(offset);
        seg.delete(byte_num);

        byte_num
    }

    /// Split the segment at `index`, moving the bytes after `offset` into
    /// a freshly allocated successor.
    fn split_segment(&mut self, index: usize, offset: usize) -> Result<()> {
        let seg_length = self.segments[index].len();
        let tail_length = seg_length - offset;

        let mut new_seg = GapBuffer::new(tail_length + GAP_INCREMENT)?;
        let mut buf = [0u8; 1024];
        let mut k = offset;

        while k < seg_length {
            let copied = self.segments[index].get_range(k, &mut buf);
            new_seg.add(&buf[..copied])?;
            k += copied;
        }

        let seg = &mut self.segments[index];
        seg.set_point(offset);
        seg.delete(tail_length);

        self.segments.insert(index + 1, new_seg);
        debug!("split segment {index} at offset {offset}, {tail_length} bytes moved");

        Ok(())
    }

    /// Insert `s` at the logical edit point, splitting segments and
    /// chaining in new ones as needed so that no segment exceeds
    /// [`MAX_SEGMENT_SIZE`]. The point advances past the inserted bytes.
    pub fn insert(&mut self, s: &[u8]) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }

        let SegmentPos { mut index, mut offset } = self.resolve(self.point);

        let inserted = Self::segment_insert(&mut self.segments[index], offset, s)?;
        let mut remaining = &s[inserted..];
        self.length += inserted;
        self.point += inserted;
        offset += inserted;

        if remaining.is_empty() {
            return Ok(());
        }

        if offset == self.segments[index].len() {
            if index + 1 < self.segments.len() {
                let inserted = Self::segment_insert(&mut self.segments[index + 1], 0, remaining)?;

                if inserted > 0 {
                    index += 1;
                    remaining = &remaining[inserted..];
                    self.length += inserted;
                    self.point += inserted;

                    if remaining.is_empty() {
                        return Ok(());
                    }

                    // Overflow segments must land between the bytes just
                    // written and this segment's original content.
                    self.split_segment(index, inserted)?;
                }
            }
        } else {
            self.split_segment(index, offset)?;
        }

        while !remaining.is_empty() {
            let chunk = remaining.len().min(NEW_SEGMENT_SIZE);
            let capacity = chunk.max(GAP_INCREMENT);

            let mut new_seg = GapBuffer::new(capacity)?;
            new_seg.add(&remaining[..chunk])?;
            self.segments.insert(index + 1, new_seg);

            index += 1;
            remaining = &remaining[chunk..];
            self.length += chunk;
            self.point += chunk;
        }

        Ok(())
    }

    /// Delete up to `byte_num` bytes after the logical edit point,
    /// clamped to the buffer end. Emptied segments are pruned except for
    /// the sole remaining one.
    pub fn delete(&mut self, byte_num: usize) {
        if byte_num == 0 {
            return;
        }

        let SegmentPos { mut index, offset } = self.resolve(self.point);
        let mut remaining = byte_num.min(self.length - self.point);

        let deleted = Self::segment_delete(&mut self.segments[index], offset, remaining);
        remaining -= deleted;
        self.length -= deleted;

        if !self.prune_if_empty(index) {
            index += 1;
        }

        while remaining > 0 {
            let deleted = Self::segment_delete(&mut self.segments[index], 0, remaining);
            remaining -= deleted;
            self.length -= deleted;

            if !self.prune_if_empty(index) {
                index += 1;
            }
        }
    }

    fn prune_if_empty(&mut self, index: usize) -> bool {
        if self.segments[index].is_empty() && self.segments.len() > 1 {
            self.segments.remove(index);
            trace!("pruned empty segment {index}");
            true
        } else {
            false
        }
    }

    /// Byte at logical offset `point`, `0` at the buffer end.
    ///
    /// A boundary offset is resolved to the next non-empty segment, so
    /// retrieval always sees the byte that follows the boundary.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    #[must_use]
    pub fn byte_at(&self, point: usize) -> u8 {
        assert!(point <= self.length, "point {point} out of bounds");

        let SegmentPos { mut index, mut offset } = self.resolve(point);

        if offset == self.segments[index].len() {
            if let Some(next) = self.segments[index + 1..]
                .iter()
                .position(|seg| !seg.is_empty())
            {
                index += next + 1;
                offset = 0;
            }
        }

        self.segments[index].byte_at(offset)
    }
}
