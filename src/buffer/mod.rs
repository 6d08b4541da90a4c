//! Gap buffer storage for efficient text editing

use crate::constants::buffer::GAP_INCREMENT;
use crate::error::{Error, Result};

pub mod segment;

pub use segment::SegmentedBuffer;

/// A contiguous byte buffer with a moveable gap at the edit point.
///
/// The allocation is split into three zones: stored text before the gap,
/// the gap itself, and stored text after the gap. Moving the edit point
/// only becomes a memmove when an edit actually happens there, so runs of
/// inserts and deletes at one location are cheap.
///
/// Offsets exposed by the public API are *external*: the number of stored
/// bytes before a location, ignoring the gap. The newline count is cached
/// and maintained incrementally by every mutation.
pub struct GapBuffer {
    text: Vec<u8>,
    /// Edit point in internal coordinates. Always on the stored side of
    /// the gap, never inside it.
    point: usize,
    gap_start: usize,
    gap_end: usize,
    lines: usize,
}

impl GapBuffer {
    /// Allocate a buffer with `capacity` bytes of initial storage.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        assert!(capacity > 0, "gap buffer capacity must be non-zero");

        let mut text = Vec::new();
        text.try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory)?;
        text.resize(capacity, 0);

        Ok(Self {
            text,
            point: 0,
            gap_start: 0,
            gap_end: capacity,
            lines: 0,
        })
    }

    /// Number of stored bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len() - self.gap_size()
    }

    /// Check if the buffer stores no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `'\n'` bytes currently stored
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of free bytes in the gap
    #[must_use]
    pub fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    fn allocated(&self) -> usize {
        self.text.len()
    }

    /// The edit point as an external offset in `[0, len]`
    #[must_use]
    pub fn point(&self) -> usize {
        if self.point > self.gap_end {
            self.point - self.gap_size()
        } else {
            self.point
        }
    }

    /// Move the edit point to external offset `point`.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    pub fn set_point(&mut self, point: usize) {
        assert!(point <= self.len(), "point {point} out of bounds");
        self.point = self.internal_point(point);
    }

    /// Ensure at least `size` bytes of storage are allocated. Useful
    /// before a bulk load to avoid repeated reallocation.
    pub fn preallocate(&mut self, size: usize) -> Result<()> {
        self.grow_gap_if_required(size)
    }

    /// Move the gap to the end of stored text so that bytes `[0, len)`
    /// are contiguous at the start of the allocation. External scanners
    /// read them through [`text`](Self::text). The edit point moves to
    /// the buffer end.
    pub fn contiguous_storage(&mut self) {
        self.set_point(self.len());
        self.move_gap_to_point();
    }

    /// The stored bytes as one slice. Only meaningful directly after
    /// [`contiguous_storage`](Self::contiguous_storage).
    #[must_use]
    pub fn text(&self) -> &[u8] {
        debug_assert!(
            self.gap_start == self.len() || self.gap_size() == 0,
            "storage is not contiguous"
        );
        &self.text[..self.len()]
    }

    fn move_gap_to_point(&mut self) {
        if self.point == self.gap_start {
            return;
        } else if self.gap_size() == 0 {
            self.gap_start = self.point;
            self.gap_end = self.point;
        } else if self.point < self.gap_start {
            let byte_num = self.gap_start - self.point;
            let gap_size = self.gap_size();
            self.text
                .copy_within(self.point..self.gap_start, self.point + gap_size);
            self.gap_end -= byte_num;
            self.gap_start = self.point;
        } else {
            let byte_num = self.point - self.gap_end;
            self.text
                .copy_within(self.gap_end..self.point, self.gap_start);
            self.gap_start += byte_num;
            self.gap_end += byte_num;
            self.point = self.gap_start;
        }
    }

    fn grow_gap_if_required(&mut self, new_size: usize) -> Result<()> {
        if new_size <= self.allocated() {
            return Ok(());
        }

        let old_alloc = self.allocated();
        let new_alloc = new_size + GAP_INCREMENT;
        self.text
            .try_reserve_exact(new_alloc - old_alloc)
            .map_err(|_| Error::OutOfMemory)?;
        self.text.resize(new_alloc, 0);

        let after_gap = old_alloc - self.gap_end;
        if after_gap > 0 {
            self.text
                .copy_within(self.gap_end..old_alloc, new_alloc - after_gap);
        }

        let size_increase = new_alloc - old_alloc;
        if self.point > self.gap_end {
            self.point += size_increase;
        }
        self.gap_end += size_increase;

        Ok(())
    }

    fn shrink_gap_if_required(&mut self) {
        if self.gap_size() <= 2 * GAP_INCREMENT {
            return;
        }

        let length = self.len();
        let point = self.point();

        self.set_point(length);
        self.move_gap_to_point();

        self.text.truncate(length + GAP_INCREMENT);
        self.text.shrink_to_fit();
        self.gap_end = self.gap_start + GAP_INCREMENT;

        self.set_point(point);
    }

    /// Insert `s` at the edit point. The point is unchanged externally;
    /// use [`add`](Self::add) to insert and advance.
    pub fn insert(&mut self, s: &[u8]) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }

        self.move_gap_to_point();

        let new_length = self.len() + s.len();
        self.grow_gap_if_required(new_length)?;

        self.text[self.point..self.point + s.len()].copy_from_slice(s);
        self.lines += count_newlines(s);
        self.gap_start += s.len();

        Ok(())
    }

    /// Insert `s` at the edit point and advance the point past it
    pub fn add(&mut self, s: &[u8]) -> Result<()> {
        self.insert(s)?;
        self.point += s.len();
        Ok(())
    }

    /// Delete up to `byte_num` bytes after the edit point, clamped to the
    /// end of the buffer
    pub fn delete(&mut self, byte_num: usize) {
        if byte_num == 0 {
            return;
        }

        self.move_gap_to_point();

        let byte_num = byte_num.min(self.allocated() - self.gap_end);
        self.lines -= count_newlines(&self.text[self.gap_end..self.gap_end + byte_num]);
        self.gap_end += byte_num;

        self.shrink_gap_if_required();
    }

    /// Replace up to `num_bytes` bytes after the edit point with `s`.
    ///
    /// Bytes are overwritten in place as far as possible; a length
    /// difference falls back to [`add`](Self::add) for leftover insertion
    /// or [`delete`](Self::delete) for leftover removal. The point ends
    /// up after the written bytes.
    pub fn replace(&mut self, num_bytes: usize, s: &[u8]) -> Result<()> {
        self.move_gap_to_point();

        let length = self.len();
        let num_bytes = num_bytes.min(length - self.point);

        let after_gap = self.allocated() - self.gap_end;
        let replace_bytes = after_gap.min(num_bytes.min(s.len()));

        for k in 0..replace_bytes {
            let old = self.text[self.gap_end + k];
            if old == b'\n' {
                self.lines -= 1;
            }
            if s[k] == b'\n' {
                self.lines += 1;
            }
            self.text[self.gap_end + k] = s[k];
        }

        if replace_bytes > 0 {
            self.point += self.gap_size() + replace_bytes;
        }

        if s.len() > replace_bytes {
            self.add(&s[replace_bytes..])?;
        }

        if num_bytes > s.len() {
            self.delete(num_bytes - s.len());
        }

        Ok(())
    }

    /// Byte at the edit point, `0` at the buffer end
    #[must_use]
    pub fn get(&self) -> u8 {
        self.byte_at(self.point())
    }

    /// Byte at external offset `point`, `0` at the buffer end.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    #[must_use]
    pub fn byte_at(&self, point: usize) -> u8 {
        assert!(point <= self.len(), "point {point} out of bounds");

        if point >= self.len() {
            return 0;
        }

        let point = self.internal_point(point);

        if point == self.gap_start {
            self.text[self.gap_end]
        } else {
            self.text[point]
        }
    }

    /// Copy stored bytes starting at `point` into `buf`, splicing around
    /// the gap. Returns the number of bytes copied, which is less than
    /// `buf.len()` when the buffer end is reached first.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    pub fn get_range(&self, point: usize, buf: &mut [u8]) -> usize {
        let length = self.len();
        assert!(point <= length, "point {point} out of bounds");

        if point >= length || buf.is_empty() {
            return 0;
        }

        let num_bytes = buf.len().min(length - point);
        let end = point + num_bytes;

        let point = self.internal_point(point);
        let end = self.internal_point(end);

        if end <= self.gap_start || point >= self.gap_end {
            buf[..num_bytes].copy_from_slice(&self.text[point..point + num_bytes]);
        } else {
            let pre_gap_bytes = self.gap_start - point;
            buf[..pre_gap_bytes].copy_from_slice(&self.text[point..self.gap_start]);
            buf[pre_gap_bytes..num_bytes].copy_from_slice(&self.text[self.gap_end..end]);
        }

        num_bytes
    }

    /// Find the next occurrence of byte `c` at or after external offset
    /// `point`. The scan is spliced across the gap.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    #[must_use]
    pub fn find_next(&self, point: usize, c: u8) -> Option<usize> {
        assert!(point <= self.len(), "point {point} out of bounds");

        if point >= self.len() {
            return None;
        }

        let mut point = self.internal_point(point);

        if point < self.gap_start {
            if let Some(offset) = self.text[point..self.gap_start]
                .iter()
                .position(|&b| b == c)
            {
                return Some(self.external_point(point + offset));
            }
        }

        if point <= self.gap_start {
            point = self.gap_end;
        }

        self.text[point..]
            .iter()
            .position(|&b| b == c)
            .map(|offset| self.external_point(point + offset))
    }

    /// Find the last occurrence of byte `c` strictly before external
    /// offset `point`. The scan is spliced across the gap.
    ///
    /// # Panics
    ///
    /// Panics if `point > len()`.
    #[must_use]
    pub fn find_prev(&self, point: usize, c: u8) -> Option<usize> {
        let length = self.len();
        assert!(point <= length, "point {point} out of bounds");

        if point == 0 || length == 0 {
            return None;
        }

        let mut point = self.internal_point(point);

        if point > self.gap_end {
            if let Some(offset) = self.text[self.gap_end..point]
                .iter()
                .rposition(|&b| b == c)
            {
                return Some(self.external_point(self.gap_end + offset));
            }
        }

        if point >= self.gap_end {
            point = self.gap_start;
        }

        self.text[..point]
            .iter()
            .rposition(|&b| b == c)
            .map(|offset| self.external_point(offset))
    }

    /// Discard all stored bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.point = 0;
        self.gap_start = 0;
        self.gap_end = self.allocated();
        self.lines = 0;
    }

    /// The whole allocation, gap included. Internal coordinates.
    pub(crate) fn raw(&self) -> &[u8] {
        &self.text
    }

    pub(crate) fn gap_start(&self) -> usize {
        self.gap_start
    }

    pub(crate) fn gap_end(&self) -> usize {
        self.gap_end
    }

    pub(crate) fn internal_point(&self, external_point: usize) -> usize {
        if external_point > self.gap_start {
            external_point + self.gap_size()
        } else {
            external_point
        }
    }

    pub(crate) fn external_point(&self, internal_point: usize) -> usize {
        if internal_point == self.gap_end {
            self.gap_start
        } else if internal_point > self.gap_end {
            internal_point - self.gap_size()
        } else {
            internal_point
        }
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
