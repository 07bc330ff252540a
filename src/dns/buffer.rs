//! Append-only segmented byte buffer used to assemble outgoing DNS messages.
//!
//! Bytes are pushed into fixed-capacity segments chained together so growth
//! is amortized O(1) and a scatter write can hand the transport the
//! underlying segments without copying them into one contiguous slice.

use std::cmp::Ordering;
use std::io::{self, Write};

/// Default segment size per RFC-sized DNS messages: most responses fit in
/// one or two segments.
pub const DEFAULT_SEGMENT_SIZE: usize = 512;

#[derive(Debug, Clone)]
pub struct WireBuffer {
    segments: Vec<Vec<u8>>,
    segment_size: usize,
    len: usize,
}

impl Default for WireBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl WireBuffer {
    pub fn new() -> Self {
        Self::with_segment_size(DEFAULT_SEGMENT_SIZE)
    }

    pub fn with_segment_size(segment_size: usize) -> Self {
        WireBuffer {
            segments: vec![Vec::with_capacity(segment_size)],
            segment_size,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn last_segment_mut(&mut self) -> &mut Vec<u8> {
        if self
            .segments
            .last()
            .map(|s| s.len() >= self.segment_size)
            .unwrap_or(true)
        {
            self.segments.push(Vec::with_capacity(self.segment_size));
        }
        self.segments.last_mut().expect("segment just pushed")
    }

    pub fn push_u8(&mut self, byte: u8) {
        self.last_segment_mut().push(byte);
        self.len += 1;
    }

    pub fn push_u16(&mut self, value: u16) {
        self.push_bytes(&value.to_be_bytes());
    }

    pub fn push_u32(&mut self, value: u32) {
        self.push_bytes(&value.to_be_bytes());
    }

    pub fn push_u64(&mut self, value: u64) {
        self.push_bytes(&value.to_be_bytes());
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_u8(b);
        }
    }

    /// Random access read, used by callers that want to re-inspect bytes
    /// already written (e.g. computing a checksum over a prefix).
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        let mut remaining = index;
        for seg in &self.segments {
            if remaining < seg.len() {
                return Some(seg[remaining]);
            }
            remaining -= seg.len();
        }
        None
    }

    /// Overwrite a single already-written byte, used for back-patching
    /// fields whose value (e.g. RDLENGTH) is only known after writing the
    /// data that follows them.
    pub fn set(&mut self, index: usize, byte: u8) {
        assert!(index < self.len, "set() index out of bounds");
        let mut remaining = index;
        for seg in &mut self.segments {
            if remaining < seg.len() {
                seg[remaining] = byte;
                return;
            }
            remaining -= seg.len();
        }
        unreachable!("index within len must land in some segment");
    }

    /// Back-patch a big-endian u16 at `index` (used for RDLENGTH).
    pub fn set_u16(&mut self, index: usize, value: u16) {
        let bytes = value.to_be_bytes();
        self.set(index, bytes[0]);
        self.set(index + 1, bytes[1]);
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.segments.iter().flat_map(|s| s.iter().copied())
    }

    /// Flatten into one contiguous buffer, e.g. for a UDP datagram which
    /// must be handed to the kernel as a single buffer.
    pub fn to_contiguous(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for seg in &self.segments {
            out.extend_from_slice(seg);
        }
        out
    }

    /// Write every segment to `w` via repeated `write_vectored` calls,
    /// letting the OS scatter the segments in one syscall where supported
    /// (e.g. `TcpStream`) without requiring a contiguous copy first.
    pub fn write_scattered<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut segment = 0usize;
        let mut offset = 0usize;
        let mut total_remaining = self.len;

        while total_remaining > 0 {
            let slices: Vec<io::IoSlice> = self.segments[segment..]
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i == 0 {
                        io::IoSlice::new(&s[offset..])
                    } else {
                        io::IoSlice::new(s)
                    }
                })
                .collect();
            let mut written = w.write_vectored(&slices)?;
            if written == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "write_vectored wrote 0 bytes",
                ));
            }
            total_remaining -= written;
            while written > 0 {
                let remaining_in_segment = self.segments[segment].len() - offset;
                if written < remaining_in_segment {
                    offset += written;
                    written = 0;
                } else {
                    written -= remaining_in_segment;
                    segment += 1;
                    offset = 0;
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for WireBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
impl Eq for WireBuffer {}

impl PartialOrd for WireBuffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WireBuffer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_read_back() {
        let mut buf = WireBuffer::new();
        buf.push_u8(1);
        buf.push_u16(0x0203);
        buf.push_u32(0x0405_0607);
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.to_contiguous(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn backpatch_u16() {
        let mut buf = WireBuffer::new();
        buf.push_u16(0);
        buf.push_bytes(b"hello");
        buf.set_u16(0, 5);
        assert_eq!(buf.to_contiguous(), vec![0, 5, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn segments_chain_past_segment_size() {
        let mut buf = WireBuffer::with_segment_size(4);
        for i in 0..10u8 {
            buf.push_u8(i);
        }
        assert_eq!(buf.segments.len(), 3);
        assert_eq!(buf.to_contiguous(), (0..10u8).collect::<Vec<_>>());
    }

    #[test]
    fn lexicographic_ordering() {
        let mut a = WireBuffer::new();
        a.push_bytes(&[1, 2, 3]);
        let mut b = WireBuffer::new();
        b.push_bytes(&[1, 2, 4]);
        assert!(a < b);
    }
}
