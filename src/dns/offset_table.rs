//! Maps names already serialized into the current message to the offset of
//! their first occurrence, so later occurrences can be compressed into a
//! two-byte pointer per RFC 1035 §4.1.4.

use super::buffer::WireBuffer;
use super::name::Name;
use std::collections::HashMap;

const MAX_POINTER_OFFSET: usize = 0x3FFF;

#[derive(Debug, Default)]
pub struct OffsetTable {
    offsets: HashMap<Name, u16>,
}

impl OffsetTable {
    pub fn new() -> Self {
        OffsetTable {
            offsets: HashMap::new(),
        }
    }

    /// Write `name` into `buf`, compressing against any already-recorded
    /// ancestor suffix. Walks from the full name down to (but excluding)
    /// the root, recording every newly-written suffix's offset so later
    /// names can point back into this one.
    pub fn write_name(&mut self, buf: &mut WireBuffer, name: &Name) {
        let mut suffix = name.clone();
        loop {
            if suffix.is_root() {
                buf.push_u8(0);
                return;
            }
            let canonical_suffix = suffix.to_canonical();
            if let Some(&offset) = self.offsets.get(&canonical_suffix) {
                buf.push_u16(0xC000 | offset);
                return;
            }
            let here = buf.len();
            if here <= MAX_POINTER_OFFSET {
                self.offsets.insert(canonical_suffix, here as u16);
            }
            let label = suffix.labels()[0].clone();
            buf.push_u8(label.len() as u8);
            buf.push_bytes(&label);
            suffix.pop_subdomain();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_suffix_compresses() {
        let mut buf = WireBuffer::new();
        let mut table = OffsetTable::new();
        let a = Name::from_presentation("a.b.example.com.").unwrap();
        let c = Name::from_presentation("c.b.example.com.").unwrap();
        table.write_name(&mut buf, &a);
        let second_start = buf.len();
        table.write_name(&mut buf, &c);
        let bytes = buf.to_contiguous();
        // "c" label then a two-byte pointer back to "b.example.com"'s offset.
        assert_eq!(bytes[second_start], 1);
        assert_eq!(bytes[second_start + 1], b'c');
        let pointer = u16::from_be_bytes([bytes[second_start + 2], bytes[second_start + 3]]);
        assert_eq!(pointer & 0xC000, 0xC000);
        let target = (pointer & 0x3FFF) as usize;
        assert!(target < second_start);
        // That target must be where "b.example.com" first began: right
        // after "a"'s length+label in the first name.
        assert_eq!(target, 2);
    }

    #[test]
    fn no_pointer_is_forward_reference() {
        let mut buf = WireBuffer::new();
        let mut table = OffsetTable::new();
        let n = Name::from_presentation("example.com.").unwrap();
        table.write_name(&mut buf, &n);
        let bytes = buf.to_contiguous();
        assert_eq!(*bytes.last().unwrap(), 0);
    }
}
