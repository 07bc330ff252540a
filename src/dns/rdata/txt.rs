use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_TXT;
use crate::error::FormatError;

/// One or more length-prefixed character-strings (RFC 1035 §3.3.14).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Txt {
    pub strings: Vec<Vec<u8>>,
}

impl Txt {
    pub fn rtype(&self) -> u16 {
        TYPE_TXT
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        let mut strings = Vec::new();
        let mut consumed = 0usize;
        let mut i = 0;
        while i < rdata.len() {
            let len = rdata[i] as usize;
            let start = i + 1;
            let end = start + len;
            if end > rdata.len() {
                return Err(FormatError::TxtLengthMismatch {
                    expected: rdata.len(),
                    actual: consumed + 1 + len,
                });
            }
            strings.push(rdata[start..end].to_vec());
            consumed += 1 + len;
            i = end;
        }
        if consumed != rdata.len() {
            return Err(FormatError::TxtLengthMismatch {
                expected: rdata.len(),
                actual: consumed,
            });
        }
        Ok(Txt { strings })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        for s in &self.strings {
            buf.push_u8(s.len() as u8);
            buf.push_bytes(s);
        }
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        for s in &self.strings {
            out.push(s.len() as u8);
            out.extend_from_slice(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_roundtrip() {
        let txt = Txt {
            strings: vec![b"v=spf1".to_vec(), b"include:example.com".to_vec()],
        };
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        txt.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        assert_eq!(Txt::parse(&bytes).unwrap(), txt);
    }

    #[test]
    fn txt_length_mismatch_rejected() {
        let bytes = [5u8, b'h', b'i']; // claims 5 bytes, only 2 present
        assert!(Txt::parse(&bytes).is_err());
    }
}
