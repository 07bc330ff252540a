use super::buffer::WireBuffer;
use super::name::Name;
use super::offset_table::OffsetTable;
use crate::error::FormatError;

/**
The question section is used to carry the "question" in most queries. Each
entry is QNAME (a [`Name`]), QTYPE, QCLASS.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub qname: Name,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(qname: Name, qtype: u16, qclass: u16) -> Self {
        Question {
            qname,
            qtype,
            qclass,
        }
    }

    pub fn from_wire(message: &[u8], offset: usize) -> Result<(Self, usize), FormatError> {
        let (qname, mut cursor) = Name::from_wire(message, offset)?;
        let qtype = read_u16(message, cursor)?;
        cursor += 2;
        let qclass = read_u16(message, cursor)?;
        cursor += 2;
        Ok((
            Question {
                qname,
                qtype,
                qclass,
            },
            cursor,
        ))
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        offsets.write_name(buf, &self.qname);
        buf.push_u16(self.qtype);
        buf.push_u16(self.qclass);
    }
}

fn read_u16(message: &[u8], offset: usize) -> Result<u16, FormatError> {
    let bytes = message
        .get(offset..offset + 2)
        .ok_or(FormatError::Truncated {
            offset,
            needed: 2,
            available: message.len().saturating_sub(offset),
        })?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{CLASS_IN, TYPE_A};

    #[test]
    fn write_then_read_back() {
        let q = Question::new(
            Name::from_presentation("www.example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
        );
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        q.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        let (parsed, end) = Question::from_wire(&bytes, 0).unwrap();
        assert_eq!(end, bytes.len());
        assert_eq!(parsed, q);
    }
}
