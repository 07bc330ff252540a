use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_NAPTR;
use crate::error::FormatError;

/// Naming Authority Pointer (RFC 3403).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naptr {
    pub order: u16,
    pub preference: u16,
    pub flags: Vec<u8>,
    pub services: Vec<u8>,
    pub regexp: Vec<u8>,
    pub replacement: Name,
}

fn parse_char_string(message: &[u8], offset: usize) -> Result<(Vec<u8>, usize), FormatError> {
    let len = *message.get(offset).ok_or(FormatError::Truncated {
        offset,
        needed: 1,
        available: 0,
    })? as usize;
    let start = offset + 1;
    let end = start + len;
    if end > message.len() {
        return Err(FormatError::Truncated {
            offset: start,
            needed: len,
            available: message.len().saturating_sub(start),
        });
    }
    Ok((message[start..end].to_vec(), end))
}

fn write_char_string(buf: &mut WireBuffer, s: &[u8]) {
    buf.push_u8(s.len() as u8);
    buf.push_bytes(s);
}

impl Naptr {
    pub fn rtype(&self) -> u16 {
        TYPE_NAPTR
    }

    pub fn parse(message: &[u8], rdata_start: usize) -> Result<Self, FormatError> {
        let read_u16 = |off: usize| -> Result<u16, FormatError> {
            let bytes = message.get(off..off + 2).ok_or(FormatError::Truncated {
                offset: off,
                needed: 2,
                available: message.len().saturating_sub(off),
            })?;
            Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
        };
        let order = read_u16(rdata_start)?;
        let preference = read_u16(rdata_start + 2)?;
        let (flags, cursor) = parse_char_string(message, rdata_start + 4)?;
        let (services, cursor) = parse_char_string(message, cursor)?;
        let (regexp, cursor) = parse_char_string(message, cursor)?;
        let (replacement, _) = Name::from_wire(message, cursor)?;
        Ok(Naptr {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        buf.push_u16(self.order);
        buf.push_u16(self.preference);
        write_char_string(buf, &self.flags);
        write_char_string(buf, &self.services);
        write_char_string(buf, &self.regexp);
        // NAPTR's replacement name never compresses in practice but
        // nothing forbids it; reuse the shared offset table like other
        // embedded names.
        offsets.write_name(buf, &self.replacement);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.order.to_be_bytes());
        out.extend_from_slice(&self.preference.to_be_bytes());
        for s in [&self.flags, &self.services, &self.regexp] {
            out.push(s.len() as u8);
            out.extend_from_slice(s);
        }
        self.replacement.write_canonical(out);
    }
}
