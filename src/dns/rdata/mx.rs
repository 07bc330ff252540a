use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_MX;
use crate::error::FormatError;

/// Mail exchange (RFC 1035 §3.3.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mx {
    pub preference: u16,
    pub exchange: Name,
}

impl Mx {
    pub fn rtype(&self) -> u16 {
        TYPE_MX
    }

    pub fn parse(message: &[u8], rdata_start: usize) -> Result<Self, FormatError> {
        let preference = message
            .get(rdata_start..rdata_start + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .ok_or(FormatError::Truncated {
                offset: rdata_start,
                needed: 2,
                available: message.len().saturating_sub(rdata_start),
            })?;
        let (exchange, _) = Name::from_wire(message, rdata_start + 2)?;
        Ok(Mx {
            preference,
            exchange,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        buf.push_u16(self.preference);
        offsets.write_name(buf, &self.exchange);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.preference.to_be_bytes());
        self.exchange.write_canonical(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mx_roundtrip() {
        let mx = Mx {
            preference: 10,
            exchange: Name::from_presentation("mail.example.com.").unwrap(),
        };
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        mx.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        assert_eq!(Mx::parse(&bytes, 0).unwrap(), mx);
    }
}
