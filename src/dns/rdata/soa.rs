use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_SOA;
use crate::error::FormatError;

/// Marks the start of a zone of authority (RFC 1035 §3.3.13).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soa {
    pub mname: Name,
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl Soa {
    pub fn rtype(&self) -> u16 {
        TYPE_SOA
    }

    pub fn parse(message: &[u8], rdata_start: usize) -> Result<Self, FormatError> {
        let (mname, cursor) = Name::from_wire(message, rdata_start)?;
        let (rname, cursor) = Name::from_wire(message, cursor)?;
        let read_u32 = |off: usize| -> Result<u32, FormatError> {
            let bytes = message.get(off..off + 4).ok_or(FormatError::Truncated {
                offset: off,
                needed: 4,
                available: message.len().saturating_sub(off),
            })?;
            Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
        };
        let serial = read_u32(cursor)?;
        let refresh = read_u32(cursor + 4)?;
        let retry = read_u32(cursor + 8)?;
        let expire = read_u32(cursor + 12)?;
        let minimum = read_u32(cursor + 16)?;
        Ok(Soa {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        offsets.write_name(buf, &self.mname);
        offsets.write_name(buf, &self.rname);
        buf.push_u32(self.serial);
        buf.push_u32(self.refresh);
        buf.push_u32(self.retry);
        buf.push_u32(self.expire);
        buf.push_u32(self.minimum);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.mname.write_canonical(out);
        self.rname.write_canonical(out);
        out.extend_from_slice(&self.serial.to_be_bytes());
        out.extend_from_slice(&self.refresh.to_be_bytes());
        out.extend_from_slice(&self.retry.to_be_bytes());
        out.extend_from_slice(&self.expire.to_be_bytes());
        out.extend_from_slice(&self.minimum.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soa_roundtrip() {
        let soa = Soa {
            mname: Name::from_presentation("ns1.example.com.").unwrap(),
            rname: Name::from_presentation("hostmaster.example.com.").unwrap(),
            serial: 2024010100,
            refresh: 3600,
            retry: 600,
            expire: 604800,
            minimum: 300,
        };
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        soa.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        assert_eq!(Soa::parse(&bytes, 0).unwrap(), soa);
    }
}
