use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_A;
use crate::dns::TYPE_AAAA;
use crate::error::FormatError;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A host address (RFC 1035 §3.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct A(pub Ipv4Addr);

impl A {
    pub fn rtype(&self) -> u16 {
        TYPE_A
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        let bytes: [u8; 4] = rdata.try_into().map_err(|_| FormatError::BadRdata {
            rtype: TYPE_A,
            reason: format!("expected 4 bytes, got {}", rdata.len()),
        })?;
        Ok(A(Ipv4Addr::from(bytes)))
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        buf.push_bytes(&self.0.octets());
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.octets());
    }
}

/// An IPv6 host address (RFC 3596).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aaaa(pub Ipv6Addr);

impl Aaaa {
    pub fn rtype(&self) -> u16 {
        TYPE_AAAA
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        let bytes: [u8; 16] = rdata.try_into().map_err(|_| FormatError::BadRdata {
            rtype: TYPE_AAAA,
            reason: format!("expected 16 bytes, got {}", rdata.len()),
        })?;
        Ok(Aaaa(Ipv6Addr::from(bytes)))
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        buf.push_bytes(&self.0.octets());
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.octets());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_roundtrip() {
        let a = A(Ipv4Addr::new(192, 0, 2, 1));
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        a.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        assert_eq!(A::parse(&bytes).unwrap(), a);
    }

    #[test]
    fn aaaa_roundtrip() {
        let addr = Aaaa("2001:db8::1".parse().unwrap());
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        addr.write(&mut buf, &mut offsets);
        assert_eq!(Aaaa::parse(&buf.to_contiguous()).unwrap(), addr);
    }
}
