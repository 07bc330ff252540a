use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_WKS;
use crate::error::FormatError;
use std::net::Ipv4Addr;

/// Well known service description (RFC 1035 §3.4.2): address, IP protocol
/// number, and a bitmap of the ports in service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wks {
    pub address: Ipv4Addr,
    pub protocol: u8,
    pub bitmap: Vec<u8>,
}

impl Wks {
    pub fn rtype(&self) -> u16 {
        TYPE_WKS
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        if rdata.len() < 5 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_WKS,
                reason: "WKS rdata shorter than 5 bytes".to_string(),
            });
        }
        let address = Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]);
        let protocol = rdata[4];
        let bitmap = rdata[5..].to_vec();
        Ok(Wks {
            address,
            protocol,
            bitmap,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        buf.push_bytes(&self.address.octets());
        buf.push_u8(self.protocol);
        buf.push_bytes(&self.bitmap);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.address.octets());
        out.push(self.protocol);
        out.extend_from_slice(&self.bitmap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wks_roundtrip() {
        let wks = Wks {
            address: Ipv4Addr::new(10, 0, 0, 1),
            protocol: 6,
            bitmap: vec![0b1000_0010],
        };
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        wks.write(&mut buf, &mut offsets);
        assert_eq!(Wks::parse(&buf.to_contiguous()).unwrap(), wks);
    }
}
