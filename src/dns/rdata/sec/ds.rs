use super::algo::DnsSecAlgorithm;
use super::key_tag::KeyTag;
use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_DS;
use crate::error::FormatError;

/// A delegation signer record (RFC 4034 §5): a digest of a child zone's
/// DNSKEY, published by the parent. The digest is computed over the
/// canonical owner name concatenated with the DNSKEY RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds {
    pub key_tag: KeyTag,
    pub algorithm: DnsSecAlgorithm,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl Ds {
    pub fn rtype(&self) -> u16 {
        TYPE_DS
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        if rdata.len() < 4 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_DS,
                reason: "rdata shorter than 4 bytes".to_string(),
            });
        }
        Ok(Ds {
            key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
            algorithm: rdata[2],
            digest_type: rdata[3],
            digest: rdata[4..].to_vec(),
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.key_tag.to_be_bytes());
        out.push(self.algorithm);
        out.push(self.digest_type);
        out.extend_from_slice(&self.digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ds_roundtrip() {
        let ds = Ds {
            key_tag: 12345,
            algorithm: 8,
            digest_type: 2,
            digest: vec![0xAA; 32],
        };
        let mut out = Vec::new();
        ds.write_canonical(&mut out);
        assert_eq!(Ds::parse(&out).unwrap(), ds);
    }
}
