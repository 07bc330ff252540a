use super::algo::DnsSecAlgorithm;
use super::key_tag::KeyTag;
use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_RRSIG;
use crate::error::FormatError;

/// A signature over an RRset (RFC 4034 §3). The Signer's Name field MUST
/// NOT be compressed on the wire (RFC 4034 §3.1), so `write` bypasses the
/// shared offset table and emits it as a plain uncompressed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rrsig {
    pub type_covered: u16,
    pub algorithm: DnsSecAlgorithm,
    /// Number of labels in the original owner name, excluding the root
    /// label and any wildcard label (RFC 4034 §3.1.3).
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: KeyTag,
    pub signer_name: Name,
    pub signature: Vec<u8>,
}

impl Rrsig {
    pub fn rtype(&self) -> u16 {
        TYPE_RRSIG
    }

    pub fn parse(message: &[u8], rdata_start: usize, rdata_end: usize) -> Result<Self, FormatError> {
        let rdata = message.get(rdata_start..rdata_end).ok_or(FormatError::Truncated {
            offset: rdata_start,
            needed: rdata_end.saturating_sub(rdata_start),
            available: message.len().saturating_sub(rdata_start),
        })?;
        if rdata.len() < 18 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_RRSIG,
                reason: "rdata shorter than 18 bytes".to_string(),
            });
        }
        let type_covered = u16::from_be_bytes([rdata[0], rdata[1]]);
        let algorithm = rdata[2];
        let labels = rdata[3];
        let original_ttl = u32::from_be_bytes(rdata[4..8].try_into().unwrap());
        let expiration = u32::from_be_bytes(rdata[8..12].try_into().unwrap());
        let inception = u32::from_be_bytes(rdata[12..16].try_into().unwrap());
        let key_tag = u16::from_be_bytes([rdata[16], rdata[17]]);

        let (signer_name, signer_end) = Name::from_wire(message, rdata_start + 18)?;
        if signer_end > rdata_end {
            return Err(FormatError::PastRdata {
                offset: signer_end,
                field_len: signer_end - (rdata_start + 18),
                rdlength_end: rdata_end,
            });
        }
        let signature = message[signer_end..rdata_end].to_vec();

        Ok(Rrsig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    /// The signed-data form (RFC 4034 §3.1.8.1) and the on-wire form are
    /// identical for RRSIG: the signer's name is never compressed either way.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.type_covered.to_be_bytes());
        out.push(self.algorithm);
        out.push(self.labels);
        out.extend_from_slice(&self.original_ttl.to_be_bytes());
        out.extend_from_slice(&self.expiration.to_be_bytes());
        out.extend_from_slice(&self.inception.to_be_bytes());
        out.extend_from_slice(&self.key_tag.to_be_bytes());
        self.signer_name.write_canonical(out);
        out.extend_from_slice(&self.signature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::offset_table::OffsetTable;

    #[test]
    fn rrsig_roundtrip() {
        let rrsig = Rrsig {
            type_covered: 1,
            algorithm: 8,
            labels: 2,
            original_ttl: 3600,
            expiration: 1_893_456_000,
            inception: 1_861_920_000,
            key_tag: 54321,
            signer_name: Name::from_presentation("example.com.").unwrap(),
            signature: vec![0xAB; 64],
        };
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        rrsig.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        let parsed = Rrsig::parse(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed, rrsig);
    }
}
