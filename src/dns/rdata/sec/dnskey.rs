use super::algo::DnsSecAlgorithm;
use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_DNSKEY;
use crate::error::FormatError;

pub const FLAG_ZONE_KEY: u16 = 0x0100;
pub const FLAG_SECURE_ENTRY_POINT: u16 = 0x0001;

/// A public key (RFC 4034 §2). `pub_key` is the raw wire-form public key:
/// RFC 3110 exponent+modulus encoding for RSA, raw X‖Y point bytes (no
/// leading 0x04) for ECDSA. The teacher's original decode/encode pushed
/// this field through base64 on top of the raw bytes, which is wrong —
/// DNSKEY RDATA carries the public key material directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: DnsSecAlgorithm,
    pub pub_key: Vec<u8>,
}

impl Dnskey {
    pub fn rtype(&self) -> u16 {
        TYPE_DNSKEY
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & FLAG_ZONE_KEY != 0
    }

    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & FLAG_SECURE_ENTRY_POINT != 0
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        if rdata.len() < 4 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_DNSKEY,
                reason: "rdata shorter than 4 bytes".to_string(),
            });
        }
        Ok(Dnskey {
            flags: u16::from_be_bytes([rdata[0], rdata[1]]),
            protocol: rdata[2],
            algorithm: rdata[3],
            pub_key: rdata[4..].to_vec(),
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    /// DNSKEY RDATA never carries a compressible name, so the canonical
    /// and presentation wire forms are identical.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.push(self.protocol);
        out.push(self.algorithm);
        out.extend_from_slice(&self.pub_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dnskey_roundtrip_raw_bytes() {
        let key = Dnskey {
            flags: 257,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![1, 2, 3, 4, 5],
        };
        let mut out = Vec::new();
        key.write_canonical(&mut out);
        let parsed = Dnskey::parse(&out).unwrap();
        assert_eq!(parsed, key);
        // Never base64 -- the raw bytes appear verbatim in the RDATA tail.
        assert_eq!(&out[4..], &key.pub_key[..]);
    }

    #[test]
    fn zone_key_and_sep_flags() {
        let ksk = Dnskey {
            flags: 257,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![],
        };
        assert!(ksk.is_zone_key());
        assert!(ksk.is_secure_entry_point());
        let zsk = Dnskey {
            flags: 256,
            ..ksk.clone()
        };
        assert!(zsk.is_zone_key());
        assert!(!zsk.is_secure_entry_point());
    }
}
