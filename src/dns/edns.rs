//! EDNS(0) OPT pseudo-record (RFC 6891). The OPT RR is not a normal RRset
//! member: its CLASS field carries the requestor's UDP payload size and its
//! TTL field is repurposed as extended-rcode/version/DO/reserved. The
//! message codec extracts it from the additional section into this
//! structure rather than leaving it as an ordinary [`crate::dns::rr::ResourceRecord`].

use crate::dns::buffer::WireBuffer;
use crate::error::FormatError;

pub const OPT_NSID: u16 = 3;
pub const OPT_CLIENT_SUBNET: u16 = 8;
pub const OPT_COOKIE: u16 = 10;
pub const OPT_TCP_KEEPALIVE: u16 = 11;
pub const OPT_KEY_TAG: u16 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edns {
    pub udp_payload_size: u16,
    pub extended_rcode: u8,
    pub version: u8,
    pub dnssec_ok: bool,
    pub options: Vec<EdnsOption>,
}

impl Default for Edns {
    fn default() -> Self {
        Edns {
            udp_payload_size: 1232,
            extended_rcode: 0,
            version: 0,
            dnssec_ok: false,
            options: Vec::new(),
        }
    }
}

impl Edns {
    /// Combine the low 4 rcode bits carried in the message header with this
    /// OPT record's extended (high 8) bits into a full 12-bit RCODE.
    pub fn full_rcode(&self, header_rcode_low: u8) -> u16 {
        ((self.extended_rcode as u16) << 4) | (header_rcode_low as u16 & 0xF)
    }

    pub fn set_full_rcode(&mut self, full: u16) -> u8 {
        self.extended_rcode = (full >> 4) as u8;
        (full & 0xF) as u8
    }

    /// Parse the TTL field (extended-rcode | version | DO | reserved) and
    /// the class field (UDP payload size), plus the option TLVs in RDATA.
    pub fn parse(udp_payload_size: u16, ttl: u32, rdata: &[u8]) -> Result<Self, FormatError> {
        let extended_rcode = ((ttl >> 24) & 0xFF) as u8;
        let version = ((ttl >> 16) & 0xFF) as u8;
        let dnssec_ok = (ttl & 0x8000) != 0;

        let mut options = Vec::new();
        let mut i = 0usize;
        while i < rdata.len() {
            let code = u16::from_be_bytes(rdata.get(i..i + 2).map(|b| [b[0], b[1]]).ok_or(
                FormatError::Truncated {
                    offset: i,
                    needed: 2,
                    available: rdata.len().saturating_sub(i),
                },
            )?);
            let len = u16::from_be_bytes(rdata.get(i + 2..i + 4).map(|b| [b[0], b[1]]).ok_or(
                FormatError::Truncated {
                    offset: i + 2,
                    needed: 2,
                    available: rdata.len().saturating_sub(i + 2),
                },
            )?) as usize;
            let start = i + 4;
            let end = start + len;
            if end > rdata.len() {
                return Err(FormatError::Truncated {
                    offset: start,
                    needed: len,
                    available: rdata.len().saturating_sub(start),
                });
            }
            options.push(EdnsOption {
                code,
                data: rdata[start..end].to_vec(),
            });
            i = end;
        }

        Ok(Edns {
            udp_payload_size,
            extended_rcode,
            version,
            dnssec_ok,
            options,
        })
    }

    /// TTL field value for this OPT record, to be written in place of a
    /// normal RRset TTL when serializing.
    pub fn ttl_field(&self) -> u32 {
        let mut ttl = (self.extended_rcode as u32) << 24 | (self.version as u32) << 16;
        if self.dnssec_ok {
            ttl |= 0x8000;
        }
        ttl
    }

    pub fn write_rdata(&self, buf: &mut WireBuffer) {
        for opt in &self.options {
            buf.push_u16(opt.code);
            buf.push_u16(opt.data.len() as u16);
            buf.push_bytes(&opt.data);
        }
    }

    /// Resolver-side clamp applied to the advertised payload size before
    /// echoing it back (spec.md §4.G: "payload size clamped to 1280").
    pub fn clamp_payload_size(&mut self) {
        self.udp_payload_size = self.udp_payload_size.min(1280);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_field_roundtrip() {
        let edns = Edns {
            udp_payload_size: 4096,
            extended_rcode: 1,
            version: 0,
            dnssec_ok: true,
            options: vec![EdnsOption {
                code: OPT_NSID,
                data: vec![],
            }],
        };
        let ttl = edns.ttl_field();
        let mut rdata_buf = WireBuffer::new();
        edns.write_rdata(&mut rdata_buf);
        let parsed = Edns::parse(4096, ttl, &rdata_buf.to_contiguous()).unwrap();
        assert_eq!(parsed, edns);
    }

    #[test]
    fn do_bit_roundtrip() {
        let mut edns = Edns::default();
        edns.dnssec_ok = true;
        let ttl = edns.ttl_field();
        assert!(ttl & 0x8000 != 0);
        let parsed = Edns::parse(edns.udp_payload_size, ttl, &[]).unwrap();
        assert!(parsed.dnssec_ok);
    }
}
