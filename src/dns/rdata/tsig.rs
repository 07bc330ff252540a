use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_TSIG;
use crate::error::FormatError;

/// Transaction signature (RFC 2845). `time_signed` is a 48-bit quantity on
/// the wire, split across a 32-bit high part and a 16-bit low part; this
/// struct keeps it reassembled as a `u64` for convenience and reconstructs
/// the split form in `write_canonical`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tsig {
    pub algorithm_name: Name,
    pub time_signed: u64,
    pub fudge: u16,
    pub mac: Vec<u8>,
    pub original_id: u16,
    pub error: u16,
    pub other_data: Vec<u8>,
}

impl Tsig {
    pub fn rtype(&self) -> u16 {
        TYPE_TSIG
    }

    pub fn parse(message: &[u8], rdata_start: usize, rdata_end: usize) -> Result<Self, FormatError> {
        let (algorithm_name, cursor) = Name::from_wire(message, rdata_start)?;

        // Every field of a TSIG RR's RDATA must land within RDLENGTH (spec.md
        // §4.E), not merely within the message — bound each read against
        // `rdata_end` rather than `message.len()`.
        let take = |start: usize, len: usize| -> Result<&[u8], FormatError> {
            let end = start + len;
            if end > rdata_end {
                return Err(FormatError::PastRdata {
                    offset: end,
                    field_len: len,
                    rdlength_end: rdata_end,
                });
            }
            message.get(start..end).ok_or(FormatError::Truncated {
                offset: start,
                needed: len,
                available: message.len().saturating_sub(start),
            })
        };

        let time_hi = u32::from_be_bytes(take(cursor, 4)?.try_into().unwrap());
        let time_lo = u16::from_be_bytes(take(cursor + 4, 2)?.try_into().unwrap());
        let time_signed = ((time_hi as u64) << 16) | (time_lo as u64);
        let fudge = u16::from_be_bytes(take(cursor + 6, 2)?.try_into().unwrap());
        let mac_len = u16::from_be_bytes(take(cursor + 8, 2)?.try_into().unwrap()) as usize;

        let mac_start = cursor + 10;
        let mac_end = mac_start + mac_len;
        let mac = take(mac_start, mac_len)?.to_vec();

        let original_id = u16::from_be_bytes(take(mac_end, 2)?.try_into().unwrap());
        let error = u16::from_be_bytes(take(mac_end + 2, 2)?.try_into().unwrap());
        let other_len = u16::from_be_bytes(take(mac_end + 4, 2)?.try_into().unwrap()) as usize;

        let other_start = mac_end + 6;
        let other_data = take(other_start, other_len)?.to_vec();

        Ok(Tsig {
            algorithm_name,
            time_signed,
            fudge,
            mac,
            original_id,
            error,
            other_data,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    /// The algorithm name is part of the MAC preimage in canonical (lower
    /// case, uncompressed) form; this method always emits it that way.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.algorithm_name.write_canonical(out);
        out.extend_from_slice(&((self.time_signed >> 16) as u32).to_be_bytes());
        out.extend_from_slice(&((self.time_signed & 0xFFFF) as u16).to_be_bytes());
        out.extend_from_slice(&self.fudge.to_be_bytes());
        out.extend_from_slice(&(self.mac.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.mac);
        out.extend_from_slice(&self.original_id.to_be_bytes());
        out.extend_from_slice(&self.error.to_be_bytes());
        out.extend_from_slice(&(self.other_data.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.other_data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsig_roundtrip_reassembles_48_bit_time() {
        let tsig = Tsig {
            algorithm_name: Name::from_presentation("hmac-sha256.").unwrap(),
            time_signed: 0x0000_1234_5678,
            fudge: 300,
            mac: vec![0xAB; 32],
            original_id: 42,
            error: 0,
            other_data: vec![],
        };
        let mut out = Vec::new();
        tsig.write_canonical(&mut out);
        let parsed = Tsig::parse(&out, 0, out.len()).unwrap();
        assert_eq!(parsed, tsig);
    }

    #[test]
    fn field_overrunning_rdlength_is_rejected_even_inside_the_packet() {
        let tsig = Tsig {
            algorithm_name: Name::from_presentation("hmac-sha256.").unwrap(),
            time_signed: 0x0000_1234_5678,
            fudge: 300,
            mac: vec![0xAB; 32],
            original_id: 42,
            error: 0,
            other_data: vec![1, 2, 3],
        };
        let mut out = Vec::new();
        tsig.write_canonical(&mut out);
        // Pad extra bytes onto the message so a bug checking against
        // `message.len()` instead of RDLENGTH would miss the overrun.
        out.extend_from_slice(&[0u8; 16]);
        // Claim an RDLENGTH that ends before `other_data` was fully written.
        let rdata_end = out.len() - 16 - tsig.other_data.len();
        let err = Tsig::parse(&out, 0, rdata_end).unwrap_err();
        assert!(matches!(err, FormatError::PastRdata { .. }));
    }
}
