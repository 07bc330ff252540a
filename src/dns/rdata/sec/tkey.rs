use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_TKEY;
use crate::error::FormatError;

/// Transaction key negotiation (RFC 2930). Only the RDATA shape is
/// implemented here: parsing and serializing a TKEY record. The key
/// exchange protocol that drives this record's use belongs to the
/// transport layer and is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tkey {
    pub algorithm: Name,
    pub inception: u32,
    pub expiration: u32,
    pub mode: u16,
    pub error: u16,
    pub key_data: Vec<u8>,
    pub other_data: Vec<u8>,
}

impl Tkey {
    pub fn rtype(&self) -> u16 {
        TYPE_TKEY
    }

    pub fn parse(message: &[u8], rdata_start: usize, rdata_end: usize) -> Result<Self, FormatError> {
        let (algorithm, cursor) = Name::from_wire(message, rdata_start)?;
        let fixed = message.get(cursor..cursor + 10).ok_or(FormatError::Truncated {
            offset: cursor,
            needed: 10,
            available: message.len().saturating_sub(cursor),
        })?;
        let inception = u32::from_be_bytes(fixed[0..4].try_into().unwrap());
        let expiration = u32::from_be_bytes(fixed[4..8].try_into().unwrap());
        let mode = u16::from_be_bytes([fixed[8], fixed[9]]);
        let cursor = cursor + 10;

        let error = u16::from_be_bytes(
            message
                .get(cursor..cursor + 2)
                .ok_or(FormatError::Truncated {
                    offset: cursor,
                    needed: 2,
                    available: message.len().saturating_sub(cursor),
                })?
                .try_into()
                .unwrap(),
        );
        let cursor = cursor + 2;

        let key_len = u16::from_be_bytes(
            message
                .get(cursor..cursor + 2)
                .ok_or(FormatError::Truncated {
                    offset: cursor,
                    needed: 2,
                    available: message.len().saturating_sub(cursor),
                })?
                .try_into()
                .unwrap(),
        ) as usize;
        let cursor = cursor + 2;
        let key_end = cursor + key_len;
        let key_data = message
            .get(cursor..key_end)
            .ok_or(FormatError::Truncated {
                offset: cursor,
                needed: key_len,
                available: message.len().saturating_sub(cursor),
            })?
            .to_vec();

        let cursor = key_end;
        let other_len = u16::from_be_bytes(
            message
                .get(cursor..cursor + 2)
                .ok_or(FormatError::Truncated {
                    offset: cursor,
                    needed: 2,
                    available: message.len().saturating_sub(cursor),
                })?
                .try_into()
                .unwrap(),
        ) as usize;
        let cursor = cursor + 2;
        let other_end = cursor + other_len;
        if other_end > rdata_end {
            return Err(FormatError::PastRdata {
                offset: other_end,
                field_len: other_len,
                rdlength_end: rdata_end,
            });
        }
        let other_data = message[cursor..other_end].to_vec();

        Ok(Tkey {
            algorithm,
            inception,
            expiration,
            mode,
            error,
            key_data,
            other_data,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.algorithm.write_canonical(out);
        out.extend_from_slice(&self.inception.to_be_bytes());
        out.extend_from_slice(&self.expiration.to_be_bytes());
        out.extend_from_slice(&self.mode.to_be_bytes());
        out.extend_from_slice(&self.error.to_be_bytes());
        out.extend_from_slice(&(self.key_data.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.key_data);
        out.extend_from_slice(&(self.other_data.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.other_data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tkey_roundtrip() {
        let tkey = Tkey {
            algorithm: Name::from_presentation("hmac-sha256.").unwrap(),
            inception: 1_700_000_000,
            expiration: 1_700_003_600,
            mode: 3,
            error: 0,
            key_data: vec![1, 2, 3, 4],
            other_data: vec![],
        };
        let mut out = Vec::new();
        tkey.write_canonical(&mut out);
        let parsed = Tkey::parse(&out, 0, out.len()).unwrap();
        assert_eq!(parsed, tkey);
    }
}
