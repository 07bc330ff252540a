use crate::dns::bitmap::TypeBitmap;
use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_NSEC3;
use crate::error::FormatError;

pub const FLAG_OPT_OUT: u8 = 0x01;

/// Hashed authenticated denial of existence (RFC 5155 §3). The owner name
/// of an NSEC3 record is the base32hex encoding of the hashed owner name,
/// not a name derived from this RDATA, so it lives on the [`crate::dns::rr::ResourceRecord`]
/// like any other record and is not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed_owner: Vec<u8>,
    pub types: TypeBitmap,
}

impl Nsec3 {
    pub fn rtype(&self) -> u16 {
        TYPE_NSEC3
    }

    pub fn opt_out(&self) -> bool {
        self.flags & FLAG_OPT_OUT != 0
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        if rdata.len() < 5 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_NSEC3,
                reason: "rdata shorter than 5 bytes".to_string(),
            });
        }
        let hash_algorithm = rdata[0];
        let flags = rdata[1];
        let iterations = u16::from_be_bytes([rdata[2], rdata[3]]);
        let salt_len = rdata[4] as usize;
        let salt_start = 5;
        let salt_end = salt_start + salt_len;
        let hash_len = *rdata.get(salt_end).ok_or(FormatError::Truncated {
            offset: salt_end,
            needed: 1,
            available: 0,
        })? as usize;
        let hash_start = salt_end + 1;
        let hash_end = hash_start + hash_len;
        if hash_end > rdata.len() {
            return Err(FormatError::Truncated {
                offset: hash_start,
                needed: hash_len,
                available: rdata.len().saturating_sub(hash_start),
            });
        }
        let types = TypeBitmap::parse(&rdata[hash_end..])?;
        Ok(Nsec3 {
            hash_algorithm,
            flags,
            iterations,
            salt: rdata[salt_start..salt_end].to_vec(),
            next_hashed_owner: rdata[hash_start..hash_end].to_vec(),
            types,
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(self.hash_algorithm);
        out.push(self.flags);
        out.extend_from_slice(&self.iterations.to_be_bytes());
        out.push(self.salt.len() as u8);
        out.extend_from_slice(&self.salt);
        out.push(self.next_hashed_owner.len() as u8);
        out.extend_from_slice(&self.next_hashed_owner);
        self.types.write(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::TYPE_A;

    #[test]
    fn nsec3_roundtrip() {
        let nsec3 = Nsec3 {
            hash_algorithm: 1,
            flags: FLAG_OPT_OUT,
            iterations: 10,
            salt: vec![0xAA, 0xBB],
            next_hashed_owner: vec![1; 20],
            types: TypeBitmap::from_types([TYPE_A]),
        };
        let mut out = Vec::new();
        nsec3.write_canonical(&mut out);
        let parsed = Nsec3::parse(&out).unwrap();
        assert_eq!(parsed, nsec3);
        assert!(parsed.opt_out());
    }
}
