use crate::dns::buffer::WireBuffer;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_NSEC3PARAM;
use crate::error::FormatError;

/// NSEC3 hashing parameters for a zone (RFC 5155 §4), published at the apex
/// so resolvers know which parameters to recompute a query name's hash with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec3Param {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

impl Nsec3Param {
    pub fn rtype(&self) -> u16 {
        TYPE_NSEC3PARAM
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        if rdata.len() < 5 {
            return Err(FormatError::BadRdata {
                rtype: TYPE_NSEC3PARAM,
                reason: "rdata shorter than 5 bytes".to_string(),
            });
        }
        let salt_len = rdata[4] as usize;
        let salt_end = 5 + salt_len;
        if salt_end > rdata.len() {
            return Err(FormatError::Truncated {
                offset: 5,
                needed: salt_len,
                available: rdata.len().saturating_sub(5),
            });
        }
        Ok(Nsec3Param {
            hash_algorithm: rdata[0],
            flags: rdata[1],
            iterations: u16::from_be_bytes([rdata[2], rdata[3]]),
            salt: rdata[5..salt_end].to_vec(),
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nsec3param_roundtrip() {
        let p = Nsec3Param {
            hash_algorithm: 1,
            flags: 0,
            iterations: 5,
            salt: vec![0x11, 0x22, 0x33],
        };
        let mut out = Vec::new();
        p.write_canonical(&mut out);
        assert_eq!(Nsec3Param::parse(&out).unwrap(), p);
    }
}
