use crate::dns::bitmap::TypeBitmap;
use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::TYPE_NSEC;
use crate::error::FormatError;

/// Authenticated denial of existence (RFC 4034 §4): links to the next owner
/// name in canonical order and lists the types present at this owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec {
    pub next_domain_name: Name,
    pub types: TypeBitmap,
}

impl Nsec {
    pub fn rtype(&self) -> u16 {
        TYPE_NSEC
    }

    pub fn parse(message: &[u8], rdata_start: usize, rdata_end: usize) -> Result<Self, FormatError> {
        let (next_domain_name, cursor) = Name::from_wire(message, rdata_start)?;
        if cursor > rdata_end {
            return Err(FormatError::PastRdata {
                offset: cursor,
                field_len: cursor - rdata_start,
                rdlength_end: rdata_end,
            });
        }
        let types = TypeBitmap::parse(&message[cursor..rdata_end])?;
        Ok(Nsec {
            next_domain_name,
            types,
        })
    }

    /// The next-domain-name field is never compressed (RFC 4034 §4.1.1, by
    /// analogy with RRSIG's Signer's Name), so `write` and `write_canonical`
    /// coincide.
    pub fn write(&self, buf: &mut WireBuffer, _offsets: &mut OffsetTable) {
        let mut bytes = Vec::new();
        self.write_canonical(&mut bytes);
        buf.push_bytes(&bytes);
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.next_domain_name.write_canonical(out);
        self.types.write(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::TYPE_A;

    #[test]
    fn nsec_roundtrip() {
        let nsec = Nsec {
            next_domain_name: Name::from_presentation("b.example.com.").unwrap(),
            types: TypeBitmap::from_types([TYPE_A, TYPE_NSEC]),
        };
        let mut out = Vec::new();
        nsec.write_canonical(&mut out);
        let parsed = Nsec::parse(&out, 0, out.len()).unwrap();
        assert_eq!(parsed, nsec);
    }
}
