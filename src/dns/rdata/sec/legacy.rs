//! Legacy KEY/SIG/NXT records (RFC 2535), superseded by DNSKEY/RRSIG/NSEC
//! but still seen in the wild and kept here for wire compatibility. Each
//! shares its successor's RDATA shape, so parsing/serializing is delegated.

use super::dnskey::Dnskey;
use super::rrsig::Rrsig;
use crate::dns::bitmap::TypeBitmap;
use crate::dns::buffer::WireBuffer;
use crate::dns::name::Name;
use crate::dns::offset_table::OffsetTable;
use crate::dns::{TYPE_KEY, TYPE_NXT, TYPE_SIG};
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub Dnskey);

impl Key {
    pub fn rtype(&self) -> u16 {
        TYPE_KEY
    }

    pub fn parse(rdata: &[u8]) -> Result<Self, FormatError> {
        Dnskey::parse(rdata).map(Key)
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        self.0.write(buf, offsets)
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.0.write_canonical(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sig(pub Rrsig);

impl Sig {
    pub fn rtype(&self) -> u16 {
        TYPE_SIG
    }

    pub fn parse(message: &[u8], rdata_start: usize, rdata_end: usize) -> Result<Self, FormatError> {
        Rrsig::parse(message, rdata_start, rdata_end).map(Sig)
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        self.0.write(buf, offsets)
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        self.0.write_canonical(out)
    }
}

/// RFC 2535 §5.2: next domain name plus a type bitmap, limited by the
/// original spec to the 0-127 type-code window. Reusing the windowed
/// [`TypeBitmap`] is a strict superset of that encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nxt {
    pub next_domain_name: Name,
    pub types: TypeBitmap,
}

impl Nxt {
    pub fn rtype(&self) -> u16 {
        TYPE_NXT
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
        Ok(Nxt {
            next_domain_name,
            types,
        })
    }

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

    #[test]
    fn nxt_roundtrip() {
        let nxt = Nxt {
            next_domain_name: Name::from_presentation("b.example.com.").unwrap(),
            types: TypeBitmap::from_types([1, 2]),
        };
        let mut out = Vec::new();
        nxt.write_canonical(&mut out);
        let parsed = Nxt::parse(&out, 0, out.len()).unwrap();
        assert_eq!(parsed, nxt);
    }
}
