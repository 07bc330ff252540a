//! A single resource record, and the RRset grouping used by the zone tree.
//!
//! A record's NAME/TYPE/CLASS/TTL are fixed-size fields; RDLENGTH is
//! back-patched after the RDATA is written because compression can make its
//! size depend on what has already been written earlier in the message
//! (spec.md §3 "RRset", §4.E).

use super::buffer::WireBuffer;
use super::name::Name;
use super::offset_table::OffsetTable;
use super::rdata::RData;
use super::{Class, Type};
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: Type,
    pub class: Class,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: Name, class: Class, ttl: u32, rdata: RData) -> Self {
        ResourceRecord {
            name,
            rtype: rdata.rtype(),
            class,
            ttl,
            rdata,
        }
    }

    /// Parse one full resource record (NAME, TYPE, CLASS, TTL, RDLENGTH,
    /// RDATA) starting at `offset`. Returns the record and the offset of
    /// the byte after it.
    pub fn from_wire(message: &[u8], offset: usize) -> Result<(Self, usize), FormatError> {
        let (name, cursor) = Name::from_wire(message, offset)?;
        let read_u16 = |off: usize| -> Result<u16, FormatError> {
            let bytes = message.get(off..off + 2).ok_or(FormatError::Truncated {
                offset: off,
                needed: 2,
                available: message.len().saturating_sub(off),
            })?;
            Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
        };
        let read_u32 = |off: usize| -> Result<u32, FormatError> {
            let bytes = message.get(off..off + 4).ok_or(FormatError::Truncated {
                offset: off,
                needed: 4,
                available: message.len().saturating_sub(off),
            })?;
            Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
        };

        let rtype = read_u16(cursor)?;
        let class = read_u16(cursor + 2)?;
        let ttl = read_u32(cursor + 4)?;
        let rdlength = read_u16(cursor + 8)? as usize;
        let rdata_start = cursor + 10;
        let rdata_end = rdata_start + rdlength;
        if rdata_end > message.len() {
            return Err(FormatError::PastRdata {
                offset: rdata_start,
                field_len: rdlength,
                rdlength_end: message.len(),
            });
        }

        let rdata = RData::parse(rtype, message, rdata_start, rdata_end)?;
        Ok((
            ResourceRecord {
                name,
                rtype,
                class,
                ttl,
                rdata,
            },
            rdata_end,
        ))
    }

    /// Write NAME/TYPE/CLASS/TTL/RDLENGTH/RDATA, back-patching RDLENGTH
    /// once the RDATA is known (its compressed size cannot be predicted
    /// before writing it, since compression depends on the offset table's
    /// state at the moment of the write).
    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        offsets.write_name(buf, &self.name);
        buf.push_u16(self.rtype);
        buf.push_u16(self.class);
        buf.push_u32(self.ttl);
        let rdlen_at = buf.len();
        buf.push_u16(0); // placeholder, back-patched below
        let rdata_start = buf.len();
        self.rdata.write(buf, offsets);
        let rdlen = buf.len() - rdata_start;
        buf.set_u16(rdlen_at, rdlen as u16);
    }

    /// The RFC 4034 §6.3 canonical form used inside RRSIG signed data:
    /// canonical owner, type, class, *original* TTL, canonical RDLENGTH,
    /// canonical RDATA (names lowered, never compressed).
    pub fn write_canonical(&self, out: &mut Vec<u8>, original_ttl: u32) {
        self.name.write_canonical(out);
        out.extend_from_slice(&self.rtype.to_be_bytes());
        out.extend_from_slice(&self.class.to_be_bytes());
        out.extend_from_slice(&original_ttl.to_be_bytes());
        let mut rdata_bytes = Vec::new();
        self.rdata.write_canonical(&mut rdata_bytes);
        out.extend_from_slice(&(rdata_bytes.len() as u16).to_be_bytes());
        out.extend_from_slice(&rdata_bytes);
    }
}

/// All records at one owner sharing CLASS and TYPE (spec.md §3 "RRset").
/// Invariant: every item in `rdata` is of `rtype`; enforced by construction
/// since callers only add through [`RRset::try_insert`] / [`RRset::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRset {
    pub owner: Name,
    pub class: Class,
    pub rtype: Type,
    pub ttl: u32,
    pub rdata: Vec<RData>,
}

impl RRset {
    pub fn new(owner: Name, class: Class, rtype: Type, ttl: u32) -> Self {
        RRset {
            owner,
            class,
            rtype,
            ttl,
            rdata: Vec::new(),
        }
    }

    pub fn singleton(owner: Name, class: Class, ttl: u32, item: RData) -> Self {
        let rtype = item.rtype();
        RRset {
            owner,
            class,
            rtype,
            ttl,
            rdata: vec![item],
        }
    }

    pub fn push(&mut self, item: RData) {
        debug_assert_eq!(item.rtype(), self.rtype);
        self.rdata.push(item);
    }

    pub fn records(&self) -> impl Iterator<Item = ResourceRecord> + '_ {
        self.rdata.iter().map(move |r| ResourceRecord {
            name: self.owner.clone(),
            rtype: self.rtype,
            class: self.class,
            ttl: self.ttl,
            rdata: r.clone(),
        })
    }

    pub fn with_ttl_and_owner(&self, owner: Name, ttl: u32) -> RRset {
        RRset {
            owner,
            class: self.class,
            rtype: self.rtype,
            ttl,
            rdata: self.rdata.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{CLASS_IN, TYPE_A};
    use std::net::Ipv4Addr;

    #[test]
    fn rr_write_then_parse_roundtrip() {
        let rr = ResourceRecord::new(
            Name::from_presentation("www.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(crate::dns::rdata::address::A(Ipv4Addr::new(192, 0, 2, 1))),
        );
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        rr.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        let (parsed, end) = ResourceRecord::from_wire(&bytes, 0).unwrap();
        assert_eq!(end, bytes.len());
        assert_eq!(parsed, rr);
        assert_eq!(parsed.rtype, TYPE_A);
    }

    #[test]
    fn rrset_records_share_owner_and_ttl() {
        let owner = Name::from_presentation("example.com.").unwrap();
        let mut set = RRset::new(owner.clone(), CLASS_IN, TYPE_A, 60);
        set.push(RData::A(crate::dns::rdata::address::A(Ipv4Addr::new(
            192, 0, 2, 1,
        ))));
        set.push(RData::A(crate::dns::rdata::address::A(Ipv4Addr::new(
            192, 0, 2, 2,
        ))));
        let recs: Vec<_> = set.records().collect();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.name == owner && r.ttl == 60));
    }
}
