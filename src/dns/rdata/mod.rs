//! One variant per record type behind a single tagged union, per spec.md
//! §4.D. Parsing dispatches on the 16-bit type code; each variant exposes
//! `rtype`, `write` (presentation form, participates in name compression
//! where applicable) and `write_canonical` (RFC 4034 canonical form: names
//! lowered, never compressed). Unknown types round-trip as opaque bytes.

pub mod address;
pub mod mx;
pub mod name_based;
pub mod naptr;
pub mod sec;
pub mod soa;
pub mod tsig;
pub mod txt;
pub mod wks;

use self::address::{Aaaa, A};
use self::mx::Mx;
use self::name_based::{Cname, Dname, Ns, Ptr};
use self::naptr::Naptr;
use self::sec::dnskey::Dnskey;
use self::sec::ds::Ds;
use self::sec::legacy::{Key, Nxt, Sig};
use self::sec::nsec::Nsec;
use self::sec::nsec3::Nsec3;
use self::sec::nsec3param::Nsec3Param;
use self::sec::rrsig::Rrsig;
use self::sec::tkey::Tkey;
use self::soa::Soa;
use self::tsig::Tsig;
use self::txt::Txt;
use self::wks::Wks;

use super::buffer::WireBuffer;
use super::offset_table::OffsetTable;
use super::{
    TYPE_A, TYPE_AAAA, TYPE_CNAME, TYPE_DNAME, TYPE_DNSKEY, TYPE_DS, TYPE_KEY, TYPE_MX, TYPE_NAPTR,
    TYPE_NS, TYPE_NSEC, TYPE_NSEC3, TYPE_NSEC3PARAM, TYPE_NXT, TYPE_PTR, TYPE_RRSIG, TYPE_SIG,
    TYPE_SOA, TYPE_TKEY, TYPE_TSIG, TYPE_TXT, TYPE_WKS,
};
use crate::error::FormatError;

/// A tagged union over every RDATA shape the codec round-trips. Types that
/// are not implemented (or simply unrecognized) are kept as opaque bytes
/// rather than rejected, per spec.md §4.D / §9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(A),
    Aaaa(Aaaa),
    Ns(Ns),
    Cname(Cname),
    Dname(Dname),
    Ptr(Ptr),
    Mx(Mx),
    Soa(Soa),
    Txt(Txt),
    Naptr(Naptr),
    Wks(Wks),
    Tsig(Tsig),
    Tkey(Tkey),
    Rrsig(Rrsig),
    Dnskey(Dnskey),
    Ds(Ds),
    Nsec(Nsec),
    Nsec3(Nsec3),
    Nsec3Param(Nsec3Param),
    Key(Key),
    Sig(Sig),
    Nxt(Nxt),
    /// Unparsed or unrecognized type: verbatim wire RDATA bytes under the
    /// `u16` type code that introduced it.
    Unknown(u16, Vec<u8>),
}

impl RData {
    pub fn rtype(&self) -> u16 {
        match self {
            RData::A(r) => r.rtype(),
            RData::Aaaa(r) => r.rtype(),
            RData::Ns(r) => r.rtype(),
            RData::Cname(r) => r.rtype(),
            RData::Dname(r) => r.rtype(),
            RData::Ptr(r) => r.rtype(),
            RData::Mx(r) => r.rtype(),
            RData::Soa(r) => r.rtype(),
            RData::Txt(r) => r.rtype(),
            RData::Naptr(r) => r.rtype(),
            RData::Wks(r) => r.rtype(),
            RData::Tsig(r) => r.rtype(),
            RData::Tkey(r) => r.rtype(),
            RData::Rrsig(r) => r.rtype(),
            RData::Dnskey(r) => r.rtype(),
            RData::Ds(r) => r.rtype(),
            RData::Nsec(r) => r.rtype(),
            RData::Nsec3(r) => r.rtype(),
            RData::Nsec3Param(r) => r.rtype(),
            RData::Key(r) => r.rtype(),
            RData::Sig(r) => r.rtype(),
            RData::Nxt(r) => r.rtype(),
            RData::Unknown(t, _) => *t,
        }
    }

    /// Parse the RDATA of a record whose type, message, and RDLENGTH-bounded
    /// span are known. `message` is the whole message so name-bearing
    /// variants can follow compression pointers; `rdata_start`/`rdata_end`
    /// bound the field within it.
    pub fn parse(
        rtype: u16,
        message: &[u8],
        rdata_start: usize,
        rdata_end: usize,
    ) -> Result<Self, FormatError> {
        if rdata_end < rdata_start || rdata_end > message.len() {
            return Err(FormatError::Truncated {
                offset: rdata_start,
                needed: rdata_end.saturating_sub(rdata_start),
                available: message.len().saturating_sub(rdata_start),
            });
        }
        let rdata = &message[rdata_start..rdata_end];
        Ok(match rtype {
            TYPE_A => RData::A(A::parse(rdata)?),
            TYPE_AAAA => RData::Aaaa(Aaaa::parse(rdata)?),
            TYPE_NS => RData::Ns(Ns::parse(message, rdata_start)?),
            TYPE_CNAME => RData::Cname(Cname::parse(message, rdata_start)?),
            TYPE_DNAME => RData::Dname(Dname::parse(message, rdata_start)?),
            TYPE_PTR => RData::Ptr(Ptr::parse(message, rdata_start)?),
            TYPE_MX => RData::Mx(Mx::parse(message, rdata_start)?),
            TYPE_SOA => RData::Soa(Soa::parse(message, rdata_start)?),
            TYPE_TXT => RData::Txt(Txt::parse(rdata)?),
            TYPE_NAPTR => RData::Naptr(Naptr::parse(message, rdata_start)?),
            TYPE_WKS => RData::Wks(Wks::parse(rdata)?),
            TYPE_TSIG => RData::Tsig(Tsig::parse(message, rdata_start, rdata_end)?),
            TYPE_TKEY => RData::Tkey(Tkey::parse(message, rdata_start, rdata_end)?),
            TYPE_RRSIG => RData::Rrsig(Rrsig::parse(message, rdata_start, rdata_end)?),
            TYPE_DNSKEY => RData::Dnskey(Dnskey::parse(rdata)?),
            TYPE_DS => RData::Ds(Ds::parse(rdata)?),
            TYPE_NSEC => RData::Nsec(Nsec::parse(message, rdata_start, rdata_end)?),
            TYPE_NSEC3 => RData::Nsec3(Nsec3::parse(rdata)?),
            TYPE_NSEC3PARAM => RData::Nsec3Param(Nsec3Param::parse(rdata)?),
            TYPE_KEY => RData::Key(Key::parse(rdata)?),
            TYPE_SIG => RData::Sig(Sig::parse(message, rdata_start, rdata_end)?),
            TYPE_NXT => RData::Nxt(Nxt::parse(message, rdata_start, rdata_end)?),
            other => RData::Unknown(other, rdata.to_vec()),
        })
    }

    pub fn write(&self, buf: &mut WireBuffer, offsets: &mut OffsetTable) {
        match self {
            RData::A(r) => r.write(buf, offsets),
            RData::Aaaa(r) => r.write(buf, offsets),
            RData::Ns(r) => r.write(buf, offsets),
            RData::Cname(r) => r.write(buf, offsets),
            RData::Dname(r) => r.write(buf, offsets),
            RData::Ptr(r) => r.write(buf, offsets),
            RData::Mx(r) => r.write(buf, offsets),
            RData::Soa(r) => r.write(buf, offsets),
            RData::Txt(r) => r.write(buf, offsets),
            RData::Naptr(r) => r.write(buf, offsets),
            RData::Wks(r) => r.write(buf, offsets),
            RData::Tsig(r) => r.write(buf, offsets),
            RData::Tkey(r) => r.write(buf, offsets),
            RData::Rrsig(r) => r.write(buf, offsets),
            RData::Dnskey(r) => r.write(buf, offsets),
            RData::Ds(r) => r.write(buf, offsets),
            RData::Nsec(r) => r.write(buf, offsets),
            RData::Nsec3(r) => r.write(buf, offsets),
            RData::Nsec3Param(r) => r.write(buf, offsets),
            RData::Key(r) => r.write(buf, offsets),
            RData::Sig(r) => r.write(buf, offsets),
            RData::Nxt(r) => r.write(buf, offsets),
            RData::Unknown(_, bytes) => buf.push_bytes(bytes),
        }
    }

    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            RData::A(r) => r.write_canonical(out),
            RData::Aaaa(r) => r.write_canonical(out),
            RData::Ns(r) => r.write_canonical(out),
            RData::Cname(r) => r.write_canonical(out),
            RData::Dname(r) => r.write_canonical(out),
            RData::Ptr(r) => r.write_canonical(out),
            RData::Mx(r) => r.write_canonical(out),
            RData::Soa(r) => r.write_canonical(out),
            RData::Txt(r) => r.write_canonical(out),
            RData::Naptr(r) => r.write_canonical(out),
            RData::Wks(r) => r.write_canonical(out),
            RData::Tsig(r) => r.write_canonical(out),
            RData::Tkey(r) => r.write_canonical(out),
            RData::Rrsig(r) => r.write_canonical(out),
            RData::Dnskey(r) => r.write_canonical(out),
            RData::Ds(r) => r.write_canonical(out),
            RData::Nsec(r) => r.write_canonical(out),
            RData::Nsec3(r) => r.write_canonical(out),
            RData::Nsec3Param(r) => r.write_canonical(out),
            RData::Key(r) => r.write_canonical(out),
            RData::Sig(r) => r.write_canonical(out),
            RData::Nxt(r) => r.write_canonical(out),
            RData::Unknown(_, bytes) => out.extend_from_slice(bytes),
        }
    }

    /// Presentation-form wire size, used to size RDLENGTH before the offset
    /// table is known to have compressed anything (an upper bound; actual
    /// written size may be smaller once compression applies).
    pub fn uncompressed_size(&self) -> usize {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::buffer::WireBuffer;
    use crate::dns::name::Name;
    use crate::dns::offset_table::OffsetTable;
    use std::net::Ipv4Addr;

    #[test]
    fn dispatch_roundtrip_a() {
        let rdata = RData::A(A(Ipv4Addr::new(192, 0, 2, 1)));
        let mut buf = WireBuffer::new();
        let mut offsets = OffsetTable::new();
        rdata.write(&mut buf, &mut offsets);
        let bytes = buf.to_contiguous();
        let parsed = RData::parse(TYPE_A, &bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed, rdata);
    }

    #[test]
    fn dispatch_roundtrip_ns_with_message_prefix() {
        // Put some junk before the record so the name parser must use the
        // real message start, not assume offset 0 is the message start.
        let mut msg = vec![0xAA; 20];
        let rdata_start = msg.len();
        let mut offsets = OffsetTable::new();
        let mut buf = WireBuffer::new();
        let ns = Ns(Name::from_presentation("ns1.example.com.").unwrap());
        ns.write(&mut buf, &mut offsets);
        msg.extend_from_slice(&buf.to_contiguous());
        let rdata_end = msg.len();
        let parsed = RData::parse(TYPE_NS, &msg, rdata_start, rdata_end).unwrap();
        assert_eq!(parsed, RData::Ns(ns));
    }

    #[test]
    fn unknown_type_roundtrips_opaque() {
        let bytes = vec![1, 2, 3, 4, 5];
        let parsed = RData::parse(999, &bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed, RData::Unknown(999, bytes));
    }
}
