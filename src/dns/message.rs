//! A full DNS message: header, question, and the three resource record
//! sections, with the OPT pseudo-record (if present) split out into a typed
//! [`Edns`] rather than left as an ordinary [`ResourceRecord`] (spec.md §4.E).

use super::buffer::WireBuffer;
use super::edns::Edns;
use super::header::Header;
use super::offset_table::OffsetTable;
use super::question::Question;
use super::rr::ResourceRecord;
use super::TYPE_OPT;
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    pub edns: Option<Edns>,
}

impl Message {
    pub fn from_wire(message: &[u8]) -> Result<Self, FormatError> {
        let header_bytes: [u8; 12] = message
            .get(0..12)
            .ok_or(FormatError::Truncated {
                offset: 0,
                needed: 12,
                available: message.len(),
            })?
            .try_into()
            .unwrap();
        let header = Header::from(header_bytes);
        let mut cursor = 12usize;

        let mut questions = Vec::with_capacity(header.qdcount() as usize);
        for _ in 0..header.qdcount() {
            let (q, next) = Question::from_wire(message, cursor)?;
            questions.push(q);
            cursor = next;
        }

        let mut answers = Vec::with_capacity(header.ancount() as usize);
        for _ in 0..header.ancount() {
            let (rr, next) = ResourceRecord::from_wire(message, cursor)?;
            answers.push(rr);
            cursor = next;
        }

        let mut authorities = Vec::with_capacity(header.nscount() as usize);
        for _ in 0..header.nscount() {
            let (rr, next) = ResourceRecord::from_wire(message, cursor)?;
            authorities.push(rr);
            cursor = next;
        }

        let mut additionals = Vec::with_capacity(header.arcount() as usize);
        let mut edns = None;
        for i in 0..header.arcount() {
            let (rr, next) = ResourceRecord::from_wire(message, cursor)?;
            cursor = next;
            if rr.rtype == TYPE_OPT {
                if edns.is_some() {
                    return Err(FormatError::DuplicateOpt);
                }
                edns = Some(Edns::parse(rr.class, rr.ttl, &opt_rdata(&rr))?);
            } else {
                if rr.rtype == super::TYPE_TSIG && i + 1 != header.arcount() {
                    return Err(FormatError::MisplacedTsig);
                }
                additionals.push(rr);
            }
        }

        // Any further OPT-typed record would have been caught above since
        // every additional-section record is inspected; an OPT record
        // appearing in the answer or authority section is rejected here.
        if answers.iter().any(|r| r.rtype == TYPE_OPT)
            || authorities.iter().any(|r| r.rtype == TYPE_OPT)
        {
            return Err(FormatError::MisplacedOpt);
        }

        Ok(Message {
            header,
            questions,
            answers,
            authorities,
            additionals,
            edns,
        })
    }

    pub fn write(&self) -> WireBuffer {
        let mut header = self.header;
        header.with_qdcount(self.questions.len() as u16);
        header.with_ancount(self.answers.len() as u16);
        header.with_nscount(self.authorities.len() as u16);
        let opt_count = if self.edns.is_some() { 1 } else { 0 };
        header.with_arcount((self.additionals.len() + opt_count) as u16);

        let mut buf = WireBuffer::new();
        buf.push_bytes(&header.to_bytes());
        let mut offsets = OffsetTable::new();

        for q in &self.questions {
            q.write(&mut buf, &mut offsets);
        }
        for rr in &self.answers {
            rr.write(&mut buf, &mut offsets);
        }
        for rr in &self.authorities {
            rr.write(&mut buf, &mut offsets);
        }
        for rr in &self.additionals {
            rr.write(&mut buf, &mut offsets);
        }
        if let Some(edns) = &self.edns {
            // OPT owner is the root name, class carries UDP payload size,
            // TTL carries extended-rcode/version/DO (RFC 6891 §6.1.2).
            buf.push_u8(0);
            buf.push_u16(TYPE_OPT);
            buf.push_u16(edns.udp_payload_size);
            buf.push_u32(edns.ttl_field());
            let rdlen_at = buf.len();
            buf.push_u16(0);
            let rdata_start = buf.len();
            edns.write_rdata(&mut buf);
            let rdlen = buf.len() - rdata_start;
            buf.set_u16(rdlen_at, rdlen as u16);
        }

        buf
    }
}

/// Re-slice an already-parsed OPT record's RDATA back out, since
/// [`ResourceRecord`] stores OPT's RDATA as an opaque `RData::Unknown`.
fn opt_rdata(rr: &ResourceRecord) -> Vec<u8> {
    match &rr.rdata {
        super::rdata::RData::Unknown(_, bytes) => bytes.clone(),
        other => {
            let mut out = Vec::new();
            other.write_canonical(&mut out);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::name::Name;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::RData;
    use crate::dns::{CLASS_IN, TYPE_A};
    use std::net::Ipv4Addr;

    #[test]
    fn roundtrip_simple_query_response() {
        let mut msg = Message::default();
        msg.header.with_id(0x1234).with_qr(true).with_rd(true);
        msg.questions.push(Question::new(
            Name::from_presentation("example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
        ));
        msg.answers.push(ResourceRecord::new(
            Name::from_presentation("example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
        ));

        let bytes = msg.write().to_contiguous();
        let parsed = Message::from_wire(&bytes).unwrap();
        assert_eq!(parsed.header.id(), 0x1234);
        assert_eq!(parsed.questions, msg.questions);
        assert_eq!(parsed.answers, msg.answers);
    }

    #[test]
    fn roundtrip_with_edns_opt() {
        let mut msg = Message::default();
        msg.header.with_id(7);
        msg.questions.push(Question::new(
            Name::from_presentation("example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
        ));
        let mut edns = Edns::default();
        edns.dnssec_ok = true;
        edns.udp_payload_size = 4096;
        msg.edns = Some(edns.clone());

        let bytes = msg.write().to_contiguous();
        let parsed = Message::from_wire(&bytes).unwrap();
        assert_eq!(parsed.edns, Some(edns));
        assert!(parsed.additionals.is_empty());
    }

    #[test]
    fn duplicate_opt_is_rejected() {
        let mut msg = Message::default();
        msg.header.with_arcount(2);
        let mut buf = WireBuffer::new();
        buf.push_bytes(&msg.header.to_bytes());
        let mut offsets = OffsetTable::new();
        for _ in 0..2 {
            buf.push_u8(0); // root owner
            buf.push_u16(TYPE_OPT);
            buf.push_u16(4096);
            buf.push_u32(0);
            buf.push_u16(0);
        }
        let _ = &mut offsets; // no names to compress here
        let bytes = buf.to_contiguous();
        let err = Message::from_wire(&bytes).unwrap_err();
        assert_eq!(err, FormatError::DuplicateOpt);
    }
}
