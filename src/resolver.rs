//! Query resolution against a single zone (spec.md §4.G). Grounded on
//! `original_source/nameserverimp.cpp`'s `handleQuery` dispatch, adapted to
//! the ordered 7-step algorithm the spec settles on; the denial-of-existence
//! lookup is injected as either [`crate::zone::NsecDb`] or
//! [`crate::zone::Nsec3Db`] so the same resolution code serves both.

use crate::dns::message::Message;
use crate::dns::name::Name;
use crate::dns::question::Question;
use crate::dns::rr::{ResourceRecord, RRset};
use crate::dns::{
    Type, RCODE_NOERROR, RCODE_NOTIMP, RCODE_NXDOMAIN, RCODE_REFUSED, TYPE_ANY, TYPE_AXFR,
    TYPE_CNAME, TYPE_DS, TYPE_IXFR, TYPE_NS, TYPE_NSEC, TYPE_RRSIG,
};
use crate::signer::Signer;
use crate::zone::{Nsec3Db, NsecDb, Zone};

/// The denial-of-existence source a resolver is wired to. A zone is signed
/// with exactly one of these, never both (spec.md §4.H/§4.I).
pub enum Denial<'a> {
    Nsec(&'a NsecDb),
    Nsec3(&'a Nsec3Db),
}

pub struct Resolver<'a> {
    zone: &'a Zone,
    denial: Option<Denial<'a>>,
    signer: Option<&'a Signer>,
}

impl<'a> Resolver<'a> {
    pub fn new(zone: &'a Zone, denial: Option<Denial<'a>>, signer: Option<&'a Signer>) -> Self {
        Resolver { zone, denial, signer }
    }

    /// Resolve one query message into a full response, per spec.md §4.G.
    /// Truncation against the client's advertised payload size is a
    /// wire-layer concern handled by the caller after serialization.
    pub fn resolve(&self, query: &Message, now: u64) -> Message {
        let mut response = Message::default();
        response.header.with_id(query.header.id());
        response.header.with_qr(true);
        response.header.with_opcode(query.header.opcode());
        response.header.with_rd(query.header.rd());
        response.header.with_cd(query.header.cd());
        response.questions = query.questions.clone();

        if let Some(edns) = &query.edns {
            let mut echoed = edns.clone();
            echoed.clamp_payload_size();
            response.edns = Some(echoed);
        }

        if query.header.opcode() != 0 {
            response.header.with_rcode(RCODE_NOTIMP);
            return response;
        }

        let question = match query.questions.first() {
            Some(q) => q.clone(),
            None => {
                response.header.with_rcode(RCODE_NOTIMP);
                return response;
            }
        };

        if question.qtype == TYPE_AXFR || question.qtype == TYPE_IXFR {
            response.header.with_rcode(RCODE_NOTIMP);
            return response;
        }

        if !self.zone.is_in_bailiwick(&question.qname) {
            response.header.with_rcode(RCODE_REFUSED);
            return response;
        }

        let dnssec_ok = query.edns.as_ref().is_some_and(|e| e.dnssec_ok);
        let mut ctx = ResolveCtx {
            resolver: self,
            question: &question,
            dnssec_ok,
            now,
            answer: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
            aa: true,
            rcode: RCODE_NOERROR,
        };
        ctx.run();

        response.header.with_aa(ctx.aa);
        response.header.with_rcode(ctx.rcode);
        response.answers = ctx.answer;
        response.authorities = ctx.authority;
        response.additionals = ctx.additional;
        response
    }

    fn sign(&self, rrset: &RRset, now: u64) -> Option<RRset> {
        self.signer.map(|s| s.sign_rrset(rrset, now))
    }

    /// Like [`Resolver::sign`], but for an RRset synthesized from a
    /// wildcard: `wildcard_labels` pins the RRSIG Labels field to the
    /// original (unexpanded) wildcard owner's label count rather than
    /// letting it be recomputed from the synthesized owner.
    fn sign_wildcard(&self, rrset: &RRset, wildcard_labels: u8, now: u64) -> Option<RRset> {
        self.signer
            .map(|s| s.sign_rrset_with_labels(rrset, Some(wildcard_labels), now))
    }

    fn denial_for(&self, name: &Name, ttl: u32) -> Option<RRset> {
        match &self.denial {
            Some(Denial::Nsec(db)) => db.find(name, ttl).ok(),
            Some(Denial::Nsec3(db)) => db.find(name, ttl).ok(),
            None => None,
        }
    }

    fn apex_wildcard_denial(&self, ttl: u32) -> Option<RRset> {
        let mut wildcard = self.zone.apex().clone();
        wildcard.push_subdomain(b"*".to_vec());
        self.denial_for(&wildcard, ttl)
    }
}

/// Scratch state threaded through one resolution; the sections it
/// accumulates become the response's answer/authority/additional once the
/// algorithm terminates.
struct ResolveCtx<'a, 'b> {
    resolver: &'b Resolver<'a>,
    question: &'b Question,
    dnssec_ok: bool,
    now: u64,
    answer: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
    aa: bool,
    rcode: u8,
}

impl<'a, 'b> ResolveCtx<'a, 'b> {
    fn zone(&self) -> &'a Zone {
        self.resolver.zone
    }

    fn soa_ttl(&self) -> u32 {
        self.zone().soa().map(|s| s.ttl).unwrap_or(0)
    }

    fn push_answer(&mut self, rrset: &RRset) {
        for r in rrset.records() {
            self.answer.push(r);
        }
        if self.dnssec_ok {
            if let Some(sig) = self.resolver.sign(rrset, self.now) {
                for r in sig.records() {
                    self.answer.push(r);
                }
            }
        }
    }

    /// Like [`ResolveCtx::push_answer`], but for an RRset synthesized from a
    /// wildcard: signs with the original wildcard owner's label count
    /// (spec.md §4.G step 6; RFC 4034 §3.1.3) rather than the synthesized
    /// owner's.
    fn push_wildcard_answer(&mut self, rrset: &RRset, wildcard_labels: u8) {
        for r in rrset.records() {
            self.answer.push(r);
        }
        if self.dnssec_ok {
            if let Some(sig) = self.resolver.sign_wildcard(rrset, wildcard_labels, self.now) {
                for r in sig.records() {
                    self.answer.push(r);
                }
            }
        }
    }

    fn push_authority(&mut self, rrset: &RRset) {
        for r in rrset.records() {
            self.authority.push(r);
        }
        if self.dnssec_ok {
            if let Some(sig) = self.resolver.sign(rrset, self.now) {
                for r in sig.records() {
                    self.authority.push(r);
                }
            }
        }
    }

    fn push_authority_denial(&mut self, name: &Name) {
        if !self.dnssec_ok {
            return;
        }
        if let Some(denial) = self.resolver.denial_for(name, self.soa_ttl()) {
            self.push_authority(&denial);
        }
    }

    fn push_soa_authority(&mut self) {
        if let Some(soa) = self.zone().soa().cloned() {
            self.push_authority(&soa);
        }
    }

    fn glue_for(&mut self, ns: &RRset) {
        for r in ns.records() {
            if let crate::dns::rdata::RData::Ns(ns_name) = &r.rdata {
                let target = ns_name.name();
                if self.zone().is_in_bailiwick(target) {
                    if let Some(node) = self.zone().node(target) {
                        for rtype in [crate::dns::TYPE_A, crate::dns::TYPE_AAAA] {
                            if let Some(glue) = node.get(rtype) {
                                for rr in glue.records() {
                                    self.additional.push(rr);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn run(&mut self) {
        let qname = self.question.qname.clone();
        let qtype = self.question.qtype;
        let ttl = self.soa_ttl();

        // 1. qtype = RRSIG.
        if qtype == TYPE_RRSIG {
            match self.zone().node(&qname) {
                Some(node) if !node.is_empty_non_terminal() => {
                    let covered: Vec<RRset> = node
                        .iter()
                        .filter(|(t, _)| **t != TYPE_RRSIG)
                        .filter_map(|(_, rrset)| self.resolver.sign(rrset, self.now))
                        .collect();
                    if covered.is_empty() {
                        self.push_soa_authority();
                        self.push_authority_denial(&qname);
                    } else {
                        for rrset in &covered {
                            for r in rrset.records() {
                                self.answer.push(r);
                            }
                        }
                    }
                }
                Some(_) => {
                    self.push_soa_authority();
                    self.push_authority_denial(&qname);
                }
                None => {
                    self.rcode = RCODE_NXDOMAIN;
                    self.push_soa_authority();
                    self.push_authority_denial(&qname);
                }
            }
            return;
        }

        // 2. qtype = NSEC.
        if qtype == TYPE_NSEC {
            if let Some(rrset) = self.resolver.denial_for(&qname, ttl) {
                self.push_answer(&rrset);
            } else {
                self.push_soa_authority();
            }
            return;
        }

        // 3. DNAME redirection.
        for ancestor in self.zone().ancestors(&qname) {
            if ancestor == *self.zone().apex() {
                break;
            }
            let node = match self.zone().node(&ancestor) {
                Some(n) => n,
                None => continue,
            };
            if let Some(dname) = node.dname() {
                self.push_answer(dname);
                if let crate::dns::rdata::RData::Dname(d) = &dname.rdata[0] {
                    if let Some(relative) = qname.relative_to(&ancestor) {
                        let target = relative.concat(d.canonical_name());
                        let cname_set = RRset::singleton(
                            qname.clone(),
                            dname.class,
                            dname.ttl,
                            crate::dns::rdata::RData::Cname(crate::dns::rdata::name_based::Cname(
                                target.clone(),
                            )),
                        );
                        self.push_answer(&cname_set);
                        if self.zone().is_in_bailiwick(&target) {
                            if let Some(target_node) = self.zone().node(&target) {
                                if let Some(rrset) = target_node.get(qtype) {
                                    self.push_answer(&rrset.with_ttl_and_owner(target.clone(), rrset.ttl));
                                }
                            }
                        }
                    }
                }
                return;
            }
        }

        // 4. Referral.
        if qname != *self.zone().apex() {
            for ancestor in self.zone().ancestors(&qname) {
                if ancestor == *self.zone().apex() {
                    break;
                }
                let node = match self.zone().node(&ancestor) {
                    Some(n) => n,
                    None => continue,
                };
                if let Some(ns) = node.get(TYPE_NS) {
                    self.aa = false;
                    self.authority.extend(ns.records());
                    self.glue_for(ns);
                    if let Some(ds) = node.get(TYPE_DS) {
                        self.authority.extend(ds.records());
                        if self.dnssec_ok {
                            if let Some(sig) = self.resolver.sign(ds, self.now) {
                                self.authority.extend(sig.records());
                            }
                        }
                    } else if self.dnssec_ok {
                        self.push_authority_denial(&ancestor);
                    }
                    return;
                }
            }
        }

        // 5. Exact node.
        if let Some(node) = self.zone().node(&qname) {
            if !node.is_empty_non_terminal() {
                if qtype == TYPE_ANY {
                    for (_, rrset) in node.iter() {
                        self.push_answer(rrset);
                    }
                    return;
                }
                if let Some(cname) = node.cname() {
                    if qtype != TYPE_CNAME {
                        self.push_answer(cname);
                        if let crate::dns::rdata::RData::Cname(c) = &cname.rdata[0] {
                            let target = c.name().clone();
                            if self.zone().is_in_bailiwick(&target) {
                                if let Some(target_node) = self.zone().node(&target) {
                                    if let Some(rrset) = target_node.get(qtype) {
                                        self.push_answer(&rrset.with_ttl_and_owner(target, rrset.ttl));
                                    }
                                }
                            }
                        }
                        return;
                    }
                }
                if let Some(rrset) = node.get(qtype) {
                    self.push_answer(rrset);
                    return;
                }
                // NODATA: qname exists literally, so the single NSEC/NSEC3
                // proof over qname already covers it — there is no
                // wildcard to additionally deny (RFC 4035 §3.1.3).
                self.push_soa_authority();
                self.push_authority_denial(&qname);
                return;
            }
            // Empty non-terminal: NODATA.
            self.push_soa_authority();
            self.push_authority_denial(&qname);
            return;
        }

        // 6. Wildcard synthesis.
        if let Some((_encloser, wildcard_node)) = self.zone().closest_wildcard_ancestor(&qname) {
            if let Some(rrset) = wildcard_node.get(qtype) {
                let wildcard_labels = crate::signer::labels_field(&rrset.owner);
                let synthesized = rrset.with_ttl_and_owner(qname.clone(), rrset.ttl);
                self.push_wildcard_answer(&synthesized, wildcard_labels);
                if self.dnssec_ok {
                    // Proves qname itself has no literal owner, which is
                    // why the wildcard had to synthesize this answer
                    // (simplified relative to RFC 5155's next-closer-name
                    // indirection — decided in DESIGN.md).
                    self.push_authority_denial(&qname);
                }
                return;
            }
            self.push_soa_authority();
            self.push_authority_denial(&qname);
            return;
        }

        // 7. NXDOMAIN.
        self.rcode = RCODE_NXDOMAIN;
        self.push_soa_authority();
        if self.dnssec_ok {
            self.push_authority_denial(&qname);
            if let Some(wildcard_denial) = self.resolver.apex_wildcard_denial(ttl) {
                self.push_authority(&wildcard_denial);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::name::Name;
    use crate::dns::question::Question;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::soa::Soa;
    use crate::dns::rdata::RData;
    use crate::dns::{CLASS_IN, RCODE_NOERROR, TYPE_A};
    use std::net::Ipv4Addr;

    fn sample_zone() -> Zone {
        let apex = Name::from_presentation("example.com.").unwrap();
        let mut zone = Zone::new(apex.clone(), CLASS_IN);
        zone.add(RRset::singleton(
            apex.clone(),
            CLASS_IN,
            3600,
            RData::Soa(Soa {
                mname: Name::from_presentation("ns1.example.com.").unwrap(),
                rname: Name::from_presentation("hostmaster.example.com.").unwrap(),
                serial: 1,
                refresh: 3600,
                retry: 600,
                expire: 604800,
                minimum: 60,
            }),
        ))
        .unwrap();
        zone.add(RRset::singleton(
            apex.clone(),
            CLASS_IN,
            3600,
            RData::Ns(crate::dns::rdata::name_based::Ns(
                Name::from_presentation("ns1.example.com.").unwrap(),
            )),
        ))
        .unwrap();
        zone.add(RRset::singleton(
            Name::from_presentation("www.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
        ))
        .unwrap();
        zone.verify().unwrap();
        zone
    }

    fn query(qname: &str, qtype: Type) -> Message {
        let mut msg = Message::default();
        msg.header.with_rd(true);
        msg.questions.push(Question::new(
            Name::from_presentation(qname).unwrap(),
            qtype,
            CLASS_IN,
        ));
        msg
    }

    #[test]
    fn answers_an_exact_match() {
        let zone = sample_zone();
        let resolver = Resolver::new(&zone, None, None);
        let response = resolver.resolve(&query("www.example.com.", TYPE_A), 0);
        assert_eq!(response.header.rcode(), RCODE_NOERROR);
        assert!(response.header.aa());
        assert_eq!(response.answers.len(), 1);
    }

    #[test]
    fn nodata_carries_soa_in_authority() {
        let zone = sample_zone();
        let resolver = Resolver::new(&zone, None, None);
        let response = resolver.resolve(&query("www.example.com.", crate::dns::TYPE_MX), 0);
        assert_eq!(response.header.rcode(), RCODE_NOERROR);
        assert!(response.answers.is_empty());
        assert_eq!(response.authorities.len(), 1);
    }

    #[test]
    fn nxdomain_carries_soa() {
        let zone = sample_zone();
        let resolver = Resolver::new(&zone, None, None);
        let response = resolver.resolve(&query("nope.example.com.", TYPE_A), 0);
        assert_eq!(response.header.rcode(), crate::dns::RCODE_NXDOMAIN);
        assert_eq!(response.authorities.len(), 1);
    }

    #[test]
    fn out_of_zone_is_refused() {
        let zone = sample_zone();
        let resolver = Resolver::new(&zone, None, None);
        let response = resolver.resolve(&query("www.other.org.", TYPE_A), 0);
        assert_eq!(response.header.rcode(), RCODE_REFUSED);
    }

    #[test]
    fn wildcard_synthesis_rewrites_owner_to_qname() {
        let mut zone = sample_zone();
        zone.add(RRset::singleton(
            Name::from_presentation("*.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 9))),
        ))
        .unwrap();
        zone.verify().unwrap();

        let resolver = Resolver::new(&zone, None, None);
        let response = resolver.resolve(&query("nope.example.com.", TYPE_A), 0);
        assert_eq!(response.header.rcode(), RCODE_NOERROR);
        assert_eq!(response.answers.len(), 1);
        assert_eq!(
            response.answers[0].name,
            Name::from_presentation("nope.example.com.").unwrap()
        );
    }
}
