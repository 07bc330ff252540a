//! Authenticated denial of existence over plain canonical names (RFC 4034
//! §4, spec.md §4.H). Built once from a verified [`Zone`] and immutable
//! thereafter; the apex is not special-cased (Open Question (a): decided in
//! `DESIGN.md`, grounded on `original_source/nsecdb.cpp`'s `NSECDB::find`).

use crate::dns::name::Name;
use crate::dns::rdata::sec::nsec::Nsec;
use crate::dns::rdata::RData;
use crate::dns::rr::RRset;
use crate::dns::{Class, Type, TYPE_NSEC, TYPE_RRSIG};
use crate::error::LogicError;
use std::collections::BTreeMap;

use super::tree::Zone;

#[derive(Debug, Clone)]
pub struct NsecDb {
    class: Class,
    entries: BTreeMap<Name, Vec<Type>>,
}

impl NsecDb {
    /// Record `(owner → types present at the node) ∪ {NSEC, RRSIG}` for
    /// every occupied node of `zone`. Empty non-terminals are skipped: they
    /// own no NSEC record of their own (they are only ever a next-name).
    pub fn build(zone: &Zone) -> Self {
        let mut entries = BTreeMap::new();
        for (owner, node) in zone.nodes() {
            if node.is_empty_non_terminal() {
                continue;
            }
            let mut types: Vec<Type> = node.types().collect();
            types.push(TYPE_NSEC);
            types.push(TYPE_RRSIG);
            types.sort_unstable();
            types.dedup();
            entries.insert(owner.clone(), types);
        }
        NsecDb {
            class: zone.class(),
            entries,
        }
    }

    /// Locate the NSEC record covering `name`: the largest stored owner ≤
    /// `name`, cyclic at the map boundary, with next-name being that
    /// owner's successor (also cyclic). Panics via [`LogicError`] if the
    /// database is empty — callers must not query a zone with zero occupied
    /// nodes, which `Zone::verify` already rejects (no SOA/NS means no
    /// occupied apex).
    pub fn find(&self, name: &Name, ttl: u32) -> Result<RRset, LogicError> {
        if self.entries.is_empty() {
            return Err(LogicError::new("NSEC database must not be empty"));
        }

        let target = name.to_canonical();
        let mut owner = None;
        let mut next = None;

        // First entry >= target.
        let mut at_or_after = self.entries.range(target.clone()..);
        match at_or_after.next() {
            Some((k, _)) if *k == target => {
                owner = Some(k.clone());
                let mut after = self.entries.range((
                    std::ops::Bound::Excluded(target.clone()),
                    std::ops::Bound::Unbounded,
                ));
                next = after.next().map(|(k, _)| k.clone());
                if next.is_none() {
                    next = self.entries.keys().next().cloned();
                }
            }
            Some((k, _)) => {
                // k is strictly after target: predecessor is the owner.
                next = Some(k.clone());
                owner = self
                    .entries
                    .range(..target.clone())
                    .next_back()
                    .map(|(k, _)| k.clone());
                if owner.is_none() {
                    owner = self.entries.keys().next_back().cloned();
                }
            }
            None => {
                // target is after every stored entry: wrap.
                owner = self.entries.keys().next_back().cloned();
                next = self.entries.keys().next().cloned();
            }
        }

        let owner = owner.expect("non-empty database always yields an owner");
        let next = next.expect("non-empty database always yields a next-name");
        let types = self.entries.get(&owner).cloned().unwrap_or_default();

        Ok(RRset::singleton(
            owner,
            self.class,
            ttl,
            RData::Nsec(Nsec {
                next_domain_name: next,
                types: crate::dns::bitmap::TypeBitmap::from_types(types),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::soa::Soa;
    use crate::dns::{CLASS_IN, TYPE_A};
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

    #[test]
    fn covers_name_between_two_owners() {
        let zone = sample_zone();
        let db = NsecDb::build(&zone);
        // "aaa.example.com" sorts before "example.com" in label-reversed
        // order only if its non-apex label beats "www"; here it's simplest
        // to probe a name between apex and www.
        let rr = db
            .find(&Name::from_presentation("mid.example.com.").unwrap(), 60)
            .unwrap();
        assert_eq!(rr.rtype, TYPE_NSEC);
    }

    #[test]
    fn wraps_at_the_last_entry() {
        let zone = sample_zone();
        let db = NsecDb::build(&zone);
        let rr = db
            .find(&Name::from_presentation("zzz.example.com.").unwrap(), 60)
            .unwrap();
        if let RData::Nsec(n) = &rr.rdata[0] {
            assert_eq!(n.next_domain_name, *zone.apex());
        } else {
            panic!("expected NSEC rdata");
        }
    }

    #[test]
    fn exact_match_uses_successor_as_next() {
        let zone = sample_zone();
        let db = NsecDb::build(&zone);
        let rr = db
            .find(&Name::from_presentation("example.com.").unwrap(), 60)
            .unwrap();
        if let RData::Nsec(n) = &rr.rdata[0] {
            assert!(n.types.contains(TYPE_A) || n.types.contains(crate::dns::TYPE_SOA));
            assert_eq!(n.next_domain_name, Name::from_presentation("www.example.com.").unwrap());
        } else {
            panic!("expected NSEC rdata");
        }
    }
}
