//! The zone tree: a canonical-name-keyed map of [`Node`]s, together with the
//! apex name and cached apex SOA/NS (spec.md §3 "Zone", §4.F).

use super::node::Node;
use crate::dns::name::Name;
use crate::dns::rr::RRset;
use crate::dns::{Class, TYPE_CNAME, TYPE_NS, TYPE_NSEC, TYPE_NSEC3, TYPE_RRSIG, TYPE_SOA};
use crate::error::ZoneError;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Zone {
    apex: Name,
    class: Class,
    nodes: BTreeMap<Name, Node>,
    apex_soa: Option<RRset>,
    apex_ns: Option<RRset>,
}

impl Zone {
    pub fn new(apex: Name, class: Class) -> Self {
        let apex = apex.to_canonical();
        let mut nodes = BTreeMap::new();
        nodes.insert(apex.clone(), Node::new());
        Zone {
            apex,
            class,
            nodes,
            apex_soa: None,
            apex_ns: None,
        }
    }

    pub fn apex(&self) -> &Name {
        &self.apex
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn is_in_bailiwick(&self, name: &Name) -> bool {
        name.is_subdomain_of(&self.apex)
    }

    pub fn node(&self, name: &Name) -> Option<&Node> {
        self.nodes.get(&name.to_canonical())
    }

    pub fn nodes(&self) -> &BTreeMap<Name, Node> {
        &self.nodes
    }

    /// Cached after [`Zone::verify`] succeeds; `None` beforehand.
    pub fn soa(&self) -> Option<&RRset> {
        self.apex_soa.as_ref()
    }

    pub fn apex_ns(&self) -> Option<&RRset> {
        self.apex_ns.as_ref()
    }

    /// Attach `rrset` to its owner's node, creating empty non-terminal
    /// ancestors up to the apex as needed (spec.md §4.F).
    pub fn add(&mut self, rrset: RRset) -> Result<(), ZoneError> {
        if !rrset.owner.is_subdomain_of(&self.apex) {
            return Err(ZoneError::OwnerOutsideApex {
                owner: rrset.owner.to_string(),
                apex: self.apex.to_string(),
            });
        }

        let mut ancestor = rrset.owner.to_canonical();
        while ancestor != self.apex {
            if ancestor.pop_subdomain().is_none() {
                break;
            }
            self.nodes.entry(ancestor.clone()).or_insert_with(Node::new);
        }

        let owner_key = rrset.owner.to_canonical();
        let node = self.nodes.entry(owner_key).or_insert_with(Node::new);
        node.add_rrset(rrset)
    }

    /// Check the structural invariants that must hold before a zone may
    /// serve, and cache the apex SOA/NS for fast access.
    pub fn verify(&mut self) -> Result<(), ZoneError> {
        for owner in self.nodes.keys() {
            if !owner.is_subdomain_of(&self.apex) {
                return Err(ZoneError::OwnerOutsideApex {
                    owner: owner.to_string(),
                    apex: self.apex.to_string(),
                });
            }
        }

        for (owner, node) in &self.nodes {
            if let Some(cname) = node.get(TYPE_CNAME) {
                if cname.rdata.len() > 1 {
                    return Err(ZoneError::MultipleCname {
                        owner: owner.to_string(),
                    });
                }
                let other_data = node
                    .types()
                    .any(|t| !matches!(t, TYPE_CNAME | TYPE_RRSIG | TYPE_NSEC | TYPE_NSEC3));
                if other_data && node.len() > 1 {
                    return Err(ZoneError::MixedCnameData {
                        owner: owner.to_string(),
                    });
                }
            }
        }

        let apex_node = self
            .nodes
            .get(&self.apex)
            .ok_or_else(|| ZoneError::MissingSoa {
                apex: self.apex.to_string(),
            })?;
        let soa = apex_node
            .get(TYPE_SOA)
            .cloned()
            .ok_or_else(|| ZoneError::MissingSoa {
                apex: self.apex.to_string(),
            })?;
        let ns = apex_node
            .get(TYPE_NS)
            .cloned()
            .ok_or_else(|| ZoneError::MissingApexNs {
                apex: self.apex.to_string(),
            })?;

        self.apex_soa = Some(soa);
        self.apex_ns = Some(ns);
        Ok(())
    }

    /// The strict ancestors of `name` up to and including the apex, nearest
    /// first — used by DNAME redirection and NS/DS referral lookup.
    pub fn ancestors(&self, name: &Name) -> Vec<Name> {
        let mut out = Vec::new();
        let mut cur = name.to_canonical();
        while cur != self.apex {
            if cur.pop_subdomain().is_none() {
                break;
            }
            out.push(cur.clone());
        }
        out
    }

    /// The closest existing ancestor of `name` (including `name` itself)
    /// that has a `*` child node, if any — used for wildcard synthesis.
    pub fn closest_wildcard_ancestor(&self, name: &Name) -> Option<(Name, &Node)> {
        let mut cur = name.to_canonical();
        loop {
            let mut wildcard = cur.clone();
            wildcard.push_subdomain(b"*".to_vec());
            if let Some(node) = self.nodes.get(&wildcard) {
                if !node.is_empty_non_terminal() {
                    return Some((cur, node));
                }
            }
            if cur == self.apex {
                return None;
            }
            if cur.pop_subdomain().is_none() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::name::Name;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::soa::Soa;
    use crate::dns::rdata::RData;
    use crate::dns::{CLASS_IN, TYPE_NS};
    use std::net::Ipv4Addr;

    fn apex_name() -> Name {
        Name::from_presentation("example.com.").unwrap()
    }

    fn build_minimal_zone() -> Zone {
        let apex = apex_name();
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
        zone
    }

    #[test]
    fn add_creates_empty_non_terminal_ancestors() {
        let mut zone = build_minimal_zone();
        zone.add(RRset::singleton(
            Name::from_presentation("a.b.c.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
        ))
        .unwrap();

        let b_c = zone
            .node(&Name::from_presentation("b.c.example.com.").unwrap())
            .unwrap();
        assert!(b_c.is_empty_non_terminal());
        let c = zone
            .node(&Name::from_presentation("c.example.com.").unwrap())
            .unwrap();
        assert!(c.is_empty_non_terminal());
    }

    #[test]
    fn verify_succeeds_and_caches_apex_records() {
        let mut zone = build_minimal_zone();
        zone.verify().unwrap();
        assert!(zone.soa().is_some());
        assert_eq!(zone.apex_ns().unwrap().rtype, TYPE_NS);
    }

    #[test]
    fn verify_fails_without_soa() {
        let apex = apex_name();
        let mut zone = Zone::new(apex, CLASS_IN);
        let err = zone.verify().unwrap_err();
        assert!(matches!(err, ZoneError::MissingSoa { .. }));
    }

    #[test]
    fn out_of_zone_owner_rejected() {
        let mut zone = build_minimal_zone();
        let err = zone
            .add(RRset::singleton(
                Name::from_presentation("www.other.tld.").unwrap(),
                CLASS_IN,
                300,
                RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
            ))
            .unwrap_err();
        assert!(matches!(err, ZoneError::OwnerOutsideApex { .. }));
    }
}
