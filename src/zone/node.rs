//! A node is a map from type to RRset, representing every record sharing one
//! owner name (spec.md §3 "Node").

use crate::dns::rr::RRset;
use crate::dns::Type;

#[derive(Debug, Clone, Default)]
pub struct Node {
    rrsets: std::collections::BTreeMap<Type, RRset>,
}

impl Node {
    pub fn new() -> Self {
        Node::default()
    }

    /// An empty non-terminal exists only to make its name a valid ancestor
    /// of occupied descendants.
    pub fn is_empty_non_terminal(&self) -> bool {
        self.rrsets.is_empty()
    }

    pub fn get(&self, rtype: Type) -> Option<&RRset> {
        self.rrsets.get(&rtype)
    }

    pub fn cname(&self) -> Option<&RRset> {
        self.get(crate::dns::TYPE_CNAME)
    }

    pub fn dname(&self) -> Option<&RRset> {
        self.get(crate::dns::TYPE_DNAME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Type, &RRset)> {
        self.rrsets.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.rrsets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rrsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty()
    }

    /// Merge `rrset` into this node under its type. A pre-existing RRset of
    /// the same type must agree on TTL (spec.md Open Question (c)); items
    /// are unioned by value, duplicates dropped.
    pub fn add_rrset(&mut self, rrset: RRset) -> Result<(), crate::error::ZoneError> {
        use crate::error::ZoneError;

        match self.rrsets.get_mut(&rrset.rtype) {
            Some(existing) => {
                if existing.ttl != rrset.ttl {
                    return Err(ZoneError::TtlMismatch {
                        owner: rrset.owner.to_string(),
                        rtype: rrset.rtype,
                        existing_ttl: existing.ttl,
                        new_ttl: rrset.ttl,
                    });
                }
                for item in rrset.rdata {
                    if !existing.rdata.contains(&item) {
                        existing.rdata.push(item);
                    }
                }
            }
            None => {
                self.rrsets.insert(rrset.rtype, rrset);
            }
        }
        Ok(())
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

    fn a_rrset(addr: Ipv4Addr) -> RRset {
        RRset::singleton(
            Name::from_presentation("www.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(addr)),
        )
    }

    #[test]
    fn empty_node_is_empty_non_terminal() {
        let node = Node::new();
        assert!(node.is_empty_non_terminal());
    }

    #[test]
    fn merging_same_type_unions_rdata() {
        let mut node = Node::new();
        node.add_rrset(a_rrset(Ipv4Addr::new(192, 0, 2, 1))).unwrap();
        node.add_rrset(a_rrset(Ipv4Addr::new(192, 0, 2, 2))).unwrap();
        let merged = node.get(TYPE_A).unwrap();
        assert_eq!(merged.rdata.len(), 2);
    }

    #[test]
    fn ttl_disagreement_rejected() {
        let mut node = Node::new();
        node.add_rrset(a_rrset(Ipv4Addr::new(192, 0, 2, 1))).unwrap();
        let mut other = a_rrset(Ipv4Addr::new(192, 0, 2, 2));
        other.ttl = 60;
        let err = node.add_rrset(other).unwrap_err();
        assert!(matches!(err, crate::error::ZoneError::TtlMismatch { .. }));
    }
}
