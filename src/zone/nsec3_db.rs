//! Hashed authenticated denial of existence (RFC 5155, spec.md §4.I). Built
//! once from a verified [`Zone`] under a chosen set of hash parameters;
//! immutable thereafter. Entries are keyed by the raw hash bytes of their
//! owner name rather than the name itself, since that is the order NSEC3
//! actually chains in.

use crate::dns::bitmap::TypeBitmap;
use crate::dns::name::Name;
use crate::dns::rdata::sec::nsec3::Nsec3;
use crate::dns::rdata::RData;
use crate::dns::rr::RRset;
use crate::dns::{Class, Type, TYPE_NSEC3, TYPE_RRSIG};
use crate::error::LogicError;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

use super::tree::Zone;

/// Only hash algorithm 1 (SHA-1, RFC 5155 §2) has ever been registered for
/// NSEC3; the wire field is carried anyway to round-trip cleanly.
pub const NSEC3_HASH_SHA1: u8 = 1;

#[derive(Debug, Clone)]
pub struct Nsec3Db {
    class: Class,
    apex: Name,
    hash_algorithm: u8,
    flags: u8,
    iterations: u16,
    salt: Vec<u8>,
    // Keyed by raw hash bytes: this is the NSEC3 chain order (RFC 5155
    // compares hashes as unsigned octet strings, same as a `Vec<u8>` Ord).
    entries: BTreeMap<Vec<u8>, (Name, Vec<Type>)>,
}

impl Nsec3Db {
    /// Hash every occupied node and empty non-terminal of `zone` under the
    /// given parameters. Opt-out is not computed here: every name gets an
    /// entry, so `flags` only ever reflects what the caller passes in.
    pub fn build(zone: &Zone, hash_algorithm: u8, flags: u8, iterations: u16, salt: Vec<u8>) -> Self {
        let mut entries = BTreeMap::new();
        for (owner, node) in zone.nodes() {
            let hash = iterate_hash(owner, &salt, iterations, hash_algorithm);
            let types = if node.is_empty_non_terminal() {
                Vec::new()
            } else {
                // NSEC3 lives under the *hashed* owner name, a different
                // name from `owner`, so (unlike plain NSEC) it never
                // appears in its own type bitmap.
                let mut types: Vec<Type> = node
                    .types()
                    .filter(|t| *t != TYPE_NSEC3)
                    .collect();
                types.push(TYPE_RRSIG);
                types.sort_unstable();
                types.dedup();
                types
            };
            entries.insert(hash, (owner.clone(), types));
        }
        Nsec3Db {
            class: zone.class(),
            apex: zone.apex().clone(),
            hash_algorithm,
            flags,
            iterations,
            salt,
            entries,
        }
    }

    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// Hash an arbitrary name (it need not be an existing node owner — the
    /// closest-encloser and wildcard-denial proofs both hash names that are
    /// never occupied) under this database's parameters.
    pub fn hash_name(&self, name: &Name) -> Vec<u8> {
        iterate_hash(name, &self.salt, self.iterations, self.hash_algorithm)
    }

    /// The NSEC3 owner name for a raw hash: base32hex label prepended to
    /// the zone apex (RFC 5155 §3.3).
    pub fn owner_name(&self, hash: &[u8]) -> Name {
        let label = data_encoding::BASE32HEX_NOPAD.encode(hash).to_ascii_lowercase();
        let mut name = self.apex.clone();
        name.push_subdomain(label.into_bytes());
        name
    }

    /// Locate the NSEC3 record whose owner hash covers (or exactly
    /// matches) `target_hash`: the largest stored hash ≤ target, cyclic at
    /// the map boundary, same structure as [`super::nsec_db::NsecDb::find`].
    pub fn find_by_hash(&self, target_hash: &[u8], ttl: u32) -> Result<RRset, LogicError> {
        if self.entries.is_empty() {
            return Err(LogicError::new("NSEC3 database must not be empty"));
        }

        let target = target_hash.to_vec();
        let owner_hash;
        let next_hash;

        let mut at_or_after = self.entries.range(target.clone()..);
        match at_or_after.next() {
            Some((k, _)) if *k == target => {
                owner_hash = k.clone();
                let mut after = self.entries.range((
                    std::ops::Bound::Excluded(target.clone()),
                    std::ops::Bound::Unbounded,
                ));
                next_hash = after
                    .next()
                    .map(|(k, _)| k.clone())
                    .unwrap_or_else(|| self.entries.keys().next().cloned().unwrap());
            }
            Some((k, _)) => {
                next_hash = k.clone();
                owner_hash = self
                    .entries
                    .range(..target.clone())
                    .next_back()
                    .map(|(k, _)| k.clone())
                    .unwrap_or_else(|| self.entries.keys().next_back().cloned().unwrap());
            }
            None => {
                owner_hash = self.entries.keys().next_back().cloned().unwrap();
                next_hash = self.entries.keys().next().cloned().unwrap();
            }
        }

        let types = self
            .entries
            .get(&owner_hash)
            .map(|(_, types)| types.clone())
            .unwrap_or_default();
        let owner = self.owner_name(&owner_hash);

        Ok(RRset::singleton(
            owner,
            self.class,
            ttl,
            RData::Nsec3(Nsec3 {
                hash_algorithm: self.hash_algorithm,
                flags: self.flags,
                iterations: self.iterations,
                salt: self.salt.clone(),
                next_hashed_owner: next_hash,
                types: TypeBitmap::from_types(types),
            }),
        ))
    }

    /// Convenience wrapper: hash `name` then look up its covering record.
    pub fn find(&self, name: &Name, ttl: u32) -> Result<RRset, LogicError> {
        let hash = self.hash_name(name);
        self.find_by_hash(&hash, ttl)
    }

    /// `true` if `name`'s hash has its own entry (an exact NSEC3 match
    /// rather than a covering one) — used by the closest-encloser walk.
    pub fn has_exact(&self, name: &Name) -> bool {
        self.entries.contains_key(&self.hash_name(name))
    }
}

/// RFC 5155 §5: `IH(salt, x, 0) = H(x || salt)`,
/// `IH(salt, x, k) = H(IH(salt, x, k-1) || salt)`. `iterations` is the
/// number of *additional* rounds beyond the initial hash.
fn iterate_hash(name: &Name, salt: &[u8], iterations: u16, algorithm: u8) -> Vec<u8> {
    debug_assert_eq!(algorithm, NSEC3_HASH_SHA1, "only SHA-1 NSEC3 hashing is registered");
    let mut buf = Vec::new();
    name.write_canonical(&mut buf);
    buf.extend_from_slice(salt);
    let mut hash = Sha1::digest(&buf).to_vec();
    for _ in 0..iterations {
        let mut next = hash;
        next.extend_from_slice(salt);
        hash = Sha1::digest(&next).to_vec();
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::soa::Soa;
    use crate::dns::{CLASS_IN, TYPE_A, TYPE_NSEC3};
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
    fn hash_is_deterministic() {
        let zone = sample_zone();
        let db = Nsec3Db::build(&zone, NSEC3_HASH_SHA1, 0, 3, vec![0xAB, 0xCD]);
        let a = db.hash_name(&Name::from_presentation("www.example.com.").unwrap());
        let b = db.hash_name(&Name::from_presentation("www.example.com.").unwrap());
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn owner_node_has_own_entry() {
        let zone = sample_zone();
        let db = Nsec3Db::build(&zone, NSEC3_HASH_SHA1, 0, 0, vec![]);
        assert!(db.has_exact(&Name::from_presentation("www.example.com.").unwrap()));
        assert!(db.has_exact(&Name::from_presentation("example.com.").unwrap()));
    }

    #[test]
    fn covering_lookup_finds_an_interval() {
        let zone = sample_zone();
        let db = Nsec3Db::build(&zone, NSEC3_HASH_SHA1, 0, 0, vec![]);
        let rr = db
            .find(&Name::from_presentation("nonexistent.example.com.").unwrap(), 60)
            .unwrap();
        assert_eq!(rr.rtype, TYPE_NSEC3);
        if let RData::Nsec3(n) = &rr.rdata[0] {
            assert_eq!(n.next_hashed_owner.len(), 20);
        } else {
            panic!("expected NSEC3 rdata");
        }
    }

    #[test]
    fn apex_bitmap_excludes_nsec3_but_keeps_rrsig() {
        let zone = sample_zone();
        let db = Nsec3Db::build(&zone, NSEC3_HASH_SHA1, 0, 0, vec![]);
        let rr = db
            .find(&Name::from_presentation("example.com.").unwrap(), 60)
            .unwrap();
        if let RData::Nsec3(n) = &rr.rdata[0] {
            assert!(!n.types.contains(TYPE_NSEC3));
            assert!(n.types.contains(crate::dns::TYPE_SOA));
        } else {
            panic!("expected NSEC3 rdata");
        }
    }
}
