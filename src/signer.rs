//! Online DNSSEC signing (spec.md §4.K). Grounded on
//! `original_source/zonesignerimp.cpp` (`generateSignData`, `signRRSet`,
//! `signDNSKEY`, `getDSRecord(s)`).

use crate::dns::name::Name;
use crate::dns::rdata::sec::algo::{DIGEST_SHA1, DIGEST_SHA256, DIGEST_SHA384};
use crate::dns::rdata::sec::ds::Ds;
use crate::dns::rdata::sec::rrsig::Rrsig;
use crate::dns::rdata::RData;
use crate::dns::rr::{ResourceRecord, RRset};
use crate::dns::{Class, TYPE_DNSKEY, TYPE_RRSIG};
use crate::keys::KeyStore;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384};

/// Clock skew tolerated before the inception time (1 hour) and the
/// validity window granted past "now" (7 days) for an online signature.
const CLOCK_SKEW_SECS: u64 = 3600;
const VALIDITY_PERIOD_SECS: u64 = 7 * 24 * 3600;

pub struct Signer {
    keys: KeyStore,
}

impl Signer {
    pub fn new(keys: KeyStore) -> Self {
        Signer { keys }
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Sign `rrset` with every ZSK (and, if it covers a DNSKEY RRset,
    /// every KSK too), returning the resulting RRSIG RRset. Keys whose
    /// validity window excludes `now`, or whose signing call fails, are
    /// silently skipped — a partially-signed RRset is still useful, an
    /// all-or-nothing policy would turn one bad key into a zone-wide outage.
    pub fn sign_rrset(&self, rrset: &RRset, now: u64) -> RRset {
        self.sign_rrset_with_labels(rrset, None, now)
    }

    /// Like [`Signer::sign_rrset`], but for an RRset synthesized from a
    /// wildcard (spec.md §4.G step 6), `wildcard_labels` carries the label
    /// count of the *original* wildcard owner (e.g. 2 for `*.example.com`)
    /// rather than letting it be recomputed from the synthesized owner —
    /// RFC 4034 §3.1.3 requires the Labels field to reflect the wildcard so
    /// a validator can detect the expansion.
    pub fn sign_rrset_with_labels(
        &self,
        rrset: &RRset,
        wildcard_labels: Option<u8>,
        now: u64,
    ) -> RRset {
        let inception = now.saturating_sub(CLOCK_SKEW_SECS) as u32;
        let expiration = (now + VALIDITY_PERIOD_SECS) as u32;

        let mut out = RRset::new(rrset.owner.clone(), rrset.class, TYPE_RRSIG, rrset.ttl);
        for key in self.keys.active_at(now) {
            if rrset.rtype != TYPE_DNSKEY && key.is_ksk() {
                continue;
            }
            if let Ok(sig) = self.sign_one(rrset, key, inception, expiration, wildcard_labels) {
                out.push(RData::Rrsig(sig));
            }
        }
        out
    }

    fn sign_one(
        &self,
        rrset: &RRset,
        key: &crate::keys::Key,
        inception: u32,
        expiration: u32,
        wildcard_labels: Option<u8>,
    ) -> Result<Rrsig, crate::error::SigningError> {
        let labels = wildcard_labels.unwrap_or_else(|| labels_field(&rrset.owner));

        let mut prefix = Vec::new();
        prefix.extend_from_slice(&rrset.rtype.to_be_bytes());
        prefix.push(key.algorithm.to_wire());
        prefix.push(labels);
        prefix.extend_from_slice(&rrset.ttl.to_be_bytes());
        prefix.extend_from_slice(&expiration.to_be_bytes());
        prefix.extend_from_slice(&inception.to_be_bytes());
        prefix.extend_from_slice(&key.key_tag().to_be_bytes());
        key.apex.write_canonical(&mut prefix);

        let data = signed_data(rrset, &prefix);
        let signature = key.sign(&data)?;

        Ok(Rrsig {
            type_covered: rrset.rtype,
            algorithm: key.algorithm.to_wire(),
            labels,
            original_ttl: rrset.ttl,
            expiration,
            inception,
            key_tag: key.key_tag(),
            signer_name: key.apex.clone(),
            signature,
        })
    }

    /// Every active key's DNSKEY record, owned by the zone apex.
    pub fn dnskey_rrset(&self, owner: &Name, class: Class, ttl: u32, now: u64) -> RRset {
        let mut set = RRset::new(owner.clone(), class, TYPE_DNSKEY, ttl);
        for key in self.keys.active_at(now) {
            set.push(RData::Dnskey(key.dnskey()));
        }
        set
    }

    /// SHA-1, SHA-256, and SHA-384 DS records for every active KSK
    /// (spec.md §4.K): digest over `canonical_owner ‖ DNSKEY_RDATA`.
    pub fn ds_records(&self, owner: &Name, class: Class, ttl: u32, now: u64) -> RRset {
        let mut set = RRset::new(owner.clone(), class, crate::dns::TYPE_DS, ttl);
        for key in self.keys.active_at(now).filter(|k| k.is_ksk()) {
            let dnskey = key.dnskey();
            let mut digest_input = Vec::new();
            owner.write_canonical(&mut digest_input);
            dnskey.write_canonical(&mut digest_input);

            let digests: [(u8, Vec<u8>); 3] = [
                (DIGEST_SHA1, Sha1::digest(&digest_input).to_vec()),
                (DIGEST_SHA256, Sha256::digest(&digest_input).to_vec()),
                (DIGEST_SHA384, Sha384::digest(&digest_input).to_vec()),
            ];
            for (digest_type, digest) in digests {
                set.push(RData::Ds(Ds {
                    key_tag: key.key_tag(),
                    algorithm: key.algorithm.to_wire(),
                    digest_type,
                    digest,
                }));
            }
        }
        set
    }
}

/// RFC 4034 §3.1.3: label count of the owner, excluding the root label and
/// (if present) a leading wildcard label — this is what lets a validator
/// detect that an answer came from wildcard expansion.
pub(crate) fn labels_field(owner: &Name) -> u8 {
    let count = owner.label_count();
    if owner.labels().first().map(|l| l.as_slice()) == Some(b"*") {
        count.saturating_sub(1)
    } else {
        count
    }
}

/// RFC 4034 §6.3: the RRSIG RDATA prefix followed by every RR in the set,
/// each in canonical form, sorted by canonical RDATA byte order.
fn signed_data(rrset: &RRset, prefix: &[u8]) -> Vec<u8> {
    let mut records: Vec<(Vec<u8>, ResourceRecord)> = rrset
        .records()
        .map(|r| {
            let mut rdata = Vec::new();
            r.rdata.write_canonical(&mut rdata);
            (rdata, r)
        })
        .collect();
    records.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = prefix.to_vec();
    for (_, record) in &records {
        record.write_canonical(&mut out, rrset.ttl);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_field_excludes_root_and_wildcard() {
        let apex = Name::from_presentation("example.com.").unwrap();
        assert_eq!(labels_field(&apex), 2);

        let wildcard = Name::from_presentation("*.example.com.").unwrap();
        assert_eq!(labels_field(&wildcard), 2);
    }

    /// Regression for the wildcard-synthesis Labels bug (RFC 4034 §3.1.3):
    /// a `*.example.com` wildcard answering for `a.b.example.com` must sign
    /// with the wildcard's own label count (2), not the synthesized
    /// owner's (4) — those differ, which is exactly what lets a validator
    /// detect the expansion.
    #[test]
    fn wildcard_labels_differ_from_synthesized_owner_labels() {
        let wildcard_owner = Name::from_presentation("*.example.com.").unwrap();
        let synthesized_owner = Name::from_presentation("a.b.example.com.").unwrap();
        assert_eq!(labels_field(&wildcard_owner), 2);
        assert_eq!(labels_field(&synthesized_owner), 4);
        assert_ne!(labels_field(&wildcard_owner), labels_field(&synthesized_owner));
    }
}
