//! Private-key material and the key store (spec.md §4.J). Grounded on
//! `original_source/zonesignerimp.cpp`'s RSA/ECDSA key-loading dispatch and
//! the teacher's `dns/rdata/sec/algo/rsa_sha1.rs` for concrete `rsa`-crate
//! usage; the YAML configuration shape itself is `config.rs`.

pub mod config;

use crate::dns::name::Name;
use crate::dns::rdata::sec::algo::SigningAlgorithm;
use crate::dns::rdata::sec::dnskey::Dnskey;
use crate::dns::rdata::sec::key_tag::{calc_key_tag, KeyTag};
use crate::error::{ConfigError, SigningError};
use config::{KeyConfigEntry, KeyRole};
use elliptic_curve::pkcs8::DecodePrivateKey as EcDecodePrivateKey;
use p256::ecdsa::SigningKey as P256SigningKey;
use p384::ecdsa::SigningKey as P384SigningKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey as RsaDecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha512};
use signature::Signer as SignatureSigner;
use std::fs;

enum PrivateMaterial {
    Rsa(RsaPrivateKey),
    EcdsaP256(P256SigningKey),
    EcdsaP384(P384SigningKey),
}

/// One loaded private key: the role it plays (KSK/ZSK), the algorithm it
/// signs with, the apex it belongs to, its validity window, and its
/// material.
pub struct Key {
    pub role: KeyRole,
    pub algorithm: SigningAlgorithm,
    pub apex: Name,
    pub not_before: u64,
    pub not_after: u64,
    material: PrivateMaterial,
}

impl Key {
    pub fn is_ksk(&self) -> bool {
        matches!(self.role, KeyRole::Ksk)
    }

    pub fn is_active_at(&self, now: u64) -> bool {
        now >= self.not_before && now <= self.not_after
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        match &self.material {
            PrivateMaterial::Rsa(k) => rsa_public_key_rfc3110(&RsaPublicKey::from(k)),
            PrivateMaterial::EcdsaP256(k) => {
                k.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec()
            }
            PrivateMaterial::EcdsaP384(k) => {
                k.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec()
            }
        }
    }

    /// DNSKEY flags are 257 (SEP set) for a KSK and 256 for a ZSK
    /// (RFC 4034 §2.1.1), both always marking the zone-key bit.
    pub fn dnskey(&self) -> Dnskey {
        let flags = if self.is_ksk() { 257 } else { 256 };
        Dnskey {
            flags,
            protocol: 3,
            algorithm: self.algorithm.to_wire(),
            pub_key: self.public_key_bytes(),
        }
    }

    pub fn key_tag(&self) -> KeyTag {
        calc_key_tag(&self.dnskey())
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SigningError> {
        match (&self.material, self.algorithm) {
            (PrivateMaterial::Rsa(k), SigningAlgorithm::RsaSha1) => rsa_sign::<sha1::Sha1>(k, data),
            (PrivateMaterial::Rsa(k), SigningAlgorithm::RsaSha256) => rsa_sign::<Sha256>(k, data),
            (PrivateMaterial::Rsa(k), SigningAlgorithm::RsaSha512) => rsa_sign::<Sha512>(k, data),
            (PrivateMaterial::EcdsaP256(k), SigningAlgorithm::EcdsaP256Sha256) => {
                let sig: p256::ecdsa::Signature =
                    k.try_sign(data).map_err(|e| SigningError::Backend(e.to_string()))?;
                Ok(sig.to_bytes().to_vec())
            }
            (PrivateMaterial::EcdsaP384(k), SigningAlgorithm::EcdsaP384Sha384) => {
                let sig: p384::ecdsa::Signature =
                    k.try_sign(data).map_err(|e| SigningError::Backend(e.to_string()))?;
                Ok(sig.to_bytes().to_vec())
            }
            _ => Err(SigningError::NoKeyMaterial(format!(
                "key for {:?} cannot sign with algorithm {:?}",
                self.apex, self.algorithm
            ))),
        }
    }
}

fn rsa_sign<D>(key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>, SigningError>
where
    D: digest::Digest + digest::const_oid::AssociatedOid,
{
    let digest = D::digest(data);
    let padding = Pkcs1v15Sign::new::<D>();
    key.sign(padding, &digest).map_err(|e| SigningError::Backend(e.to_string()))
}

/// RFC 3110: a one- (or, for huge exponents, three-) byte exponent-length
/// prefix, the exponent, then the modulus, all big-endian.
fn rsa_public_key_rfc3110(pk: &RsaPublicKey) -> Vec<u8> {
    let e = pk.e().to_bytes_be();
    let n = pk.n().to_bytes_be();
    let mut out = Vec::with_capacity(3 + e.len() + n.len());
    if e.len() <= 255 {
        out.push(e.len() as u8);
    } else {
        out.push(0);
        out.extend_from_slice(&(e.len() as u16).to_be_bytes());
    }
    out.extend_from_slice(&e);
    out.extend_from_slice(&n);
    out
}

/// A set of loaded keys, immutable after construction (spec.md §5: the key
/// store is part of the core's read-only setup state).
pub struct KeyStore {
    keys: Vec<Key>,
}

impl KeyStore {
    pub fn load(yaml: &str) -> Result<Self, ConfigError> {
        let entries: Vec<KeyConfigEntry> = config::parse(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        let keys = entries.iter().map(load_one).collect::<Result<Vec<_>, _>>()?;
        Ok(KeyStore { keys })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    pub fn ksks(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|k| k.is_ksk())
    }

    pub fn active_at(&self, now: u64) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(move |k| k.is_active_at(now))
    }
}

fn load_one(entry: &KeyConfigEntry) -> Result<Key, ConfigError> {
    let algorithm = match entry.algorithm.as_str() {
        "RSASHA1" => SigningAlgorithm::RsaSha1,
        "RSASHA256" => SigningAlgorithm::RsaSha256,
        "RSASHA512" => SigningAlgorithm::RsaSha512,
        "ECDSAP256SHA256" => SigningAlgorithm::EcdsaP256Sha256,
        "ECDSAP384SHA384" => SigningAlgorithm::EcdsaP384Sha384,
        other => return Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
    };

    let pem = fs::read_to_string(&entry.key_file).map_err(|e| ConfigError::KeyFile {
        path: entry.key_file.clone(),
        reason: e.to_string(),
    })?;
    let key_file_err = |e: String| ConfigError::KeyFile {
        path: entry.key_file.clone(),
        reason: e,
    };

    let material = match algorithm {
        SigningAlgorithm::RsaSha1 | SigningAlgorithm::RsaSha256 | SigningAlgorithm::RsaSha512 => {
            let key = RsaPrivateKey::from_pkcs8_pem(&pem)
                .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
                .map_err(|e| key_file_err(e.to_string()))?;
            PrivateMaterial::Rsa(key)
        }
        SigningAlgorithm::EcdsaP256Sha256 => {
            let key = P256SigningKey::from_pkcs8_pem(&pem).map_err(|e| key_file_err(e.to_string()))?;
            PrivateMaterial::EcdsaP256(key)
        }
        SigningAlgorithm::EcdsaP384Sha384 => {
            let key = P384SigningKey::from_pkcs8_pem(&pem).map_err(|e| key_file_err(e.to_string()))?;
            PrivateMaterial::EcdsaP384(key)
        }
    };

    let domain = if entry.domain.ends_with('.') {
        entry.domain.clone()
    } else {
        format!("{}.", entry.domain)
    };
    let apex = Name::from_presentation(&domain).map_err(|source| ConfigError::BadDomain(entry.domain.clone(), source))?;

    Ok(Key {
        role: entry.role,
        algorithm,
        apex,
        not_before: entry.not_before,
        not_after: entry.not_after,
        material,
    })
}
