/**
Ref: https://www.iana.org/assignments/dns-sec-alg-numbers/dns-sec-alg-numbers.xhtml

# DNS Security Algorithm Numbers
## Registration Procedure(s)
RFC Required
## Reference
[RFC4034][RFC3755][RFC6014][RFC6944]
## Note
The KEY, SIG, DNSKEY, RRSIG, DS, and CERT RRs use an 8-bit number used
to identify the security algorithm being used.

## Available Formats

|Number|Description|Mnemonic|ZoneSigning|Trans.Sec.|Reference|
|----|----|----|----|----|----|
|1|RSA/MD5<br>(deprecated, see 5)|RSAMD5|N|Y|[RFC3110][RFC3110],[RFC4034][RFC4034]|
|2|Diffie-Hellman|DH|N|Y|[RFC2539][RFC2539]|
|3|DSA/SHA1|DSA|Y|Y|[RFC3755][RFC3755],[RFC2536][RFC2536]|
|5|RSA/SHA-1|RSASHA1|Y|Y|[RFC3110][RFC3110],[RFC4034][RFC4034]|
|8|RSA/SHA-256|RSASHA256|Y|*|[RFC5702][RFC5702]|
|10|RSA/SHA-512|RSASHA512|Y|*|[RFC5702][RFC5702]|
|13|ECDSA Curve P-256 with SHA-256|ECDSAP256SHA256|Y|*|[RFC6605][RFC6605]|
|14|ECDSA Curve P-384 with SHA-384|ECDSAP384SHA384|Y|*|[RFC6605][RFC6605]|
|252|Reserved for Indirect Keys|INDIRECT|N|N|[RFC4034][RFC4034]|
|253|private algorithm|PRIVATEDNS|Y|Y|[RFC4034][RFC4034]|
|254|private algorithm OID|PRIVATEOID|Y|Y|[RFC4034][RFC4034]|

[RFC2536]: https://www.rfc-editor.org/rfc/rfc2536.html
[RFC2539]: https://www.rfc-editor.org/rfc/rfc2539.html
[RFC3110]: https://www.rfc-editor.org/rfc/rfc3110.html
[RFC3755]: https://www.rfc-editor.org/rfc/rfc3755.html
[RFC4034]: https://www.rfc-editor.org/rfc/rfc4034.html
[RFC5702]: https://www.rfc-editor.org/rfc/rfc5702.html
[RFC6605]: https://www.rfc-editor.org/rfc/rfc6605.html
 */
pub type DnsSecAlgorithm = u8;

pub const ALGO_RSAMD5: DnsSecAlgorithm = 1;
pub const ALGO_DH: DnsSecAlgorithm = 2;
pub const ALGO_DSA: DnsSecAlgorithm = 3;
pub const ALGO_RSASHA1: DnsSecAlgorithm = 5;
pub const ALGO_RSASHA256: DnsSecAlgorithm = 8;
pub const ALGO_RSASHA512: DnsSecAlgorithm = 10;
pub const ALGO_ECDSAP256SHA256: DnsSecAlgorithm = 13;
pub const ALGO_ECDSAP384SHA384: DnsSecAlgorithm = 14;
pub const ALGO_INDIRECT: DnsSecAlgorithm = 252;
pub const ALGO_PRIVATEDNS: DnsSecAlgorithm = 253;
pub const ALGO_PRIVATEOID: DnsSecAlgorithm = 254;

/**
# Digest Algorithms
## Available Formats

|Value|Description|Status|Reference|
|-----|-----------|------|---------|
|1	  |SHA-1	  |MANDATORY|[RFC3658][RFC3658]|
|2	  |SHA-256    |MANDATORY|[RFC4509][RFC4509]|
|4	  |SHA-384	  |OPTIONAL|[RFC6605][RFC6605]|

[RFC3658]: https://www.rfc-editor.org/rfc/rfc3658.html
[RFC4509]: https://www.rfc-editor.org/rfc/rfc4059.html
[RFC6605]: https://www.rfc-editor.org/rfc/rfc6605.html
 */
pub type DigestAlgorithm = u8;

pub const DIGEST_SHA1: DigestAlgorithm = 1;
pub const DIGEST_SHA256: DigestAlgorithm = 2;
pub const DIGEST_SHA384: DigestAlgorithm = 4;

/// The signing algorithms this crate's [`crate::signer::Signer`] actually
/// implements (a strict subset of the IANA registry above, per spec.md
/// §4.J: RSASHA1, ECDSAP256SHA256, ECDSAP384SHA384 — extended here with
/// RSASHA256/RSASHA512 since the `rsa` crate makes them free).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    RsaSha1,
    RsaSha256,
    RsaSha512,
    EcdsaP256Sha256,
    EcdsaP384Sha384,
}

impl SigningAlgorithm {
    pub fn to_wire(self) -> DnsSecAlgorithm {
        match self {
            SigningAlgorithm::RsaSha1 => ALGO_RSASHA1,
            SigningAlgorithm::RsaSha256 => ALGO_RSASHA256,
            SigningAlgorithm::RsaSha512 => ALGO_RSASHA512,
            SigningAlgorithm::EcdsaP256Sha256 => ALGO_ECDSAP256SHA256,
            SigningAlgorithm::EcdsaP384Sha384 => ALGO_ECDSAP384SHA384,
        }
    }

    pub fn from_wire(value: DnsSecAlgorithm) -> Option<Self> {
        match value {
            ALGO_RSASHA1 => Some(SigningAlgorithm::RsaSha1),
            ALGO_RSASHA256 => Some(SigningAlgorithm::RsaSha256),
            ALGO_RSASHA512 => Some(SigningAlgorithm::RsaSha512),
            ALGO_ECDSAP256SHA256 => Some(SigningAlgorithm::EcdsaP256Sha256),
            ALGO_ECDSAP384SHA384 => Some(SigningAlgorithm::EcdsaP384Sha384),
            _ => None,
        }
    }
}
