//! Error types for the DNS core: wire-format errors, zone-construction
//! errors, and internal invariant violations.

use thiserror::Error;

/// The wire bytes being parsed do not conform to DNS encoding.
///
/// A `FormatError` during message parsing maps to RCODE=FORMERR; the
/// question section is echoed back if the header itself was parseable,
/// otherwise the message is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer truncated: need {needed} bytes at offset {offset}, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("compression pointer at offset {pointer_offset} references offset {target} which is not strictly earlier")]
    ForwardPointer {
        pointer_offset: usize,
        target: usize,
    },

    #[error("name decompression exceeded 100 indirections starting at offset {start}")]
    PointerLoop { start: usize },

    #[error("label at offset {offset} has reserved top bits set without being a compression pointer")]
    ReservedLabelBits { offset: usize },

    #[error("domain name exceeds 255 octets")]
    NameTooLong,

    #[error("label exceeds 63 octets")]
    LabelTooLong,

    #[error("invalid escape sequence in presentation name: {0}")]
    BadEscape(String),

    #[error("field of length {field_len} at offset {offset} extends past RDLENGTH boundary {rdlength_end}")]
    PastRdata {
        offset: usize,
        field_len: usize,
        rdlength_end: usize,
    },

    #[error("TXT record character-string lengths sum to {actual}, rdlength is {expected}")]
    TxtLengthMismatch { expected: usize, actual: usize },

    #[error("a second OPT record was encountered in the additional section")]
    DuplicateOpt,

    #[error("OPT record encountered outside the additional section")]
    MisplacedOpt,

    #[error("TSIG record is not the last record of the additional section")]
    MisplacedTsig,

    #[error("unsupported or malformed RDATA for type {rtype}: {reason}")]
    BadRdata { rtype: u16, reason: String },
}

/// An internal invariant was violated by the implementation rather than by
/// attacker-controlled input. Must never be reachable once a zone has
/// passed [`crate::zone::Zone::verify`]; encountering one is a bug and the
/// worker handling the request should abort rather than guess.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicError {
    #[error("{0}")]
    Invariant(String),
}

impl LogicError {
    pub fn new(msg: impl Into<String>) -> Self {
        LogicError::Invariant(msg.into())
    }
}

/// The zone being constructed is structurally invalid. Raised during zone
/// build/verify and fatal to startup; never raised once the zone is serving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZoneError {
    #[error("owner {owner} is not a subdomain of the zone apex {apex}")]
    OwnerOutsideApex { owner: String, apex: String },

    #[error("zone {apex} has no SOA record at its apex")]
    MissingSoa { apex: String },

    #[error("zone {apex} has no NS records at its apex")]
    MissingApexNs { apex: String },

    #[error("owner {owner} has more than one CNAME record")]
    MultipleCname { owner: String },

    #[error("owner {owner} has a CNAME alongside other non-RRSIG/NSEC/NSEC3 data")]
    MixedCnameData { owner: String },

    #[error("owner {owner} already has an RRset of type {rtype} with TTL {existing_ttl}, cannot add TTL {new_ttl}")]
    TtlMismatch {
        owner: String,
        rtype: u16,
        existing_ttl: u32,
        new_ttl: u32,
    },
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// A key-configuration entry or key file could not be turned into usable
/// private-key material. Fatal to startup; never raised once keys are
/// loaded and the signer is serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("key configuration is not valid YAML: {0}")]
    Yaml(String),

    #[error("unsupported DNSSEC algorithm mnemonic {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("failed to read key file {path}: {reason}")]
    KeyFile { path: String, reason: String },

    #[error("invalid domain name {0:?} in key configuration: {1}")]
    BadDomain(String, FormatError),
}

/// A zone master file could not be tokenized or its records understood.
/// Fatal to startup; never raised once the zone is serving.
#[derive(Debug, Error)]
pub enum MasterFileError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("line {line}: record type {rtype:?} is not supported by this loader")]
    UnsupportedType { line: usize, rtype: String },

    #[error("line {line}: domain name {name:?} is invalid: {source}")]
    BadName {
        line: usize,
        name: String,
        source: FormatError,
    },

    #[error("line {line}: owner omitted but no previous owner is recorded")]
    NoPreviousOwner { line: usize },

    #[error("line {line}: zone construction failed: {source}")]
    Zone { line: usize, source: ZoneError },
}

/// Signing a RRset failed: either no loaded key matches the requested
/// algorithm/role, or the crypto backend itself rejected the operation.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("no private key available for algorithm {0:?}")]
    NoKeyMaterial(String),

    #[error("signature backend failure: {0}")]
    Backend(String),
}
