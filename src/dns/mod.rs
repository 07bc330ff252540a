pub mod bitmap;
pub mod buffer;
pub mod edns;
pub mod header;
pub mod message;
pub mod name;
pub mod offset_table;
pub mod question;
pub mod rdata;
pub mod rr;

pub use header::Header;
pub use message::Message;
pub use name::Name;
pub use question::Question;
pub use rr::{ResourceRecord, RRset};

pub type Type = u16;
pub type Class = u16;

/// a host address
pub const TYPE_A: Type = 1;

/// an authoritative name server
pub const TYPE_NS: Type = 2;

/// a mail destination (Obsolete - use MX)
pub const TYPE_MD: Type = 3;

/// a mail forwarder (Obsolete - use MX)
pub const TYPE_MF: Type = 4;

/// the canonical name for an alias
pub const TYPE_CNAME: Type = 5;

/// marks the start of a zone of authority
pub const TYPE_SOA: Type = 6;

/// a mailbox domain name (EXPERIMENTAL)
pub const TYPE_MB: Type = 7;

/// a mail group member (EXPERIMENTAL)
pub const TYPE_MG: Type = 8;

/// a mail rename domain name (EXPERIMENTAL)
pub const TYPE_MR: Type = 9;

/// a null RR (EXPERIMENTAL)
pub const TYPE_NULL: Type = 10;

/// a well known service description
pub const TYPE_WKS: Type = 11;

/// a domain name pointer
pub const TYPE_PTR: Type = 12;

/// host information
pub const TYPE_HINFO: Type = 13;

/// mailbox or mail list information
pub const TYPE_MINFO: Type = 14;

/// mail exchange
pub const TYPE_MX: Type = 15;

/// text strings
pub const TYPE_TXT: Type = 16;

/// an IPv6 host address (RFC 3596)
pub const TYPE_AAAA: Type = 28;

/// a naming authority pointer (RFC 3403)
pub const TYPE_NAPTR: Type = 35;

/// a transaction key (RFC 2930)
pub const TYPE_TKEY: Type = 249;

/// a transaction signature (RFC 2845)
pub const TYPE_TSIG: Type = 250;

/// delegation of a subtree (RFC 6672)
pub const TYPE_DNAME: Type = 39;

/// OPT pseudo-record (RFC 6891)
pub const TYPE_OPT: Type = 41;

/// legacy signature (RFC 2535), superseded by RRSIG
pub const TYPE_SIG: Type = 24;

/// legacy public key (RFC 2535), superseded by DNSKEY
pub const TYPE_KEY: Type = 25;

/// legacy next-name denial of existence (RFC 2535), superseded by NSEC
pub const TYPE_NXT: Type = 30;

/// DS
pub const TYPE_DS: Type = 43;

/// RRSIG
pub const TYPE_RRSIG: Type = 46;

/// NSEC
pub const TYPE_NSEC: Type = 47;

/// DNSKEY
pub const TYPE_DNSKEY: Type = 48;

/// NSEC3
pub const TYPE_NSEC3: Type = 50;

/// NSEC3PARAM
pub const TYPE_NSEC3PARAM: Type = 51;

/// incremental zone transfer (RFC 1995)
pub const TYPE_IXFR: Type = 251;

/// for QType
pub const TYPE_AXFR: Type = 252;

/// for QType
pub const TYPE_MAILB: Type = 253;

/// for QType
pub const TYPE_MAILA: Type = 254;

/// for QType
///
/// ref: https://www.rfc-editor.org/rfc/rfc8482
pub const TYPE_ANY: Type = 255;

///  the Internet
pub const CLASS_IN: Class = 1;
/// the CSNET class (Obsolete - used only for examples in  some obsolete RFCs)
pub const CLASS_CS: Class = 2;
/// the CHAOS class
pub const CLASS_CH: Class = 3;
/// Hesiod [Dyer 87]
pub const CLASS_HS: Class = 4;

/// for QClass
pub const CLASS_ANY: Class = 255;

/// RCODE: No Error.
pub const RCODE_NOERROR: u8 = 0;
/// RCODE: Format Error.
pub const RCODE_FORMERR: u8 = 1;
/// RCODE: Server Failure.
pub const RCODE_SERVFAIL: u8 = 2;
/// RCODE: Name Error (NXDOMAIN).
pub const RCODE_NXDOMAIN: u8 = 3;
/// RCODE: Not Implemented.
pub const RCODE_NOTIMP: u8 = 4;
/// RCODE: Refused.
pub const RCODE_REFUSED: u8 = 5;

/// Query/Response opcode: a standard query (RFC 1035 §4.1.1).
pub const OPCODE_QUERY: u8 = 0;
