pub mod algo;
pub mod dnskey;
pub mod ds;
pub mod key_tag;
pub mod legacy;
pub mod nsec;
pub mod nsec3;
pub mod nsec3param;
pub mod rrsig;
pub mod tkey;
