//! The zone engine: apex-anchored node tree plus its two denial-of-existence
//! companions (spec.md §3 "Zone"/"Node", §4.F/H/I).

pub mod master_file;
pub mod node;
pub mod nsec3_db;
pub mod nsec_db;
pub mod tree;

pub use node::Node;
pub use nsec3_db::Nsec3Db;
pub use nsec_db::NsecDb;
pub use tree::Zone;
