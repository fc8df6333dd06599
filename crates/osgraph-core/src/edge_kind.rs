//! Relationship tags carried by [`Edge::kind`](crate::Edge).
//!
//! Edge types are open strings on the wire; these are the ones the linking
//! pipeline emits and the tree renderer follows.

pub const ATTACHED: &str = "attached";
pub const HAS_SNAPSHOT: &str = "has_snapshot";
pub const HAS_SUBNET: &str = "has_subnet";
pub const HAS_SG: &str = "has_sg";
pub const HAS_PORT: &str = "has_port";
pub const HAS_LISTENER: &str = "has_listener";
pub const HAS_POOL: &str = "has_pool";
pub const HAS_POLICY: &str = "has_policy";
pub const HAS_RULE: &str = "has_rule";
pub const HAS_MONITOR: &str = "has_monitor";
pub const HAS_MEMBER: &str = "has_member";
pub const HAS_BACKUP: &str = "has_backup";
pub const HAS_RECORDSET: &str = "has_recordset";
