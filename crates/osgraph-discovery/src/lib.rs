//! Resource discovery for osgraph.
//!
//! A [`DiscoveryProvider`] lists the raw records of one [`ResourceKind`] at a
//! time. [`discover`] fans those calls out across kinds, retries temporary
//! failures, absorbs the rest into empty collections, waits for all kinds,
//! and then fills in the foreign keys the linking rules need but providers do not always
//! return (see [`annotate`]).
//!
//! [`ResourceKind`]: osgraph_core::ResourceKind

pub mod annotate;
pub mod inventory;
pub mod provider;

pub use annotate::annotate_foreign_keys;
pub use inventory::InventoryProvider;
pub use provider::{Discovered, DiscoveryProvider, LIST_ATTEMPTS, discover, safe_list};
