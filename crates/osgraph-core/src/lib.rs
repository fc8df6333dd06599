//! Resource graph construction for a multi-service cloud project.
//!
//! Raw per-kind records (see [`Record`], [`ResourceCollections`]) become
//! [`Node`]s in a [`Graph`]; a fixed pipeline of linking rules then emits
//! typed [`Edge`]s from the foreign keys embedded in those records. The
//! finished graph is handed to renderers only as a [`GraphDocument`].
//!
//! ```text
//! ResourceCollections ──> build_graph ──> Graph ──> GraphDocument (JSON)
//!                           │
//!                           ├─ node assembly (naming, enrichment)
//!                           └─ link pipeline (attached, has_subnet, ...)
//! ```

pub mod assemble;
pub mod builder;
pub mod document;
pub mod edge_kind;
pub mod link;
pub mod meta;
pub mod model;
pub mod record;
pub mod resource;

pub use assemble::{ProjectScope, build_graph};
pub use builder::GraphBuilder;
pub use document::GraphDocument;
pub use link::{LINK_PIPELINE, LinkRule, apply_link_pipeline};
pub use meta::{Meta, MetaExt};
pub use model::{Edge, Graph, Node};
pub use osgraph_error::{Error, ErrorKind, Result};
pub use record::Record;
pub use resource::{ResourceCollections, ResourceKind};
