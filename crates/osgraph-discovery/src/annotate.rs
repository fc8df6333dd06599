//! Post-discovery foreign-key annotation.
//!
//! Pool members and L7 rules are sub-resources: providers list them per
//! parent, and the flattened records do not always say which parent they
//! came from. The parents do list their children, so the missing key is
//! recovered from there before linking.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use osgraph_core::{Record, ResourceCollections, ResourceKind};

/// Fill in every parent key the linking rules rely on.
pub fn annotate_foreign_keys(collections: &mut ResourceCollections) {
    annotate_member_pools(collections);
    annotate_rule_policies(collections);
}

/// Stamp `pool_id` on members that lack it, from each pool's `members` list.
pub fn annotate_member_pools(collections: &mut ResourceCollections) {
    let owners = owner_map(collections.get(ResourceKind::Pool), "members");
    let stamped = stamp_parent(collections, ResourceKind::Member, &owners, &["pool_id"]);
    debug!(count = stamped, "annotated member pool ids");
}

/// Stamp `l7_policy_id` on rules that carry neither `l7_policy_id` nor
/// `policy_id`, from each policy's `rules` list.
pub fn annotate_rule_policies(collections: &mut ResourceCollections) {
    let owners = owner_map(collections.get(ResourceKind::L7Policy), "rules");
    let stamped = stamp_parent(
        collections,
        ResourceKind::L7Rule,
        &owners,
        &["l7_policy_id", "policy_id"],
    );
    debug!(count = stamped, "annotated rule policy ids");
}

/// `child id -> parent id` from the parents' reference lists. The first
/// parent to claim a child keeps it.
fn owner_map(parents: &[Record], key: &str) -> HashMap<String, String> {
    let mut owners = HashMap::new();
    for parent in parents {
        let Some(parent_id) = parent.id() else {
            continue;
        };
        for child_id in parent.ref_ids(key) {
            owners
                .entry(child_id.to_string())
                .or_insert_with(|| parent_id.to_string());
        }
    }
    owners
}

/// Set `keys[0]` on every child of `kind` that has none of `keys`.
fn stamp_parent(
    collections: &mut ResourceCollections,
    kind: ResourceKind,
    owners: &HashMap<String, String>,
    keys: &[&'static str],
) -> usize {
    let Some(children) = collections.get_mut(kind) else {
        return 0;
    };
    let mut stamped = 0;
    for child in children.iter_mut() {
        if keys.iter().any(|key| child.str_field(key).is_some()) {
            continue;
        }
        let owner = child.id().and_then(|id| owners.get(id)).cloned();
        if let Some(parent_id) = owner {
            child.set(keys[0], Value::String(parent_id));
            stamped += 1;
        }
    }
    stamped
}
