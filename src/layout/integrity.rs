use std::collections::{BTreeMap, BTreeSet};

use super::{ItemId, ItemKind, ItemTree};

/// Structural problems in `tree`, one line each. Empty when the tree is consistent.
pub(crate) fn tree_integrity_issues(tree: &ItemTree) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    let root = tree.root;

    let Some(root_item) = tree.items.get(&root) else {
        issues.push(format!("integrity: root {root:?} missing"));
        return issues;
    };
    if !root_item.is_container() {
        issues.push(format!("integrity: root {root:?} is not a container"));
    }
    if root_item.parent.is_some() {
        issues.push(format!("integrity: root {root:?} has a parent"));
    }

    let mut visited: BTreeSet<ItemId> = BTreeSet::new();
    let mut parent_of: BTreeMap<ItemId, ItemId> = BTreeMap::new();
    let mut stack: Vec<ItemId> = vec![root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(item) = tree.items.get(&id) else {
            issues.push(format!("integrity: missing item {id:?} (reachable)"));
            continue;
        };

        if !item.share.is_finite() || item.share <= 0.0 {
            issues.push(format!("integrity: item {id:?} has share {}", item.share));
        }

        let ItemKind::Container { children, .. } = &item.kind else {
            continue;
        };

        if id != root && children.len() < 2 {
            issues.push(format!(
                "integrity: container {id:?} has {} children",
                children.len()
            ));
        }

        let mut local: BTreeSet<ItemId> = BTreeSet::new();
        for &child in children {
            if !local.insert(child) {
                issues.push(format!(
                    "integrity: parent {id:?} contains duplicate child {child:?}"
                ));
            }

            let Some(child_item) = tree.items.get(&child) else {
                issues.push(format!(
                    "integrity: parent {id:?} references missing child {child:?}"
                ));
                continue;
            };
            if child_item.parent != Some(id) {
                issues.push(format!(
                    "integrity: child {child:?} of {id:?} points at parent {:?}",
                    child_item.parent
                ));
            }
            if let Some(prev_parent) = parent_of.insert(child, id) {
                issues.push(format!(
                    "integrity: child {child:?} has multiple parents {prev_parent:?} and {id:?}"
                ));
            }
            stack.push(child);
        }
    }

    let total = tree.items.len();
    if visited.len() != total {
        issues.push(format!(
            "integrity: unreachable items {} of {}",
            total.saturating_sub(visited.len()),
            total
        ));
    }

    let mut frames = BTreeSet::new();
    for (id, item) in &tree.items {
        if let ItemKind::Guest { frame } = item.kind {
            if !frames.insert(frame) {
                issues.push(format!("integrity: frame {frame:?} hosted twice (again by {id:?})"));
            }
        }
    }

    issues
}
