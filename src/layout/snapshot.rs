use egui::{Rect, Vec2};

use super::{Item, ItemId, ItemKind, ItemTree};
use crate::frame::FrameId;
use crate::geometry::Orientation;

/// Flat structural snapshot of an [`ItemTree`].
///
/// `nodes[0]` is the root container; children refer to other nodes by index.
/// `Guest` is whatever the caller stores per leaf (typically the frame's tabs).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LayoutSnapshot<Guest> {
    pub layout_rect: Rect,
    pub nodes: Vec<ItemSnapshot<Guest>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ItemSnapshot<Guest> {
    Guest {
        guest: Guest,
        share: f32,
        min_size: Vec2,
        visible: bool,
    },
    Container {
        orientation: Orientation,
        children: Vec<usize>,
        share: f32,
    },
}

impl<Guest> LayoutSnapshot<Guest> {
    /// Number of guest nodes, placeholders included.
    pub fn guest_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, ItemSnapshot::Guest { .. }))
            .count()
    }
}

impl ItemTree {
    /// Capture the tree structure, calling `guest` once per leaf.
    pub fn snapshot_with<Guest>(
        &self,
        mut guest: impl FnMut(FrameId) -> Guest,
    ) -> LayoutSnapshot<Guest> {
        fn snapshot_node<Guest>(
            tree: &ItemTree,
            id: ItemId,
            nodes: &mut Vec<ItemSnapshot<Guest>>,
            guest: &mut dyn FnMut(FrameId) -> Guest,
        ) -> Option<usize> {
            let item = tree.items.get(&id)?;

            // Reserve the slot first so the root stays at index 0.
            let idx = nodes.len();
            nodes.push(ItemSnapshot::Container {
                orientation: Orientation::Horizontal,
                children: Vec::new(),
                share: item.share,
            });

            let node = match &item.kind {
                ItemKind::Guest { frame } => ItemSnapshot::Guest {
                    guest: guest(*frame),
                    share: item.share,
                    min_size: item.min_size,
                    visible: item.visible,
                },
                ItemKind::Container {
                    orientation,
                    children,
                } => ItemSnapshot::Container {
                    orientation: *orientation,
                    children: children
                        .iter()
                        .filter_map(|&c| snapshot_node(tree, c, nodes, guest))
                        .collect(),
                    share: item.share,
                },
            };
            nodes[idx] = node;
            Some(idx)
        }

        let mut nodes = Vec::with_capacity(self.items.len());
        snapshot_node(self, self.root, &mut nodes, &mut guest);
        LayoutSnapshot {
            layout_rect: self.layout_rect(),
            nodes,
        }
    }

    /// Rebuild a tree from `snapshot`.
    ///
    /// `guest_from` maps each stored leaf to the frame hosting it; leaves it returns `None` for
    /// are dropped, as are containers left without children. Malformed indices are ignored.
    pub fn restore_try<Guest>(
        snapshot: LayoutSnapshot<Guest>,
        separator_thickness: f32,
        hardcoded_min_size: Vec2,
        mut guest_from: impl FnMut(Guest) -> Option<FrameId>,
    ) -> Self {
        let LayoutSnapshot { layout_rect, nodes } = snapshot;
        let mut tree = Self::new(layout_rect, separator_thickness, hardcoded_min_size);

        let mut slots: Vec<Option<ItemSnapshot<Guest>>> = nodes.into_iter().map(Some).collect();
        let Some(Some(ItemSnapshot::Container {
            orientation,
            children,
            ..
        })) = slots.first_mut().map(Option::take)
        else {
            if !slots.is_empty() {
                log::warn!("layout snapshot root is not a container; restoring an empty layout");
            }
            return tree;
        };

        fn build_node<Guest>(
            tree: &mut ItemTree,
            slots: &mut [Option<ItemSnapshot<Guest>>],
            idx: usize,
            parent: ItemId,
            guest_from: &mut dyn FnMut(Guest) -> Option<FrameId>,
        ) -> Option<ItemId> {
            // Taking the slot also breaks cycles in a corrupt snapshot.
            let node = slots.get_mut(idx)?.take()?;
            match node {
                ItemSnapshot::Guest {
                    guest,
                    share,
                    min_size,
                    visible,
                } => {
                    let frame = guest_from(guest)?;
                    let id = tree.alloc_id();
                    let mut item = Item::guest(frame, min_size);
                    item.parent = Some(parent);
                    item.share = share;
                    item.visible = visible;
                    tree.items.insert(id, item);
                    Some(id)
                }
                ItemSnapshot::Container {
                    orientation,
                    children,
                    share,
                } => {
                    let id = tree.alloc_id();
                    let mut item = Item::container(orientation, Vec::new());
                    item.parent = Some(parent);
                    item.share = share;
                    tree.items.insert(id, item);

                    let built: Vec<ItemId> = children
                        .into_iter()
                        .filter_map(|c| build_node(tree, slots, c, id, guest_from))
                        .collect();
                    match built.as_slice() {
                        [] => {
                            tree.items.remove(&id);
                            None
                        }
                        [only] => {
                            let only = *only;
                            tree.items.remove(&id);
                            if let Some(child) = tree.items.get_mut(&only) {
                                child.parent = Some(parent);
                                child.share = share;
                            }
                            Some(only)
                        }
                        _ => {
                            if let Some(container) = tree.items.get_mut(&id) {
                                container.kind = ItemKind::Container {
                                    orientation,
                                    children: built,
                                };
                            }
                            Some(id)
                        }
                    }
                }
            }
        }

        let root = tree.root;
        let built: Vec<ItemId> = children
            .into_iter()
            .filter_map(|c| build_node(&mut tree, &mut slots, c, root, &mut guest_from))
            .collect();
        if let Some(item) = tree.items.get_mut(&root) {
            item.kind = ItemKind::Container {
                orientation,
                children: built,
            };
        }
        tree.relayout();
        tree
    }
}

#[cfg(test)]
mod tests {
    use egui::Pos2;

    use super::*;
    use crate::layout::{DockLocation, tree_integrity_issues};

    fn sample() -> (ItemTree, [ItemId; 3]) {
        let mut tree = ItemTree::new(
            Rect::from_min_size(Pos2::ZERO, Vec2::new(900.0, 600.0)),
            5.0,
            Vec2::new(80.0, 90.0),
        );
        let frame = FrameId::from_u64;
        let a = tree.insert_item(frame(1), Vec2::ZERO, DockLocation::Left, None).unwrap();
        let b = tree.insert_item(frame(2), Vec2::ZERO, DockLocation::Right, None).unwrap();
        let c = tree
            .insert_item(frame(3), Vec2::new(100.0, 100.0), DockLocation::Bottom, Some(b))
            .unwrap();
        tree.move_separator(tree.root(), 0, 120.0);
        tree.set_item_visible(c, false);
        (tree, [a, b, c])
    }

    #[test]
    fn snapshot_root_is_first_node() {
        let (tree, _) = sample();
        let snapshot = tree.snapshot_with(|f| f);
        assert!(matches!(snapshot.nodes[0], ItemSnapshot::Container { .. }));
        assert_eq!(snapshot.guest_count(), 3);
    }

    #[test]
    fn restore_reproduces_geometry_and_placeholders() {
        let (tree, [a, b, c]) = sample();
        let snapshot = tree.snapshot_with(|f| f);
        let restored = ItemTree::restore_try(snapshot, 5.0, Vec2::new(80.0, 90.0), Some);

        assert!(tree_integrity_issues(&restored).is_empty());
        for (id, frame) in [(a, 1), (b, 2)] {
            let restored_id = restored.item_for_frame(FrameId::from_u64(frame)).unwrap();
            assert_eq!(
                restored.get(restored_id).unwrap().geometry(),
                tree.get(id).unwrap().geometry()
            );
        }
        let placeholder = restored.item_for_frame(FrameId::from_u64(3)).unwrap();
        assert!(!restored.is_item_visible(placeholder));
        assert!(tree.contains(c));
    }

    #[test]
    fn missing_guests_are_dropped_and_containers_collapse() {
        let (tree, _) = sample();
        let snapshot = tree.snapshot_with(|f| f);
        let restored = ItemTree::restore_try(snapshot, 5.0, Vec2::new(80.0, 90.0), |f| {
            (f != FrameId::from_u64(3)).then_some(f)
        });

        assert!(tree_integrity_issues(&restored).is_empty());
        assert_eq!(restored.leaf_items().len(), 2);
        let b = restored.item_for_frame(FrameId::from_u64(2)).unwrap();
        assert_eq!(restored.get(b).unwrap().parent(), Some(restored.root()));
    }

    #[test]
    fn malformed_snapshot_restores_empty() {
        let snapshot: LayoutSnapshot<FrameId> = LayoutSnapshot {
            layout_rect: Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0)),
            nodes: vec![ItemSnapshot::Guest {
                guest: FrameId::from_u64(1),
                share: 1.0,
                min_size: Vec2::ZERO,
                visible: true,
            }],
        };
        let restored = ItemTree::restore_try(snapshot, 5.0, Vec2::ZERO, Some);
        assert!(restored.is_empty());
        assert_eq!(restored.len(), 1);
    }
}
