//! The multisplitter: a tree of nested horizontal/vertical boxes whose leaves host frames.
//!
//! Items are stored in an arena keyed by [`ItemId`]. The root is always a container and owns
//! the layout rect. Every mutation ends with a relayout, so geometries are always current.

use std::collections::BTreeMap;

use egui::{Rect, Vec2};
use itertools::Itertools as _;

use crate::error::DockError;
use crate::frame::FrameId;
use crate::geometry::{Orientation, bound_size};

mod borders;
mod integrity;
mod relayout;
mod snapshot;


pub use borders::LayoutBorderLocations;
pub use snapshot::{ItemSnapshot, LayoutSnapshot};

pub(crate) use integrity::tree_integrity_issues;

/// Identifies an item in an [`ItemTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn from_u64(n: u64) -> Self {
        Self(n)
    }
}

/// Where to put a new item relative to the layout or to another item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockLocation {
    Left,
    Top,
    Right,
    Bottom,
}

impl DockLocation {
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Top | Self::Bottom => Orientation::Vertical,
        }
    }

    /// `true` for Left and Top: the new item goes before its neighbor.
    pub fn is_start(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    /// A leaf hosting a frame.
    Guest { frame: FrameId },

    /// A box of child items laid out along `orientation`.
    Container {
        orientation: Orientation,
        children: Vec<ItemId>,
    },
}

/// A resizable region of the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    kind: ItemKind,
    parent: Option<ItemId>,
    geometry: Rect,
    min_size: Vec2,
    max_size: Vec2,
    share: f32,
    visible: bool,
}

impl Item {
    fn guest(frame: FrameId, min_size: Vec2) -> Self {
        Self {
            kind: ItemKind::Guest { frame },
            parent: None,
            geometry: Rect::NOTHING,
            min_size,
            max_size: Vec2::INFINITY,
            share: 1.0,
            visible: true,
        }
    }

    fn container(orientation: Orientation, children: Vec<ItemId>) -> Self {
        Self {
            kind: ItemKind::Container {
                orientation,
                children,
            },
            parent: None,
            geometry: Rect::NOTHING,
            min_size: Vec2::ZERO,
            max_size: Vec2::INFINITY,
            share: 1.0,
            visible: true,
        }
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Geometry in layout coordinates. Hidden items keep their last geometry.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Relative weight within the parent container.
    pub fn share(&self) -> f32 {
        self.share
    }

    pub fn frame(&self) -> Option<FrameId> {
        match self.kind {
            ItemKind::Guest { frame } => Some(frame),
            ItemKind::Container { .. } => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ItemKind::Container { .. })
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self.kind {
            ItemKind::Guest { .. } => None,
            ItemKind::Container { orientation, .. } => Some(orientation),
        }
    }

    pub fn children(&self) -> &[ItemId] {
        match &self.kind {
            ItemKind::Guest { .. } => &[],
            ItemKind::Container { children, .. } => children,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<ItemId>> {
        match &mut self.kind {
            ItemKind::Guest { .. } => None,
            ItemKind::Container { children, .. } => Some(children),
        }
    }
}

/// The layout tree of one dock area.
#[derive(Clone, Debug)]
pub struct ItemTree {
    items: BTreeMap<ItemId, Item>,
    root: ItemId,
    next_id: u64,
    separator_thickness: f32,
    hardcoded_min_size: Vec2,
}

impl ItemTree {
    pub fn new(layout_rect: Rect, separator_thickness: f32, hardcoded_min_size: Vec2) -> Self {
        let mut tree = Self {
            items: BTreeMap::new(),
            root: ItemId(0),
            next_id: 1,
            separator_thickness,
            hardcoded_min_size,
        };
        let mut root = Item::container(Orientation::Horizontal, Vec::new());
        root.geometry = layout_rect;
        tree.items.insert(tree.root, root);
        tree
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of items, containers included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_items().is_empty()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn layout_rect(&self) -> Rect {
        self.items[&self.root].geometry
    }

    pub fn separator_thickness(&self) -> f32 {
        self.separator_thickness
    }

    fn alloc_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// All guest items, depth-first in layout order.
    pub fn leaf_items(&self) -> Vec<ItemId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            match &item.kind {
                ItemKind::Guest { .. } => leaves.push(id),
                ItemKind::Container { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        leaves
    }

    pub fn item_for_frame(&self, frame: FrameId) -> Option<ItemId> {
        self.items
            .iter()
            .find(|(_, item)| item.frame() == Some(frame))
            .map(|(&id, _)| id)
    }

    /// Guests are visible unless hidden as placeholders; containers are visible if any child is.
    pub fn is_item_visible(&self, id: ItemId) -> bool {
        let Some(item) = self.items.get(&id) else {
            return false;
        };
        match &item.kind {
            ItemKind::Guest { .. } => item.visible,
            ItemKind::Container { children, .. } => {
                children.iter().any(|&c| self.is_item_visible(c))
            }
        }
    }

    pub fn visible_children(&self, container: ItemId) -> Vec<ItemId> {
        self.items
            .get(&container)
            .map(|item| {
                item.children()
                    .iter()
                    .copied()
                    .filter(|&c| self.is_item_visible(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Effective minimum size: guests are never below the hardcoded minimum; containers add up
    /// their visible children along their axis, plus separators.
    pub fn item_min_size(&self, id: ItemId) -> Vec2 {
        let Some(item) = self.items.get(&id) else {
            return Vec2::ZERO;
        };
        match &item.kind {
            ItemKind::Guest { .. } => item.min_size.max(self.hardcoded_min_size),
            ItemKind::Container { orientation, .. } => {
                let visible = self.visible_children(id);
                if visible.is_empty() {
                    return Vec2::ZERO;
                }
                let separators = self.separator_thickness * (visible.len() - 1) as f32;
                let (length, breadth) = visible.iter().fold((separators, 0.0_f32), |acc, &c| {
                    let min = self.item_min_size(c);
                    (acc.0 + orientation.length(min), acc.1.max(orientation.breadth(min)))
                });
                orientation.size(length, breadth)
            }
        }
    }

    pub fn item_max_size(&self, id: ItemId) -> Vec2 {
        let Some(item) = self.items.get(&id) else {
            return Vec2::INFINITY;
        };
        match &item.kind {
            ItemKind::Guest { .. } => item.max_size.max(self.item_min_size(id)),
            ItemKind::Container { orientation, .. } => {
                let visible = self.visible_children(id);
                if visible.is_empty() {
                    return Vec2::INFINITY;
                }
                let separators = self.separator_thickness * (visible.len() - 1) as f32;
                let (length, breadth) =
                    visible
                        .iter()
                        .fold((separators, f32::INFINITY), |acc, &c| {
                            let max = self.item_max_size(c);
                            (acc.0 + orientation.length(max), acc.1.min(orientation.breadth(max)))
                        });
                orientation.size(length, breadth)
            }
        }
    }

    /// Insert a new guest hosting `frame`.
    ///
    /// With `relative_to == None` the item goes to the `location` edge of the whole layout;
    /// otherwise next to the `relative_to` guest. When the target container has the wrong
    /// orientation a new container is created so that the requested side is honored.
    pub fn insert_item(
        &mut self,
        frame: FrameId,
        min_size: Vec2,
        location: DockLocation,
        relative_to: Option<ItemId>,
    ) -> Result<ItemId, DockError> {
        if let Some(relative_to) = relative_to {
            match self.items.get(&relative_to) {
                Some(item) if !item.is_container() => {}
                Some(_) => {
                    return Err(DockError::invalid(format!(
                        "cannot dock relative to container item {relative_to:?}"
                    ))
                    .warn());
                }
                None => {
                    return Err(
                        DockError::not_found(format!("relative item {relative_to:?}")).warn()
                    );
                }
            }
        }

        let new_id = self.alloc_id();
        let mut item = Item::guest(frame, min_size);

        match relative_to {
            None => {
                let root = self.root;
                self.ensure_orientation(root, location.orientation());
                let visible = self.visible_children(root);
                item.share = if visible.is_empty() {
                    1.0
                } else {
                    visible.iter().map(|&c| self.items[&c].share).sum::<f32>()
                        / visible.len() as f32
                };
                item.parent = Some(root);
                self.items.insert(new_id, item);
                if let Some(children) = self.items.get_mut(&root).and_then(Item::children_mut) {
                    if location.is_start() {
                        children.insert(0, new_id);
                    } else {
                        children.push(new_id);
                    }
                }
            }
            Some(relative_to) => {
                let parent = self.items[&relative_to].parent.unwrap_or(self.root);
                let parent_item = &self.items[&parent];
                let parent_orientation = parent_item.orientation();
                let parent_len = parent_item.children().len();

                if parent_orientation == Some(location.orientation()) || parent_len <= 1 {
                    self.set_orientation(parent, location.orientation());
                    let half = self.items[&relative_to].share * 0.5;
                    if let Some(r) = self.items.get_mut(&relative_to) {
                        r.share = half;
                    }
                    item.share = half;
                    item.parent = Some(parent);
                    self.items.insert(new_id, item);
                    self.insert_next_to(parent, relative_to, new_id, location.is_start());
                } else {
                    // Wrap `relative_to` in a new container of the requested orientation.
                    let wrapper = self.alloc_id();
                    let children = if location.is_start() {
                        vec![new_id, relative_to]
                    } else {
                        vec![relative_to, new_id]
                    };
                    let mut container = Item::container(location.orientation(), children);
                    container.parent = Some(parent);
                    container.share = self.items[&relative_to].share;
                    container.geometry = self.items[&relative_to].geometry;

                    if let Some(children) = self.items.get_mut(&parent).and_then(Item::children_mut)
                    {
                        if let Some(slot) = children.iter_mut().find(|c| **c == relative_to) {
                            *slot = wrapper;
                        }
                    }
                    if let Some(r) = self.items.get_mut(&relative_to) {
                        r.parent = Some(wrapper);
                        r.share = 1.0;
                    }
                    item.parent = Some(wrapper);
                    self.items.insert(new_id, item);
                    self.items.insert(wrapper, container);
                }
            }
        }

        log::debug!("insert_item {new_id:?} frame={frame:?} location={location:?} relative_to={relative_to:?}");
        self.relayout();
        Ok(new_id)
    }

    fn insert_next_to(&mut self, parent: ItemId, sibling: ItemId, new_id: ItemId, before: bool) {
        if let Some(children) = self.items.get_mut(&parent).and_then(Item::children_mut) {
            let index = children
                .iter()
                .position(|&c| c == sibling)
                .unwrap_or(children.len());
            let index = if before { index } else { index + 1 };
            children.insert(index.min(children.len()), new_id);
        }
    }

    fn set_orientation(&mut self, container: ItemId, new_orientation: Orientation) {
        if let Some(Item {
            kind: ItemKind::Container { orientation, .. },
            ..
        }) = self.items.get_mut(&container)
        {
            *orientation = new_orientation;
        }
    }

    /// Make `container` lay out along `wanted`, pushing its current children down into a new
    /// child container if it already has more than one.
    fn ensure_orientation(&mut self, container: ItemId, wanted: Orientation) {
        let item = &self.items[&container];
        if item.orientation() == Some(wanted) {
            return;
        }
        if item.children().len() <= 1 {
            self.set_orientation(container, wanted);
            return;
        }

        let old_orientation = item.orientation().unwrap_or(Orientation::Horizontal);
        let old_children = item.children().to_vec();
        let geometry = item.geometry;

        let wrapper = self.alloc_id();
        let mut inner = Item::container(old_orientation, old_children.clone());
        inner.parent = Some(container);
        inner.geometry = geometry;
        for child in old_children {
            if let Some(c) = self.items.get_mut(&child) {
                c.parent = Some(wrapper);
            }
        }
        self.items.insert(wrapper, inner);

        if let Some(item) = self.items.get_mut(&container) {
            item.kind = ItemKind::Container {
                orientation: wanted,
                children: vec![wrapper],
            };
        }
    }

    /// Remove a guest (or a whole non-root subtree). Containers left with a single child are
    /// collapsed into their parent; empty ones are removed.
    ///
    /// Returns the frames that were hosted by the removed items.
    pub fn remove_item(&mut self, id: ItemId) -> Vec<FrameId> {
        if id == self.root {
            log::warn!("refusing to remove the root item");
            return Vec::new();
        }
        let Some(parent) = self.items.get(&id).map(|i| i.parent) else {
            return Vec::new();
        };

        let mut frames = Vec::new();
        self.drop_subtree(id, &mut frames);

        if let Some(parent) = parent {
            if let Some(children) = self.items.get_mut(&parent).and_then(Item::children_mut) {
                children.retain(|&c| c != id);
            }
            self.simplify(parent);
        }

        self.relayout();
        frames
    }

    fn drop_subtree(&mut self, id: ItemId, frames: &mut Vec<FrameId>) {
        let Some(item) = self.items.remove(&id) else {
            return;
        };
        match item.kind {
            ItemKind::Guest { frame } => frames.push(frame),
            ItemKind::Container { children, .. } => {
                for child in children {
                    self.drop_subtree(child, frames);
                }
            }
        }
    }

    fn simplify(&mut self, container: ItemId) {
        if container == self.root {
            return;
        }
        let Some(item) = self.items.get(&container) else {
            return;
        };
        let Some(grandparent) = item.parent else {
            return;
        };
        let children = item.children().to_vec();
        let share = item.share;

        match children.as_slice() {
            [] => {
                self.items.remove(&container);
                if let Some(siblings) = self.items.get_mut(&grandparent).and_then(Item::children_mut)
                {
                    siblings.retain(|&c| c != container);
                }
                self.simplify(grandparent);
            }
            [only] => {
                let only = *only;
                self.items.remove(&container);
                if let Some(siblings) = self.items.get_mut(&grandparent).and_then(Item::children_mut)
                {
                    if let Some(slot) = siblings.iter_mut().find(|c| **c == container) {
                        *slot = only;
                    }
                }
                if let Some(child) = self.items.get_mut(&only) {
                    child.parent = Some(grandparent);
                    child.share = share;
                }
            }
            _ => {}
        }
    }

    /// Hide or show a guest. Hidden guests stay in the tree as placeholders and take no space.
    pub fn set_item_visible(&mut self, id: ItemId, visible: bool) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if item.is_container() || item.visible == visible {
            return;
        }
        item.visible = visible;
        self.relayout();
    }

    pub fn set_guest_min_size(&mut self, id: ItemId, min_size: Vec2) {
        if let Some(item) = self.items.get_mut(&id) {
            if !item.is_container() {
                item.min_size = min_size;
                self.relayout();
            }
        }
    }

    pub fn set_guest_max_size(&mut self, id: ItemId, max_size: Vec2) {
        if let Some(item) = self.items.get_mut(&id) {
            if !item.is_container() {
                item.max_size = max_size;
                self.relayout();
            }
        }
    }

    /// Resize the whole layout.
    pub fn set_layout_rect(&mut self, rect: Rect) {
        if let Some(root) = self.items.get_mut(&self.root) {
            root.geometry = rect;
        }
        self.relayout();
    }

    /// Recompute every visible item's geometry from the root rect.
    pub fn relayout(&mut self) {
        let rect = self.layout_rect();
        self.layout_container(self.root, rect);
    }

    fn layout_container(&mut self, id: ItemId, rect: Rect) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        item.geometry = rect;
        let Some(orientation) = item.orientation() else {
            let clamped = bound_size(self.item_min_size(id), rect.size(), self.item_max_size(id));
            if let Some(item) = self.items.get_mut(&id) {
                item.geometry = Rect::from_min_size(rect.min, clamped);
            }
            return;
        };

        let visible = self.visible_children(id);
        if visible.is_empty() {
            return;
        }

        let separators = self.separator_thickness * (visible.len() - 1) as f32;
        let available = (orientation.length(rect.size()) - separators).max(0.0);
        let shares: Vec<f32> = visible.iter().map(|c| self.items[c].share).collect();
        let mins: Vec<f32> = visible
            .iter()
            .map(|&c| orientation.length(self.item_min_size(c)))
            .collect();
        let maxs: Vec<f32> = visible
            .iter()
            .map(|&c| orientation.length(self.item_max_size(c)))
            .collect();

        let lengths = relayout::distribute(available, &shares, &mins, &maxs);

        let mut pos = orientation.start(rect);
        for (child, length) in visible.into_iter().zip(lengths) {
            let child_rect = orientation.slice(rect, pos, length);
            self.layout_container(child, child_rect);
            pos += length + self.separator_thickness;
        }
    }

    /// Give every child of every container the same share.
    pub fn layout_equally(&mut self) {
        let containers: Vec<ItemId> = self
            .items
            .iter()
            .filter(|(_, item)| item.is_container())
            .map(|(&id, _)| id)
            .collect();
        for container in containers {
            self.reset_shares(container);
        }
        self.relayout();
    }

    /// Give every child of `container` the same share.
    pub fn layout_container_equally(&mut self, container: ItemId) {
        if self.items.get(&container).is_some_and(Item::is_container) {
            self.reset_shares(container);
            self.relayout();
        }
    }

    fn reset_shares(&mut self, container: ItemId) {
        let children = self.items[&container].children().to_vec();
        for child in children {
            if let Some(c) = self.items.get_mut(&child) {
                c.share = 1.0;
            }
        }
    }

    /// Rects of the splitters between visible children of `container`.
    pub fn separator_rects(&self, container: ItemId) -> Vec<Rect> {
        let Some(orientation) = self.get(container).and_then(Item::orientation) else {
            return Vec::new();
        };
        let rect = self.items[&container].geometry;
        self.visible_children(container)
            .into_iter()
            .tuple_windows()
            .map(|(a, _b)| {
                let end = orientation.start(self.items[&a].geometry)
                    + orientation.length(self.items[&a].geometry.size());
                orientation.slice(rect, end, self.separator_thickness)
            })
            .collect()
    }

    /// Drag the `index`-th splitter of `container` by `delta` points along its axis.
    ///
    /// The two neighbors never shrink below their minimum nor grow past their maximum.
    /// Returns the delta that was actually applied.
    pub fn move_separator(&mut self, container: ItemId, index: usize, delta: f32) -> f32 {
        let Some(orientation) = self.get(container).and_then(Item::orientation) else {
            return 0.0;
        };
        let visible = self.visible_children(container);
        let (Some(&a), Some(&b)) = (visible.get(index), visible.get(index + 1)) else {
            return 0.0;
        };

        let len_a = orientation.length(self.items[&a].geometry.size());
        let len_b = orientation.length(self.items[&b].geometry.size());
        let (min_a, max_a) = (
            orientation.length(self.item_min_size(a)),
            orientation.length(self.item_max_size(a)),
        );
        let (min_b, max_b) = (
            orientation.length(self.item_min_size(b)),
            orientation.length(self.item_max_size(b)),
        );

        let lowest = (min_a - len_a).max(len_b - max_b).min(0.0);
        let highest = (len_b - min_b).min(max_a - len_a).max(0.0);
        let applied = delta.clamp(lowest, highest);
        if applied == 0.0 {
            return 0.0;
        }

        let new_a = len_a + applied;
        let new_b = len_b - applied;
        let total_share = self.items[&a].share + self.items[&b].share;
        let total_len = new_a + new_b;
        if total_len > 0.0 {
            if let Some(item) = self.items.get_mut(&a) {
                item.share = total_share * new_a / total_len;
            }
            if let Some(item) = self.items.get_mut(&b) {
                item.share = total_share * new_b / total_len;
            }
        }

        self.relayout();
        applied
    }
}
