use super::{ItemId, ItemTree};

/// Which outer edges of the root layout an item touches.
///
/// A tiny bitset over `NORTH`, `EAST`, `WEST`, `SOUTH`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayoutBorderLocations(u8);

impl LayoutBorderLocations {
    pub const NONE: Self = Self(0);
    pub const NORTH: Self = Self(1);
    pub const EAST: Self = Self(2);
    pub const WEST: Self = Self(4);
    pub const SOUTH: Self = Self(8);
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    /// East and West: the left and right borders.
    pub const VERTICALS: Self = Self(2 | 4);

    /// North and South: the top and bottom borders.
    pub const HORIZONTALS: Self = Self(1 | 8);

    /// The four single-border values, in a fixed order.
    pub const EACH: [Self; 4] = [Self::NORTH, Self::EAST, Self::WEST, Self::SOUTH];

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every border in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for LayoutBorderLocations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for LayoutBorderLocations {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for LayoutBorderLocations {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::Not for LayoutBorderLocations {
    type Output = Self;

    /// Complement within the four borders.
    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl ItemTree {
    /// The outer layout borders `item` currently touches.
    ///
    /// Computed from the tree structure on every call: the root touches everything; a child of a
    /// vertical container inherits its parent's West/East and gets North/South only when it is
    /// the first/last *visible* child and the parent touches that border. Horizontal containers
    /// are symmetric. Hidden items and unknown ids touch nothing.
    pub fn adjacent_layout_borders(&self, item: ItemId) -> LayoutBorderLocations {
        type B = LayoutBorderLocations;

        if item == self.root {
            return B::ALL;
        }

        let Some(parent) = self.get(item).and_then(|i| i.parent) else {
            return B::NONE;
        };
        let Some(orientation) = self.get(parent).and_then(|p| p.orientation()) else {
            return B::NONE;
        };

        let visible = self.visible_children(parent);
        let Some(index) = visible.iter().position(|&c| c == item) else {
            return B::NONE;
        };
        let is_first = index == 0;
        let is_last = index + 1 == visible.len();

        // Borders along the container's axis (start/end) and across it (both sides).
        let (across, start, end) = if orientation.is_vertical() {
            (B::VERTICALS, B::NORTH, B::SOUTH)
        } else {
            (B::HORIZONTALS, B::WEST, B::EAST)
        };

        let parent_borders = self.adjacent_layout_borders(parent);

        let mut locations = parent_borders & across;
        if is_first && parent_borders.contains(start) {
            locations |= start;
        }
        if is_last && parent_borders.contains(end) {
            locations |= end;
        }
        locations
    }
}
