use egui::{Pos2, Rect, Vec2};

/// Per-edge insets, in points.
///
/// `egui::Margin` stores `i8`s, which is too small for window chrome, so we keep our own.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn same(margin: f32) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        }
    }

    /// Shrink `rect` by these margins. Never produces a negative size.
    pub fn shrink_rect(self, rect: Rect) -> Rect {
        let min = Pos2::new(rect.min.x + self.left, rect.min.y + self.top);
        let max = Pos2::new(
            (rect.max.x - self.right).max(min.x),
            (rect.max.y - self.bottom).max(min.y),
        );
        Rect::from_min_max(min, max)
    }

    /// Grow `rect` by these margins.
    pub fn expand_rect(self, rect: Rect) -> Rect {
        Rect::from_min_max(
            Pos2::new(rect.min.x - self.left, rect.min.y - self.top),
            Pos2::new(rect.max.x + self.right, rect.max.y + self.bottom),
        )
    }
}

/// The two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Orientation {
    /// Children laid out left to right.
    Horizontal,

    /// Children laid out top to bottom.
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }

    pub fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Length of `size` along this axis.
    pub fn length(self, size: Vec2) -> f32 {
        match self {
            Self::Horizontal => size.x,
            Self::Vertical => size.y,
        }
    }

    /// Length of `size` across this axis.
    pub fn breadth(self, size: Vec2) -> f32 {
        self.other().length(size)
    }

    pub(crate) fn size(self, length: f32, breadth: f32) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(length, breadth),
            Self::Vertical => Vec2::new(breadth, length),
        }
    }

    /// Start coordinate of `rect` along this axis.
    pub(crate) fn start(self, rect: Rect) -> f32 {
        match self {
            Self::Horizontal => rect.min.x,
            Self::Vertical => rect.min.y,
        }
    }

    /// A sub-rect of `rect` covering `[start, start + length]` along this axis, full breadth.
    pub(crate) fn slice(self, rect: Rect, start: f32, length: f32) -> Rect {
        match self {
            Self::Horizontal => Rect::from_min_size(
                Pos2::new(start, rect.min.y),
                Vec2::new(length, rect.height()),
            ),
            Self::Vertical => Rect::from_min_size(
                Pos2::new(rect.min.x, start),
                Vec2::new(rect.width(), length),
            ),
        }
    }
}

/// Width divided by height; a degenerate height counts as "wide".
pub fn aspect_ratio(size: Vec2) -> f32 {
    if size.y <= 0.0 {
        return f32::INFINITY;
    }
    size.x / size.y
}

/// `value` clamped to `[min, max]`, where `min` wins if the bounds are inverted.
pub(crate) fn bound(min: f32, value: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Component-wise [`bound`].
pub(crate) fn bound_size(min: Vec2, value: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(bound(min.x, value.x, max.x), bound(min.y, value.y, max.y))
}
