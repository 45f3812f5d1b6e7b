use egui::{Rect, Vec2};

/// Identifies a [`Frame`] within one main window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameId(u64);

impl FrameId {
    pub const fn from_u64(n: u64) -> Self {
        Self(n)
    }
}

/// What kind of frame this is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameOptions {
    /// The persistent central frame of a main window with a central frame.
    pub is_central: bool,

    /// A transient frame shown above the layout from a side bar.
    pub is_overlayed: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Tab {
    panel: String,
    min_size: Vec2,
}

/// A tab group of panels. Docked frames are hosted by a leaf of the item tree;
/// the overlay frame floats above the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    id: FrameId,
    options: FrameOptions,
    tabs: Vec<Tab>,
    current: usize,
    geometry: Rect,
    hardcoded_min_size: Vec2,
    visible: bool,
}

impl Frame {
    pub fn new(id: FrameId, options: FrameOptions, hardcoded_min_size: Vec2) -> Self {
        Self {
            id,
            options,
            tabs: Vec::new(),
            current: 0,
            geometry: Rect::NOTHING,
            hardcoded_min_size,
            visible: false,
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn options(&self) -> FrameOptions {
        self.options
    }

    pub fn is_central_frame(&self) -> bool {
        self.options.is_central
    }

    pub fn is_overlayed(&self) -> bool {
        self.options.is_overlayed
    }

    /// Panel names in tab order.
    pub fn panels(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.tabs.iter().map(|t| t.panel.as_str())
    }

    pub fn contains(&self, panel: &str) -> bool {
        self.tabs.iter().any(|t| t.panel == panel)
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Name of the active tab.
    pub fn current_panel(&self) -> Option<&str> {
        self.tabs.get(self.current).map(|t| t.panel.as_str())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_current_index(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.current = index;
        }
    }

    /// Append a tab and make it current. Adding a panel twice is a no-op.
    pub fn add_panel(&mut self, panel: impl Into<String>, min_size: Vec2) {
        let panel = panel.into();
        if self.contains(&panel) {
            log::warn!("frame {:?} already contains {panel:?}", self.id);
            return;
        }
        self.tabs.push(Tab { panel, min_size });
        self.current = self.tabs.len() - 1;
    }

    /// Returns `true` if the panel was there.
    pub fn remove_panel(&mut self, panel: &str) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.panel == panel) else {
            return false;
        };
        self.tabs.remove(index);
        if self.current >= self.tabs.len() || self.current > index {
            self.current = self.current.saturating_sub(1);
        }
        true
    }

    /// Largest minimum size among the tabs, never below the hardcoded minimum.
    pub fn min_size(&self) -> Vec2 {
        self.tabs
            .iter()
            .fold(self.hardcoded_min_size, |acc, t| acc.max(t.min_size))
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Rect) {
        self.geometry = geometry;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Constructs frames, including the transient overlay frame.
///
/// Apps that decorate frames (title bars, custom minimum sizes) plug in their own factory.
pub trait FrameFactory {
    fn create_frame(&mut self, id: FrameId, options: FrameOptions) -> Frame;
}

/// Plain frames using the configured hardcoded minimum size.
#[derive(Clone, Copy, Debug)]
pub struct DefaultFrameFactory {
    pub hardcoded_min_size: Vec2,
}

impl FrameFactory for DefaultFrameFactory {
    fn create_frame(&mut self, id: FrameId, options: FrameOptions) -> Frame {
        Frame::new(id, options, self.hardcoded_min_size)
    }
}
