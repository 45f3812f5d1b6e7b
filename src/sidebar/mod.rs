//! Side bars: per-edge strips holding minimized panels.

mod placement;

pub use placement::preferred_location;

/// Which edge of a main window a side bar sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SideBarLocation {
    North,
    East,
    West,
    South,

    /// No side bar; returned when no suitable location exists.
    None,
}

impl SideBarLocation {
    /// The four real locations.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::West, Self::South];

    /// West and East bars stack their buttons vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}

/// An ordered list of minimized panels along one edge of a main window.
///
/// Panels are referenced by unique name. A side bar is visible iff it is not empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideBar {
    location: SideBarLocation,
    panels: Vec<String>,
}

impl SideBar {
    pub fn new(location: SideBarLocation) -> Self {
        Self {
            location,
            panels: Vec::new(),
        }
    }

    pub fn location(&self) -> SideBarLocation {
        self.location
    }

    pub fn is_vertical(&self) -> bool {
        self.location.is_vertical()
    }

    /// Append a panel. Adding the same panel twice is a no-op.
    pub fn add_panel(&mut self, unique_name: &str) {
        if self.contains(unique_name) {
            log::warn!("{unique_name:?} is already in side bar {:?}", self.location);
            return;
        }
        self.panels.push(unique_name.to_owned());
    }

    /// Returns `true` if the panel was there.
    pub fn remove_panel(&mut self, unique_name: &str) -> bool {
        let before = self.panels.len();
        self.panels.retain(|p| p != unique_name);
        self.panels.len() != before
    }

    pub fn contains(&self, unique_name: &str) -> bool {
        self.panels.iter().any(|p| p == unique_name)
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        !self.is_empty()
    }

    pub fn panels(&self) -> &[String] {
        &self.panels
    }

    /// Unique names in button order.
    pub fn serialize(&self) -> Vec<String> {
        self.panels.clone()
    }

    pub fn clear(&mut self) {
        self.panels.clear();
    }
}
