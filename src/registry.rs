use ahash::HashMap;
use egui::Vec2;

/// Behavior flags of a [`Panel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelOptions {
    /// The panel may only float; docking and tabbing it are refused.
    pub not_dockable: bool,
}

/// A dock widget: user-visible content that can be docked, minimized to a side bar, or overlayed.
///
/// Panels are identified everywhere by their unique name; the content itself belongs to the app.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    unique_name: String,
    pub title: String,
    pub options: PanelOptions,
    pub min_size: Vec2,
    affinities: Vec<String>,
}

impl Panel {
    pub fn new(unique_name: impl Into<String>) -> Self {
        let unique_name = unique_name.into();
        Self {
            title: unique_name.clone(),
            unique_name,
            options: PanelOptions::default(),
            min_size: Vec2::ZERO,
            affinities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PanelOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: Vec2) -> Self {
        self.min_size = min_size;
        self
    }

    /// Empty affinity names are dropped.
    #[must_use]
    pub fn with_affinities(mut self, affinities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.affinities = affinities
            .into_iter()
            .map(Into::into)
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn affinities(&self) -> &[String] {
        &self.affinities
    }

    pub fn is_dockable(&self) -> bool {
        !self.options.not_dockable
    }
}

/// Lookup table for panels and main windows, owned by the application root.
///
/// Operations that need to resolve a panel by name take a `&DockRegistry` explicitly.
#[derive(Debug, Default)]
pub struct DockRegistry {
    panels: HashMap<String, Panel>,
    main_windows: Vec<String>,
}

impl DockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a panel under its unique name.
    pub fn register_panel(&mut self, panel: Panel) {
        if self.panels.contains_key(panel.unique_name()) {
            log::debug!("replacing registered panel {:?}", panel.unique_name());
        }
        self.panels.insert(panel.unique_name.clone(), panel);
    }

    pub fn unregister_panel(&mut self, unique_name: &str) -> Option<Panel> {
        self.panels.remove(unique_name)
    }

    pub fn dock_by_name(&self, unique_name: &str) -> Option<&Panel> {
        self.panels.get(unique_name)
    }

    pub fn contains_panel(&self, unique_name: &str) -> bool {
        self.panels.contains_key(unique_name)
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn register_main_window(&mut self, unique_name: &str) {
        if self.main_windows.iter().any(|n| n == unique_name) {
            log::warn!("main window {unique_name:?} is already registered");
            return;
        }
        self.main_windows.push(unique_name.to_owned());
    }

    pub fn unregister_main_window(&mut self, unique_name: &str) {
        self.main_windows.retain(|n| n != unique_name);
    }

    pub fn main_window_names(&self) -> &[String] {
        &self.main_windows
    }

    /// Two affinity sets match if both are empty or they share at least one name.
    pub fn affinities_match(affinities1: &[String], affinities2: &[String]) -> bool {
        if affinities1.is_empty() && affinities2.is_empty() {
            return true;
        }
        affinities1.iter().any(|a| affinities2.contains(a))
    }
}
