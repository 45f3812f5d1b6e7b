//! A main window: a dock area (the multisplitter) surrounded by up to four side bars, plus at
//! most one overlay frame showing a minimized panel on top of the layout.

use std::collections::BTreeMap;

use ahash::{HashMap, HashMapExt as _};
use egui::{Pos2, Rect, Vec2, pos2};

use crate::error::DockError;
use crate::frame::{DefaultFrameFactory, Frame, FrameFactory, FrameId, FrameOptions};
use crate::geometry::Margins;
use crate::layout::{DockLocation, ItemId, ItemTree};
use crate::options::{DockingConfig, MainWindowOptions};
use crate::registry::DockRegistry;
use crate::sidebar::{SideBar, SideBarLocation};

mod side_bars;


/// How [`MainWindow::add_dock_widget`] inserts the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddingOption {
    #[default]
    None,

    /// Only reserve the panel's place in the layout. The panel stays closed until shown.
    StartHidden,
}

/// Where a panel currently lives within a main window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Docked,
    InSideBar,
    Overlayed,
    Closed,
}

/// Notifications for the host, drained with [`MainWindow::take_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockEvent {
    Docked { panel: String },
    Closed { panel: String },
    Minimized { panel: String, location: SideBarLocation },
    Restored { panel: String },
    OverlayChanged { panel: String, overlayed: bool },
}

/// The panel shown above the layout from a side bar, and the frame hosting it.
#[derive(Clone, Debug)]
pub(crate) struct Overlay {
    pub(crate) panel: String,
    pub(crate) frame: Frame,
}

pub struct MainWindow {
    pub(crate) unique_name: String,
    pub(crate) options: MainWindowOptions,
    pub(crate) config: DockingConfig,
    pub(crate) affinities: Vec<String>,

    /// Outer geometry in global coordinates. Everything else is relative to its top-left corner.
    pub(crate) geometry: Rect,
    pub(crate) is_visible: bool,
    pub(crate) screen_index: i32,
    pub(crate) screen_size: Vec2,
    pub(crate) center_widget_margins: Margins,

    pub(crate) tree: ItemTree,
    pub(crate) frames: BTreeMap<FrameId, Frame>,
    pub(crate) central_frame: Option<FrameId>,
    next_frame_id: u64,

    pub(crate) side_bars: BTreeMap<SideBarLocation, SideBar>,
    pub(crate) overlay: Option<Overlay>,

    /// Where each closed or minimized panel was docked last.
    pub(crate) placeholders: HashMap<String, ItemId>,

    events: Vec<DockEvent>,
    frame_factory: Box<dyn FrameFactory>,
}

impl std::fmt::Debug for MainWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainWindow")
            .field("unique_name", &self.unique_name)
            .field("options", &self.options)
            .field("geometry", &self.geometry)
            .field("frames", &self.frames.len())
            .field("side_bars", &self.side_bars)
            .field("overlay", &self.overlay.as_ref().map(|o| &o.panel))
            .finish_non_exhaustive()
    }
}

impl MainWindow {
    pub fn new(unique_name: &str, options: MainWindowOptions, config: DockingConfig) -> Self {
        let factory = DefaultFrameFactory {
            hardcoded_min_size: config.hardcoded_minimum_size,
        };
        Self::with_frame_factory(unique_name, options, config, Box::new(factory))
    }

    pub fn with_frame_factory(
        unique_name: &str,
        options: MainWindowOptions,
        config: DockingConfig,
        frame_factory: Box<dyn FrameFactory>,
    ) -> Self {
        let side_bars = if config.auto_hide_support {
            SideBarLocation::ALL
                .into_iter()
                .map(|location| (location, SideBar::new(location)))
                .collect()
        } else {
            BTreeMap::new()
        };

        let geometry = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 800.0));
        let tree = ItemTree::new(
            Rect::from_min_size(Pos2::ZERO, geometry.size()),
            config.separator_thickness,
            config.hardcoded_minimum_size,
        );

        let mut mw = Self {
            unique_name: unique_name.to_owned(),
            options,
            config,
            affinities: Vec::new(),
            geometry,
            is_visible: false,
            screen_index: 0,
            screen_size: Vec2::ZERO,
            center_widget_margins: Margins::ZERO,
            tree,
            frames: BTreeMap::new(),
            central_frame: None,
            next_frame_id: 1,
            side_bars,
            overlay: None,
            placeholders: HashMap::new(),
            events: Vec::new(),
            frame_factory,
        };
        if options.has_central_frame {
            mw.create_central_frame();
        }
        mw.update_layout();
        mw
    }

    pub(crate) fn create_central_frame(&mut self) {
        let mut frame = self.create_frame(FrameOptions {
            is_central: true,
            is_overlayed: false,
        });
        frame.show();
        let id = frame.id();
        match self
            .tree
            .insert_item(id, frame.min_size(), DockLocation::Left, None)
        {
            Ok(_) => {
                self.frames.insert(id, frame);
                self.central_frame = Some(id);
            }
            Err(err) => log::warn!("failed to create the central frame: {err}"),
        }
    }

    pub(crate) fn create_frame(&mut self, options: FrameOptions) -> Frame {
        let id = FrameId::from_u64(self.next_frame_id);
        self.next_frame_id += 1;
        self.frame_factory.create_frame(id, options)
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    /// Name this main window. A main window can only be named once.
    ///
    /// # Errors
    /// [`DockError::InvalidOperation`] if it already has a name.
    pub fn set_unique_name(&mut self, unique_name: &str) -> Result<(), DockError> {
        if unique_name.is_empty() {
            return Ok(());
        }
        if !self.unique_name.is_empty() {
            return Err(DockError::invalid(format!(
                "main window already has a name: {:?}, refusing {unique_name:?}",
                self.unique_name
            ))
            .warn());
        }
        self.unique_name = unique_name.to_owned();
        Ok(())
    }

    pub fn options(&self) -> MainWindowOptions {
        self.options
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    pub fn affinities(&self) -> &[String] {
        &self.affinities
    }

    /// Set the affinities once; empty names are dropped.
    ///
    /// # Errors
    /// [`DockError::InvalidOperation`] when different affinities are already set.
    pub fn set_affinities(&mut self, affinities: &[&str]) -> Result<(), DockError> {
        let affinities: Vec<String> = affinities
            .iter()
            .filter(|a| !a.is_empty())
            .map(|a| (*a).to_owned())
            .collect();
        if self.affinities == affinities {
            return Ok(());
        }
        if !self.affinities.is_empty() {
            return Err(DockError::invalid(format!(
                "affinities are already set to {:?}, refusing to change to {affinities:?}",
                self.affinities
            ))
            .warn());
        }
        self.affinities = affinities;
        Ok(())
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub fn set_screen(&mut self, screen_index: i32, screen_size: Vec2) {
        self.screen_index = screen_index;
        self.screen_size = screen_size;
    }

    pub fn screen_index(&self) -> i32 {
        self.screen_index
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Space reserved around the dock area for the host's own chrome (menu bar, status bar...).
    pub fn set_center_widget_margins(&mut self, margins: Margins) {
        self.center_widget_margins = margins;
        self.update_layout();
    }

    pub fn center_widget_margins(&self) -> Margins {
        self.center_widget_margins
    }

    /// The window's own area, in window-local coordinates.
    pub fn central_area(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.geometry.size())
    }

    /// The central area minus the center-widget margins: where the side bars and layout go.
    pub fn content_rect(&self) -> Rect {
        self.center_widget_margins.shrink_rect(self.central_area())
    }

    /// The area left to the multisplitter once visible side bars took their share.
    pub fn layout_rect(&self) -> Rect {
        let c = self.content_rect();
        let [n, e, w, s] = self.side_bar_extents();
        let min = pos2(c.min.x + w, c.min.y + n);
        let max = pos2((c.max.x - e).max(min.x), (c.max.y - s).max(min.y));
        Rect::from_min_max(min, max)
    }

    pub fn item_tree(&self) -> &ItemTree {
        &self.tree
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.values()
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(&id)
    }

    pub fn central_frame(&self) -> Option<&Frame> {
        self.central_frame.and_then(|id| self.frames.get(&id))
    }

    /// The docked frame holding `panel`.
    pub fn frame_for_dock_widget(&self, panel: &str) -> Option<&Frame> {
        self.frames.values().find(|f| f.contains(panel))
    }

    pub(crate) fn item_for_dock_widget(&self, panel: &str) -> Option<ItemId> {
        let frame = self.frame_for_dock_widget(panel)?;
        self.tree.item_for_frame(frame.id())
    }

    pub fn dock_widget_state(&self, panel: &str) -> PanelState {
        if self.overlayed_dock_widget() == Some(panel) {
            PanelState::Overlayed
        } else if self.side_bar_for_dock_widget(panel).is_some() {
            PanelState::InSideBar
        } else if self.frame_for_dock_widget(panel).is_some() {
            PanelState::Docked
        } else {
            PanelState::Closed
        }
    }

    /// Drain the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: DockEvent) {
        log::debug!("{}: {event:?}", self.unique_name);
        self.events.push(event);
    }

    fn check_dockable(&self, registry: &DockRegistry, panel: &str) -> Result<Vec2, DockError> {
        let Some(p) = registry.dock_by_name(panel) else {
            return Err(DockError::not_found(format!("dock widget {panel:?}")).warn());
        };
        if !p.is_dockable() {
            return Err(DockError::invalid(format!("refusing to dock non-dockable widget {panel:?}")).warn());
        }
        if !DockRegistry::affinities_match(&self.affinities, p.affinities()) {
            return Err(DockError::invalid(format!(
                "refusing to dock {panel:?} with incompatible affinities {:?} into {:?}",
                p.affinities(),
                self.affinities
            ))
            .warn());
        }
        Ok(p.min_size)
    }

    /// Dock `panel` at `location`, either at the edge of the whole layout or next to the panel
    /// named `relative_to`. A panel that is already shown somewhere is moved.
    ///
    /// # Errors
    /// - [`DockError::NotFound`] if `panel` isn't registered or `relative_to` isn't docked.
    /// - [`DockError::InvalidOperation`] for non-dockable panels, incompatible affinities, or
    ///   docking a panel relative to itself.
    pub fn add_dock_widget(
        &mut self,
        registry: &DockRegistry,
        panel: &str,
        location: DockLocation,
        relative_to: Option<&str>,
        option: AddingOption,
    ) -> Result<(), DockError> {
        let min_size = self.check_dockable(registry, panel)?;
        if let Some(relative_to) = relative_to {
            if relative_to == panel {
                return Err(DockError::invalid(format!("cannot dock {panel:?} relative to itself")).warn());
            }
            if self.item_for_dock_widget(relative_to).is_none() {
                return Err(DockError::not_found(format!("relative dock widget {relative_to:?} is not docked")).warn());
            }
        }

        self.take_panel_out(panel);

        let relative_item = match relative_to {
            Some(relative_to) => Some(
                self.item_for_dock_widget(relative_to)
                    .ok_or_else(|| DockError::not_found(format!("relative dock widget {relative_to:?}")))?,
            ),
            None => None,
        };

        let mut frame = self.create_frame(FrameOptions::default());
        if option == AddingOption::StartHidden {
            let item = self.tree.insert_item(frame.id(), min_size, location, relative_item)?;
            self.tree.set_item_visible(item, false);
            self.placeholders.insert(panel.to_owned(), item);
            self.frames.insert(frame.id(), frame);
        } else {
            frame.add_panel(panel, min_size);
            frame.show();
            self.tree
                .insert_item(frame.id(), frame.min_size(), location, relative_item)?;
            self.frames.insert(frame.id(), frame);
            self.emit(DockEvent::Docked {
                panel: panel.to_owned(),
            });
        }

        self.update_layout();
        Ok(())
    }

    /// Add `panel` as a tab of the central frame.
    ///
    /// # Errors
    /// [`DockError::PreconditionViolation`] without [`MainWindowOptions::has_central_frame`],
    /// plus the errors of [`Self::add_dock_widget`].
    pub fn add_dock_widget_as_tab(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        let min_size = self.check_dockable(registry, panel)?;
        let Some(central) = self.central_frame else {
            return Err(DockError::precondition(format!(
                "adding {panel:?} as a tab requires a central frame"
            ))
            .warn());
        };

        self.take_panel_out(panel);

        let frame_min = self.frames.get_mut(&central).map(|frame| {
            frame.add_panel(panel, min_size);
            frame.min_size()
        });
        if let (Some(min), Some(item)) = (frame_min, self.tree.item_for_frame(central)) {
            self.tree.set_guest_min_size(item, min);
        }
        self.emit(DockEvent::Docked {
            panel: panel.to_owned(),
        });
        self.update_layout();
        Ok(())
    }

    /// Close `panel`, remembering where it was docked. Closing a closed panel does nothing.
    pub fn close_dock_widget(&mut self, panel: &str) {
        if self.dock_widget_state(panel) == PanelState::Closed {
            log::debug!("{panel:?} is already closed");
            return;
        }
        if self.overlayed_dock_widget() == Some(panel) {
            self.clear_side_bar_overlay();
        }
        for side_bar in self.side_bars.values_mut() {
            side_bar.remove_panel(panel);
        }
        self.undock_leaving_placeholder(panel);
        self.emit(DockEvent::Closed {
            panel: panel.to_owned(),
        });
        self.update_layout();
    }

    /// Show a closed panel again: back into its placeholder if it has one, otherwise docked at the
    /// right edge. Panels that are already shown are left alone.
    ///
    /// # Errors
    /// The errors of [`Self::add_dock_widget`].
    pub fn show_dock_widget(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        if self.dock_widget_state(panel) != PanelState::Closed {
            return Ok(());
        }
        let min_size = self.check_dockable(registry, panel)?;
        if self.restore_into_placeholder(panel, min_size) {
            self.emit(DockEvent::Docked {
                panel: panel.to_owned(),
            });
            self.update_layout();
            return Ok(());
        }
        self.add_dock_widget(registry, panel, DockLocation::Right, None, AddingOption::None)
    }

    /// Give every item of the layout the same share.
    pub fn layout_equally(&mut self) {
        self.tree.layout_equally();
        self.sync_frames();
    }

    /// Give the siblings of `panel`'s item the same share.
    ///
    /// # Errors
    /// [`DockError::NotFound`] if `panel` isn't docked.
    pub fn layout_parent_container_equally(&mut self, panel: &str) -> Result<(), DockError> {
        let Some(item) = self.item_for_dock_widget(panel) else {
            return Err(DockError::not_found(format!("docked widget {panel:?}")).warn());
        };
        let parent = self
            .tree
            .get(item)
            .and_then(|i| i.parent())
            .unwrap_or_else(|| self.tree.root());
        self.tree.layout_container_equally(parent);
        self.sync_frames();
        Ok(())
    }

    /// React to the window being resized or moved.
    pub fn on_resized(&mut self, geometry: Rect) {
        self.geometry = geometry;
        self.update_layout();
    }

    /// Remove `panel` from wherever it is, forgetting its placeholder. Used before re-docking.
    pub(crate) fn take_panel_out(&mut self, panel: &str) {
        if self.overlayed_dock_widget() == Some(panel) {
            self.clear_side_bar_overlay();
        }
        for side_bar in self.side_bars.values_mut() {
            side_bar.remove_panel(panel);
        }
        self.undock_leaving_placeholder(panel);
        self.placeholders.remove(panel);
        self.prune_placeholders();
    }

    /// Take `panel` out of its docked frame and remember the frame's item as its placeholder.
    /// An emptied frame is hidden, except the central one.
    pub(crate) fn undock_leaving_placeholder(&mut self, panel: &str) {
        let Some(frame) = self.frames.values_mut().find(|f| f.contains(panel)) else {
            return;
        };
        frame.remove_panel(panel);
        let (frame_id, now_empty, is_central, min_size) =
            (frame.id(), frame.is_empty(), frame.is_central_frame(), frame.min_size());
        if now_empty && !is_central {
            frame.hide();
        }

        let Some(item) = self.tree.item_for_frame(frame_id) else {
            return;
        };
        self.placeholders.insert(panel.to_owned(), item);
        if now_empty && !is_central {
            self.tree.set_item_visible(item, false);
        } else {
            self.tree.set_guest_min_size(item, min_size);
        }
    }

    /// Put `panel` back where it was last docked. Returns `false` if that place is gone.
    pub(crate) fn restore_into_placeholder(&mut self, panel: &str, min_size: Vec2) -> bool {
        let Some(item) = self.placeholders.remove(panel) else {
            return false;
        };
        let Some(frame_id) = self.tree.get(item).and_then(|i| i.frame()) else {
            return false;
        };
        let Some(frame) = self.frames.get_mut(&frame_id) else {
            return false;
        };
        frame.add_panel(panel, min_size);
        frame.show();
        let frame_min = frame.min_size();
        self.tree.set_guest_min_size(item, frame_min);
        self.tree.set_item_visible(item, true);
        true
    }

    /// Drop hidden, empty frames that no panel would come back to.
    pub(crate) fn prune_placeholders(&mut self) {
        let tree = &self.tree;
        self.placeholders.retain(|_, item| tree.contains(*item));

        let referenced: Vec<ItemId> = self.placeholders.values().copied().collect();
        let stale: Vec<ItemId> = self
            .tree
            .leaf_items()
            .into_iter()
            .filter(|&item| !referenced.contains(&item))
            .filter(|&item| {
                self.tree
                    .get(item)
                    .and_then(|i| i.frame())
                    .and_then(|f| self.frames.get(&f))
                    .is_none_or(|f| f.is_empty() && !f.is_central_frame())
            })
            .collect();

        for item in stale {
            for frame in self.tree.remove_item(item) {
                self.frames.remove(&frame);
            }
        }
    }

    /// Lay the tree out in the current layout rect and move frames and the overlay along.
    pub(crate) fn update_layout(&mut self) {
        self.tree.set_layout_rect(self.layout_rect());
        self.sync_frames();
        self.update_overlay_geometry();
    }

    pub(crate) fn sync_frames(&mut self) {
        for item in self.tree.leaf_items() {
            let Some(node) = self.tree.get(item) else {
                continue;
            };
            let Some(frame) = node.frame().and_then(|f| self.frames.get_mut(&f)) else {
                continue;
            };
            frame.set_geometry(node.geometry());
            if self.tree.is_item_visible(item) {
                frame.show();
            } else {
                frame.hide();
            }
        }
    }
}
