//! Snapshots of a main window's layout and the rules for restoring them.
//!
//! [`MainWindow::serialize`] and [`MainWindow::deserialize`] work on plain data; with the
//! `serde` feature the snapshot types can go through any serde format. The `persistence`
//! feature adds RON helpers and the multi-window [`LayoutSaver`].

use std::collections::BTreeMap;

use ahash::HashSet;
use egui::{Rect, Vec2};
use itertools::Itertools as _;

use crate::error::DockError;
use crate::frame::{FrameId, FrameOptions};
use crate::layout::{ItemTree, LayoutSnapshot};
use crate::main_window::{MainWindow, PanelState};
use crate::options::MainWindowOptions;
use crate::registry::DockRegistry;
use crate::sidebar::SideBarLocation;

#[cfg(feature = "persistence")]
mod saver;

#[cfg(feature = "persistence")]
pub use saver::{LAYOUT_SAVER_VERSION, LayoutPersistenceError, LayoutSaver};

#[cfg(test)]
mod persistence_tests;

/// A frame as stored in a layout leaf.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameSnapshot {
    pub options: FrameOptions,

    /// Panel names in tab order.
    pub panels: Vec<String>,
    pub current: usize,

    /// Closed or minimized panels that would come back to this frame, sorted.
    pub placeholder_for: Vec<String>,
}

/// Everything needed to rebuild a main window's layout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MainWindowSnapshot {
    pub options: MainWindowOptions,
    pub geometry: Rect,
    pub is_visible: bool,
    pub unique_name: String,
    pub screen_index: i32,
    pub screen_size: Vec2,
    pub multi_splitter_layout: LayoutSnapshot<FrameSnapshot>,
    pub affinities: Vec<String>,

    /// Minimized panels per side bar, in button order. Empty side bars are left out.
    pub dock_widgets_per_side_bar: BTreeMap<SideBarLocation, Vec<String>>,
}

impl MainWindow {
    /// Capture the layout. The overlay is transient and not part of the snapshot.
    pub fn serialize(&self) -> MainWindowSnapshot {
        let mut placeholders: BTreeMap<FrameId, Vec<String>> = BTreeMap::new();
        let entries = self
            .placeholders
            .iter()
            .filter_map(|(panel, item)| {
                let frame = self.tree.get(*item)?.frame()?;
                Some((frame, panel.clone()))
            })
            .sorted();
        for (frame, panel) in entries {
            placeholders.entry(frame).or_default().push(panel);
        }

        let multi_splitter_layout = self.tree.snapshot_with(|frame_id| {
            let placeholder_for = placeholders.get(&frame_id).cloned().unwrap_or_default();
            match self.frames.get(&frame_id) {
                Some(frame) => FrameSnapshot {
                    options: frame.options(),
                    panels: frame.panels().map(str::to_owned).collect(),
                    current: frame.current_index(),
                    placeholder_for,
                },
                None => FrameSnapshot {
                    placeholder_for,
                    ..Default::default()
                },
            }
        });

        let dock_widgets_per_side_bar = self
            .side_bars
            .iter()
            .filter(|(_, side_bar)| !side_bar.is_empty())
            .map(|(location, side_bar)| (*location, side_bar.serialize()))
            .collect();

        MainWindowSnapshot {
            options: self.options,
            geometry: self.geometry,
            is_visible: self.is_visible,
            unique_name: self.unique_name.clone(),
            screen_index: self.screen_index,
            screen_size: self.screen_size,
            multi_splitter_layout,
            affinities: self.affinities.clone(),
            dock_widgets_per_side_bar,
        }
    }

    /// Replace the layout with `snapshot`.
    ///
    /// Panels missing from `registry` are skipped with a warning, as are frames left with
    /// nothing to show. Side bars are repopulated from scratch and any overlay is cleared.
    ///
    /// # Errors
    /// [`DockError::ConfigurationMismatch`] if the snapshot was taken with different
    /// [`MainWindowOptions`]. Nothing is restored in that case.
    pub fn deserialize(&mut self, snapshot: MainWindowSnapshot, registry: &DockRegistry) -> Result<(), DockError> {
        if snapshot.options != self.options {
            return Err(DockError::ConfigurationMismatch {
                expected: self.options.to_string(),
                found: snapshot.options.to_string(),
            }
            .warn());
        }

        if snapshot.affinities != self.affinities {
            log::warn!(
                "{}: affinities {:?} replaced by stored {:?}",
                self.unique_name,
                self.affinities,
                snapshot.affinities
            );
            self.affinities = snapshot.affinities;
        }

        self.clear_side_bar_overlay();
        if self.unique_name.is_empty() {
            self.unique_name = snapshot.unique_name;
        }
        self.geometry = snapshot.geometry;
        self.is_visible = snapshot.is_visible;
        self.screen_index = snapshot.screen_index;
        self.screen_size = snapshot.screen_size;

        self.restore_multi_splitter(snapshot.multi_splitter_layout, registry);
        self.restore_side_bars(snapshot.dock_widgets_per_side_bar, registry);

        self.prune_placeholders();
        self.update_layout();
        Ok(())
    }

    fn restore_multi_splitter(&mut self, layout: LayoutSnapshot<FrameSnapshot>, registry: &DockRegistry) {
        self.frames.clear();
        self.central_frame = None;
        self.placeholders.clear();

        let separator_thickness = self.config.separator_thickness;
        let hardcoded_min_size = self.config.hardcoded_minimum_size;
        let mut placed = HashSet::default();
        let mut pending_placeholders = Vec::new();
        let tree = ItemTree::restore_try(layout, separator_thickness, hardcoded_min_size, |guest| {
            self.restore_frame(guest, registry, &mut placed, &mut pending_placeholders)
        });
        self.tree = tree;

        let tree = &self.tree;
        self.frames
            .retain(|id, _| tree.item_for_frame(*id).is_some());
        if self.central_frame.is_some_and(|id| !self.frames.contains_key(&id)) {
            self.central_frame = None;
        }
        if self.options.has_central_frame && self.central_frame.is_none() {
            self.create_central_frame();
        }

        for (frame, panels) in pending_placeholders {
            let Some(item) = self.tree.item_for_frame(frame) else {
                continue;
            };
            for panel in panels {
                self.placeholders.insert(panel, item);
            }
        }

        for item in self.tree.leaf_items() {
            let visible = self
                .tree
                .get(item)
                .and_then(|i| i.frame())
                .and_then(|f| self.frames.get(&f))
                .is_some_and(|f| !f.is_empty() || f.is_central_frame());
            self.tree.set_item_visible(item, visible);
        }
    }

    fn restore_frame(
        &mut self,
        stored: FrameSnapshot,
        registry: &DockRegistry,
        placed: &mut HashSet<String>,
        pending_placeholders: &mut Vec<(FrameId, Vec<String>)>,
    ) -> Option<FrameId> {
        let FrameSnapshot {
            mut options,
            panels,
            current,
            placeholder_for,
        } = stored;

        let panels: Vec<(String, Vec2)> = panels
            .into_iter()
            .filter_map(|name| {
                let Some(panel) = registry.dock_by_name(&name) else {
                    log::warn!("skipping unknown dock widget {name:?} while restoring");
                    return None;
                };
                if !placed.insert(name.clone()) {
                    log::warn!("skipping dock widget {name:?}: it appears twice in the layout");
                    return None;
                }
                Some((name, panel.min_size))
            })
            .collect();
        let placeholder_for: Vec<String> = placeholder_for
            .into_iter()
            .filter(|name| registry.contains_panel(name))
            .collect();

        options.is_overlayed = false;
        if options.is_central && (!self.options.has_central_frame || self.central_frame.is_some()) {
            options.is_central = false;
        }
        if panels.is_empty() && placeholder_for.is_empty() && !options.is_central {
            return None;
        }

        let mut frame = self.create_frame(options);
        for (name, min_size) in panels {
            frame.add_panel(name, min_size);
        }
        frame.set_current_index(current);
        let id = frame.id();
        if frame.is_central_frame() {
            self.central_frame = Some(id);
        }
        self.frames.insert(id, frame);
        if !placeholder_for.is_empty() {
            pending_placeholders.push((id, placeholder_for));
        }
        Some(id)
    }

    fn restore_side_bars(&mut self, stored: BTreeMap<SideBarLocation, Vec<String>>, registry: &DockRegistry) {
        for side_bar in self.side_bars.values_mut() {
            side_bar.clear();
        }

        for (location, panels) in stored {
            if !self.side_bars.contains_key(&location) {
                log::warn!("no side bar at {location:?}; dropping {} minimized dock widgets", panels.len());
                continue;
            }
            for panel in panels {
                if !registry.contains_panel(&panel) {
                    log::warn!("skipping unknown dock widget {panel:?} in side bar {location:?}");
                    continue;
                }
                if self.dock_widget_state(&panel) != PanelState::Closed {
                    log::warn!("skipping {panel:?} in side bar {location:?}: it is already shown");
                    continue;
                }
                if let Some(side_bar) = self.side_bars.get_mut(&location) {
                    side_bar.add_panel(&panel);
                }
            }
        }
    }
}
