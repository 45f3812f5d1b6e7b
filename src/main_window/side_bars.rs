use egui::{Rect, Vec2, pos2, vec2};

use super::{DockEvent, MainWindow, Overlay};
use crate::error::DockError;
use crate::frame::{Frame, FrameOptions};
use crate::geometry::aspect_ratio;
use crate::layout::DockLocation;
use crate::registry::DockRegistry;
use crate::sidebar::{SideBar, SideBarLocation, preferred_location};

impl SideBarLocation {
    /// The layout edge a panel minimized here is re-docked at when its old place is gone.
    fn dock_location(self) -> DockLocation {
        match self {
            Self::North => DockLocation::Top,
            Self::South => DockLocation::Bottom,
            Self::West => DockLocation::Left,
            Self::East | Self::None => DockLocation::Right,
        }
    }
}

impl MainWindow {
    pub fn side_bar(&self, location: SideBarLocation) -> Option<&SideBar> {
        self.side_bars.get(&location)
    }

    pub fn side_bar_for_dock_widget(&self, panel: &str) -> Option<SideBarLocation> {
        self.side_bars
            .values()
            .find(|sb| sb.contains(panel))
            .map(SideBar::location)
    }

    pub fn side_bar_is_visible(&self, location: SideBarLocation) -> bool {
        self.side_bars.get(&location).is_some_and(SideBar::is_visible)
    }

    pub fn any_side_bar_is_visible(&self) -> bool {
        self.side_bars.values().any(SideBar::is_visible)
    }

    /// North, East, West, South thicknesses; zero for hidden side bars.
    pub(crate) fn side_bar_extents(&self) -> [f32; 4] {
        SideBarLocation::ALL.map(|location| {
            if self.side_bar_is_visible(location) {
                self.config.side_bar_thickness
            } else {
                0.0
            }
        })
    }

    /// Where a visible side bar is drawn, in window-local coordinates.
    ///
    /// North and South span the full content width; West and East fit between them.
    pub fn side_bar_rect(&self, location: SideBarLocation) -> Option<Rect> {
        if !self.side_bar_is_visible(location) {
            return None;
        }
        let c = self.content_rect();
        let [n, e, w, s] = self.side_bar_extents();
        let rect = match location {
            SideBarLocation::North => Rect::from_min_max(c.min, pos2(c.max.x, c.min.y + n)),
            SideBarLocation::South => Rect::from_min_max(pos2(c.min.x, c.max.y - s), c.max),
            SideBarLocation::West => {
                Rect::from_min_max(pos2(c.min.x, c.min.y + n), pos2(c.min.x + w, c.max.y - s))
            }
            SideBarLocation::East => {
                Rect::from_min_max(pos2(c.max.x - e, c.min.y + n), pos2(c.max.x, c.max.y - s))
            }
            SideBarLocation::None => return None,
        };
        Some(rect)
    }

    /// Geometry of an overlay frame with minimum size `min_size` popping out of the side bar at
    /// `location`. `None` when that side bar doesn't exist.
    ///
    /// The overlay hugs its side bar, keeps `overlay_margin` away from the perpendicular bars, and
    /// is at least `overlay_min_extent` deep.
    pub fn rect_for_overlay(&self, min_size: Vec2, location: SideBarLocation) -> Option<Rect> {
        if !self.side_bars.contains_key(&location) {
            return None;
        }
        let c = self.content_rect();
        let margin = self.config.overlay_margin;
        let [n, e, w, s] = self.side_bar_extents();

        let rect = match location {
            SideBarLocation::North | SideBarLocation::South => {
                let height = self.config.overlay_min_extent.max(min_size.y);
                let width = (c.width() - 2.0 * margin - w - e).max(0.0);
                let left = c.min.x + margin + w;
                let top = if location == SideBarLocation::North {
                    c.min.y + n
                } else {
                    c.max.y - s - height
                };
                Rect::from_min_size(pos2(left, top), vec2(width, height))
            }
            SideBarLocation::West | SideBarLocation::East => {
                let width = self.config.overlay_min_extent.max(min_size.x);
                let height = (c.height() - n - s).max(0.0);
                let top = c.min.y + n;
                let left = if location == SideBarLocation::West {
                    c.min.x + margin + w
                } else {
                    c.max.x - e - margin - width
                };
                Rect::from_min_size(pos2(left, top), vec2(width, height))
            }
            SideBarLocation::None => return None,
        };
        Some(rect)
    }

    /// The side bar `panel` would be minimized to, judging by where its item touches the layout
    /// borders and by its shape. [`SideBarLocation::None`] if the panel isn't docked.
    pub fn preferred_side_bar(&self, panel: &str) -> SideBarLocation {
        let Some(item) = self.item_for_dock_widget(panel) else {
            log::warn!("can't pick a side bar for {panel:?}: it isn't docked");
            return SideBarLocation::None;
        };
        let borders = self.tree.adjacent_layout_borders(item);
        let size = self
            .tree
            .get(item)
            .map_or(Vec2::ZERO, |i| i.geometry().size());
        preferred_location(borders, aspect_ratio(size))
    }

    /// Minimize `panel` to its preferred side bar.
    ///
    /// # Errors
    /// See [`Self::move_to_side_bar_at`].
    pub fn move_to_side_bar(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        if !registry.contains_panel(panel) {
            return Err(DockError::not_found(format!("dock widget {panel:?}")).warn());
        }
        let location = self.preferred_side_bar(panel);
        self.move_to_side_bar_at(registry, panel, location)
    }

    /// Minimize `panel` to the side bar at `location`. If docked, it leaves a placeholder behind
    /// so that restoring puts it back in the same place.
    ///
    /// # Errors
    /// - [`DockError::NotFound`] if `panel` isn't registered.
    /// - [`DockError::PreconditionViolation`] if there is no side bar at `location`, which is
    ///   always the case without [`crate::DockingConfig::auto_hide_support`].
    pub fn move_to_side_bar_at(
        &mut self,
        registry: &DockRegistry,
        panel: &str,
        location: SideBarLocation,
    ) -> Result<(), DockError> {
        if !registry.contains_panel(panel) {
            return Err(DockError::not_found(format!("dock widget {panel:?}")).warn());
        }
        if !self.side_bars.contains_key(&location) {
            return Err(DockError::precondition(format!(
                "no side bar at {location:?} for {panel:?} (is auto-hide support enabled?)"
            ))
            .warn());
        }
        if self.side_bar_for_dock_widget(panel) == Some(location) {
            return Ok(());
        }

        if self.overlayed_dock_widget() == Some(panel) {
            self.clear_side_bar_overlay();
        }
        for side_bar in self.side_bars.values_mut() {
            side_bar.remove_panel(panel);
        }
        self.undock_leaving_placeholder(panel);

        if let Some(side_bar) = self.side_bars.get_mut(&location) {
            side_bar.add_panel(panel);
        }
        self.emit(DockEvent::Minimized {
            panel: panel.to_owned(),
            location,
        });
        self.update_layout();
        Ok(())
    }

    /// Take `panel` out of its side bar and dock it where it was before minimizing, or at the
    /// layout edge matching the side bar if that place is gone.
    ///
    /// # Errors
    /// - [`DockError::NotFound`] if `panel` isn't in a side bar or isn't registered.
    /// - [`DockError::InvalidOperation`] if it can't be docked here anymore.
    pub fn restore_from_side_bar(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        let Some(location) = self.side_bar_for_dock_widget(panel) else {
            return Err(DockError::not_found(format!("{panel:?} in any side bar")).warn());
        };
        let min_size = self.check_dockable(registry, panel)?;

        if self.overlayed_dock_widget() == Some(panel) {
            self.clear_side_bar_overlay();
        }
        if let Some(side_bar) = self.side_bars.get_mut(&location) {
            side_bar.remove_panel(panel);
        }

        if !self.restore_into_placeholder(panel, min_size) {
            let mut frame = self.create_frame(FrameOptions::default());
            frame.add_panel(panel, min_size);
            frame.show();
            let id = frame.id();
            let frame_min = frame.min_size();
            self.frames.insert(id, frame);
            if let Err(err) = self
                .tree
                .insert_item(id, frame_min, location.dock_location(), None)
            {
                self.frames.remove(&id);
                return Err(err);
            }
        }

        self.emit(DockEvent::Restored {
            panel: panel.to_owned(),
        });
        self.update_layout();
        Ok(())
    }

    /// The panel currently shown in the overlay.
    pub fn overlayed_dock_widget(&self) -> Option<&str> {
        self.overlay.as_ref().map(|o| o.panel.as_str())
    }

    pub fn overlay_frame(&self) -> Option<&Frame> {
        self.overlay.as_ref().map(|o| &o.frame)
    }

    /// Show a minimized panel above the layout, next to its side bar. Replaces any other
    /// overlay; overlaying the current overlay again does nothing.
    ///
    /// # Errors
    /// - [`DockError::InvalidOperation`] if `panel` isn't in a side bar.
    /// - [`DockError::NotFound`] if it isn't registered.
    pub fn overlay_on_side_bar(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        let Some(location) = self.side_bar_for_dock_widget(panel) else {
            return Err(DockError::invalid(format!("{panel:?} must be in a side bar to be overlayed")).warn());
        };
        if self.overlayed_dock_widget() == Some(panel) {
            return Ok(());
        }
        let Some(min_size) = registry.dock_by_name(panel).map(|p| p.min_size) else {
            return Err(DockError::not_found(format!("dock widget {panel:?}")).warn());
        };

        self.clear_side_bar_overlay();

        let mut frame = self.create_frame(FrameOptions {
            is_central: false,
            is_overlayed: true,
        });
        frame.add_panel(panel, min_size);
        if let Some(rect) = self.rect_for_overlay(frame.min_size(), location) {
            frame.set_geometry(rect);
        }
        frame.show();
        self.overlay = Some(Overlay {
            panel: panel.to_owned(),
            frame,
        });
        self.emit(DockEvent::OverlayChanged {
            panel: panel.to_owned(),
            overlayed: true,
        });
        Ok(())
    }

    /// Hide the overlay, if any. The panel stays in its side bar.
    pub fn clear_side_bar_overlay(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            self.emit(DockEvent::OverlayChanged {
                panel: overlay.panel,
                overlayed: false,
            });
        }
    }

    /// Overlay `panel`, or hide it if it's the one already overlayed.
    ///
    /// A refused overlay keeps the current one.
    ///
    /// # Errors
    /// See [`Self::overlay_on_side_bar`].
    pub fn toggle_overlay_on_side_bar(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        if self.overlayed_dock_widget() == Some(panel) {
            self.clear_side_bar_overlay();
            Ok(())
        } else {
            self.overlay_on_side_bar(registry, panel)
        }
    }

    /// A side-bar button was clicked.
    ///
    /// # Errors
    /// See [`Self::overlay_on_side_bar`].
    pub fn on_side_bar_button_clicked(&mut self, registry: &DockRegistry, panel: &str) -> Result<(), DockError> {
        self.toggle_overlay_on_side_bar(registry, panel)
    }

    pub(crate) fn update_overlay_geometry(&mut self) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let Some(location) = self.side_bar_for_dock_widget(&overlay.panel) else {
            return;
        };
        let rect = self.rect_for_overlay(overlay.frame.min_size(), location);
        if let (Some(rect), Some(overlay)) = (rect, self.overlay.as_mut()) {
            overlay.frame.set_geometry(rect);
        }
    }
}
