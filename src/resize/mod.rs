//! Edge and corner resizing of borderless windows.
//!
//! A [`ResizeHandler`] watches pointer events, classifies the pointer against the target's
//! border, reports the cursor shape to show, and turns drags into clamped geometry updates.

use egui::{CursorIcon, PointerButton, Pos2, Rect, Vec2};

use crate::frame::Frame;
use crate::geometry::bound;
use crate::options::DockingConfig;

pub mod native;

mod input;

pub use input::EguiPointerInput;

/// Anything a [`ResizeHandler`] can resize. Geometry is in global coordinates.
pub trait ResizeTarget {
    fn geometry(&self) -> Rect;

    fn set_geometry(&mut self, geometry: Rect);

    fn min_size(&self) -> Vec2;

    fn max_size(&self) -> Vec2 {
        Vec2::INFINITY
    }

    fn is_maximized(&self) -> bool {
        false
    }

    /// Whether the target is a native top-level window.
    fn is_top_level(&self) -> bool {
        true
    }
}

/// A plain top-level window, for hosts that don't have their own window type.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizableWindow {
    pub geometry: Rect,
    pub min_size: Vec2,
    pub max_size: Vec2,
    pub maximized: bool,
}

impl ResizableWindow {
    pub fn new(geometry: Rect) -> Self {
        Self {
            geometry,
            min_size: Vec2::ZERO,
            max_size: Vec2::INFINITY,
            maximized: false,
        }
    }
}

impl ResizeTarget for ResizableWindow {
    fn geometry(&self) -> Rect {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: Rect) {
        self.geometry = geometry;
    }

    fn min_size(&self) -> Vec2 {
        self.min_size
    }

    fn max_size(&self) -> Vec2 {
        self.max_size
    }

    fn is_maximized(&self) -> bool {
        self.maximized
    }
}

impl ResizeTarget for Frame {
    fn geometry(&self) -> Rect {
        Self::geometry(self)
    }

    fn set_geometry(&mut self, geometry: Rect) {
        Self::set_geometry(self, geometry);
    }

    fn min_size(&self) -> Vec2 {
        Self::min_size(self)
    }

    fn is_top_level(&self) -> bool {
        false
    }
}

/// Which edges of the target the pointer is on. A bitmask; corners set two bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CursorPosition(u8);

impl CursorPosition {
    pub const UNDEFINED: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const TOP: Self = Self(4);
    pub const BOTTOM: Self = Self(8);
    pub const TOP_LEFT: Self = Self(4 | 1);
    pub const TOP_RIGHT: Self = Self(4 | 2);
    pub const BOTTOM_LEFT: Self = Self(8 | 1);
    pub const BOTTOM_RIGHT: Self = Self(8 | 2);

    pub const fn is_undefined(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Classify `local` (relative to the target's top-left corner) against a target of `size`.
    pub fn classify(local: Vec2, size: Vec2, margin: f32) -> Self {
        let mut bits = 0;
        if local.x.abs() <= margin {
            bits |= Self::LEFT.0;
        } else if (local.x - (size.x - margin)).abs() <= margin {
            bits |= Self::RIGHT.0;
        }
        if local.y.abs() <= margin {
            bits |= Self::TOP.0;
        } else if (local.y - (size.y - margin)).abs() <= margin {
            bits |= Self::BOTTOM.0;
        }
        Self(bits)
    }

    pub fn cursor_icon(self) -> CursorIcon {
        match self {
            Self::TOP_LEFT | Self::BOTTOM_RIGHT => CursorIcon::ResizeNwSe,
            Self::BOTTOM_LEFT | Self::TOP_RIGHT => CursorIcon::ResizeNeSw,
            Self::TOP | Self::BOTTOM => CursorIcon::ResizeVertical,
            Self::LEFT | Self::RIGHT => CursorIcon::ResizeHorizontal,
            _ => CursorIcon::Default,
        }
    }
}

/// `old` with the edges in `cursor` dragged to `pointer`, keeping the size within
/// `[min, max]`. Edges not in `cursor` don't move.
pub fn resized_geometry(old: Rect, cursor: CursorPosition, pointer: Pos2, min: Vec2, max: Vec2) -> Rect {
    let mut new = old;

    if cursor.contains(CursorPosition::LEFT) {
        let delta = old.min.x - pointer.x;
        let delta = bound(min.x, old.width() + delta, max.x) - old.width();
        if delta != 0.0 {
            new.min.x = old.min.x - delta;
        }
    } else if cursor.contains(CursorPosition::RIGHT) {
        let delta = pointer.x - old.max.x;
        let delta = bound(min.x, old.width() + delta, max.x) - old.width();
        if delta != 0.0 {
            new.max.x = old.max.x + delta;
        }
    }

    if cursor.contains(CursorPosition::TOP) {
        let delta = old.min.y - pointer.y;
        let delta = bound(min.y, old.height() + delta, max.y) - old.height();
        if delta != 0.0 {
            new.min.y = old.min.y - delta;
        }
    } else if cursor.contains(CursorPosition::BOTTOM) {
        let delta = pointer.y - old.max.y;
        let delta = bound(min.y, old.height() + delta, max.y) - old.height();
        if delta != 0.0 {
            new.max.y = old.max.y + delta;
        }
    }

    new
}

/// Which events a handler looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Every pointer event of the application. The cursor is set as an application override.
    Global,

    /// Only events delivered to the target itself, which must be a top-level window.
    #[default]
    TargetOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Press,
    Release,
    Move,
}

/// A pointer event in global coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pos: Pos2,

    /// The button that changed, for presses and releases.
    pub button: Option<PointerButton>,

    /// Whether the primary button is held after this event.
    pub primary_down: bool,

    /// Whether the event was delivered to the target itself rather than to another widget.
    pub on_target: bool,
}

impl PointerEvent {
    pub fn press(pos: Pos2, button: PointerButton) -> Self {
        Self {
            kind: PointerEventKind::Press,
            pos,
            button: Some(button),
            primary_down: button == PointerButton::Primary,
            on_target: true,
        }
    }

    pub fn release(pos: Pos2, button: PointerButton) -> Self {
        Self {
            kind: PointerEventKind::Release,
            pos,
            button: Some(button),
            primary_down: false,
            on_target: true,
        }
    }

    pub fn moved(pos: Pos2, primary_down: bool) -> Self {
        Self {
            kind: PointerEventKind::Move,
            pos,
            button: None,
            primary_down,
            on_target: true,
        }
    }

    #[must_use]
    pub fn elsewhere(mut self) -> Self {
        self.on_target = false;
        self
    }
}

/// An ongoing edge drag, from press to release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeSession {
    pub cursor_position: CursorPosition,
    pub origin_geometry: Rect,
    pub press_pos: Pos2,
    pub button: PointerButton,
}

/// What the host should do with the mouse cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorRequest {
    /// Set an application-wide override cursor.
    Override(CursorIcon),

    /// Drop the application-wide override.
    RestoreOverride,

    /// Set the cursor of the target only.
    Target(CursorIcon),
}

impl CursorRequest {
    pub fn icon(self) -> CursorIcon {
        match self {
            Self::Override(icon) | Self::Target(icon) => icon,
            Self::RestoreOverride => CursorIcon::Default,
        }
    }
}

/// Turns pointer events on a window's border into resizes.
#[derive(Clone, Debug)]
pub struct ResizeHandler {
    filter_mode: FilterMode,
    margin: f32,

    /// Ignore every event while set.
    pub disabled: bool,

    session: Option<ResizeSession>,
    cursor_request: Option<CursorRequest>,
    cursor_icon: CursorIcon,
}

impl ResizeHandler {
    pub fn new(filter_mode: FilterMode, config: &DockingConfig) -> Self {
        Self {
            filter_mode,
            margin: config.resize_handler_margin,
            disabled: false,
            session: None,
            cursor_request: None,
            cursor_icon: CursorIcon::Default,
        }
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Where `global_pos` is relative to the target's border. Points farther than the margin
    /// outside the target are always undefined.
    pub fn cursor_position(&self, target: &(impl ResizeTarget + ?Sized), global_pos: Pos2) -> CursorPosition {
        let geometry = target.geometry();
        if !geometry.expand(self.margin).contains(global_pos) {
            return CursorPosition::UNDEFINED;
        }
        CursorPosition::classify(global_pos - geometry.min, geometry.size(), self.margin)
    }

    /// Feed one pointer event. Returns `true` if the event was consumed.
    pub fn handle_event(&mut self, target: &mut (impl ResizeTarget + ?Sized), event: &PointerEvent) -> bool {
        if self.disabled {
            return false;
        }
        if self.filter_mode == FilterMode::TargetOnly && (!target.is_top_level() || !event.on_target) {
            return false;
        }

        match event.kind {
            PointerEventKind::Press => self.on_press(&*target, event),
            PointerEventKind::Release => self.on_release(&*target, event),
            PointerEventKind::Move => self.on_move(target, event),
        }
    }

    fn on_press(&mut self, target: &(impl ResizeTarget + ?Sized), event: &PointerEvent) -> bool {
        if target.is_maximized() {
            return false;
        }
        let cursor_position = self.cursor_position(target, event.pos);
        if cursor_position.is_undefined() {
            return false;
        }

        if event.button == Some(PointerButton::Primary) {
            self.session = Some(ResizeSession {
                cursor_position,
                origin_geometry: target.geometry(),
                press_pos: event.pos,
                button: PointerButton::Primary,
            });
            log::debug!("resize started at {:?} ({cursor_position:?})", event.pos);
        }
        true
    }

    fn on_release(&mut self, target: &(impl ResizeTarget + ?Sized), event: &PointerEvent) -> bool {
        if target.is_maximized() || event.button != Some(PointerButton::Primary) {
            return false;
        }
        if let Some(session) = self.session.take() {
            log::debug!(
                "resize ended: {:?} -> {:?}",
                session.origin_geometry,
                target.geometry()
            );
        }
        true
    }

    fn on_move(&mut self, target: &mut (impl ResizeTarget + ?Sized), event: &PointerEvent) -> bool {
        if target.is_maximized() {
            return false;
        }
        if !event.primary_down {
            self.session = None;
        }

        match self.session {
            Some(session) if event.on_target => {
                let old = target.geometry();
                let new = resized_geometry(
                    old,
                    session.cursor_position,
                    event.pos,
                    target.min_size(),
                    target.max_size(),
                );
                if new != old {
                    target.set_geometry(new);
                }
                true
            }
            _ => {
                let position = self.cursor_position(&*target, event.pos);
                self.update_cursor(position);
                !position.is_undefined()
            }
        }
    }

    /// Abort the current drag and put the target back where it started.
    pub fn cancel(&mut self, target: &mut (impl ResizeTarget + ?Sized)) {
        if let Some(session) = self.session.take() {
            target.set_geometry(session.origin_geometry);
        }
    }

    fn update_cursor(&mut self, position: CursorPosition) {
        let icon = position.cursor_icon();
        let request = match (self.filter_mode, position.is_undefined()) {
            (FilterMode::Global, true) => CursorRequest::RestoreOverride,
            (FilterMode::Global, false) => CursorRequest::Override(icon),
            (FilterMode::TargetOnly, _) => CursorRequest::Target(icon),
        };
        self.cursor_icon = icon;
        self.cursor_request = Some(request);
    }

    /// The cursor change requested by the last hover, if any.
    pub fn take_cursor_request(&mut self) -> Option<CursorRequest> {
        self.cursor_request.take()
    }

    /// The cursor that should currently be shown.
    pub fn cursor_icon(&self) -> CursorIcon {
        if let Some(session) = &self.session {
            return session.cursor_position.cursor_icon();
        }
        self.cursor_icon
    }

    /// Show [`Self::cursor_icon`] for this frame.
    pub fn apply_cursor(&self, ctx: &egui::Context) {
        let icon = self.cursor_icon();
        if icon != CursorIcon::Default {
            ctx.set_cursor_icon(icon);
        }
    }
}

#[cfg(test)]
mod handler_tests;
