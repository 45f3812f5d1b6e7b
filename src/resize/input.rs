use egui::{PointerButton, Pos2, Vec2};

use super::{PointerEvent, PointerEventKind};

/// Converts egui pointer events (in window-local points) into [`PointerEvent`]s in global
/// coordinates, tracking the primary button state across events.
#[derive(Clone, Debug, Default)]
pub struct EguiPointerInput {
    /// Global position of the window's top-left corner.
    pub window_origin: Vec2,

    /// Whether the events are delivered to the resize target itself.
    pub on_target: bool,

    primary_down: bool,
    last_pos: Option<Pos2>,
}

impl EguiPointerInput {
    pub fn new(window_origin: Vec2) -> Self {
        Self {
            window_origin,
            on_target: true,
            primary_down: false,
            last_pos: None,
        }
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    /// `None` for events that aren't pointer events.
    ///
    /// `PointerGone` while the primary button is held becomes a primary release at the last
    /// known position.
    pub fn convert(&mut self, event: &egui::Event) -> Option<PointerEvent> {
        let event = match event {
            egui::Event::PointerMoved(pos) => {
                let pos = *pos + self.window_origin;
                self.last_pos = Some(pos);
                PointerEvent {
                    kind: PointerEventKind::Move,
                    pos,
                    button: None,
                    primary_down: self.primary_down,
                    on_target: self.on_target,
                }
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let pos = *pos + self.window_origin;
                self.last_pos = Some(pos);
                if *button == PointerButton::Primary {
                    self.primary_down = *pressed;
                }
                PointerEvent {
                    kind: if *pressed {
                        PointerEventKind::Press
                    } else {
                        PointerEventKind::Release
                    },
                    pos,
                    button: Some(*button),
                    primary_down: self.primary_down,
                    on_target: self.on_target,
                }
            }
            egui::Event::PointerGone => {
                if !self.primary_down {
                    return None;
                }
                self.primary_down = false;
                PointerEvent {
                    kind: PointerEventKind::Release,
                    pos: self.last_pos?,
                    button: Some(PointerButton::Primary),
                    primary_down: false,
                    on_target: self.on_target,
                }
            }
            _ => return None,
        };
        Some(event)
    }
}
