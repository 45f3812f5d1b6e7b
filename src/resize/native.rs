//! Native non-client message handling for borderless windows.
//!
//! A borderless window still wants native edge resizing, caption dragging and snapping. The host
//! forwards the relevant native messages to a [`NativeWindowIntegration`], which answers them
//! the way the window manager expects.

use egui::{Pos2, Rect, Vec2};

use super::CursorPosition;
use crate::options::DockingConfig;

/// Native non-client hit-test result codes (Win32 `HT*`).
pub mod ht {
    pub const HTNOWHERE: isize = 0;
    pub const HTCAPTION: isize = 2;
    pub const HTLEFT: isize = 10;
    pub const HTRIGHT: isize = 11;
    pub const HTTOP: isize = 12;
    pub const HTTOPLEFT: isize = 13;
    pub const HTTOPRIGHT: isize = 14;
    pub const HTBOTTOM: isize = 15;
    pub const HTBOTTOMLEFT: isize = 16;
    pub const HTBOTTOMRIGHT: isize = 17;
}

/// The part of a window a native hit test landed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitRegion {
    #[default]
    Nowhere,
    Caption,
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl HitRegion {
    pub fn ht_code(self) -> isize {
        match self {
            Self::Nowhere => ht::HTNOWHERE,
            Self::Caption => ht::HTCAPTION,
            Self::Left => ht::HTLEFT,
            Self::Right => ht::HTRIGHT,
            Self::Top => ht::HTTOP,
            Self::TopLeft => ht::HTTOPLEFT,
            Self::TopRight => ht::HTTOPRIGHT,
            Self::Bottom => ht::HTBOTTOM,
            Self::BottomLeft => ht::HTBOTTOMLEFT,
            Self::BottomRight => ht::HTBOTTOMRIGHT,
        }
    }

    /// The edge being resized, or undefined for the caption and nowhere.
    pub fn cursor_position(self) -> CursorPosition {
        match self {
            Self::Nowhere | Self::Caption => CursorPosition::UNDEFINED,
            Self::Left => CursorPosition::LEFT,
            Self::Right => CursorPosition::RIGHT,
            Self::Top => CursorPosition::TOP,
            Self::TopLeft => CursorPosition::TOP_LEFT,
            Self::TopRight => CursorPosition::TOP_RIGHT,
            Self::Bottom => CursorPosition::BOTTOM,
            Self::BottomLeft => CursorPosition::BOTTOM_LEFT,
            Self::BottomRight => CursorPosition::BOTTOM_RIGHT,
        }
    }
}

/// The native messages a borderless window needs answered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeMessage {
    /// Compute the client area (`WM_NCCALCSIZE`).
    CalcSize,

    /// Which part of the window is at this screen point, in native pixels (`WM_NCHITTEST`).
    HitTest(Pos2),

    /// Double click on the non-client area (`WM_NCLBUTTONDBLCLK`).
    NonClientDoubleClick,

    /// Maximized size and minimum tracking size (`WM_GETMINMAXINFO`).
    GetMinMaxInfo,
}

/// Sizes for `WM_GETMINMAXINFO`, in native pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxInfo {
    pub max_size: Vec2,
    pub max_position: Pos2,
    pub min_track_size: Vec2,
}

/// How a native message was answered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NativeResponse {
    /// `false` lets the default window procedure handle the message.
    pub handled: bool,
    pub result: isize,
    pub min_max_info: Option<MinMaxInfo>,
}

impl NativeResponse {
    pub const UNHANDLED: Self = Self {
        handled: false,
        result: 0,
        min_max_info: None,
    };

    pub fn handled(result: isize) -> Self {
        Self {
            handled: true,
            result,
            min_max_info: None,
        }
    }
}

/// A screen as seen by the native layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenInfo {
    /// Work area in logical points, excluding task bars.
    pub available_geometry: Rect,
    pub device_pixel_ratio: f32,
}

/// Knows whether a drag implemented by the docking layer itself (not by the OS) is in progress.
pub trait DragController {
    fn is_in_client_drag(&self) -> bool;
}

/// No drag ever.
impl DragController for () {
    fn is_in_client_drag(&self) -> bool {
        false
    }
}

/// The borderless window the native messages are for.
pub trait BorderlessWindow {
    /// Outer window rect in native pixels.
    fn native_rect(&self) -> Rect;

    fn device_pixel_ratio(&self) -> f32;

    fn min_size(&self) -> Vec2;

    fn max_size(&self) -> Vec2;

    /// The area that drags the window natively, in global logical points.
    fn drag_rect(&self) -> Rect;

    /// Whether `pos` (global logical points) is over a control that must not start a drag,
    /// such as the close button.
    fn is_in_disallow_drag_region(&self, pos: Pos2) -> bool;

    fn set_last_hit_test(&mut self, region: HitRegion);

    fn is_title_bar_visible(&self) -> bool;

    /// The title bar's double-click action: re-docks the window.
    fn on_title_bar_double_clicked(&mut self);

    /// The primary screen, if the window is currently on it.
    fn primary_screen(&self) -> Option<ScreenInfo>;
}

/// Answers native window messages for a window.
pub trait NativeWindowIntegration {
    fn handle_native_message(
        &mut self,
        window: &mut dyn BorderlessWindow,
        drag: &dyn DragController,
        message: NativeMessage,
    ) -> NativeResponse;
}

/// For platforms where the toolkit handles window decorations itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNativeIntegration;

impl NativeWindowIntegration for NoNativeIntegration {
    fn handle_native_message(
        &mut self,
        _window: &mut dyn BorderlessWindow,
        _drag: &dyn DragController,
        _message: NativeMessage,
    ) -> NativeResponse {
        NativeResponse::UNHANDLED
    }
}

/// Native edge resizing, caption drag and aero-snap for frameless windows.
#[derive(Clone, Copy, Debug)]
pub struct BorderlessWindowIntegration {
    /// Width of the resize border, in native pixels.
    pub border_width: f32,
    pub double_click_maximizes: bool,
}

impl BorderlessWindowIntegration {
    pub fn new(config: &DockingConfig) -> Self {
        Self {
            border_width: config.native_border_width,
            double_click_maximizes: config.double_click_maximizes,
        }
    }

    /// Classify a screen point in native pixels. Corners win over edges; edges of a fixed
    /// dimension are never reported.
    pub fn hit_test(&self, window: &dyn BorderlessWindow, native_pos: Pos2) -> HitRegion {
        let rect = window.native_rect();
        let border = self.border_width;
        let (min, max) = (window.min_size(), window.max_size());
        let has_fixed_width = min.x == max.x;
        let has_fixed_height = min.y == max.y;
        let Pos2 { x, y } = native_pos;

        let near_left = x >= rect.left() && x <= rect.left() + border;
        let near_right = x <= rect.right() && x >= rect.right() - border;
        let near_top = y >= rect.top() && y <= rect.top() + border;
        let near_bottom = y <= rect.bottom() && y >= rect.bottom() - border;

        if near_left && near_bottom {
            HitRegion::BottomLeft
        } else if near_right && x < rect.right() && near_bottom {
            HitRegion::BottomRight
        } else if near_left && near_top {
            HitRegion::TopLeft
        } else if near_right && near_top && y < rect.top() + border {
            HitRegion::TopRight
        } else if !has_fixed_width && near_left {
            HitRegion::Left
        } else if !has_fixed_height && near_top {
            HitRegion::Top
        } else if !has_fixed_height && near_bottom {
            HitRegion::Bottom
        } else if !has_fixed_width && near_right {
            HitRegion::Right
        } else {
            let dpr = window.device_pixel_ratio();
            let dpr = if dpr > 0.0 { dpr } else { 1.0 };
            let logical = Pos2::new(x / dpr, y / dpr);
            if window.drag_rect().contains(logical) && !window.is_in_disallow_drag_region(logical) {
                HitRegion::Caption
            } else {
                HitRegion::Nowhere
            }
        }
    }

    fn min_max_info(window: &dyn BorderlessWindow) -> Option<MinMaxInfo> {
        let screen = window.primary_screen()?;
        let available = screen.available_geometry;
        let dpr = screen.device_pixel_ratio;
        let min = window.min_size();
        Some(MinMaxInfo {
            max_size: Vec2::new(
                (available.width() * dpr).floor() - 1.0,
                (available.height() * dpr).floor(),
            ),
            max_position: available.min,
            min_track_size: Vec2::new((min.x * dpr).floor(), (min.y * dpr).floor()),
        })
    }
}

impl NativeWindowIntegration for BorderlessWindowIntegration {
    fn handle_native_message(
        &mut self,
        window: &mut dyn BorderlessWindow,
        drag: &dyn DragController,
        message: NativeMessage,
    ) -> NativeResponse {
        match message {
            // Returning 0 makes the whole window client area, removing the native frame.
            NativeMessage::CalcSize => NativeResponse::handled(0),
            NativeMessage::HitTest(pos) => {
                if drag.is_in_client_drag() {
                    return NativeResponse::UNHANDLED;
                }
                let region = self.hit_test(window, pos);
                window.set_last_hit_test(region);
                NativeResponse {
                    handled: region != HitRegion::Nowhere,
                    result: region.ht_code(),
                    min_max_info: None,
                }
            }
            NativeMessage::NonClientDoubleClick => {
                if self.double_click_maximizes {
                    // The OS maximizes natively.
                    return NativeResponse::UNHANDLED;
                }
                if window.is_title_bar_visible() {
                    window.on_title_bar_double_clicked();
                }
                NativeResponse::handled(0)
            }
            NativeMessage::GetMinMaxInfo => match Self::min_max_info(window) {
                Some(info) => NativeResponse {
                    handled: true,
                    result: 0,
                    min_max_info: Some(info),
                },
                None => NativeResponse::UNHANDLED,
            },
        }
    }
}

/// The integration suited to the platform this crate was built for.
pub fn native_integration_for_platform(config: &DockingConfig) -> Box<dyn NativeWindowIntegration> {
    if cfg!(target_os = "windows") {
        Box::new(BorderlessWindowIntegration::new(config))
    } else {
        Box::new(NoNativeIntegration)
    }
}

#[cfg(test)]
mod tests {
    use egui::pos2;

    use super::*;

    struct Window {
        rect: Rect,
        min: Vec2,
        max: Vec2,
        dpr: f32,
        drag_rect: Rect,
        close_button: Rect,
        last_hit_test: HitRegion,
        double_clicks: usize,
        on_primary: bool,
    }

    impl Window {
        fn new() -> Self {
            Self {
                rect: Rect::from_min_max(pos2(100.0, 100.0), pos2(500.0, 400.0)),
                min: Vec2::new(80.0, 90.0),
                max: Vec2::INFINITY,
                dpr: 1.0,
                drag_rect: Rect::from_min_max(pos2(100.0, 100.0), pos2(500.0, 130.0)),
                close_button: Rect::from_min_max(pos2(470.0, 105.0), pos2(495.0, 125.0)),
                last_hit_test: HitRegion::Nowhere,
                double_clicks: 0,
                on_primary: true,
            }
        }
    }

    impl BorderlessWindow for Window {
        fn native_rect(&self) -> Rect {
            self.rect
        }

        fn device_pixel_ratio(&self) -> f32 {
            self.dpr
        }

        fn min_size(&self) -> Vec2 {
            self.min
        }

        fn max_size(&self) -> Vec2 {
            self.max
        }

        fn drag_rect(&self) -> Rect {
            self.drag_rect
        }

        fn is_in_disallow_drag_region(&self, pos: Pos2) -> bool {
            self.close_button.contains(pos)
        }

        fn set_last_hit_test(&mut self, region: HitRegion) {
            self.last_hit_test = region;
        }

        fn is_title_bar_visible(&self) -> bool {
            true
        }

        fn on_title_bar_double_clicked(&mut self) {
            self.double_clicks += 1;
        }

        fn primary_screen(&self) -> Option<ScreenInfo> {
            self.on_primary.then_some(ScreenInfo {
                available_geometry: Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(1920.0, 1040.0)),
                device_pixel_ratio: 1.5,
            })
        }
    }

    struct Dragging;

    impl DragController for Dragging {
        fn is_in_client_drag(&self) -> bool {
            true
        }
    }

    fn integration() -> BorderlessWindowIntegration {
        BorderlessWindowIntegration::new(&DockingConfig::default())
    }

    #[test]
    fn corners_take_precedence_over_edges() {
        let window = Window::new();
        let i = integration();
        assert_eq!(i.hit_test(&window, pos2(102.0, 398.0)), HitRegion::BottomLeft);
        assert_eq!(i.hit_test(&window, pos2(498.0, 398.0)), HitRegion::BottomRight);
        assert_eq!(i.hit_test(&window, pos2(102.0, 102.0)), HitRegion::TopLeft);
        assert_eq!(i.hit_test(&window, pos2(498.0, 102.0)), HitRegion::TopRight);
    }

    #[test]
    fn edges_caption_and_client() {
        let window = Window::new();
        let i = integration();
        assert_eq!(i.hit_test(&window, pos2(103.0, 250.0)), HitRegion::Left);
        assert_eq!(i.hit_test(&window, pos2(497.0, 250.0)), HitRegion::Right);
        assert_eq!(i.hit_test(&window, pos2(300.0, 103.0)), HitRegion::Top);
        assert_eq!(i.hit_test(&window, pos2(300.0, 397.0)), HitRegion::Bottom);
        assert_eq!(i.hit_test(&window, pos2(300.0, 120.0)), HitRegion::Caption);
        assert_eq!(i.hit_test(&window, pos2(480.0, 115.0)), HitRegion::Nowhere);
        assert_eq!(i.hit_test(&window, pos2(300.0, 250.0)), HitRegion::Nowhere);
    }

    #[test]
    fn fixed_dimensions_disable_their_edges() {
        let mut window = Window::new();
        window.min = Vec2::new(400.0, 90.0);
        window.max = Vec2::new(400.0, f32::INFINITY);
        let i = integration();
        assert_eq!(i.hit_test(&window, pos2(103.0, 250.0)), HitRegion::Nowhere);
        assert_eq!(i.hit_test(&window, pos2(300.0, 397.0)), HitRegion::Bottom);
        // Corners still resize.
        assert_eq!(i.hit_test(&window, pos2(102.0, 398.0)), HitRegion::BottomLeft);
    }

    #[test]
    fn caption_uses_logical_coordinates() {
        let mut window = Window::new();
        window.dpr = 2.0;
        window.rect = Rect::from_min_max(pos2(200.0, 200.0), pos2(1000.0, 800.0));
        let i = integration();
        assert_eq!(i.hit_test(&window, pos2(600.0, 240.0)), HitRegion::Caption);
    }

    #[test]
    fn hit_test_records_last_result_and_defers_to_client_drags() {
        let mut window = Window::new();
        let mut i = integration();

        let response = i.handle_native_message(&mut window, &(), NativeMessage::HitTest(pos2(103.0, 250.0)));
        assert!(response.handled);
        assert_eq!(response.result, ht::HTLEFT);
        assert_eq!(window.last_hit_test, HitRegion::Left);

        let response = i.handle_native_message(&mut window, &(), NativeMessage::HitTest(pos2(300.0, 250.0)));
        assert!(!response.handled);
        assert_eq!(window.last_hit_test, HitRegion::Nowhere);

        window.last_hit_test = HitRegion::Top;
        let response =
            i.handle_native_message(&mut window, &Dragging, NativeMessage::HitTest(pos2(103.0, 250.0)));
        assert_eq!(response, NativeResponse::UNHANDLED);
        assert_eq!(window.last_hit_test, HitRegion::Top);
    }

    #[test]
    fn calc_size_removes_the_frame() {
        let mut window = Window::new();
        let response = integration().handle_native_message(&mut window, &(), NativeMessage::CalcSize);
        assert_eq!(response, NativeResponse::handled(0));
    }

    #[test]
    fn double_click_redocks_unless_native_maximize_is_configured() {
        let mut window = Window::new();
        let mut i = integration();
        let response = i.handle_native_message(&mut window, &(), NativeMessage::NonClientDoubleClick);
        assert!(response.handled);
        assert_eq!(window.double_clicks, 1);

        i.double_click_maximizes = true;
        let response = i.handle_native_message(&mut window, &(), NativeMessage::NonClientDoubleClick);
        assert!(!response.handled);
        assert_eq!(window.double_clicks, 1);
    }

    #[test]
    fn min_max_info_only_on_primary_screen() {
        let mut window = Window::new();
        let mut i = integration();
        let response = i.handle_native_message(&mut window, &(), NativeMessage::GetMinMaxInfo);
        let info = response.min_max_info.unwrap();
        assert!(response.handled);
        assert_eq!(info.max_size, Vec2::new(2879.0, 1560.0));
        assert_eq!(info.max_position, pos2(0.0, 0.0));
        assert_eq!(info.min_track_size, Vec2::new(120.0, 135.0));

        window.on_primary = false;
        let response = i.handle_native_message(&mut window, &(), NativeMessage::GetMinMaxInfo);
        assert_eq!(response, NativeResponse::UNHANDLED);
    }

    #[test]
    fn no_integration_never_handles() {
        let mut window = Window::new();
        let response = NoNativeIntegration.handle_native_message(&mut window, &(), NativeMessage::CalcSize);
        assert_eq!(response, NativeResponse::UNHANDLED);
    }
}
