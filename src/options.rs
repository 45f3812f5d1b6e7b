use egui::Vec2;

/// Framework-wide configuration shared by every [`crate::MainWindow`].
///
/// There is no global instance: construct one and hand it to each main window.
#[derive(Clone, Debug)]
pub struct DockingConfig {
    /// Enables minimizing panels to side bars ("auto-hide").
    ///
    /// When disabled, main windows have no side bars and every side-bar operation is refused.
    pub auto_hide_support: bool,

    /// Double-clicking the caption of a borderless floating window maximizes it natively.
    ///
    /// If `false`, the double click is routed to the title bar instead, which re-docks the window.
    pub double_click_maximizes: bool,

    /// Thickness of the splitter between two visible items, in points.
    pub separator_thickness: f32,

    /// No guest is ever smaller than this, whatever it reports.
    pub hardcoded_minimum_size: Vec2,

    /// Thickness of a non-empty side bar (width for West/East, height for North/South).
    pub side_bar_thickness: f32,

    /// Minimum extent of the overlay frame perpendicular to its side bar.
    pub overlay_min_extent: f32,

    /// Gap between the overlay frame and the layout edges.
    pub overlay_margin: f32,

    /// Distance from a window edge within which the pointer grabs a resize handle.
    pub resize_handler_margin: f32,

    /// Border width used when answering native non-client hit tests, in native pixels.
    pub native_border_width: f32,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            auto_hide_support: true,
            double_click_maximizes: false,
            separator_thickness: 5.0,
            hardcoded_minimum_size: Vec2::new(80.0, 90.0),
            side_bar_thickness: 30.0,
            overlay_min_extent: 300.0,
            overlay_margin: 1.0,
            resize_handler_margin: 4.0,
            native_border_width: 8.0,
        }
    }
}

impl DockingConfig {
    /// Config with side-bar minimization turned off.
    pub fn without_auto_hide() -> Self {
        Self {
            auto_hide_support: false,
            ..Default::default()
        }
    }
}

/// Per-main-window options. Stored in layout snapshots and compared on restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MainWindowOptions {
    /// The layout has a persistent central frame that accepts panels as tabs
    /// and stays in place even when empty.
    pub has_central_frame: bool,
}

impl MainWindowOptions {
    pub const NONE: Self = Self {
        has_central_frame: false,
    };

    pub const HAS_CENTRAL_FRAME: Self = Self {
        has_central_frame: true,
    };
}

impl std::fmt::Display for MainWindowOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_central_frame {
            f.write_str("HasCentralFrame")
        } else {
            f.write_str("None")
        }
    }
}
