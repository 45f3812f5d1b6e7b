//! Dock-widget layout core for [`egui`].
//!
//! A [`MainWindow`] owns a multisplitter ([`ItemTree`]) of tab [`Frame`]s, up to four
//! [`SideBar`]s that hold minimized panels, and at most one overlay frame showing a minimized
//! panel above the layout. Panels are registered by unique name in a [`DockRegistry`].
//!
//! [`ResizeHandler`] drives edge/corner resizing of floating windows from pointer events, and
//! [`resize::native`] answers the non-client messages of borderless top-level windows.
//!
//! Layouts are captured with [`MainWindow::serialize`]; the `persistence` feature adds RON
//! helpers and [`LayoutSaver`].

#![forbid(unsafe_code)]

mod error;
mod frame;
mod geometry;
pub mod layout;
mod main_window;
mod options;
pub mod persistence;
mod registry;
pub mod resize;
pub mod sidebar;

pub use error::DockError;
pub use frame::{DefaultFrameFactory, Frame, FrameFactory, FrameId, FrameOptions};
pub use geometry::{Margins, Orientation, aspect_ratio};
pub use layout::{DockLocation, ItemId, ItemTree, LayoutBorderLocations};
pub use main_window::{AddingOption, DockEvent, MainWindow, PanelState};
pub use options::{DockingConfig, MainWindowOptions};
pub use persistence::{FrameSnapshot, MainWindowSnapshot};
pub use registry::{DockRegistry, Panel, PanelOptions};
pub use resize::{CursorPosition, FilterMode, PointerEvent, ResizableWindow, ResizeHandler, ResizeTarget};
pub use sidebar::{SideBar, SideBarLocation, preferred_location};

#[cfg(feature = "persistence")]
pub use persistence::{LAYOUT_SAVER_VERSION, LayoutPersistenceError, LayoutSaver};

/// Route `log` output through the test harness so refusals show up next to failing asserts.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}
