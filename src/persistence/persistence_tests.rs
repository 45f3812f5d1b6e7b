use egui::{Rect, pos2, vec2};

use super::*;
use crate::layout::DockLocation;
use crate::main_window::{AddingOption, MainWindow, PanelState};
use crate::options::DockingConfig;
use crate::registry::Panel;

fn registry(names: &[&str]) -> DockRegistry {
    crate::init_test_logger();
    let mut registry = DockRegistry::new();
    for name in names {
        registry.register_panel(Panel::new(*name).with_min_size(vec2(100.0, 50.0)));
    }
    registry
}

fn window(options: MainWindowOptions) -> MainWindow {
    MainWindow::new("mw", options, DockingConfig::default())
}

/// a | b, with c below a; b closed, c minimized to South and overlayed.
fn populated(registry: &DockRegistry) -> MainWindow {
    let mut mw = window(MainWindowOptions::NONE);
    mw.on_resized(Rect::from_min_size(pos2(10.0, 20.0), vec2(1200.0, 900.0)));
    mw.set_visible(true);
    mw.set_screen(1, vec2(1920.0, 1080.0));
    for (name, location, relative) in [
        ("a", DockLocation::Left, None),
        ("b", DockLocation::Right, None),
        ("c", DockLocation::Bottom, Some("a")),
    ] {
        mw.add_dock_widget(registry, name, location, relative, AddingOption::None)
            .unwrap();
    }
    mw.close_dock_widget("b");
    mw.move_to_side_bar_at(registry, "c", SideBarLocation::South).unwrap();
    mw.overlay_on_side_bar(registry, "c").unwrap();
    mw
}

#[test]
fn serialize_captures_window_state() {
    let registry = registry(&["a", "b", "c"]);
    let mw = populated(&registry);
    let snapshot = mw.serialize();

    assert_eq!(snapshot.unique_name, "mw");
    assert_eq!(snapshot.options, MainWindowOptions::NONE);
    assert_eq!(snapshot.geometry, Rect::from_min_size(pos2(10.0, 20.0), vec2(1200.0, 900.0)));
    assert!(snapshot.is_visible);
    assert_eq!(snapshot.screen_index, 1);
    assert_eq!(snapshot.screen_size, vec2(1920.0, 1080.0));
    assert_eq!(
        snapshot.dock_widgets_per_side_bar,
        BTreeMap::from([(SideBarLocation::South, vec!["c".to_owned()])])
    );
    assert_eq!(snapshot.multi_splitter_layout.guest_count(), 3);

    let frames: Vec<&FrameSnapshot> = snapshot
        .multi_splitter_layout
        .nodes
        .iter()
        .filter_map(|n| match n {
            crate::layout::ItemSnapshot::Guest { guest, .. } => Some(guest),
            crate::layout::ItemSnapshot::Container { .. } => None,
        })
        .collect();
    assert!(frames.iter().any(|f| f.panels == ["a"]));
    assert!(frames.iter().any(|f| f.panels.is_empty() && f.placeholder_for == ["b"]));
    assert!(frames.iter().any(|f| f.panels.is_empty() && f.placeholder_for == ["c"]));
}

#[test]
fn deserialize_restores_the_layout_without_the_overlay() {
    let registry = registry(&["a", "b", "c"]);
    let original = populated(&registry);
    let snapshot = original.serialize();

    let mut restored = window(MainWindowOptions::NONE);
    restored.deserialize(snapshot.clone(), &registry).unwrap();

    assert_eq!(restored.geometry(), original.geometry());
    assert_eq!(restored.dock_widget_state("a"), PanelState::Docked);
    assert_eq!(restored.dock_widget_state("b"), PanelState::Closed);
    assert_eq!(restored.dock_widget_state("c"), PanelState::InSideBar);
    assert!(restored.overlayed_dock_widget().is_none());
    assert_eq!(
        restored.frame_for_dock_widget("a").unwrap().geometry(),
        original.frame_for_dock_widget("a").unwrap().geometry()
    );
    assert_eq!(restored.serialize(), snapshot);
    assert!(crate::layout::tree_integrity_issues(restored.item_tree()).is_empty());
}

#[test]
fn placeholders_survive_a_round_trip() {
    let registry = registry(&["a", "b", "c"]);
    let mut original = populated(&registry);
    let snapshot = original.serialize();
    let mut restored = window(MainWindowOptions::NONE);
    restored.deserialize(snapshot, &registry).unwrap();

    original.show_dock_widget(&registry, "b").unwrap();
    restored.show_dock_widget(&registry, "b").unwrap();
    assert_eq!(
        restored.frame_for_dock_widget("b").unwrap().geometry(),
        original.frame_for_dock_widget("b").unwrap().geometry()
    );

    original.restore_from_side_bar(&registry, "c").unwrap();
    restored.restore_from_side_bar(&registry, "c").unwrap();
    assert_eq!(
        restored.frame_for_dock_widget("c").unwrap().geometry(),
        original.frame_for_dock_widget("c").unwrap().geometry()
    );
}

#[test]
fn deserialize_clears_an_active_overlay() {
    let registry = registry(&["a", "b", "c"]);
    let snapshot = populated(&registry).serialize();
    let mut mw = populated(&registry);
    mw.take_events();

    mw.deserialize(snapshot, &registry).unwrap();
    assert!(mw.overlay_frame().is_none());
    assert_eq!(
        mw.take_events(),
        vec![crate::main_window::DockEvent::OverlayChanged {
            panel: "c".into(),
            overlayed: false
        }]
    );
}

#[test]
fn options_mismatch_restores_nothing() {
    let registry = registry(&["a", "b", "c"]);
    let snapshot = populated(&registry).serialize();

    let mut mw = window(MainWindowOptions::HAS_CENTRAL_FRAME);
    let before = mw.serialize();
    let err = mw.deserialize(snapshot, &registry).unwrap_err();
    assert_eq!(
        err,
        DockError::ConfigurationMismatch {
            expected: "HasCentralFrame".into(),
            found: "None".into(),
        }
    );
    assert_eq!(mw.serialize(), before);
}

#[test]
fn unknown_panels_are_skipped() {
    let full = registry(&["a", "b", "c"]);
    let snapshot = populated(&full).serialize();

    let partial = registry(&["b"]);
    let mut mw = window(MainWindowOptions::NONE);
    mw.deserialize(snapshot, &partial).unwrap();

    assert_eq!(mw.dock_widget_state("a"), PanelState::Closed);
    assert!(mw.frame_for_dock_widget("a").is_none());
    assert!(!mw.any_side_bar_is_visible());
    assert!(crate::layout::tree_integrity_issues(mw.item_tree()).is_empty());

    mw.show_dock_widget(&partial, "b").unwrap();
    assert!(approx_eq(
        mw.frame_for_dock_widget("b").unwrap().geometry(),
        mw.layout_rect()
    ));
}

fn approx_eq(a: Rect, b: Rect) -> bool {
    (a.min - b.min).length() < 0.01 && (a.max - b.max).length() < 0.01
}

#[test]
fn stored_affinities_win() {
    let registry = registry(&["a", "b", "c"]);
    let mut snapshot = populated(&registry).serialize();
    snapshot.affinities = vec!["left".into()];

    let mut mw = window(MainWindowOptions::NONE);
    mw.set_affinities(&["right"]).unwrap();
    mw.deserialize(snapshot, &registry).unwrap();
    assert_eq!(mw.affinities(), ["left".to_owned()]);
}

#[test]
fn central_frame_tabs_round_trip() {
    let registry = registry(&["a", "b", "c"]);
    let mut mw = window(MainWindowOptions::HAS_CENTRAL_FRAME);
    mw.add_dock_widget_as_tab(&registry, "a").unwrap();
    mw.add_dock_widget_as_tab(&registry, "b").unwrap();
    mw.add_dock_widget(&registry, "c", DockLocation::Left, None, AddingOption::None)
        .unwrap();
    let snapshot = mw.serialize();

    let mut restored = window(MainWindowOptions::HAS_CENTRAL_FRAME);
    restored.deserialize(snapshot.clone(), &registry).unwrap();
    let central = restored.central_frame().unwrap();
    assert!(central.is_central_frame());
    assert_eq!(central.panels().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(central.current_panel(), Some("b"));
    assert_eq!(restored.frames().count(), 2);
    assert_eq!(restored.serialize(), snapshot);
}

#[test]
fn side_bars_without_auto_hide_are_dropped() {
    let registry = registry(&["a", "b", "c"]);
    let snapshot = populated(&registry).serialize();
    let mut mw = MainWindow::new("mw", MainWindowOptions::NONE, DockingConfig::without_auto_hide());
    mw.deserialize(snapshot, &registry).unwrap();
    assert_eq!(mw.dock_widget_state("c"), PanelState::Closed);
    assert!(mw.serialize().dock_widgets_per_side_bar.is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_goes_through_serde_formats() {
    let registry = registry(&["a", "b", "c"]);
    let snapshot = populated(&registry).serialize();

    let json = serde_json::to_string(&snapshot).unwrap();
    let from_json: MainWindowSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, snapshot);

    let ron_str = ron::to_string(&snapshot).unwrap();
    let from_ron: MainWindowSnapshot = ron::from_str(&ron_str).unwrap();
    assert_eq!(from_ron, snapshot);
}

#[cfg(feature = "persistence")]
mod saver_tests {
    use super::*;

    #[test]
    fn layout_saver_restores_windows_by_name() {
        let registry = registry(&["a", "b", "c", "d"]);
        let first = populated(&registry);
        let mut second = MainWindow::new("second", MainWindowOptions::NONE, DockingConfig::default());
        second
            .add_dock_widget(&registry, "d", DockLocation::Top, None, AddingOption::None)
            .unwrap();

        let saver = LayoutSaver::capture([&second, &first]);
        let ron_str = saver.to_ron_string().unwrap();
        let loaded = LayoutSaver::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, saver);

        let mut windows = vec![
            window(MainWindowOptions::NONE),
            MainWindow::new("second", MainWindowOptions::NONE, DockingConfig::default()),
            MainWindow::new("unsaved", MainWindowOptions::NONE, DockingConfig::default()),
        ];
        loaded.restore(windows.iter_mut(), &registry).unwrap();
        assert_eq!(windows[0].dock_widget_state("a"), PanelState::Docked);
        assert_eq!(windows[1].dock_widget_state("d"), PanelState::Docked);
        assert_eq!(windows[2].frames().count(), 0);
    }

    #[test]
    fn other_versions_are_refused() {
        let saver = LayoutSaver {
            version: LAYOUT_SAVER_VERSION + 1,
            main_windows: Vec::new(),
        };
        let ron_str = saver.to_ron_string().unwrap();
        assert!(matches!(
            LayoutSaver::from_ron_str(&ron_str),
            Err(LayoutPersistenceError::VersionMismatch { stored, supported })
                if stored == LAYOUT_SAVER_VERSION + 1 && supported == LAYOUT_SAVER_VERSION
        ));
    }

    #[test]
    fn restore_errors_are_reported() {
        let registry = registry(&["a", "b", "c"]);
        let saver = LayoutSaver::capture([&populated(&registry)]);
        let mut central = window(MainWindowOptions::HAS_CENTRAL_FRAME);
        let err = saver.restore([&mut central], &registry).unwrap_err();
        assert!(matches!(
            err,
            LayoutPersistenceError::Restore(DockError::ConfigurationMismatch { .. })
        ));
        assert!(matches!(
            LayoutSaver::from_ron_str("not ron"),
            Err(LayoutPersistenceError::Parse(_))
        ));
    }

    #[test]
    fn main_window_layout_file_round_trip() {
        let registry = registry(&["a", "b", "c"]);
        let original = populated(&registry);
        let path = std::env::temp_dir().join(format!(
            "egui_dockwin_layout_{}.ron",
            std::process::id()
        ));
        original.save_layout_to_ron_file(&path).unwrap();

        let mut restored = window(MainWindowOptions::NONE);
        restored
            .restore_layout_from_ron_file(&path, &registry)
            .unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(restored.serialize(), original.serialize());

        let missing_path = path.with_extension("missing");
        let missing = restored.restore_layout_from_ron_file(&missing_path, &registry);
        assert!(matches!(
            missing,
            Err(LayoutPersistenceError::File { ref path, .. }) if *path == missing_path
        ));
        assert_eq!(restored.serialize(), original.serialize());
    }
}
