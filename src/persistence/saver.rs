use std::path::{Path, PathBuf};

use super::MainWindowSnapshot;
use crate::error::DockError;
use crate::main_window::MainWindow;
use crate::registry::DockRegistry;

pub const LAYOUT_SAVER_VERSION: u32 = 1;

/// Why a layout couldn't be written or brought back.
#[derive(Debug)]
pub enum LayoutPersistenceError {
    /// The document was written by another layout format version.
    VersionMismatch { stored: u32, supported: u32 },

    /// A snapshot couldn't be encoded as RON.
    Encode(ron::Error),

    /// The text isn't a layout document. Carries the line and column.
    Parse(ron::error::SpannedError),

    /// Reading or writing the layout file at `path` failed.
    File { path: PathBuf, source: std::io::Error },

    /// A main window refused its snapshot.
    Restore(DockError),
}

impl LayoutPersistenceError {
    fn file(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::File {
            path: path.to_owned(),
            source,
        }
    }
}

impl std::fmt::Display for LayoutPersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionMismatch { stored, supported } => {
                write!(f, "layout format v{stored} can't be read, only v{supported}")
            }
            Self::Encode(err) => write!(f, "failed to encode layout: {err}"),
            Self::Parse(err) => write!(f, "malformed layout document: {err}"),
            Self::File { path, source } => write!(f, "layout file {}: {source}", path.display()),
            Self::Restore(err) => write!(f, "main window kept its layout: {err}"),
        }
    }
}

impl std::error::Error for LayoutPersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::VersionMismatch { .. } => None,
            Self::Encode(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::File { source, .. } => Some(source),
            Self::Restore(err) => Some(err),
        }
    }
}

impl From<ron::Error> for LayoutPersistenceError {
    fn from(err: ron::Error) -> Self {
        Self::Encode(err)
    }
}

impl From<ron::error::SpannedError> for LayoutPersistenceError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Parse(err)
    }
}

impl From<DockError> for LayoutPersistenceError {
    fn from(err: DockError) -> Self {
        Self::Restore(err)
    }
}

/// Layout documents are meant to be diffed and hand-edited: named structs, and nesting below
/// the frame level kept on one line.
fn layout_ron_format() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new().struct_names(true).depth_limit(5)
}

fn write_layout_file(path: &Path, ron_str: &str) -> Result<(), LayoutPersistenceError> {
    std::fs::write(path, ron_str).map_err(LayoutPersistenceError::file(path))
}

fn read_layout_file(path: &Path) -> Result<String, LayoutPersistenceError> {
    std::fs::read_to_string(path).map_err(LayoutPersistenceError::file(path))
}

/// A saved layout covering several main windows, matched back up by unique name.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LayoutSaver {
    pub version: u32,
    pub main_windows: Vec<MainWindowSnapshot>,
}

impl LayoutSaver {
    pub fn capture<'a>(main_windows: impl IntoIterator<Item = &'a MainWindow>) -> Self {
        Self {
            version: LAYOUT_SAVER_VERSION,
            main_windows: main_windows.into_iter().map(MainWindow::serialize).collect(),
        }
    }

    /// Restore every main window that has a snapshot under its unique name.
    ///
    /// Main windows without a snapshot keep their layout; snapshots of main windows that don't
    /// exist are skipped. Both cases are logged.
    ///
    /// # Errors
    /// The first [`DockError`] returned by [`MainWindow::deserialize`]; windows restored before
    /// it keep their new layout.
    pub fn restore<'a>(
        &self,
        main_windows: impl IntoIterator<Item = &'a mut MainWindow>,
        registry: &DockRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        let mut remaining: Vec<&MainWindowSnapshot> = self.main_windows.iter().collect();
        for mw in main_windows {
            let Some(index) = remaining
                .iter()
                .position(|s| s.unique_name == mw.unique_name())
            else {
                log::warn!("no saved layout for main window {:?}", mw.unique_name());
                continue;
            };
            let snapshot = remaining.swap_remove(index);
            mw.deserialize(snapshot.clone(), registry)?;
        }
        for snapshot in remaining {
            log::warn!(
                "saved layout for unknown main window {:?} was not restored",
                snapshot.unique_name
            );
        }
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, LayoutPersistenceError> {
        Ok(ron::ser::to_string_pretty(self, layout_ron_format())?)
    }

    /// # Errors
    /// [`LayoutPersistenceError::VersionMismatch`] for documents written by another version.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, LayoutPersistenceError> {
        let saver: Self = ron::from_str(ron_str)?;
        if saver.version != LAYOUT_SAVER_VERSION {
            return Err(LayoutPersistenceError::VersionMismatch {
                stored: saver.version,
                supported: LAYOUT_SAVER_VERSION,
            });
        }
        Ok(saver)
    }

    pub fn save_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), LayoutPersistenceError> {
        write_layout_file(path.as_ref(), &self.to_ron_string()?)
    }

    pub fn load_from_ron_file(path: impl AsRef<Path>) -> Result<Self, LayoutPersistenceError> {
        Self::from_ron_str(&read_layout_file(path.as_ref())?)
    }
}

impl MainWindow {
    pub fn layout_to_ron_string(&self) -> Result<String, LayoutPersistenceError> {
        Ok(ron::ser::to_string_pretty(&self.serialize(), layout_ron_format())?)
    }

    pub fn restore_layout_from_ron_str(
        &mut self,
        ron_str: &str,
        registry: &DockRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        let snapshot: MainWindowSnapshot = ron::from_str(ron_str)?;
        Ok(self.deserialize(snapshot, registry)?)
    }

    pub fn save_layout_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), LayoutPersistenceError> {
        write_layout_file(path.as_ref(), &self.layout_to_ron_string()?)
    }

    pub fn restore_layout_from_ron_file(
        &mut self,
        path: impl AsRef<Path>,
        registry: &DockRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        let ron_str = read_layout_file(path.as_ref())?;
        self.restore_layout_from_ron_str(&ron_str, registry)
    }
}
