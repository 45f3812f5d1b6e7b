/// Why a docking operation was refused.
///
/// Every refusal is also reported with `log::warn!` at the point of failure and leaves the
/// state untouched, so callers that don't care can ignore the returned error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockError {
    /// A layout snapshot was taken with different main-window options than the live window.
    ConfigurationMismatch { expected: String, found: String },

    /// A panel, item or sidebar that the operation needs doesn't exist.
    NotFound(String),

    /// The operation makes no sense for the panel in its current state.
    InvalidOperation(String),

    /// The operation requires a feature that is disabled in the configuration.
    PreconditionViolation(String),
}

impl DockError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidOperation(what.into())
    }

    pub(crate) fn precondition(what: impl Into<String>) -> Self {
        Self::PreconditionViolation(what.into())
    }

    /// Log this error as a warning and hand it back, for `return Err(err.warn())`.
    pub(crate) fn warn(self) -> Self {
        log::warn!("{self}");
        self
    }
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigurationMismatch { expected, found } => {
                write!(
                    f,
                    "refusing to restore main window with different options; expected={expected} found={found}"
                )
            }
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::InvalidOperation(what) => write!(f, "invalid operation: {what}"),
            Self::PreconditionViolation(what) => write!(f, "precondition violated: {what}"),
        }
    }
}

impl std::error::Error for DockError {}
