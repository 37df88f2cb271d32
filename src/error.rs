use thiserror::Error;

/// Why a target element cannot accept synthetic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotTypable {
    #[error("element kind does not accept text")]
    WrongKind,
    #[error("element is read-only")]
    ReadOnly,
    #[error("element is disabled")]
    Disabled,
    #[error("element is detached from the page")]
    Detached,
}

/// Failures surfaced before a session starts. Nothing here carries partial
/// state; mid-run faults are absorbed into skip/continue decisions instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("target not typable: {0}")]
    TargetNotTypable(#[from] NotTypable),
    #[error("no typable field available")]
    NoTarget,
    #[error("text contains no typable content")]
    EmptyText,
    #[error("invalid typing config: {0}")]
    InvalidConfig(String),
}
