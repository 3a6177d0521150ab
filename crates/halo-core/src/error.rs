use thiserror::Error;

/// Failures raised by guard checks in geometry, layout and node lookups.
///
/// None of these are fatal: frame-driven callers log them and keep the
/// previous state, so the worst outcome is one stale frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HaloError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("invalid {what}: {value}")]
    InvalidRange { what: &'static str, value: f32 },

    #[error("missing node: {0}")]
    MissingNode(&'static str),
}

pub type Result<T> = std::result::Result<T, HaloError>;
