//! Common error infrastructure for tile-core.
//!
//! Every fallible engine operation returns [`EngineError`]. The engine logs at
//! the point of failure and hands the error back to the caller, so callers can
//! treat a failure as a recoverable "false" or bubble it up with `?`.
//!
//! # Design Principles
//!
//! - **Classification**: each variant maps onto an [`ErrorKind`] so hosts can
//!   react to the category without matching on every variant
//! - **No containment**: subscriber failures are wrapped in
//!   [`EngineError::Handler`] and propagate to whoever fired the event
//! - **Rich context**: variants carry the offending name, id, or position

use crate::types::Position;

/// Result type returned by subscriber callbacks, timer callbacks, and renderers.
pub type HandlerResult = anyhow::Result<()>;

/// Category of an [`EngineError`].
///
/// - **InvalidArgument**: malformed input, should not be retried unchanged
/// - **NotFound**: the referenced timer, callback, layer, or binding does not exist
/// - **Unsupported**: unknown input-mode configuration
/// - **Handler**: a user callback failed
/// - **Input**: the raw input source failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unsupported,
    Handler,
    Input,
}

impl ErrorKind {
    /// Returns a human-readable description of this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Handler => "handler",
            Self::Input => "input",
        }
    }

    /// Returns true if the caller can continue the session after this error.
    ///
    /// Handler and input failures abort the current turn and are left to the
    /// host to decide on.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidArgument | Self::NotFound | Self::Unsupported)
    }
}

/// Errors surfaced by the engine and its components.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `x` and `y` must be supplied together.
    #[error("x and y must be specified together (got x={x:?}, y={y:?})")]
    PartialPosition { x: Option<i32>, y: Option<i32> },

    /// Position lies outside the grid.
    #[error("position {position} is outside the {height}x{width} grid")]
    OutOfBounds {
        position: Position,
        height: usize,
        width: usize,
    },

    /// Event name is not registered on the bus.
    #[error("event \"{0}\" does not exist")]
    UnknownEvent(String),

    /// Event name is already registered on the bus.
    #[error("event \"{0}\" already exists")]
    DuplicateEvent(String),

    /// Key action name is not one of the supported kinds.
    #[error("key action \"{0}\" is not supported")]
    UnknownAction(String),

    /// Key name cannot be resolved for the active input mode.
    #[error("key \"{0}\" is not a recognised key name")]
    UnknownKey(String),

    /// Timers need at least one tick to run.
    #[error("timer duration must be positive (got {0})")]
    InvalidDuration(u32),

    /// No live timer with this id.
    #[error("timer {0} not found")]
    TimerNotFound(u64),

    /// The callback is not subscribed to this event.
    #[error("callback not subscribed to \"{0}\"")]
    CallbackNotFound(String),

    /// The callback is not bound to this key/action pair.
    #[error("no binding for \"{action} {key}\"")]
    BindingNotFound { key: String, action: String },

    /// No item on this tile.
    #[error("no item at {0}")]
    ItemNotFound(Position),

    /// No renderer registered under this layer name.
    #[error("layer \"{0}\" is not available")]
    LayerNotFound(String),

    /// Input mode name is not recognised.
    #[error("input system \"{0}\" is not supported")]
    UnsupportedInput(String),

    /// A subscriber, timer callback, or renderer returned an error.
    #[error("handler for \"{event}\" failed: {source}")]
    Handler {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// The raw input source failed.
    #[error("input source failed: {0}")]
    Input(#[from] std::io::Error),
}

impl EngineError {
    /// Wraps a failed callback with the name of the event it was handling.
    pub fn handler(event: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Handler {
            event: event.into(),
            source,
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            PartialPosition { .. }
            | OutOfBounds { .. }
            | UnknownEvent(_)
            | DuplicateEvent(_)
            | UnknownAction(_)
            | UnknownKey(_)
            | InvalidDuration(_) => ErrorKind::InvalidArgument,
            TimerNotFound(_)
            | CallbackNotFound(_)
            | BindingNotFound { .. }
            | ItemNotFound(_)
            | LayerNotFound(_) => ErrorKind::NotFound,
            UnsupportedInput(_) => ErrorKind::Unsupported,
            Handler { .. } => ErrorKind::Handler,
            Input(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let partial = EngineError::PartialPosition {
            x: Some(2),
            y: None,
        };
        assert_eq!(partial.kind(), ErrorKind::InvalidArgument);
        assert_eq!(EngineError::TimerNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(
            EngineError::UnsupportedInput("tty".into()).kind(),
            ErrorKind::Unsupported
        );

        let failed = EngineError::handler("onstart", anyhow::anyhow!("boom"));
        assert_eq!(failed.kind(), ErrorKind::Handler);
        assert!(!failed.kind().is_recoverable());
        assert!(failed.to_string().contains("onstart"));
    }
}
