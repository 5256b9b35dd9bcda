//! Error types for the navigation state engine.
//!
//! Vetoed and no-op navigations are not errors; they are reported through
//! [`Navigation`](crate::Navigation). The types here cover programming errors
//! (re-activating a state), failures of the underlying history backend, and the
//! reasons a native navigation cannot be resolved against the state cache.

use crate::state::StateId;

/// Error raised by [`State`](crate::State) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
	/// The state already received an id.
	#[error("state is already activated with id {0}")]
	AlreadyActivated(StateId),
}

/// Error raised by a [`HistoryBackend`](crate::HistoryBackend) or the session history.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
	/// The platform does not expose a history/location object.
	#[error("History unavailable: {0}")]
	Unavailable(String),

	/// The platform rejected a history operation.
	#[error("History operation failed: {0}")]
	Operation(String),

	/// A state without an id cannot be written to history.
	#[error("State '{0}' has not been activated")]
	Inactive(String),

	/// The tagged entry could not be encoded.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Why a trusted id could not be resolved to a new cache position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// The current history entry carries no id from this session.
	#[error("untrusted history entry")]
	Untrusted,

	/// The id belongs to this session but is not cached.
	#[error("unknown id {0}")]
	UnknownId(StateId),

	/// The id resolves to the position that is already active.
	#[error("state {0} is already at the current position")]
	SamePosition(StateId),

	/// Nothing is cached yet.
	#[error("state cache is empty")]
	Empty,
}

/// Error type for router operations.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
	/// State error.
	#[error(transparent)]
	State(#[from] StateError),

	/// History backend error.
	#[error(transparent)]
	History(#[from] HistoryError),
}

/// Error raised while loading settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}
