//! Error types for the page layer.

/// Error raised by the page layer.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
	/// Two views were registered for one path.
	#[error("Path '{path}' is already bound to view '{existing}'")]
	DuplicatePath { path: String, existing: String },

	/// Frame settings could not be parsed.
	#[error("TOML error: {0}")]
	Settings(#[from] toml::de::Error),
}
