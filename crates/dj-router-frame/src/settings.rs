//! Frame settings.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};

/// Default page cache capacity.
pub const DEFAULT_MAX_CACHED_PAGES: usize = 50;

/// Settings for [`Frame`](crate::Frame).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
	/// Most pages kept in the cache; `None` keeps every page.
	pub max_cached_pages: Option<usize>,
}

impl Default for FrameSettings {
	fn default() -> Self {
		Self {
			max_cached_pages: Some(DEFAULT_MAX_CACHED_PAGES),
		}
	}
}

impl FrameSettings {
	/// Parses settings from TOML; missing keys take their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, FrameError> {
		Ok(toml::from_str(source)?)
	}
}
