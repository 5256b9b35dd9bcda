//! Router settings.
//!
//! ```toml
//! session_tag = 1700000000000
//! veto_unresolved_routes = true
//! ```

use crate::error::SettingsError;
use crate::history::load_timestamp;
use serde::{Deserialize, Serialize};

/// Settings for [`StateRouter`](crate::StateRouter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Fixed session tag. When unset, the page load time in milliseconds is used.
	pub session_tag: Option<u64>,
	/// Veto `RouteChangeStart` for paths the view resolver does not know.
	pub veto_unresolved_routes: bool,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			session_tag: None,
			veto_unresolved_routes: true,
		}
	}
}

impl RouterSettings {
	/// Parses settings from TOML; missing keys take their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	/// The configured session tag, or the current time.
	pub fn resolve_session_tag(&self) -> u64 {
		self.session_tag.unwrap_or_else(load_timestamp)
	}
}
