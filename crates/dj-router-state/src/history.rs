//! Session history.
//!
//! [`SessionHistory`] wraps the platform's history stack through the
//! [`HistoryBackend`] seam. Every entry it writes is tagged with this session's
//! tag and the state id, so entries surviving from an earlier page load are
//! never mistaken for ours. The platform stack itself is never enumerated;
//! only the entry currently shown can be observed.

mod memory;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserHistory, LocationListener, listen};
pub use memory::{LocationChange, MemoryHistory};

use crate::error::HistoryError;
use crate::state::{State, StateId};
use serde::{Deserialize, Serialize};

/// Data stored alongside every history entry written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedEntry {
	/// Tag of the page session that wrote the entry.
	pub session_tag: u64,
	/// Id of the state the entry points at.
	pub id: StateId,
}

/// Access to the platform's history stack and location.
pub trait HistoryBackend {
	/// Full URL of the current location.
	fn href(&self) -> Result<String, HistoryError>;

	/// Origin and pathname of the current location, without the hash.
	fn base(&self) -> Result<String, HistoryError>;

	/// Data attached to the current history entry, if it is a tagged entry.
	fn entry(&self) -> Result<Option<TaggedEntry>, HistoryError>;

	/// Appends a new entry after the current one.
	fn push_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError>;

	/// Overwrites the current entry.
	fn replace_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError>;

	/// Moves `delta` entries through the stack.
	///
	/// The resulting navigation is reported later by the platform, not by
	/// this call.
	fn go(&mut self, delta: i32) -> Result<(), HistoryError>;
}

/// History adapter for one page session.
#[derive(Debug)]
pub struct SessionHistory<B> {
	backend: B,
	session_tag: u64,
	active: Option<State>,
}

impl<B: HistoryBackend> SessionHistory<B> {
	/// Creates a session history tagged with the current time in milliseconds.
	pub fn new(backend: B) -> Self {
		Self::with_session_tag(backend, load_timestamp())
	}

	/// Creates a session history with an explicit session tag.
	pub fn with_session_tag(backend: B, session_tag: u64) -> Self {
		Self {
			backend,
			session_tag,
			active: None,
		}
	}

	/// Returns the session tag.
	pub fn session_tag(&self) -> u64 {
		self.session_tag
	}

	/// Returns the state last pushed or replaced.
	pub fn active_state(&self) -> Option<&State> {
		self.active.as_ref()
	}

	/// Whether `state` has the same hash as the active state.
	pub fn equals_active(&self, state: &State) -> bool {
		self.active.as_ref().is_some_and(|active| active == state)
	}

	/// Returns the backend.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Returns the backend mutably.
	pub fn backend_mut(&mut self) -> &mut B {
		&mut self.backend
	}

	/// Full URL of the current location.
	pub fn href(&self) -> Result<String, HistoryError> {
		self.backend.href()
	}

	/// Origin and pathname of the current location.
	pub fn base(&self) -> Result<String, HistoryError> {
		self.backend.base()
	}

	/// Overwrites the current entry with `state`.
	pub fn replace(&mut self, state: &State) -> Result<(), HistoryError> {
		let entry = self.tag(state)?;
		let url = state.href(&self.backend.base()?);
		self.backend.replace_entry(entry, &url)?;
		tracing::debug!(state_id = entry.id.get(), %url, "history entry replaced");
		self.active = Some(state.clone());
		Ok(())
	}

	/// Appends `state` as a new entry.
	pub fn push(&mut self, state: &State) -> Result<(), HistoryError> {
		let entry = self.tag(state)?;
		let url = state.href(&self.backend.base()?);
		self.backend.push_entry(entry, &url)?;
		tracing::debug!(state_id = entry.id.get(), %url, "history entry pushed");
		self.active = Some(state.clone());
		Ok(())
	}

	/// Records `state` as active after the platform moved to its entry on its
	/// own, e.g. on back or forward.
	pub fn observe(&mut self, state: &State) {
		self.active = Some(state.clone());
	}

	/// Steps one entry back.
	pub fn go_back(&mut self) -> Result<(), HistoryError> {
		self.backend.go(-1)
	}

	/// Steps one entry forward.
	pub fn forward(&mut self) -> Result<(), HistoryError> {
		self.backend.go(1)
	}

	/// Returns the id stored in the current entry if it was written by this
	/// session, otherwise `None`.
	pub fn current_trusted_id(&self) -> Result<Option<StateId>, HistoryError> {
		let entry = self.backend.entry()?;
		Ok(entry
			.filter(|entry| entry.session_tag == self.session_tag)
			.map(|entry| entry.id))
	}

	fn tag(&self, state: &State) -> Result<TaggedEntry, HistoryError> {
		let id = state
			.id()
			.ok_or_else(|| HistoryError::Inactive(state.hash()))?;
		Ok(TaggedEntry {
			session_tag: self.session_tag,
			id,
		})
	}
}

pub(crate) fn load_timestamp() -> u64 {
	u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
