//! In-memory history backend.
//!
//! Behaves like a browser tab restricted to one document: a stack of entries
//! with a cursor. Pushing truncates the forward entries. Like a browser, writes
//! through [`HistoryBackend`] are silent; visits and traversals are queued as
//! [`LocationChange`]s that the host later feeds to
//! [`StateRouter::handle_location_change_start`](crate::StateRouter::handle_location_change_start)
//! and
//! [`StateRouter::handle_location_change_success`](crate::StateRouter::handle_location_change_success),
//! mirroring the asynchronous notifications a browser delivers.

use super::{HistoryBackend, TaggedEntry};
use crate::error::HistoryError;
use std::collections::VecDeque;

/// A location change waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChange {
	/// URL after the change.
	pub new_url: String,
	/// URL before the change.
	pub old_url: String,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
	url: String,
	tag: Option<TaggedEntry>,
}

/// History stack kept in memory.
#[derive(Debug)]
pub struct MemoryHistory {
	base: String,
	entries: Vec<MemoryEntry>,
	index: usize,
	pending: VecDeque<LocationChange>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `base` without a hash.
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		Self::with_url(base.clone(), base)
	}

	/// Creates a history whose only entry is `url`.
	pub fn with_url(base: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			base: base.into(),
			entries: vec![MemoryEntry {
				url: url.into(),
				tag: None,
			}],
			index: 0,
			pending: VecDeque::new(),
		}
	}

	/// Navigates to `url` the way a typed address or a plain link does: a new
	/// untagged entry is appended after the current one.
	pub fn visit(&mut self, url: impl Into<String>) {
		self.visit_with(url, None);
	}

	/// Like [`visit`](Self::visit), with explicit entry data.
	pub fn visit_with(&mut self, url: impl Into<String>, tag: Option<TaggedEntry>) {
		let old_url = self.current_url().to_string();
		self.append(url.into(), tag);
		self.queue(old_url);
	}

	/// URL of the current entry.
	pub fn current_url(&self) -> &str {
		&self.entries[self.index].url
	}

	/// Data of the entry at `index`.
	pub fn tag_at(&self, index: usize) -> Option<TaggedEntry> {
		self.entries.get(index).and_then(|entry| entry.tag)
	}

	/// URLs of all entries, oldest first.
	pub fn urls(&self) -> Vec<&str> {
		self.entries.iter().map(|entry| entry.url.as_str()).collect()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Always `false`; a history has at least one entry.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Takes the oldest undelivered location change.
	pub fn take_change(&mut self) -> Option<LocationChange> {
		self.pending.pop_front()
	}

	/// Number of undelivered location changes.
	pub fn pending_changes(&self) -> usize {
		self.pending.len()
	}

	fn append(&mut self, url: String, tag: Option<TaggedEntry>) {
		self.entries.truncate(self.index + 1);
		self.entries.push(MemoryEntry { url, tag });
		self.index = self.entries.len() - 1;
	}

	fn queue(&mut self, old_url: String) {
		let new_url = self.current_url().to_string();
		self.pending.push_back(LocationChange { new_url, old_url });
	}
}

impl HistoryBackend for MemoryHistory {
	fn href(&self) -> Result<String, HistoryError> {
		Ok(self.current_url().to_string())
	}

	fn base(&self) -> Result<String, HistoryError> {
		Ok(self.base.clone())
	}

	fn entry(&self) -> Result<Option<TaggedEntry>, HistoryError> {
		Ok(self.entries[self.index].tag)
	}

	fn push_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError> {
		self.append(url.to_string(), Some(entry));
		Ok(())
	}

	fn replace_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError> {
		self.entries[self.index] = MemoryEntry {
			url: url.to_string(),
			tag: Some(entry),
		};
		Ok(())
	}

	fn go(&mut self, delta: i32) -> Result<(), HistoryError> {
		let Some(target) = self
			.index
			.checked_add_signed(delta as isize)
			.filter(|target| *target < self.entries.len())
		else {
			return Ok(());
		};
		if target != self.index {
			let old_url = self.current_url().to_string();
			self.index = target;
			self.queue(old_url);
		}
		Ok(())
	}
}
