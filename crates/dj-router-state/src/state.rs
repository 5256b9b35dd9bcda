//! Route states.
//!
//! A [`State`] is a normalized path plus a flat query map. It is given a
//! [`StateId`] exactly once, when it is committed to history and the state
//! cache; states built only for comparison never receive one.
//!
//! The canonical hash form is `path` or `path?k1=v1&k2=v2`. Query values are
//! written as-is, no URL encoding is applied. Parsing accepts both `#/` and
//! `#!/` prefixes while writing always emits `#/`.

use crate::error::StateError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Flat query parameters of a state.
pub type Query = BTreeMap<String, String>;

static HASH_PATTERN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"#(!)?/([^?]+)(\?(.*))?$").expect("hash pattern must compile")
});

/// Identifier assigned to a state when it is activated.
///
/// Ids increase strictly in activation order, so a lower id was reached
/// earlier in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
	/// Wraps a raw id, e.g. one read back from a history entry.
	pub const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw id.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for StateId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Source of state ids for one router session.
#[derive(Debug, Default)]
pub struct StateIdSequence {
	last: u64,
}

impl StateIdSequence {
	/// Creates a sequence whose first id is `1`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the most recently issued id.
	pub fn last(&self) -> Option<StateId> {
		(self.last > 0).then_some(StateId(self.last))
	}

	fn next_id(&mut self) -> StateId {
		self.last += 1;
		StateId(self.last)
	}
}

/// A logical navigation target: path, query and (once committed) an id.
#[derive(Debug, Clone)]
pub struct State {
	path: String,
	query: Query,
	id: Option<StateId>,
}

impl State {
	/// Creates an inactive state, normalizing the path.
	pub fn new(path: impl AsRef<str>, query: Query) -> Self {
		Self {
			path: normalize_path(path.as_ref()),
			query,
			id: None,
		}
	}

	/// Creates an inactive state without query parameters.
	pub fn from_path(path: impl AsRef<str>) -> Self {
		Self::new(path, Query::new())
	}

	/// Parses the hash part of a URL.
	///
	/// Returns `None` when the URL has no `#/<path>` (or `#!/<path>`) fragment.
	///
	/// # Examples
	///
	/// ```
	/// use dj_router_state::State;
	///
	/// let state = State::parse("https://app.test/index.html#!/users/list?page=2").unwrap();
	/// assert_eq!(state.path(), "users/list");
	/// assert_eq!(state.hash(), "users/list?page=2");
	///
	/// assert!(State::parse("https://app.test/index.html").is_none());
	/// ```
	pub fn parse(url: &str) -> Option<Self> {
		let captures = HASH_PATTERN.captures(url)?;
		let path = captures.get(2)?.as_str();
		let query = parse_query(captures.get(4).map(|m| m.as_str()));
		Some(Self::new(path, query))
	}

	/// Returns the normalized path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the query parameters.
	pub fn query(&self) -> &Query {
		&self.query
	}

	/// Returns the id, or `None` if the state was never activated.
	pub fn id(&self) -> Option<StateId> {
		self.id
	}

	/// Whether the state has received its id.
	pub fn is_active(&self) -> bool {
		self.id.is_some()
	}

	/// Assigns the next id from `ids`.
	///
	/// # Errors
	///
	/// Returns [`StateError::AlreadyActivated`] if the state already has an id;
	/// the existing id is kept.
	pub fn activate(&mut self, ids: &mut StateIdSequence) -> Result<StateId, StateError> {
		if let Some(id) = self.id {
			return Err(StateError::AlreadyActivated(id));
		}
		let id = ids.next_id();
		self.id = Some(id);
		Ok(id)
	}

	/// Canonical hash string (without the leading `#/`).
	pub fn hash(&self) -> String {
		hash(&self.path, &self.query)
	}

	/// Full URL of this state under `base` (origin + pathname).
	pub fn href(&self, base: &str) -> String {
		href(base, &self.path, &self.query)
	}
}

impl PartialEq for State {
	fn eq(&self, other: &Self) -> bool {
		self.hash() == other.hash()
	}
}

impl Eq for State {}

impl PartialEq<str> for State {
	fn eq(&self, other: &str) -> bool {
		self.hash() == other
	}
}

impl PartialEq<&str> for State {
	fn eq(&self, other: &&str) -> bool {
		self.hash() == *other
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.hash())
	}
}

/// Builds the canonical hash string for a path and query.
pub fn hash(path: &str, query: &Query) -> String {
	let query_string = query
		.iter()
		.map(|(key, value)| format!("{}={}", key, value))
		.collect::<Vec<_>>()
		.join("&");
	if query_string.is_empty() {
		path.to_string()
	} else {
		format!("{}?{}", path, query_string)
	}
}

/// Builds the full URL: `base` + `#/` + hash.
pub fn href(base: &str, path: &str, query: &Query) -> String {
	format!("{}#/{}", base, hash(path, query))
}

/// Parses a query string into a [`Query`].
///
/// Pairs without a value (`k` or `k=`) are dropped. Only the text between the
/// first and second `=` is kept as the value.
pub fn parse_query(query_string: Option<&str>) -> Query {
	let mut query = Query::new();
	let Some(query_string) = query_string.filter(|s| !s.is_empty()) else {
		return query;
	};
	for pair in query_string.split('&') {
		let mut parts = pair.split('=');
		let key = parts.next().unwrap_or_default();
		if let Some(value) = parts.next().filter(|v| !v.is_empty()) {
			query.insert(key.to_string(), value.to_string());
		}
	}
	query
}

/// Strips leading and trailing slashes and whitespace.
pub fn normalize_path(path: &str) -> String {
	path.trim_matches(|c: char| c.is_whitespace() || c == '/')
		.to_string()
}
