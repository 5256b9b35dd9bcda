//! Ordered cache of the states this session has reached.
//!
//! `list[pos]` is always the active state. Appending first drops everything
//! after `pos`, so a new route reached from the middle of the list discards
//! the abandoned forward branch.

use crate::error::ResolveError;
use crate::state::{State, StateId};

/// The outcome of a resolved navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	/// The state that was active before.
	pub old_state: Option<State>,
	/// The state that is active now.
	pub new_state: State,
}

/// States in arrival order with a cursor on the active one.
#[derive(Debug, Default)]
pub struct StateCache {
	list: Vec<State>,
	pos: Option<usize>,
}

impl StateCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Cached states in arrival order.
	pub fn states(&self) -> &[State] {
		&self.list
	}

	/// Index of the active state.
	pub fn position(&self) -> Option<usize> {
		self.pos
	}

	/// The active state.
	pub fn active(&self) -> Option<&State> {
		self.pos.and_then(|pos| self.list.get(pos))
	}

	/// Whether the active state has the same hash as `state`.
	pub fn active_equals(&self, state: &State) -> bool {
		self.active().is_some_and(|active| active == state)
	}

	/// Number of cached states.
	pub fn len(&self) -> usize {
		self.list.len()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	/// Drops the states after the active one, appends `state` and makes it
	/// active.
	///
	/// `state` is expected to be activated; lookups are by id.
	pub fn append_state(&mut self, state: State) {
		debug_assert!(state.is_active(), "cached states must be activated");
		let keep = self.pos.map_or(0, |pos| pos + 1);
		self.list.truncate(keep);
		self.list.push(state);
		self.pos = Some(self.list.len() - 1);
	}

	/// Swaps the active state for `state` and returns the previous one.
	///
	/// Appends when nothing is active.
	pub fn replace_active(&mut self, state: State) -> Option<State> {
		debug_assert!(state.is_active(), "cached states must be activated");
		match self.pos.and_then(|pos| self.list.get_mut(pos)) {
			Some(slot) => Some(std::mem::replace(slot, state)),
			None => {
				self.append_state(state);
				None
			}
		}
	}

	/// Position of the state with `id`.
	pub fn find_position_by_id(&self, id: StateId) -> Option<usize> {
		self.list.iter().position(|state| state.id() == Some(id))
	}

	/// Moves the cursor to the state carrying `trusted_id`.
	///
	/// # Errors
	///
	/// - [`ResolveError::Untrusted`] when there is no trusted id.
	/// - [`ResolveError::UnknownId`] when no cached state has the id.
	/// - [`ResolveError::SamePosition`] when the id is already active.
	pub fn resolve_navigation(
		&mut self,
		trusted_id: Option<StateId>,
	) -> Result<Transition, ResolveError> {
		let id = trusted_id.ok_or(ResolveError::Untrusted)?;
		let pos = self
			.find_position_by_id(id)
			.ok_or(ResolveError::UnknownId(id))?;
		self.navigate_to(pos)
	}

	/// Moves the cursor to the last cached state.
	pub fn navigate_to_last(&mut self) -> Result<Transition, ResolveError> {
		let last = self.list.len().checked_sub(1).ok_or(ResolveError::Empty)?;
		self.navigate_to(last)
	}

	fn navigate_to(&mut self, pos: usize) -> Result<Transition, ResolveError> {
		let new_state = self.list.get(pos).cloned().ok_or(ResolveError::Empty)?;
		if self.pos == Some(pos) {
			// Cached states are always activated.
			let id = new_state.id().unwrap_or(StateId::from_raw(0));
			return Err(ResolveError::SamePosition(id));
		}
		let old_state = self.active().cloned();
		self.pos = Some(pos);
		Ok(Transition {
			old_state,
			new_state,
		})
	}
}
