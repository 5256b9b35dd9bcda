//! Navigation reconciliation engine.
//!
//! [`StateRouter`] owns the session history, the state cache and the id
//! sequence, and decides for every navigation which state becomes active,
//! how history and cache change, and which events fire. Three sources feed it:
//!
//! 1. Programmatic calls: [`navigate`](StateRouter::navigate),
//!    [`replace`](StateRouter::replace), [`replace_query`](StateRouter::replace_query).
//!    [`go_back`](StateRouter::go_back) and [`forward`](StateRouter::forward)
//!    only move the platform history; the result arrives through source 3.
//! 2. A native location change that has not been committed yet:
//!    [`handle_location_change_start`](StateRouter::handle_location_change_start).
//! 3. A native location change that has been committed (back/forward, typed
//!    URLs, and hosts that also report our own push/replace):
//!    [`handle_location_change_success`](StateRouter::handle_location_change_success).
//!
//! `RouteChangeStart` is always broadcast before any mutation and
//! `RouteChangeSuccess` after it.

use crate::cache::StateCache;
use crate::error::{HistoryError, ResolveError, RouterError};
use crate::events::{NavigationBus, RouteChangeStart, RouteChangeSuccess, RouteEvent};
use crate::history::{HistoryBackend, SessionHistory};
use crate::settings::RouterSettings;
use crate::state::{self, Query, State, StateIdSequence};
use std::cell::RefCell;
use std::sync::Arc;

/// Resolves a route path to a view. Implemented by the view layer.
pub trait ViewResolver: Send + Sync {
	/// Whether a view is registered for `path`.
	fn resolves(&self, path: &str) -> bool;
}

/// Outcome of a programmatic navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
	/// A transition was committed.
	Navigated,
	/// Nothing to do: the target is already current, or nothing is active yet.
	Unchanged,
	/// A `RouteChangeStart` listener canceled the transition.
	Vetoed,
}

/// What to do with a native location change that is about to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationDecision {
	/// Let it happen.
	Proceed,
	/// Prevent it (best effort; a browser may already show the new URL).
	Prevent,
}

/// The router engine.
pub struct StateRouter<B> {
	history: SessionHistory<B>,
	cache: StateCache,
	ids: StateIdSequence,
	bus: Arc<NavigationBus>,
	resolver: Option<Arc<dyn ViewResolver>>,
	settings: RouterSettings,
}

impl<B: std::fmt::Debug> std::fmt::Debug for StateRouter<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StateRouter")
			.field("history", &self.history)
			.field("cache", &self.cache)
			.field("last_id", &self.ids.last())
			.field("has_resolver", &self.resolver.is_some())
			.field("settings", &self.settings)
			.finish()
	}
}

impl<B: HistoryBackend> StateRouter<B> {
	/// Creates a router over `backend` with default settings.
	pub fn new(backend: B) -> Self {
		Self::with_settings(backend, RouterSettings::default())
	}

	/// Creates a router over `backend`.
	pub fn with_settings(backend: B, settings: RouterSettings) -> Self {
		let history = SessionHistory::with_session_tag(backend, settings.resolve_session_tag());
		Self::from_parts(history, StateCache::new(), Arc::new(NavigationBus::new()))
			.with_router_settings(settings)
	}

	/// Creates a router from its collaborators.
	pub fn from_parts(
		history: SessionHistory<B>,
		cache: StateCache,
		bus: Arc<NavigationBus>,
	) -> Self {
		Self {
			history,
			cache,
			ids: StateIdSequence::new(),
			bus,
			resolver: None,
			settings: RouterSettings::default(),
		}
	}

	/// Replaces the settings. The session tag of an existing history is kept.
	pub fn with_router_settings(mut self, settings: RouterSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Uses `resolver` to veto navigation to paths without a view.
	pub fn with_resolver(mut self, resolver: Arc<dyn ViewResolver>) -> Self {
		self.resolver = Some(resolver);
		self
	}

	/// The event bus.
	pub fn bus(&self) -> &Arc<NavigationBus> {
		&self.bus
	}

	/// The state cache.
	pub fn cache(&self) -> &StateCache {
		&self.cache
	}

	/// The session history.
	pub fn history(&self) -> &SessionHistory<B> {
		&self.history
	}

	/// The session history, mutably.
	pub fn history_mut(&mut self) -> &mut SessionHistory<B> {
		&mut self.history
	}

	/// The active state.
	pub fn active_state(&self) -> Option<&State> {
		self.cache.active()
	}

	/// URL of the state last written to history.
	pub fn active_href(&self) -> Result<Option<String>, HistoryError> {
		match self.history.active_state() {
			Some(active) => Ok(Some(active.href(&self.history.base()?))),
			None => Ok(None),
		}
	}

	/// Canonical hash for `path` and `query`.
	pub fn hash(path: &str, query: &Query) -> String {
		state::hash(&state::normalize_path(path), query)
	}

	/// Full URL for `path` and `query` at the current location.
	pub fn href(&self, path: &str, query: &Query) -> Result<String, RouterError> {
		let base = self.history.base()?;
		Ok(state::href(&base, &state::normalize_path(path), query))
	}

	/// Navigates to `path` with `query`, pushing a new history entry.
	///
	/// The first navigation of a session replaces the current entry instead.
	/// Navigating to the current URL is a no-op.
	pub fn navigate(&mut self, path: &str, query: Query) -> Result<Navigation, RouterError> {
		let mut candidate = State::new(path, query);
		let current = self.current_state()?;
		if self.start_vetoed(&candidate, current) {
			return Ok(Navigation::Vetoed);
		}

		if self.history.active_state().is_none() {
			candidate.activate(&mut self.ids)?;
			self.history.replace(&candidate)?;
			let old_state = self.cache.active().cloned();
			self.cache.append_state(candidate.clone());
			self.broadcast_success(RouteChangeSuccess::new(candidate, old_state));
			return Ok(Navigation::Navigated);
		}

		if self.history.href()? == candidate.href(&self.history.base()?) {
			tracing::debug!(hash = %candidate, "already at target, navigation skipped");
			return Ok(Navigation::Unchanged);
		}

		candidate.activate(&mut self.ids)?;
		self.history.push(&candidate)?;
		let old_state = self.cache.active().cloned();
		self.cache.append_state(candidate.clone());
		self.broadcast_success(RouteChangeSuccess::new(candidate, old_state));
		Ok(Navigation::Navigated)
	}

	/// Steps one entry back in the platform history.
	pub fn go_back(&mut self) -> Result<(), RouterError> {
		Ok(self.history.go_back()?)
	}

	/// Steps one entry forward in the platform history.
	pub fn forward(&mut self) -> Result<(), RouterError> {
		Ok(self.history.forward()?)
	}

	/// Replaces the current history entry and the active cached state.
	pub fn replace(&mut self, path: &str, query: Query) -> Result<Navigation, RouterError> {
		let mut state = State::new(path, query);
		let current = self.current_state()?;
		if self.start_vetoed(&state, current) {
			return Ok(Navigation::Vetoed);
		}

		state.activate(&mut self.ids)?;
		self.history.replace(&state)?;
		let old_state = self.cache.replace_active(state.clone());
		self.broadcast_success(RouteChangeSuccess::replacement(state, old_state));
		Ok(Navigation::Navigated)
	}

	/// Replaces the query of the active state.
	///
	/// Does nothing before the first navigation.
	pub fn replace_query(&mut self, query: Query) -> Result<Navigation, RouterError> {
		let Some(active) = self.history.active_state() else {
			return Ok(Navigation::Unchanged);
		};
		let path = active.path().to_string();
		self.replace(&path, query)
	}

	/// Handles a native location change that is about to be committed.
	///
	/// URLs without a route hash, and the settling of our own history writes,
	/// are let through without an event.
	pub fn handle_location_change_start(&self, new_url: &str, old_url: &str) -> LocationDecision {
		let Some(new_state) = State::parse(new_url) else {
			tracing::debug!(%new_url, "not a route url");
			return LocationDecision::Proceed;
		};
		if let Ok(Some(active_href)) = self.active_href()
			&& active_href == new_url
		{
			return LocationDecision::Proceed;
		}
		if self.start_vetoed(&new_state, State::parse(old_url)) {
			LocationDecision::Prevent
		} else {
			LocationDecision::Proceed
		}
	}

	/// Reconciles a committed native location change with the state cache.
	///
	/// Returns the broadcast event, or `None` when the change needed no
	/// transition.
	pub fn handle_location_change_success(
		&mut self,
		new_url: &str,
	) -> Result<Option<RouteChangeSuccess>, RouterError> {
		let trusted_id = self.history.current_trusted_id()?;
		match self.cache.resolve_navigation(trusted_id) {
			Ok(transition) => {
				self.history.observe(&transition.new_state);
				Ok(Some(self.broadcast_success(transition.into())))
			}
			Err(ResolveError::SamePosition(id)) => {
				tracing::debug!(state_id = id.get(), "history settled on the active state");
				Ok(None)
			}
			Err(reason) => self.adopt_location(new_url, reason),
		}
	}

	/// Reconciles the current location, e.g. at startup.
	pub fn sync_with_location(&mut self) -> Result<Option<RouteChangeSuccess>, RouterError> {
		let href = self.history.href()?;
		self.handle_location_change_success(&href)
	}

	/// A location the cache does not know: make it a new cached state and tag
	/// the history entry with it.
	fn adopt_location(
		&mut self,
		new_url: &str,
		reason: ResolveError,
	) -> Result<Option<RouteChangeSuccess>, RouterError> {
		let Some(mut state) = State::parse(new_url) else {
			tracing::warn!(%new_url, %reason, "unrecognized location ignored");
			return Ok(None);
		};

		if reason == ResolveError::Untrusted
			&& let Some(active) = self.cache.active()
			&& *active == state
		{
			let active = active.clone();
			tracing::warn!(hash = %active, "untrusted entry duplicates the active state, re-tagging");
			self.history.replace(&active)?;
			return Ok(None);
		}

		tracing::debug!(hash = %state, %reason, "adopting new location");
		state.activate(&mut self.ids)?;
		let old_state = self.cache.active().cloned();
		self.cache.append_state(state.clone());
		self.history.replace(&state)?;
		Ok(Some(
			self.broadcast_success(RouteChangeSuccess::new(state, old_state)),
		))
	}

	fn current_state(&self) -> Result<Option<State>, RouterError> {
		if let Some(active) = self.cache.active() {
			return Ok(Some(active.clone()));
		}
		Ok(State::parse(&self.history.href()?))
	}

	/// Broadcasts `RouteChangeStart` and reports whether it was canceled.
	fn start_vetoed(&self, new_state: &State, old_state: Option<State>) -> bool {
		let event = RouteChangeStart::new(new_state.clone(), old_state);
		if self.settings.veto_unresolved_routes
			&& let Some(resolver) = &self.resolver
			&& !resolver.resolves(new_state.path())
		{
			tracing::debug!(path = new_state.path(), "no view for path");
			event.cancel();
		}
		self.bus.broadcast(RouteEvent::ChangeStart(&event));
		if event.is_canceled() {
			tracing::debug!(hash = %new_state, "route change vetoed");
		}
		event.is_canceled()
	}

	fn broadcast_success(&self, event: RouteChangeSuccess) -> RouteChangeSuccess {
		tracing::info!(
			hash = %event.new_state,
			state_id = event.new_state.id().map(|id| id.get()),
			old_state_id = event.old_state.as_ref().and_then(State::id).map(|id| id.get()),
			"route changed"
		);
		self.bus.broadcast(RouteEvent::ChangeSuccess(&event));
		event
	}
}

/// Reconciles the current location with a shared router, the way a
/// `popstate` handler does.
///
/// Returns `false` without touching the router when it is already borrowed,
/// e.g. when the change fires from inside one of the router's own listeners.
pub fn reconcile_location<B: HistoryBackend>(router: &RefCell<StateRouter<B>>) -> bool {
	let Ok(mut router) = router.try_borrow_mut() else {
		tracing::warn!("router busy, location change dropped");
		return false;
	};
	let (new_url, old_url) = match (router.history().href(), router.active_href()) {
		(Ok(new_url), Ok(old_url)) => (new_url, old_url.unwrap_or_default()),
		(Err(err), _) | (_, Err(err)) => {
			tracing::warn!(%err, "cannot read location");
			return true;
		}
	};
	if router.handle_location_change_start(&new_url, &old_url) == LocationDecision::Prevent {
		tracing::warn!(%new_url, "vetoed location change has already been committed");
		return true;
	}
	if let Err(err) = router.handle_location_change_success(&new_url) {
		tracing::warn!(%err, %new_url, "location change not reconciled");
	}
	true
}
