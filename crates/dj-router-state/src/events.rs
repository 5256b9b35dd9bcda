//! Navigation event bus.
//!
//! Two events are broadcast synchronously to every listener of their kind:
//! [`RouteChangeStart`] before anything is mutated (listeners may cancel it),
//! and [`RouteChangeSuccess`] once per committed transition.

use crate::cache::Transition;
use crate::state::State;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Kind of a route event, used to key subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteEventKind {
	/// [`RouteChangeStart`].
	ChangeStart,
	/// [`RouteChangeSuccess`].
	ChangeSuccess,
}

/// Cancellation flag carried by a cancelable event.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
	/// Marks the event as canceled.
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	/// Whether any listener canceled the event.
	pub fn is_canceled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// A transition is about to happen.
#[derive(Debug)]
pub struct RouteChangeStart {
	/// Target state (not yet activated).
	pub new_state: State,
	/// State the transition leaves.
	pub old_state: Option<State>,
	cancel: CancelFlag,
}

impl RouteChangeStart {
	/// Creates a pending, uncanceled event.
	pub fn new(new_state: State, old_state: Option<State>) -> Self {
		Self {
			new_state,
			old_state,
			cancel: CancelFlag::default(),
		}
	}

	/// Vetoes the transition.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Whether the transition was vetoed.
	pub fn is_canceled(&self) -> bool {
		self.cancel.is_canceled()
	}
}

/// Direction of a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// No state was active before.
	Initial,
	/// The new state was reached earlier than the old one.
	Back,
	/// Any other transition.
	Forward,
}

/// A transition was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeSuccess {
	/// State that is now active.
	pub new_state: State,
	/// State that was active before.
	pub old_state: Option<State>,
	replaced: bool,
}

impl RouteChangeSuccess {
	/// Creates the event.
	pub fn new(new_state: State, old_state: Option<State>) -> Self {
		Self {
			new_state,
			old_state,
			replaced: false,
		}
	}

	/// Creates the event for a transition that swapped the active state in
	/// place instead of adding one.
	pub fn replacement(new_state: State, old_state: Option<State>) -> Self {
		Self {
			replaced: old_state.is_some(),
			..Self::new(new_state, old_state)
		}
	}

	/// Whether `new_state` took the place of `old_state`.
	pub fn is_replacement(&self) -> bool {
		self.replaced
	}

	/// Classifies the transition by comparing state ids.
	pub fn direction(&self) -> Direction {
		match &self.old_state {
			None => Direction::Initial,
			Some(old) if old.id() > self.new_state.id() => Direction::Back,
			Some(_) => Direction::Forward,
		}
	}

	/// Whether this is a back navigation.
	pub fn is_back(&self) -> bool {
		self.direction() == Direction::Back
	}
}

impl From<Transition> for RouteChangeSuccess {
	fn from(transition: Transition) -> Self {
		Self::new(transition.new_state, transition.old_state)
	}
}

/// A broadcast route event.
#[derive(Debug, Clone, Copy)]
pub enum RouteEvent<'a> {
	/// See [`RouteChangeStart`].
	ChangeStart(&'a RouteChangeStart),
	/// See [`RouteChangeSuccess`].
	ChangeSuccess(&'a RouteChangeSuccess),
}

impl RouteEvent<'_> {
	/// The event's kind.
	pub fn kind(&self) -> RouteEventKind {
		match self {
			Self::ChangeStart(_) => RouteEventKind::ChangeStart,
			Self::ChangeSuccess(_) => RouteEventKind::ChangeSuccess,
		}
	}
}

/// Type alias for route event listeners.
pub type RouteListener = Arc<dyn Fn(&RouteEvent<'_>) + Send + Sync>;

/// Handle returned by [`NavigationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Subscription {
	id: ListenerId,
	kind: RouteEventKind,
	listener: RouteListener,
}

/// Listener registry for route events.
pub struct NavigationBus {
	subscriptions: RwLock<Vec<Subscription>>,
	next_id: AtomicU64,
}

impl std::fmt::Debug for NavigationBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationBus")
			.field("start_listeners", &self.listener_count(RouteEventKind::ChangeStart))
			.field(
				"success_listeners",
				&self.listener_count(RouteEventKind::ChangeSuccess),
			)
			.finish()
	}
}

impl Default for NavigationBus {
	fn default() -> Self {
		Self::new()
	}
}

impl NavigationBus {
	/// Creates a bus without listeners.
	pub fn new() -> Self {
		Self {
			subscriptions: RwLock::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Subscribes `listener` to events of `kind`.
	pub fn subscribe<F>(&self, kind: RouteEventKind, listener: F) -> ListenerId
	where
		F: Fn(&RouteEvent<'_>) + Send + Sync + 'static,
	{
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.subscriptions.write().push(Subscription {
			id,
			kind,
			listener: Arc::new(listener),
		});
		id
	}

	/// Subscribes to [`RouteChangeStart`].
	///
	/// # Example
	///
	/// ```
	/// use dj_router_state::NavigationBus;
	///
	/// let bus = NavigationBus::new();
	/// bus.on_change_start(|event| {
	///     if event.new_state.path().starts_with("admin") {
	///         event.cancel();
	///     }
	/// });
	/// ```
	pub fn on_change_start<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&RouteChangeStart) + Send + Sync + 'static,
	{
		self.subscribe(RouteEventKind::ChangeStart, move |event| {
			if let RouteEvent::ChangeStart(start) = event {
				listener(start);
			}
		})
	}

	/// Subscribes to [`RouteChangeSuccess`].
	pub fn on_change_success<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&RouteChangeSuccess) + Send + Sync + 'static,
	{
		self.subscribe(RouteEventKind::ChangeSuccess, move |event| {
			if let RouteEvent::ChangeSuccess(success) = event {
				listener(success);
			}
		})
	}

	/// Removes a listener. Returns `false` if it was not subscribed.
	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		let mut subscriptions = self.subscriptions.write();
		let before = subscriptions.len();
		subscriptions.retain(|subscription| subscription.id != id);
		subscriptions.len() != before
	}

	/// Number of listeners for `kind`.
	pub fn listener_count(&self, kind: RouteEventKind) -> usize {
		self.subscriptions
			.read()
			.iter()
			.filter(|subscription| subscription.kind == kind)
			.count()
	}

	/// Delivers `event` to every listener of its kind, in subscription order.
	///
	/// Listeners run on a snapshot, so they may subscribe or unsubscribe while
	/// being called.
	pub fn broadcast(&self, event: RouteEvent<'_>) {
		let kind = event.kind();
		let listeners: Vec<RouteListener> = self
			.subscriptions
			.read()
			.iter()
			.filter(|subscription| subscription.kind == kind)
			.map(|subscription| Arc::clone(&subscription.listener))
			.collect();
		for listener in listeners {
			listener(&event);
		}
	}
}
