//! Integration test utilities for dj-router
//!
//! Wires a [`StateRouter`] over a [`MemoryHistory`] together with a [`Frame`]
//! and records every event they broadcast.

use dj_router::frame::{Frame, FrameSettings, RouteTable, ViewDescriptor};
use dj_router::state::{
	LocationDecision, MemoryHistory, RouteChangeSuccess, RouterSettings, StateRouter,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Base URL of the simulated document.
pub const BASE: &str = "https://app.test/index.html";

/// Session tag used by [`TestApp::new`].
pub const SESSION_TAG: u64 = 1_700_000_000_000;

/// Full URL for a route hash.
pub fn url(hash: &str) -> String {
	format!("{}#/{}", BASE, hash)
}

/// One recorded event, as `kind:detail`.
pub type Log = Arc<Mutex<Vec<String>>>;

/// Router, frame and event log of one simulated page session.
pub struct TestApp {
	pub router: StateRouter<MemoryHistory>,
	pub frame: Frame,
	pub log: Log,
	pub successes: Arc<Mutex<Vec<RouteChangeSuccess>>>,
}

impl TestApp {
	/// Starts a session on an empty document with `home`, `users`, `users/detail`
	/// and `login` registered.
	pub fn new() -> Self {
		Self::start(MemoryHistory::new(BASE), SESSION_TAG)
	}

	/// Starts a session over `history` with `session_tag`.
	pub fn start(history: MemoryHistory, session_tag: u64) -> Self {
		Self::configure(
			history,
			RouterSettings {
				session_tag: Some(session_tag),
				..RouterSettings::default()
			},
			FrameSettings::default(),
		)
	}

	/// Starts a session over `history` with explicit router and frame settings.
	pub fn configure(
		history: MemoryHistory,
		router_settings: RouterSettings,
		frame_settings: FrameSettings,
	) -> Self {
		let routes = RouteTable::new()
			.with_view(ViewDescriptor::new("page-home", "home").with_title("Home"))
			.and_then(|routes| routes.with_view(ViewDescriptor::new("page-users", "users")))
			.and_then(|routes| {
				routes.with_view(
					ViewDescriptor::new("page-users-detail", "users/detail").with_auto_destroy(true),
				)
			})
			.and_then(|routes| routes.with_view(ViewDescriptor::new("page-login", "login")))
			.expect("test routes are distinct");
		let frame = Frame::new(routes, frame_settings);
		let router =
			StateRouter::with_settings(history, router_settings).with_resolver(frame.resolver());
		frame.attach(router.bus());

		let log: Log = Arc::new(Mutex::new(Vec::new()));
		let successes = Arc::new(Mutex::new(Vec::new()));

		let sink = Arc::clone(&log);
		router.bus().on_change_start(move |event| {
			sink.lock().push(format!("start:{}", event.new_state));
		});
		let sink = Arc::clone(&log);
		let recorded = Arc::clone(&successes);
		router.bus().on_change_success(move |event| {
			sink.lock().push(format!("success:{}", event.new_state));
			recorded.lock().push(event.clone());
		});
		let sink = Arc::clone(&log);
		frame.on_navigation(move |event| {
			sink.lock().push(format!("page:{}", event.new_page.state()));
		});

		Self {
			router,
			frame,
			log,
			successes,
		}
	}

	/// Delivers queued location changes the way a browser does.
	pub fn settle(&mut self) {
		while let Some(change) = self.router.history_mut().backend_mut().take_change() {
			if self
				.router
				.handle_location_change_start(&change.new_url, &change.old_url)
				== LocationDecision::Prevent
			{
				continue;
			}
			self.router
				.handle_location_change_success(&change.new_url)
				.expect("memory history does not fail");
		}
	}

	/// Presses the back button.
	pub fn back(&mut self) {
		self.router.go_back().expect("memory history does not fail");
		self.settle();
	}

	/// Presses the forward button.
	pub fn forward(&mut self) {
		self.router.forward().expect("memory history does not fail");
		self.settle();
	}

	/// Types `url` into the address bar.
	pub fn type_url(&mut self, url: &str) {
		self.router.history_mut().backend_mut().visit(url);
		self.settle();
	}

	/// Takes the recorded log.
	pub fn take_log(&self) -> Vec<String> {
		std::mem::take(&mut *self.log.lock())
	}

	/// Paths of the cached states, oldest first.
	pub fn cached_paths(&self) -> Vec<String> {
		self.router
			.cache()
			.states()
			.iter()
			.map(|state| state.path().to_string())
			.collect()
	}

	/// Paths of the frame's pages, oldest first.
	pub fn page_paths(&self) -> Vec<String> {
		self.frame
			.pages()
			.iter()
			.map(|page| page.state().path().to_string())
			.collect()
	}

	/// Asserts that the frame holds one page per cached state, in cache order.
	pub fn assert_pages_match_cache(&self) {
		let pages = self.frame.pages();
		let states = self.router.cache().states();
		assert_eq!(pages.len(), self.router.cache().len());
		for (page, state) in pages.iter().zip(states) {
			assert_eq!(page.state().id(), state.id());
			assert_eq!(page.state().hash(), state.hash());
		}
		assert_eq!(
			self.frame.current_page().map(|page| page.state().hash()),
			self.router.active_state().map(|state| state.hash())
		);
	}

	/// URLs of the history entries, oldest first.
	pub fn history_urls(&self) -> Vec<String> {
		self.router
			.history()
			.backend()
			.urls()
			.into_iter()
			.map(str::to_string)
			.collect()
	}
}

impl Default for TestApp {
	fn default() -> Self {
		Self::new()
	}
}
