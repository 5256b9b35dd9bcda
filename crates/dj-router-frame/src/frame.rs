//! The frame: turns committed route changes into page switches.
//!
//! For every `RouteChangeSuccess` the frame locates or creates the page of the
//! new state, announces the switch with [`PageNavigateStart`], flips
//! visibility, and reports the result with [`PageNavigation`].

use crate::page::{Page, PageCache, PageChanges};
use crate::settings::FrameSettings;
use crate::view::RouteTable;
use dj_router_state::{ListenerId, NavigationBus, RouteChangeSuccess};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A page switch is about to happen.
#[derive(Debug, Clone)]
pub struct PageNavigateStart {
	/// Page of the new state, not shown yet.
	pub new_page: Page,
	/// Page being left.
	pub old_page: Option<Page>,
}

/// A page switch happened.
#[derive(Debug, Clone)]
pub struct PageNavigation {
	/// Page that was hidden.
	pub old_page: Option<Page>,
	/// Page that is shown now.
	pub new_page: Page,
	/// Cache positions of the switch.
	pub changes: PageChanges,
	/// Every cached page after the switch.
	pub cache: Vec<Page>,
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct FrameInner {
	routes: Arc<RouteTable>,
	pages: Mutex<PageCache>,
	start_listeners: RwLock<Vec<Listener<PageNavigateStart>>>,
	navigation_listeners: RwLock<Vec<Listener<PageNavigation>>>,
}

/// Page host driven by the router's event bus.
///
/// Cloning shares the page cache and listeners.
#[derive(Clone)]
pub struct Frame {
	inner: Arc<FrameInner>,
}

impl std::fmt::Debug for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Frame")
			.field("routes", &self.inner.routes.len())
			.field("pages", &self.inner.pages.lock().len())
			.finish()
	}
}

impl Frame {
	/// Creates a frame over `routes`.
	pub fn new(routes: RouteTable, settings: FrameSettings) -> Self {
		Self {
			inner: Arc::new(FrameInner {
				routes: Arc::new(routes),
				pages: Mutex::new(PageCache::new(settings.max_cached_pages)),
				start_listeners: RwLock::new(Vec::new()),
				navigation_listeners: RwLock::new(Vec::new()),
			}),
		}
	}

	/// The route table, for use as the router's view resolver.
	pub fn resolver(&self) -> Arc<RouteTable> {
		Arc::clone(&self.inner.routes)
	}

	/// Subscribes the frame to committed route changes on `bus`.
	pub fn attach(&self, bus: &NavigationBus) -> ListenerId {
		let inner = Arc::clone(&self.inner);
		bus.on_change_success(move |event| inner.on_route_change(event))
	}

	/// Subscribes to [`PageNavigateStart`].
	pub fn on_navigate_start<F>(&self, listener: F)
	where
		F: Fn(&PageNavigateStart) + Send + Sync + 'static,
	{
		self.inner.start_listeners.write().push(Arc::new(listener));
	}

	/// Subscribes to [`PageNavigation`].
	pub fn on_navigation<F>(&self, listener: F)
	where
		F: Fn(&PageNavigation) + Send + Sync + 'static,
	{
		self.inner.navigation_listeners.write().push(Arc::new(listener));
	}

	/// Snapshot of the cached pages.
	pub fn pages(&self) -> Vec<Page> {
		self.inner.pages.lock().pages().to_vec()
	}

	/// The shown page.
	pub fn current_page(&self) -> Option<Page> {
		self.inner.pages.lock().current().cloned()
	}

	/// Handles a committed route change directly, without a bus.
	pub fn on_route_change(&self, event: &RouteChangeSuccess) {
		self.inner.on_route_change(event);
	}
}

impl FrameInner {
	fn on_route_change(&self, event: &RouteChangeSuccess) {
		let view = self.routes.resolve(event.new_state.path());
		if view.is_none() {
			tracing::warn!(path = event.new_state.path(), "no view registered for path");
		}

		let (changes, replaced, start) = {
			let mut pages = self.pages.lock();
			let (changes, replaced) = if event.is_replacement() {
				pages.on_replace(&event.new_state, view)
			} else {
				(pages.on_state(&event.new_state, view), None)
			};
			let Some(new_page) = pages.get(changes.new_pos).cloned() else {
				return;
			};
			let old_page = match &replaced {
				Some(page) => Some(page.clone()),
				None => changes.old_pos.and_then(|pos| pages.get(pos)).cloned(),
			};
			(changes, replaced, PageNavigateStart { new_page, old_page })
		};
		emit(&self.start_listeners, &start);

		let navigation = {
			let mut pages = self.pages.lock();
			let (old_page, new_page) = pages.invalidate(changes);
			let Some(new_page) = new_page else {
				return;
			};
			PageNavigation {
				old_page: old_page.or(replaced),
				new_page,
				changes,
				cache: pages.pages().to_vec(),
			}
		};
		tracing::debug!(
			hash = %navigation.new_page.state(),
			old_pos = ?changes.old_pos,
			new_pos = changes.new_pos,
			"page shown"
		);
		emit(&self.navigation_listeners, &navigation);
	}
}

fn emit<E>(listeners: &RwLock<Vec<Listener<E>>>, event: &E) {
	let snapshot: Vec<Listener<E>> = listeners.read().iter().cloned().collect();
	for listener in snapshot {
		listener(event);
	}
}
