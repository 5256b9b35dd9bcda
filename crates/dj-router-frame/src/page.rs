//! Pages and the page cache.
//!
//! Every state the router commits gets a [`Page`], at the same position the
//! state has in the router's state cache. Pages stay cached while hidden, so
//! going back shows the earlier page again instead of rebuilding it. Past the
//! capacity the oldest pages are evicted: they keep their slot but lose their
//! view until they are shown again.

use crate::view::ViewDescriptor;
use dj_router_state::State;
use std::sync::Arc;

/// A state together with the view mounted for it.
#[derive(Debug, Clone)]
pub struct Page {
	state: State,
	view: Option<Arc<ViewDescriptor>>,
	visible: bool,
	first_show: bool,
	evicted: bool,
}

impl Page {
	/// Creates a hidden page that has never been shown.
	pub fn new(state: State, view: Option<Arc<ViewDescriptor>>) -> Self {
		Self {
			state,
			view,
			visible: false,
			first_show: true,
			evicted: false,
		}
	}

	/// The page's state.
	pub fn state(&self) -> &State {
		&self.state
	}

	/// The view bound to the state's path.
	pub fn view(&self) -> Option<&Arc<ViewDescriptor>> {
		self.view.as_ref()
	}

	/// Whether the page is currently shown.
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Whether the page has not been shown yet.
	pub fn is_first_show(&self) -> bool {
		self.first_show
	}

	/// Shows the page.
	pub fn show(&mut self) {
		self.visible = true;
		self.first_show = false;
	}

	/// Hides the page.
	pub fn hide(&mut self) {
		self.visible = false;
	}

	/// Whether the page was evicted and must be rebuilt before it is shown.
	pub fn is_evicted(&self) -> bool {
		self.evicted
	}

	fn evict(&mut self) {
		self.visible = false;
		self.evicted = true;
	}

	fn restore(&mut self) {
		self.evicted = false;
		self.first_show = true;
	}

	/// Listener data of the view.
	pub fn data(&self) -> Option<&serde_json::Value> {
		self.view
			.as_ref()
			.map(|view| &view.data)
			.filter(|data| !data.is_null())
	}

	/// Whether the view should exist right now: always while visible, and
	/// while hidden unless the view is auto-destroyed or the page evicted.
	pub fn is_mounted(&self) -> bool {
		!self.evicted
			&& self
				.view
				.as_ref()
				.is_some_and(|view| self.visible || !view.auto_destroy)
	}
}

/// Cache positions involved in one page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChanges {
	/// Position of the page being left.
	pub old_pos: Option<usize>,
	/// Position of the page being shown.
	pub new_pos: usize,
}

/// Ordered pages with a cursor on the shown one.
#[derive(Debug, Default)]
pub struct PageCache {
	list: Vec<Page>,
	pos: Option<usize>,
	capacity: Option<usize>,
}

impl PageCache {
	/// Creates an empty cache keeping at most `capacity` pages alive.
	pub fn new(capacity: Option<usize>) -> Self {
		Self {
			list: Vec::new(),
			pos: None,
			capacity,
		}
	}

	/// Cached pages in arrival order.
	pub fn pages(&self) -> &[Page] {
		&self.list
	}

	/// Position of the shown page.
	pub fn position(&self) -> Option<usize> {
		self.pos
	}

	/// The shown page.
	pub fn current(&self) -> Option<&Page> {
		self.pos.and_then(|pos| self.list.get(pos))
	}

	/// Page at `pos`.
	pub fn get(&self, pos: usize) -> Option<&Page> {
		self.list.get(pos)
	}

	/// Number of page slots, evicted ones included.
	pub fn len(&self) -> usize {
		self.list.len()
	}

	/// Number of pages that are not evicted.
	pub fn live_len(&self) -> usize {
		self.list.iter().filter(|page| !page.evicted).count()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	/// Position of the page for the state with `state`'s id.
	pub fn find_position(&self, state: &State) -> Option<usize> {
		let id = state.id()?;
		self.list.iter().position(|page| page.state.id() == Some(id))
	}

	/// Locates the page for `state`, creating it when the state is new.
	///
	/// A new page replaces every page after the current one; an evicted page
	/// is restored. Nothing is shown or hidden until
	/// [`invalidate`](Self::invalidate).
	pub fn on_state(&mut self, state: &State, view: Option<Arc<ViewDescriptor>>) -> PageChanges {
		let old_pos = self.pos;
		if let Some(new_pos) = self.find_position(state) {
			let page = &mut self.list[new_pos];
			if page.evicted {
				tracing::debug!(hash = %page.state, "evicted page restored");
				page.restore();
			}
			return self.evict(PageChanges { old_pos, new_pos });
		}
		self.list.truncate(old_pos.map_or(0, |pos| pos + 1));
		self.list.push(Page::new(state.clone(), view));
		let changes = PageChanges {
			old_pos,
			new_pos: self.list.len() - 1,
		};
		self.evict(changes)
	}

	/// Swaps the current page for a new page of `state`, which took the place
	/// of the current state.
	///
	/// Returns the positions to [`invalidate`](Self::invalidate) and the page
	/// that was swapped out. Without a current page this is
	/// [`on_state`](Self::on_state).
	pub fn on_replace(
		&mut self,
		state: &State,
		view: Option<Arc<ViewDescriptor>>,
	) -> (PageChanges, Option<Page>) {
		let Some(pos) = self.pos.filter(|pos| *pos < self.list.len()) else {
			return (self.on_state(state, view), None);
		};
		let mut replaced = std::mem::replace(&mut self.list[pos], Page::new(state.clone(), view));
		replaced.hide();
		let changes = PageChanges {
			old_pos: None,
			new_pos: pos,
		};
		(changes, Some(replaced))
	}

	/// Hides the old page, shows the new one and moves the cursor.
	///
	/// Returns snapshots of the old and new page after the switch.
	pub fn invalidate(&mut self, changes: PageChanges) -> (Option<Page>, Option<Page>) {
		let old_page = changes.old_pos.and_then(|pos| self.list.get_mut(pos)).map(|page| {
			page.hide();
			page.clone()
		});
		let new_page = self.list.get_mut(changes.new_pos).map(|page| {
			page.show();
			page.clone()
		});
		self.pos = Some(changes.new_pos);
		(old_page, new_page)
	}

	/// Evicts the oldest live pages beyond capacity, never the two in
	/// `changes`. Slots are kept so positions stay stable.
	fn evict(&mut self, changes: PageChanges) -> PageChanges {
		let Some(capacity) = self.capacity else {
			return changes;
		};
		while self.live_len() > capacity.max(2) {
			let Some(page) = self.list.iter_mut().enumerate().find_map(|(index, page)| {
				let in_transition = Some(index) == changes.old_pos || index == changes.new_pos;
				(!page.evicted && !in_transition).then_some(page)
			}) else {
				break;
			};
			tracing::debug!(hash = %page.state, "page evicted");
			page.evict();
		}
		changes
	}
}
