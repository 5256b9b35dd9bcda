//! Browser history backend (`wasm32` only).

use super::{HistoryBackend, TaggedEntry};
use crate::error::HistoryError;
use crate::router::{StateRouter, reconcile_location};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{History, Location, Window};

fn js_error(value: JsValue) -> HistoryError {
	HistoryError::Operation(format!("{:?}", value))
}

fn window() -> Result<Window, HistoryError> {
	web_sys::window().ok_or_else(|| HistoryError::Unavailable("no global window".to_string()))
}

/// [`HistoryBackend`] over `window.history` and `window.location`.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: Window,
}

impl BrowserHistory {
	/// Binds to the global window.
	pub fn new() -> Result<Self, HistoryError> {
		Ok(Self { window: window()? })
	}

	fn history(&self) -> Result<History, HistoryError> {
		self.window.history().map_err(js_error)
	}

	fn location(&self) -> Location {
		self.window.location()
	}
}

fn to_js(entry: TaggedEntry) -> Result<JsValue, HistoryError> {
	let text = serde_json::to_string(&entry)?;
	js_sys::JSON::parse(&text).map_err(js_error)
}

impl HistoryBackend for BrowserHistory {
	fn href(&self) -> Result<String, HistoryError> {
		self.location().href().map_err(js_error)
	}

	fn base(&self) -> Result<String, HistoryError> {
		let location = self.location();
		let origin = location.origin().map_err(js_error)?;
		let pathname = location.pathname().map_err(js_error)?;
		Ok(format!("{}{}", origin, pathname))
	}

	fn entry(&self) -> Result<Option<TaggedEntry>, HistoryError> {
		let raw = self.history()?.state().map_err(js_error)?;
		if raw.is_null() || raw.is_undefined() {
			return Ok(None);
		}
		let text: String = js_sys::JSON::stringify(&raw).map_err(js_error)?.into();
		match serde_json::from_str(&text) {
			Ok(entry) => Ok(Some(entry)),
			Err(err) => {
				// Entries written by other scripts are treated as untagged.
				tracing::debug!(%err, "ignoring foreign history state");
				Ok(None)
			}
		}
	}

	fn push_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError> {
		self.history()?
			.push_state_with_url(&to_js(entry)?, "", Some(url))
			.map_err(js_error)
	}

	fn replace_entry(&mut self, entry: TaggedEntry, url: &str) -> Result<(), HistoryError> {
		self.history()?
			.replace_state_with_url(&to_js(entry)?, "", Some(url))
			.map_err(js_error)
	}

	fn go(&mut self, delta: i32) -> Result<(), HistoryError> {
		self.history()?.go_with_delta(delta).map_err(js_error)
	}
}

/// `popstate` subscription feeding a router; removed on drop.
pub struct LocationListener {
	window: Window,
	callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for LocationListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("popstate", self.callback.as_ref().unchecked_ref());
	}
}

/// Routes every `popstate` of the window into `router`.
///
/// Listeners on the router's bus run inside this callback while the router is
/// borrowed. A `popstate` that arrives while the router is already borrowed is
/// dropped with a warning.
pub fn listen(
	router: Rc<RefCell<StateRouter<BrowserHistory>>>,
) -> Result<LocationListener, HistoryError> {
	let window = window()?;
	let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
		reconcile_location(&router);
	});
	window
		.add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
		.map_err(js_error)?;
	Ok(LocationListener { window, callback })
}
