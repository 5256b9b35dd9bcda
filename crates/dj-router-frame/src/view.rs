//! View registration.

use crate::error::FrameError;
use dj_router_state::{ViewResolver, normalize_path};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A view that can be mounted for a route path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
	/// Component name.
	pub name: String,
	/// Route path the view is bound to.
	pub path: String,
	/// Page title.
	#[serde(default)]
	pub title: Option<String>,
	/// Unmount the view while its page is hidden.
	#[serde(default)]
	pub auto_destroy: bool,
	/// Extra CSS class for the page host.
	#[serde(default)]
	pub css: Option<String>,
	/// Free-form data handed to navigation listeners.
	#[serde(default)]
	pub data: serde_json::Value,
}

impl ViewDescriptor {
	/// Creates a view bound to `path`.
	pub fn new(name: impl Into<String>, path: &str) -> Self {
		Self {
			name: name.into(),
			path: normalize_path(path),
			title: None,
			auto_destroy: false,
			css: None,
			data: serde_json::Value::Null,
		}
	}

	/// Sets the page title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Unmounts the view whenever its page is hidden.
	pub fn with_auto_destroy(mut self, auto_destroy: bool) -> Self {
		self.auto_destroy = auto_destroy;
		self
	}

	/// Sets the host CSS class.
	pub fn with_css(mut self, css: impl Into<String>) -> Self {
		self.css = Some(css.into());
		self
	}

	/// Attaches listener data.
	pub fn with_data(mut self, data: serde_json::Value) -> Self {
		self.data = data;
		self
	}
}

/// Route path to view table.
///
/// # Example
///
/// ```
/// use dj_router_frame::{RouteTable, ViewDescriptor};
///
/// let mut routes = RouteTable::new();
/// routes.register(ViewDescriptor::new("page-users", "users")).unwrap();
///
/// assert!(routes.resolve("/users/").is_some());
/// assert!(routes.resolve("admin").is_none());
/// ```
#[derive(Debug, Default)]
pub struct RouteTable {
	views: HashMap<String, Arc<ViewDescriptor>>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `view` under its path.
	///
	/// # Errors
	///
	/// Returns [`FrameError::DuplicatePath`] if another view owns the path.
	pub fn register(&mut self, view: ViewDescriptor) -> Result<Arc<ViewDescriptor>, FrameError> {
		let path = normalize_path(&view.path);
		if let Some(existing) = self.views.get(&path) {
			return Err(FrameError::DuplicatePath {
				path,
				existing: existing.name.clone(),
			});
		}
		tracing::debug!(path = %path, view = %view.name, "view registered");
		let view = Arc::new(ViewDescriptor { path: path.clone(), ..view });
		self.views.insert(path, Arc::clone(&view));
		Ok(view)
	}

	/// Builder form of [`register`](Self::register).
	pub fn with_view(mut self, view: ViewDescriptor) -> Result<Self, FrameError> {
		self.register(view)?;
		Ok(self)
	}

	/// The view bound to `path`.
	pub fn resolve(&self, path: &str) -> Option<Arc<ViewDescriptor>> {
		self.views.get(&normalize_path(path)).cloned()
	}

	/// Number of registered views.
	pub fn len(&self) -> usize {
		self.views.len()
	}

	/// Whether no view is registered.
	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}
}

impl ViewResolver for RouteTable {
	fn resolves(&self, path: &str) -> bool {
		self.views.contains_key(&normalize_path(path))
	}
}
