//! # dj-router
//!
//! Hash-based client routing for single-page applications.
//!
//! The router keeps the application's logical navigation state in step with
//! the platform's history stack: it tells back from forward, refuses to push
//! duplicate entries, lets listeners veto a transition before anything is
//! mutated, and recognizes entries left over from an earlier page load.
//!
//! ## Crates
//!
//! - [`state`]: states, session history, state cache, the router engine and
//!   its event bus
//! - [`frame`] (feature `frame`, default): view registration and the page cache
//!
//! ## Example
//!
//! ```
//! use dj_router::prelude::*;
//!
//! let routes = RouteTable::new()
//!     .with_view(ViewDescriptor::new("page-home", "home"))
//!     .unwrap()
//!     .with_view(ViewDescriptor::new("page-users", "users"))
//!     .unwrap();
//! let frame = Frame::new(routes, FrameSettings::default());
//!
//! let mut router = StateRouter::new(MemoryHistory::new("https://app.test/index.html"))
//!     .with_resolver(frame.resolver());
//! frame.attach(router.bus());
//!
//! router.navigate("home", Query::new()).unwrap();
//! router.navigate("users", Query::new()).unwrap();
//! assert_eq!(router.navigate("admin", Query::new()).unwrap(), Navigation::Vetoed);
//! assert_eq!(frame.pages().len(), 2);
//! ```

pub use dj_router_state as state;

#[cfg(feature = "frame")]
pub use dj_router_frame as frame;

pub use dj_router_state::{
	Navigation, Query, RouteChangeStart, RouteChangeSuccess, RouterError, RouterSettings, State,
	StateRouter,
};

#[cfg(feature = "frame")]
pub use dj_router_frame::{Frame, FrameSettings, RouteTable, ViewDescriptor};

/// Commonly used types.
pub mod prelude {
	pub use dj_router_state::{
		Direction, HistoryBackend, LocationDecision, MemoryHistory, Navigation, NavigationBus,
		Query, RouteChangeStart, RouteChangeSuccess, RouterError, RouterSettings, State, StateId,
		StateRouter, ViewResolver,
	};

	#[cfg(target_arch = "wasm32")]
	pub use dj_router_state::{BrowserHistory, listen};

	#[cfg(feature = "frame")]
	pub use dj_router_frame::{
		Frame, FrameSettings, Page, PageNavigateStart, PageNavigation, RouteTable, ViewDescriptor,
	};
}
