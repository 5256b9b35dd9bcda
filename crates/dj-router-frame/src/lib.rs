//! dj-router page layer
//!
//! Binds route paths to views and keeps a cache of pages, one per committed
//! state, so a back navigation shows the earlier page instead of rebuilding it.
//!
//! - [`view`]: [`ViewDescriptor`] and the explicit [`RouteTable`]
//! - [`page`]: [`Page`] and [`PageCache`]
//! - [`frame`]: [`Frame`], driven by the router's event bus
//!
//! ## Example
//!
//! ```
//! use dj_router_frame::{Frame, FrameSettings, RouteTable, ViewDescriptor};
//! use dj_router_state::{MemoryHistory, Query, StateRouter};
//!
//! let routes = RouteTable::new()
//!     .with_view(ViewDescriptor::new("page-home", "home"))
//!     .unwrap();
//! let frame = Frame::new(routes, FrameSettings::default());
//!
//! let mut router = StateRouter::new(MemoryHistory::new("https://app.test/"))
//!     .with_resolver(frame.resolver());
//! frame.attach(router.bus());
//!
//! router.navigate("home", Query::new()).unwrap();
//! assert_eq!(frame.current_page().unwrap().state().path(), "home");
//! ```

pub mod error;
pub mod frame;
pub mod page;
pub mod settings;
pub mod view;

pub use error::FrameError;
pub use frame::{Frame, PageNavigateStart, PageNavigation};
pub use page::{Page, PageCache, PageChanges};
pub use settings::{DEFAULT_MAX_CACHED_PAGES, FrameSettings};
pub use view::{RouteTable, ViewDescriptor};
