//! dj-router state engine
//!
//! Keeps an application's logical navigation state consistent with the
//! platform's history stack for hash-based single-page routing.
//!
//! ## Architecture
//!
//! - [`state`]: navigation targets (`#/<path>?<query>`) and their ids
//! - [`history`]: session history over a pluggable [`HistoryBackend`]
//! - [`cache`]: ordered list of reached states with a cursor on the active one
//! - [`events`]: `RouteChangeStart`/`RouteChangeSuccess` broadcast
//! - [`router`]: the reconciliation engine tying the above together
//! - [`settings`]: TOML-loadable router settings
//!
//! ## Example
//!
//! ```
//! use dj_router_state::{MemoryHistory, Navigation, Query, StateRouter};
//!
//! let mut router = StateRouter::new(MemoryHistory::new("https://app.test/index.html"));
//! router.bus().on_change_success(|event| {
//!     println!("now at {}", event.new_state);
//! });
//!
//! assert_eq!(router.navigate("users", Query::new()).unwrap(), Navigation::Navigated);
//! assert_eq!(router.navigate("/users/", Query::new()).unwrap(), Navigation::Unchanged);
//! assert_eq!(
//!     router.history().href().unwrap(),
//!     "https://app.test/index.html#/users"
//! );
//! ```
//!
//! In a browser, build the router over `BrowserHistory` and pass it to
//! `history::listen` to feed `popstate` events back in.

pub mod cache;
pub mod error;
pub mod events;
pub mod history;
pub mod router;
pub mod settings;
pub mod state;

pub use cache::{StateCache, Transition};
pub use error::{HistoryError, ResolveError, RouterError, SettingsError, StateError};
pub use events::{
	CancelFlag, Direction, ListenerId, NavigationBus, RouteChangeStart, RouteChangeSuccess,
	RouteEvent, RouteEventKind, RouteListener,
};
#[cfg(target_arch = "wasm32")]
pub use history::{BrowserHistory, LocationListener, listen};
pub use history::{HistoryBackend, LocationChange, MemoryHistory, SessionHistory, TaggedEntry};
pub use router::{LocationDecision, Navigation, StateRouter, ViewResolver, reconcile_location};
pub use settings::RouterSettings;
pub use state::{Query, State, StateId, StateIdSequence, hash, href, normalize_path, parse_query};
