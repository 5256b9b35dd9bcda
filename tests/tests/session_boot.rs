//! Page load and reload: adopting the initial location and distrusting entries
//! written by an earlier session.

use dj_router::frame::FrameSettings;
use dj_router::state::{
	HistoryBackend, MemoryHistory, Navigation, Query, RouterSettings, State, StateId, TaggedEntry,
};
use dj_router_integration_tests::{BASE, SESSION_TAG, TestApp, url};
use rstest::*;

#[rstest]
fn test_deep_link_is_adopted_at_startup() {
	let mut app = TestApp::start(MemoryHistory::with_url(BASE, url("users?page=4")), SESSION_TAG);

	let event = app.router.sync_with_location().unwrap().unwrap();

	assert_eq!(event.new_state.hash(), "users?page=4");
	assert_eq!(event.old_state, None);
	assert_eq!(app.history_urls(), vec![url("users?page=4")]);
	assert_eq!(
		app.router.history().current_trusted_id().unwrap(),
		event.new_state.id()
	);
	assert_eq!(
		app.frame.current_page().map(|page| page.state().hash()),
		Some("users?page=4".to_string())
	);
}

#[rstest]
fn test_startup_without_route_waits_for_first_navigate() {
	let mut app = TestApp::new();

	assert_eq!(app.router.sync_with_location().unwrap(), None);
	assert!(app.router.cache().is_empty());

	assert_eq!(
		app.router.navigate("home", Query::new()).unwrap(),
		Navigation::Navigated
	);
	assert_eq!(app.history_urls(), vec![url("home")]);
}

#[rstest]
fn test_reload_distrusts_entries_of_previous_session() {
	// Entries written by a session that ended with a reload.
	let mut history = MemoryHistory::new(BASE);
	let previous = |id| TaggedEntry {
		session_tag: SESSION_TAG - 1,
		id: StateId::from_raw(id),
	};
	history.push_entry(previous(1), &url("home")).unwrap();
	history.push_entry(previous(2), &url("users")).unwrap();

	let mut app = TestApp::start(history, SESSION_TAG);
	let boot = app.router.sync_with_location().unwrap().unwrap();
	assert_eq!(boot.new_state.path(), "users");
	assert_eq!(boot.new_state.id(), Some(StateId::from_raw(1)));

	// Back lands on an entry whose id collides with ours but whose tag does not.
	app.back();

	assert_eq!(app.cached_paths(), vec!["users", "home"]);
	assert_eq!(app.router.active_state().map(State::path), Some("home"));
	assert_eq!(
		app.router.history().current_trusted_id().unwrap(),
		app.router.active_state().and_then(State::id)
	);
}

#[rstest]
fn test_settings_from_toml() {
	let settings =
		RouterSettings::from_toml_str("session_tag = 7\nveto_unresolved_routes = false\n").unwrap();
	let frame_settings = FrameSettings::from_toml_str("max_cached_pages = 4\n").unwrap();
	let mut app = TestApp::configure(MemoryHistory::new(BASE), settings, frame_settings);

	assert_eq!(app.router.history().session_tag(), 7);
	app.router.navigate("home", Query::new()).unwrap();
	assert_eq!(
		app.router.history().backend().tag_at(0).map(|entry| entry.session_tag),
		Some(7)
	);

	// With the veto off, a path without a view still commits.
	assert_eq!(
		app.router.navigate("admin", Query::new()).unwrap(),
		Navigation::Navigated
	);
	assert_eq!(app.cached_paths(), vec!["home", "admin"]);
	assert_eq!(app.history_urls(), vec![url("home"), url("admin")]);
	let current = app.frame.current_page().unwrap();
	assert_eq!(current.state().path(), "admin");
	assert!(current.view().is_none());
	app.assert_pages_match_cache();
}

#[rstest]
fn test_default_settings_veto_unresolved_paths() {
	let settings = RouterSettings::from_toml_str("session_tag = 7\n").unwrap();
	let mut app = TestApp::configure(MemoryHistory::new(BASE), settings, FrameSettings::default());
	app.router.navigate("home", Query::new()).unwrap();

	assert_eq!(
		app.router.navigate("admin", Query::new()).unwrap(),
		Navigation::Vetoed
	);
	assert_eq!(app.cached_paths(), vec!["home"]);
}
