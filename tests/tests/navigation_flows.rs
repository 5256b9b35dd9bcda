//! End-to-end navigation flows: router, history and frame together.

use dj_router::frame::FrameSettings;
use dj_router::state::{Direction, MemoryHistory, Navigation, Query, RouterSettings, State};
use dj_router_integration_tests::{BASE, SESSION_TAG, TestApp, url};
use rstest::*;

fn query(pairs: &[(&str, &str)]) -> Query {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

#[fixture]
fn app() -> TestApp {
	TestApp::new()
}

#[rstest]
fn test_forward_navigation_builds_history_and_pages(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.router
		.navigate("users", query(&[("page", "2")]))
		.unwrap();
	app.settle();

	assert_eq!(app.history_urls(), vec![url("home"), url("users?page=2")]);
	assert_eq!(app.cached_paths(), vec!["home", "users"]);
	assert_eq!(
		app.take_log(),
		vec![
			"start:home",
			"page:home",
			"success:home",
			"start:users?page=2",
			"page:users?page=2",
			"success:users?page=2",
		]
	);
	let pages = app.frame.pages();
	assert_eq!(pages.len(), 2);
	assert!(!pages[0].is_visible());
	assert!(pages[1].is_visible());
}

#[rstest]
fn test_back_then_new_route_discards_forward_branch(mut app: TestApp) {
	for path in ["home", "users", "login"] {
		app.router.navigate(path, Query::new()).unwrap();
	}
	app.settle();

	app.back();
	assert_eq!(app.router.active_state().map(State::path), Some("users"));
	app.router.navigate("users/detail", Query::new()).unwrap();

	assert_eq!(app.cached_paths(), vec!["home", "users", "users/detail"]);
	assert_eq!(app.router.cache().position(), Some(2));
	assert_eq!(
		app.history_urls(),
		vec![url("home"), url("users"), url("users/detail")]
	);
	let pages: Vec<String> = app
		.frame
		.pages()
		.iter()
		.map(|page| page.state().path().to_string())
		.collect();
	assert_eq!(pages, vec!["home", "users", "users/detail"]);
}

#[rstest]
fn test_back_and_forward_report_direction(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.router.navigate("users", Query::new()).unwrap();
	app.settle();

	app.back();
	app.forward();

	let directions: Vec<Direction> = app
		.successes
		.lock()
		.iter()
		.map(|event| event.direction())
		.collect();
	assert_eq!(
		directions,
		vec![
			Direction::Initial,
			Direction::Forward,
			Direction::Back,
			Direction::Forward
		]
	);
	// Each transition broadcast exactly one success and one page switch.
	let log = app.take_log();
	assert_eq!(log.iter().filter(|line| line.starts_with("success:")).count(), 4);
	assert_eq!(log.iter().filter(|line| line.starts_with("page:")).count(), 4);
}

#[rstest]
fn test_back_shows_cached_page(mut app: TestApp) {
	app.router.navigate("users", Query::new()).unwrap();
	app.router.navigate("users/detail", Query::new()).unwrap();

	app.back();

	let pages = app.frame.pages();
	assert_eq!(pages.len(), 2);
	assert!(pages[0].is_visible());
	assert!(!pages[0].is_first_show());
	// users/detail is auto-destroyed once hidden.
	assert!(!pages[1].is_mounted());
}

#[rstest]
fn test_duplicate_navigation_adds_nothing(mut app: TestApp) {
	app.router.navigate("users", query(&[("page", "1")])).unwrap();
	app.take_log();

	let outcome = app
		.router
		.navigate("/users/", query(&[("page", "1")]))
		.unwrap();
	app.settle();

	assert_eq!(outcome, Navigation::Unchanged);
	assert_eq!(app.history_urls(), vec![url("users?page=1")]);
	assert_eq!(app.cached_paths(), vec!["users"]);
	assert_eq!(app.take_log(), vec!["start:users?page=1"]);
}

#[rstest]
fn test_unregistered_route_is_vetoed(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.take_log();

	let outcome = app.router.navigate("admin", Query::new()).unwrap();

	assert_eq!(outcome, Navigation::Vetoed);
	assert_eq!(app.history_urls(), vec![url("home")]);
	assert_eq!(app.cached_paths(), vec!["home"]);
	assert_eq!(app.frame.pages().len(), 1);
	assert_eq!(app.take_log(), vec!["start:admin"]);
}

#[rstest]
fn test_listener_veto(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.router.bus().on_change_start(|event| {
		if event.new_state.path() == "login" && event.new_state.query().is_empty() {
			event.cancel();
		}
	});

	assert_eq!(
		app.router.navigate("login", Query::new()).unwrap(),
		Navigation::Vetoed
	);
	assert_eq!(
		app.router
			.navigate("login", query(&[("next", "home")]))
			.unwrap(),
		Navigation::Navigated
	);
	assert_eq!(app.history_urls(), vec![url("home"), url("login?next=home")]);
}

#[rstest]
fn test_replace_query_keeps_depth(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.router.navigate("users", Query::new()).unwrap();

	app.router
		.replace_query(query(&[("sort", "name")]))
		.unwrap();
	app.settle();

	assert_eq!(app.history_urls(), vec![url("home"), url("users?sort=name")]);
	assert_eq!(app.cached_paths(), vec!["home", "users"]);
	assert_eq!(
		app.router.active_state().map(State::hash).as_deref(),
		Some("users?sort=name")
	);
	app.assert_pages_match_cache();

	// The replaced entry still resolves on back/forward.
	app.back();
	app.forward();
	assert_eq!(
		app.router.active_state().map(State::hash).as_deref(),
		Some("users?sort=name")
	);
	assert_eq!(app.cached_paths(), vec!["home", "users"]);
	app.assert_pages_match_cache();
	assert!(!app.frame.pages()[0].is_visible());
}

#[rstest]
fn test_replace_swaps_page_in_place(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.router.navigate("users", Query::new()).unwrap();
	app.take_log();

	let outcome = app.router.replace("login", Query::new()).unwrap();
	app.settle();

	assert_eq!(outcome, Navigation::Navigated);
	assert_eq!(app.history_urls(), vec![url("home"), url("login")]);
	assert_eq!(app.cached_paths(), vec!["home", "login"]);
	assert_eq!(app.page_paths(), vec!["home", "login"]);
	app.assert_pages_match_cache();
	assert_eq!(app.take_log(), vec!["start:login", "page:login", "success:login"]);

	// Back and forward again: no page goes missing and none is duplicated.
	app.back();
	app.assert_pages_match_cache();
	app.forward();
	app.assert_pages_match_cache();
	assert_eq!(app.page_paths(), vec!["home", "login"]);
}

#[rstest]
fn test_evicted_pages_keep_their_place() {
	let mut app = TestApp::configure(
		MemoryHistory::new(BASE),
		RouterSettings {
			session_tag: Some(SESSION_TAG),
			..RouterSettings::default()
		},
		FrameSettings {
			max_cached_pages: Some(3),
		},
	);
	let live = |app: &TestApp| app.frame.pages().iter().filter(|page| !page.is_evicted()).count();
	for page in 1..=5 {
		let page = page.to_string();
		app.router
			.navigate("users", query(&[("page", page.as_str())]))
			.unwrap();
	}
	app.settle();
	app.assert_pages_match_cache();
	assert_eq!(live(&app), 3);

	for _ in 0..3 {
		app.back();
		app.assert_pages_match_cache();
		assert!(live(&app) <= 3);
	}
	let current = app.frame.current_page().unwrap();
	assert_eq!(current.state().hash(), "users?page=2");
	assert!(current.is_visible());
	assert!(!current.is_evicted());

	for _ in 0..2 {
		app.forward();
		app.assert_pages_match_cache();
		assert!(live(&app) <= 3);
	}
	assert_eq!(app.router.cache().position(), Some(3));
	assert_eq!(app.frame.pages().len(), 5);

	// A new route drops the forward page from both caches.
	app.router.navigate("login", Query::new()).unwrap();
	app.assert_pages_match_cache();
	assert_eq!(
		app.frame
			.pages()
			.iter()
			.map(|page| page.state().hash())
			.collect::<Vec<_>>(),
		vec!["users?page=1", "users?page=2", "users?page=3", "users?page=4", "login"]
	);
}

#[rstest]
fn test_typed_url_becomes_new_route(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	app.take_log();

	app.type_url(&format!("{}#!/users?page=9", BASE));

	assert_eq!(app.cached_paths(), vec!["home", "users"]);
	assert_eq!(
		app.take_log(),
		vec!["start:users?page=9", "page:users?page=9", "success:users?page=9"]
	);
	// The typed entry now carries a trusted id, so back/forward resolve it.
	app.back();
	app.forward();
	assert_eq!(app.cached_paths(), vec!["home", "users"]);
	assert_eq!(app.router.cache().position(), Some(1));
}

#[rstest]
fn test_typed_url_of_unregistered_route_is_ignored(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();

	app.type_url(&url("admin"));

	assert_eq!(app.cached_paths(), vec!["home"]);
	assert_eq!(app.frame.pages().len(), 1);
}

#[rstest]
fn test_typed_url_of_active_route_is_retagged(mut app: TestApp) {
	app.router.navigate("home", Query::new()).unwrap();
	let active_id = app.router.active_state().and_then(State::id);
	app.take_log();

	app.type_url(&url("home"));

	assert!(app.take_log().is_empty());
	assert_eq!(app.cached_paths(), vec!["home"]);
	assert_eq!(
		app.router.history().current_trusted_id().unwrap(),
		active_id
	);
}
