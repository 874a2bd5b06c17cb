//! In-process Appium stand-in serving TheApp's Home and Echo Box screens.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mobi_cli::config::{ConfigOverrides, RunConfig};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const ECHO_BOX_ID: &str = "echo-box";
pub const MESSAGE_INPUT_ID: &str = "message-input";
pub const SAVE_BUTTON_ID: &str = "message-save";
pub const SAVED_MESSAGE_ID: &str = "saved-message";

/// PNG signature followed by a few payload bytes.
pub const SCREENSHOT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock-screen";

#[derive(Debug, Clone, Default)]
pub struct MockOptions {
	/// Finds for "Echo Box" answer `no such element` this many times first.
	pub echo_box_misses: u32,
	/// New-session requests fail with `session not created`.
	pub reject_sessions: bool,
	/// Navigating back discards the saved message.
	pub forget_on_back: bool,
	/// Element finds answer HTTP 500 `unknown error`.
	pub broken_finds: bool,
	/// Session deletes answer HTTP 500.
	pub fail_delete: bool,
	/// The save button does nothing.
	pub drop_saves: bool,
	/// Displayed queries answer `false` this many times first.
	pub hidden_displays: u32,
	/// Displayed queries answer `stale element reference` this many times first.
	pub stale_displays: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
	Home,
	EchoBox,
}

#[derive(Debug)]
struct AppState {
	screen: Screen,
	input: String,
	saved: String,
}

impl AppState {
	fn new() -> Self {
		Self {
			screen: Screen::Home,
			input: String::new(),
			saved: String::new(),
		}
	}

	fn visible(&self, element_id: &str) -> bool {
		match self.screen {
			Screen::Home => element_id == ECHO_BOX_ID,
			Screen::EchoBox => matches!(element_id, MESSAGE_INPUT_ID | SAVE_BUTTON_ID | SAVED_MESSAGE_ID),
		}
	}
}

#[derive(Debug, Default)]
struct Counters {
	next_id: u64,
	created: u32,
	deleted: u32,
	find_requests: u32,
	displayed_requests: u32,
	last_capabilities: Option<Value>,
	echo_box_misses: u32,
	hidden_displays: u32,
	stale_displays: u32,
}

#[derive(Debug)]
struct Inner {
	options: MockOptions,
	sessions: HashMap<String, AppState>,
	counters: Counters,
}

type Shared = Arc<Mutex<Inner>>;

/// A running mock server; lives until the test's runtime shuts down.
pub struct MockAppium {
	pub url: String,
	state: Shared,
}

impl MockAppium {
	pub async fn start() -> Self {
		Self::with_options(MockOptions::default()).await
	}

	pub async fn with_options(options: MockOptions) -> Self {
		let state = Arc::new(Mutex::new(Inner {
			counters: Counters {
				echo_box_misses: options.echo_box_misses,
				hidden_displays: options.hidden_displays,
				stale_displays: options.stale_displays,
				..Counters::default()
			},
			options,
			sessions: HashMap::new(),
		}));

		let app = Router::new()
			.route("/session", post(create_session))
			.route("/session/{sid}", axum::routing::delete(delete_session))
			.route("/session/{sid}/element", post(find_element))
			.route("/session/{sid}/elements", post(find_elements))
			.route("/session/{sid}/element/{eid}/click", post(click))
			.route("/session/{sid}/element/{eid}/value", post(send_keys))
			.route("/session/{sid}/element/{eid}/clear", post(clear))
			.route("/session/{sid}/element/{eid}/text", get(text))
			.route("/session/{sid}/element/{eid}/displayed", get(displayed))
			.route("/session/{sid}/back", post(back))
			.route("/session/{sid}/source", get(source))
			.route("/session/{sid}/screenshot", get(screenshot))
			.with_state(state.clone());

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Self {
			url: format!("http://{addr}"),
			state,
		}
	}

	/// Run config pointed at this server with short waits.
	pub fn config(&self) -> RunConfig {
		RunConfig::default()
			.apply(ConfigOverrides {
				server_url: Some(self.url.clone()),
				wait_timeout_ms: Some(2_000),
				poll_interval_ms: Some(25),
				..ConfigOverrides::default()
			})
			.unwrap()
	}

	pub fn created(&self) -> u32 {
		self.state.lock().counters.created
	}

	pub fn deleted(&self) -> u32 {
		self.state.lock().counters.deleted
	}

	pub fn live_sessions(&self) -> usize {
		self.state.lock().sessions.len()
	}

	pub fn find_requests(&self) -> u32 {
		self.state.lock().counters.find_requests
	}

	pub fn displayed_requests(&self) -> u32 {
		self.state.lock().counters.displayed_requests
	}

	pub fn last_capabilities(&self) -> Option<Value> {
		self.state.lock().counters.last_capabilities.clone()
	}

	/// Waits up to two seconds for `deleted()` to reach `n`.
	pub async fn wait_for_deletes(&self, n: u32) -> bool {
		for _ in 0..80 {
			if self.deleted() >= n {
				return true;
			}
			tokio::time::sleep(std::time::Duration::from_millis(25)).await;
		}
		false
	}
}

type Reply = (StatusCode, Json<Value>);

fn ok(value: Value) -> Reply {
	(StatusCode::OK, Json(json!({ "value": value })))
}

fn w3c_error(status: StatusCode, error: &str, message: &str) -> Reply {
	(
		status,
		Json(json!({
			"value": { "error": error, "message": message, "stacktrace": "" }
		})),
	)
}

fn no_session(sid: &str) -> Reply {
	w3c_error(StatusCode::NOT_FOUND, "invalid session id", &format!("session {sid} does not exist"))
}

fn element_ref(id: &str) -> Value {
	json!({ "element-6066-11e4-a52f-4ce4ed8ec6dd": id })
}

fn element_id_for(using: &str, value: &str) -> Option<&'static str> {
	if using != "accessibility id" {
		return None;
	}
	match value {
		"Echo Box" => Some(ECHO_BOX_ID),
		"messageInput" => Some(MESSAGE_INPUT_ID),
		"messageSaveBtn" => Some(SAVE_BUTTON_ID),
		"savedMessage" => Some(SAVED_MESSAGE_ID),
		_ => None,
	}
}

async fn create_session(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
	let mut inner = state.lock();
	inner.counters.last_capabilities = Some(body["capabilities"]["alwaysMatch"].clone());

	if inner.options.reject_sessions {
		return w3c_error(
			StatusCode::INTERNAL_SERVER_ERROR,
			"session not created",
			"Unable to launch WebDriverAgent",
		);
	}

	inner.counters.next_id += 1;
	inner.counters.created += 1;
	let sid = format!("mock-session-{}", inner.counters.next_id);
	inner.sessions.insert(sid.clone(), AppState::new());

	ok(json!({
		"sessionId": sid,
		"capabilities": body["capabilities"]["alwaysMatch"].clone(),
	}))
}

async fn delete_session(State(state): State<Shared>, Path(sid): Path<String>) -> Reply {
	let mut inner = state.lock();
	if inner.sessions.remove(&sid).is_none() {
		return no_session(&sid);
	}
	inner.counters.deleted += 1;
	if inner.options.fail_delete {
		return w3c_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown error", "simulator did not shut down");
	}
	ok(Value::Null)
}

/// Resolves a find request against the current screen.
fn locate(inner: &mut Inner, sid: &str, body: &Value) -> Result<Option<&'static str>, Reply> {
	inner.counters.find_requests += 1;
	if inner.options.broken_finds {
		return Err(w3c_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown error", "driver crashed"));
	}

	let using = body["using"].as_str().unwrap_or_default();
	let value = body["value"].as_str().unwrap_or_default();
	let Some(id) = element_id_for(using, value) else {
		return Ok(None);
	};

	if id == ECHO_BOX_ID && inner.counters.echo_box_misses > 0 {
		inner.counters.echo_box_misses -= 1;
		return Ok(None);
	}

	let app = inner.sessions.get(sid).ok_or_else(|| no_session(sid))?;
	Ok(app.visible(id).then_some(id))
}

async fn find_element(State(state): State<Shared>, Path(sid): Path<String>, Json(body): Json<Value>) -> Reply {
	let mut inner = state.lock();
	if !inner.sessions.contains_key(&sid) {
		return no_session(&sid);
	}
	match locate(&mut inner, &sid, &body) {
		Ok(Some(id)) => ok(element_ref(id)),
		Ok(None) => w3c_error(
			StatusCode::NOT_FOUND,
			"no such element",
			"An element could not be located on the page using the given search parameters.",
		),
		Err(reply) => reply,
	}
}

async fn find_elements(State(state): State<Shared>, Path(sid): Path<String>, Json(body): Json<Value>) -> Reply {
	let mut inner = state.lock();
	if !inner.sessions.contains_key(&sid) {
		return no_session(&sid);
	}
	match locate(&mut inner, &sid, &body) {
		Ok(Some(id)) => ok(json!([element_ref(id)])),
		Ok(None) => ok(json!([])),
		Err(reply) => reply,
	}
}

/// Runs `action` on a session's app if the element is on screen.
fn with_element(state: &Shared, sid: &str, eid: &str, action: impl FnOnce(&mut AppState, &MockOptions) -> Value) -> Reply {
	let mut inner = state.lock();
	let Inner { sessions, options, .. } = &mut *inner;
	let Some(app) = sessions.get_mut(sid) else {
		return no_session(sid);
	};
	if !app.visible(eid) {
		return w3c_error(
			StatusCode::NOT_FOUND,
			"stale element reference",
			&format!("element {eid} is no longer attached to the screen"),
		);
	}
	ok(action(app, options))
}

async fn click(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Reply {
	with_element(&state, &sid, &eid, |app, options| {
		match eid.as_str() {
			ECHO_BOX_ID => app.screen = Screen::EchoBox,
			SAVE_BUTTON_ID if !options.drop_saves => app.saved = std::mem::take(&mut app.input),
			_ => {}
		}
		Value::Null
	})
}

async fn send_keys(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>, Json(body): Json<Value>) -> Reply {
	let typed = body["text"].as_str().unwrap_or_default().to_string();
	with_element(&state, &sid, &eid, |app, _| {
		if eid == MESSAGE_INPUT_ID {
			app.input.push_str(&typed);
		}
		Value::Null
	})
}

async fn clear(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Reply {
	with_element(&state, &sid, &eid, |app, _| {
		if eid == MESSAGE_INPUT_ID {
			app.input.clear();
		}
		Value::Null
	})
}

async fn text(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Reply {
	with_element(&state, &sid, &eid, |app, _| match eid.as_str() {
		SAVED_MESSAGE_ID => json!(app.saved),
		MESSAGE_INPUT_ID => json!(app.input),
		ECHO_BOX_ID => json!("Echo Box"),
		_ => json!(""),
	})
}

async fn displayed(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Reply {
	{
		let mut inner = state.lock();
		if inner.sessions.contains_key(&sid) {
			let counters = &mut inner.counters;
			counters.displayed_requests += 1;
			if counters.stale_displays > 0 {
				counters.stale_displays -= 1;
				return w3c_error(
					StatusCode::NOT_FOUND,
					"stale element reference",
					&format!("element {eid} was re-rendered"),
				);
			}
			if counters.hidden_displays > 0 {
				counters.hidden_displays -= 1;
				return ok(json!(false));
			}
		}
	}
	with_element(&state, &sid, &eid, |_, _| json!(true))
}

async fn back(State(state): State<Shared>, Path(sid): Path<String>) -> Reply {
	let mut inner = state.lock();
	let forget = inner.options.forget_on_back;
	let Some(app) = inner.sessions.get_mut(&sid) else {
		return no_session(&sid);
	};
	app.screen = Screen::Home;
	if forget {
		app.saved.clear();
	}
	ok(Value::Null)
}

async fn source(State(state): State<Shared>, Path(sid): Path<String>) -> Reply {
	let inner = state.lock();
	let Some(app) = inner.sessions.get(&sid) else {
		return no_session(&sid);
	};
	let screen = match app.screen {
		Screen::Home => "home",
		Screen::EchoBox => "echo-box",
	};
	ok(json!(format!("<AppRoot screen=\"{screen}\"/>")))
}

async fn screenshot(State(state): State<Shared>, Path(sid): Path<String>) -> Reply {
	if !state.lock().sessions.contains_key(&sid) {
		return no_session(&sid);
	}
	ok(json!(STANDARD.encode(SCREENSHOT_BYTES)))
}
