#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use refurnish::api::{ApiRequest, ApiResponse, SessionUser, Transport, TransportError};
use refurnish::forms::{Acknowledgement, Navigator, Notice, Notifier, View};
use serde_json::Value;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A unique directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Replies in order and records every request it was asked to send.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body.to_string().into_bytes())));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::new(message)));
        self
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|req| req.path.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply")))
    }
}

/// One shared log so tests can assert the order of notices and navigation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EffectLog {
    pub events: Vec<String>,
}

pub struct RecordingNotifier<'a>(pub &'a RefCell<EffectLog>);

impl Notifier for RecordingNotifier<'_> {
    fn notify(&mut self, notice: &Notice) -> Acknowledgement {
        self.0
            .borrow_mut()
            .events
            .push(format!("notify:{}", notice.title));
        self.0.borrow_mut().events.push("ack".into());
        Acknowledgement::Confirmed
    }
}

pub struct RecordingNavigator<'a>(pub &'a RefCell<EffectLog>);

impl Navigator for RecordingNavigator<'_> {
    fn navigate(&mut self, view: View) {
        self.0
            .borrow_mut()
            .events
            .push(format!("navigate:{}", view));
    }
}

pub fn user(admin: bool) -> SessionUser {
    SessionUser {
        id: if admin { "a1".into() } else { "u1".into() },
        name: if admin { "Admin".into() } else { "Asha".into() },
        is_admin: admin,
        email: None,
        avatar: None,
    }
}
