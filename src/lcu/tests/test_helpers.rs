// Test helpers and mock utilities for LCU tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{LcuError, Result};
use crate::lcu::transport::{Connector, LcuApi, LcuSession};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Patch(String, Value),
    Post(String, Option<Value>),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Get(_))
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    NotFound,
    Fail(u16),
    Hang,
}

/// In-memory LCU API. Unknown reads are 404, writes succeed unless told otherwise.
/// Every request is recorded, including failed ones.
#[derive(Default)]
pub struct MockLcuApi {
    replies: Mutex<HashMap<String, Reply>>,
    write_failures: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<Call>>,
}

impl MockLcuApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    pub fn fail_writes_to(&self, path: &str, status: u16) {
        self.write_failures
            .lock()
            .unwrap()
            .insert(path.to_string(), status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.is_write()).collect()
    }

    pub fn count_gets(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(p) if p == path))
            .count()
    }

    fn write_result(&self, path: &str) -> Result<()> {
        match self.write_failures.lock().unwrap().get(path) {
            Some(status) => Err(LcuError::Status {
                path: path.to_string(),
                status: *status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LcuApi for MockLcuApi {
    async fn get_json(&self, path: &str) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(Call::Get(path.to_string()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(Reply::NotFound);
        match reply {
            Reply::Json(value) => Ok(Some(value)),
            Reply::NotFound => Ok(None),
            Reply::Fail(status) => Err(LcuError::Status {
                path: path.to_string(),
                status,
            }),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }

    async fn patch_json(&self, path: &str, body: Value) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Patch(path.to_string(), body));
        self.write_result(path)
    }

    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Post(path.to_string(), body));
        self.write_result(path)
    }
}

/// Connector that fails a set number of times, then hands out sessions backed
/// by a shared [`MockLcuApi`]. Tracks how many opens overlap.
pub struct MockConnector {
    pub api: Arc<MockLcuApi>,
    failures_left: AtomicUsize,
    always_fail: bool,
    delay: Duration,
    attempts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    sessions: Mutex<Vec<CancellationToken>>,
}

impl MockConnector {
    pub fn new(api: Arc<MockLcuApi>) -> Self {
        Self {
            api,
            failures_left: AtomicUsize::new(0),
            always_fail: false,
            delay: Duration::ZERO,
            attempts: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_first(self, failures: usize) -> Self {
        self.failures_left.store(failures, Ordering::SeqCst);
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.always_fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Simulate the client going away for the most recent session.
    pub fn drop_last_session(&self) {
        if let Some(token) = self.sessions.lock().unwrap().last() {
            token.cancel();
        }
    }

    pub fn last_session_closed(&self) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .last()
            .map(|token| token.is_cancelled())
            .unwrap_or(false)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(&self) -> Result<LcuSession> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.always_fail {
            return Err(LcuError::ClientNotFound);
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(LcuError::ClientNotFound);
        }

        let token = CancellationToken::new();
        self.sessions.lock().unwrap().push(token.clone());
        Ok(LcuSession::new(self.api.clone(), token))
    }
}
