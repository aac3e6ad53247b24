// Connection supervisor: keeps one live session to the client and reconnects on loss

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::endpoints::CURRENT_SUMMONER;
use super::transport::{Connector, LcuApi, LcuSession};
use crate::error::{LcuError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
  Disconnected,
  Connecting,
  Connected,
}

/// Sent once per successful connection. `generation` increases with every new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnected {
  pub generation: u64,
}

pub type ReconnectEvents = mpsc::UnboundedReceiver<Reconnected>;

struct Shared {
  state: ConnectionState,
  session: Option<Arc<LcuSession>>,
  generation: u64,
  /// Id of the retry loop currently in flight. At most one at a time.
  retry_loop: Option<u64>,
  next_loop_id: u64,
  /// Set by `connect_with_retry`, cleared by `disconnect`.
  keep_alive: bool,
  subscriber: Option<mpsc::UnboundedSender<Reconnected>>,
  shutdown: CancellationToken,
}

struct Inner {
  connector: Arc<dyn Connector>,
  retry_interval: Duration,
  probe_timeout: Duration,
  shared: Mutex<Shared>,
}

#[derive(Clone)]
pub struct ConnectionSupervisor {
  inner: Arc<Inner>,
}

impl ConnectionSupervisor {
  pub fn new(connector: Arc<dyn Connector>, retry_interval: Duration, probe_timeout: Duration) -> Self {
    Self {
      inner: Arc::new(Inner {
        connector,
        retry_interval,
        probe_timeout,
        shared: Mutex::new(Shared {
          state: ConnectionState::Disconnected,
          session: None,
          generation: 0,
          retry_loop: None,
          next_loop_id: 0,
          keep_alive: false,
          subscriber: None,
          shutdown: CancellationToken::new(),
        }),
      }),
    }
  }

  /// Start connecting in the background and keep reconnecting until `disconnect`.
  /// The returned channel is the single subscriber: a later call replaces it.
  pub fn connect_with_retry(&self) -> ReconnectEvents {
    let (tx, rx) = mpsc::unbounded_channel();
    {
      let mut shared = self.inner.lock();
      shared.keep_alive = true;
      if shared.state == ConnectionState::Connected {
        let _ = tx.send(Reconnected {
          generation: shared.generation,
        });
      }
      shared.subscriber = Some(tx);
    }
    self.inner.ensure_retry_loop();
    rx
  }

  /// Single attempt outside the retry loop. Errors are returned to the caller.
  pub async fn connect(&self) -> Result<u64> {
    let session = self
      .inner
      .connector
      .open()
      .await
      .map_err(LcuError::connect)?;
    self
      .inner
      .install_session(session, None)
      .ok_or(LcuError::NotConnected)
  }

  /// Usable means connected and answering: one probe request with a short timeout.
  pub async fn is_connected(&self) -> bool {
    let current = {
      let shared = self.inner.lock();
      match (&shared.state, &shared.session) {
        (ConnectionState::Connected, Some(session)) => Some((Arc::clone(session), shared.generation)),
        _ => None,
      }
    };

    let (session, generation) = match current {
      Some(current) => current,
      None => {
        self.inner.ensure_retry_loop();
        return false;
      }
    };

    let probe = tokio::time::timeout(self.inner.probe_timeout, session.api.get_json(CURRENT_SUMMONER)).await;
    match probe {
      Ok(Ok(Some(_))) => true,
      Ok(Ok(None)) => {
        debug!("[Supervisor] Client API not ready yet");
        false
      }
      Ok(Err(e)) => {
        self.inner.mark_disconnected(generation, &format!("liveness probe failed: {}", e));
        false
      }
      Err(_) => {
        self.inner.mark_disconnected(generation, "liveness probe timed out");
        false
      }
    }
  }

  /// Stop retrying, drop the subscriber and the session. Idempotent.
  pub fn disconnect(&self) {
    let session = {
      let mut shared = self.inner.lock();
      shared.keep_alive = false;
      shared.subscriber = None;
      shared.shutdown.cancel();
      shared.shutdown = CancellationToken::new();
      shared.retry_loop = None;
      shared.state = ConnectionState::Disconnected;
      shared.session.take()
    };
    if let Some(session) = session {
      session.close();
      info!("[Supervisor] Disconnected from League client");
    }
  }

  pub fn state(&self) -> ConnectionState {
    self.inner.lock().state
  }

  pub fn generation(&self) -> u64 {
    self.inner.lock().generation
  }

  /// API of the current session, without probing it.
  pub fn api(&self) -> Result<Arc<dyn LcuApi>> {
    self
      .inner
      .lock()
      .session
      .as_ref()
      .map(|session| Arc::clone(&session.api))
      .ok_or(LcuError::NotConnected)
  }
}

impl Inner {
  fn lock(&self) -> MutexGuard<'_, Shared> {
    // State stays consistent across a panic: every write is a single field
    self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Start the retry loop unless one is in flight, we are connected, or retries are off.
  fn ensure_retry_loop(self: &Arc<Self>) {
    let (loop_id, shutdown) = {
      let mut shared = self.lock();
      if !shared.keep_alive
        || shared.retry_loop.is_some()
        || shared.state == ConnectionState::Connected
      {
        return;
      }
      shared.next_loop_id += 1;
      let loop_id = shared.next_loop_id;
      shared.retry_loop = Some(loop_id);
      shared.state = ConnectionState::Connecting;
      (loop_id, shared.shutdown.clone())
    };

    let inner = Arc::clone(self);
    tokio::spawn(async move {
      inner.run_retry_loop(loop_id, shutdown).await;
    });
  }

  async fn run_retry_loop(self: Arc<Self>, loop_id: u64, shutdown: CancellationToken) {
    let mut attempt: u32 = 0;
    loop {
      if !self.owns_loop(loop_id) {
        debug!("[Supervisor] Retry loop {} superseded", loop_id);
        break;
      }
      attempt += 1;
      let result = tokio::select! {
        _ = shutdown.cancelled() => break,
        result = self.connector.open() => result,
      };

      match result {
        Ok(session) => {
          // Either installed, or superseded and the guard is already released
          self.install_session(session, Some(loop_id));
          return;
        }
        Err(e) => {
          if attempt == 1 || attempt % 20 == 0 {
            info!("[Supervisor] Waiting for League client (attempt {}): {}", attempt, e);
          } else {
            debug!("[Supervisor] Connection attempt {} failed: {}", attempt, e);
          }
        }
      }

      tokio::select! {
        _ = shutdown.cancelled() => break,
        _ = tokio::time::sleep(self.retry_interval) => {}
      }
    }
    self.release_loop(loop_id);
  }

  fn owns_loop(&self, loop_id: u64) -> bool {
    let shared = self.lock();
    shared.retry_loop == Some(loop_id) && shared.state != ConnectionState::Connected
  }

  fn release_loop(&self, loop_id: u64) {
    let mut shared = self.lock();
    if shared.retry_loop == Some(loop_id) {
      shared.retry_loop = None;
      if shared.state == ConnectionState::Connecting {
        shared.state = ConnectionState::Disconnected;
      }
    }
  }

  /// Make `session` current and notify the subscriber. When `owner` is a retry
  /// loop that no longer owns the guard, or someone else connected first, the
  /// session is closed instead and `None` is returned. Either way the retry
  /// guard is released under the same lock, so a later disconnect can start a
  /// fresh loop.
  fn install_session(self: &Arc<Self>, session: LcuSession, owner: Option<u64>) -> Option<u64> {
    let session = Arc::new(session);
    let (generation, shutdown, replaced) = {
      let mut shared = self.lock();
      if let Some(loop_id) = owner {
        let owned = shared.retry_loop == Some(loop_id);
        if owned {
          shared.retry_loop = None;
        }
        if !owned || shared.state == ConnectionState::Connected {
          drop(shared);
          session.close();
          return None;
        }
      } else {
        // A one-shot connect wins: any running retry loop stops at its next check
        shared.retry_loop = None;
      }

      let replaced = shared.session.take();
      shared.generation += 1;
      shared.state = ConnectionState::Connected;
      shared.session = Some(Arc::clone(&session));

      let generation = shared.generation;
      let delivered = shared
        .subscriber
        .as_ref()
        .map(|tx| tx.send(Reconnected { generation }).is_ok())
        .unwrap_or(true);
      if !delivered {
        shared.subscriber = None;
      }
      (generation, shared.shutdown.clone(), replaced)
    };

    if let Some(old) = replaced {
      old.close();
    }
    info!("[Supervisor] Connected to League client (connection #{})", generation);

    let inner = Arc::clone(self);
    tokio::spawn(async move {
      tokio::select! {
        _ = session.closed.cancelled() => inner.mark_disconnected(generation, "transport closed"),
        _ = shutdown.cancelled() => {}
      }
    });

    Some(generation)
  }

  /// Drop connection `generation` if it is still current and start reconnecting.
  fn mark_disconnected(self: &Arc<Self>, generation: u64, reason: &str) {
    let session = {
      let mut shared = self.lock();
      if shared.generation != generation || shared.session.is_none() {
        return;
      }
      shared.state = ConnectionState::Disconnected;
      shared.session.take()
    };
    if let Some(session) = session {
      session.close();
    }
    warn!("[Supervisor] Lost connection #{}: {}", generation, reason);
    self.ensure_retry_loop();
  }
}
