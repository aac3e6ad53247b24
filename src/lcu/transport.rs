// Authenticated transport to the local client: REST calls plus the WAMP event socket

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use futures_util::{SinkExt, StreamExt};
use http::HeaderValue;
use native_tls::TlsConnector;
use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::Connector as WsConnector;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::discovery::{find_credentials, read_lockfile, Credentials};
use crate::error::{LcuError, Result};

const LCU_USERNAME: &str = "riot";

/// Request surface of the client API. 404 on a read is `Ok(None)`, never an error.
#[async_trait]
pub trait LcuApi: Send + Sync {
  async fn get_json(&self, path: &str) -> Result<Option<Value>>;
  async fn patch_json(&self, path: &str, body: Value) -> Result<()>;
  async fn post_json(&self, path: &str, body: Option<Value>) -> Result<()>;
}

pub fn basic_auth_header(token: &str) -> String {
  let auth = general_purpose::STANDARD.encode(format!("{}:{}", LCU_USERNAME, token));
  format!("Basic {}", auth)
}

pub struct HttpTransport {
  client: reqwest::Client,
  base_url: String,
  auth_header: String,
}

impl HttpTransport {
  pub fn new(credentials: &Credentials, request_timeout: Duration) -> Result<Self> {
    // The client serves a self-signed certificate
    let client = reqwest::Client::builder()
      .danger_accept_invalid_certs(true)
      .timeout(request_timeout)
      .connect_timeout(Duration::from_secs(2))
      .pool_max_idle_per_host(2)
      .build()?;

    Ok(Self {
      client,
      base_url: format!("https://127.0.0.1:{}", credentials.port),
      auth_header: basic_auth_header(&credentials.auth_token),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  fn check_status(path: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
      Ok(())
    } else {
      Err(LcuError::Status {
        path: path.to_string(),
        status: status.as_u16(),
      })
    }
  }
}

#[async_trait]
impl LcuApi for HttpTransport {
  async fn get_json(&self, path: &str) -> Result<Option<Value>> {
    let response = self
      .client
      .get(self.url(path))
      .header("Authorization", &self.auth_header)
      .send()
      .await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Self::check_status(path, status)?;

    let body = response.text().await?;
    if body.trim().is_empty() {
      return Ok(Some(Value::Null));
    }
    Ok(Some(serde_json::from_str(&body)?))
  }

  async fn patch_json(&self, path: &str, body: Value) -> Result<()> {
    let response = self
      .client
      .patch(self.url(path))
      .header("Authorization", &self.auth_header)
      .json(&body)
      .send()
      .await?;
    Self::check_status(path, response.status())
  }

  async fn post_json(&self, path: &str, body: Option<Value>) -> Result<()> {
    let mut request = self
      .client
      .post(self.url(path))
      .header("Authorization", &self.auth_header);
    if let Some(body) = body {
      request = request.json(&body);
    }
    let response = request.send().await?;
    Self::check_status(path, response.status())
  }
}

/// One live connection. `closed` is cancelled when the transport goes away
/// (socket closed, client exited) or when the session is dropped by its owner.
pub struct LcuSession {
  pub api: Arc<dyn LcuApi>,
  pub closed: CancellationToken,
}

impl LcuSession {
  pub fn new(api: Arc<dyn LcuApi>, closed: CancellationToken) -> Self {
    Self { api, closed }
  }

  pub fn close(&self) {
    self.closed.cancel();
  }

  pub fn is_closed(&self) -> bool {
    self.closed.is_cancelled()
  }
}

/// Opens a session using freshly discovered credentials.
#[async_trait]
pub trait Connector: Send + Sync {
  async fn open(&self) -> Result<LcuSession>;
}

pub struct LcuConnector {
  league_path: Option<PathBuf>,
  request_timeout: Duration,
}

impl LcuConnector {
  pub fn new(league_path: Option<PathBuf>, request_timeout: Duration) -> Self {
    Self {
      league_path,
      request_timeout,
    }
  }

  async fn credentials(&self) -> Result<Credentials> {
    if let Some(creds) = find_credentials().await {
      return Ok(creds);
    }
    if let Some(path) = &self.league_path {
      if let Some(creds) = read_lockfile(path).await {
        return Ok(creds);
      }
    }
    Err(LcuError::ClientNotFound)
  }
}

#[async_trait]
impl Connector for LcuConnector {
  async fn open(&self) -> Result<LcuSession> {
    let credentials = self.credentials().await?;
    let api = HttpTransport::new(&credentials, self.request_timeout)?;
    let closed = watch_event_socket(&credentials).await?;
    Ok(LcuSession::new(Arc::new(api), closed))
  }
}

fn ws_error(e: impl std::fmt::Display) -> LcuError {
  LcuError::WebSocket(e.to_string())
}

/// Connect the WAMP socket and subscribe to JSON API events. The returned token
/// is cancelled when the stream ends; cancelling it closes the socket.
pub async fn watch_event_socket(credentials: &Credentials) -> Result<CancellationToken> {
  let ws_url = format!("wss://127.0.0.1:{}/", credentials.port);
  let tls = TlsConnector::builder()
    .danger_accept_invalid_certs(true)
    .build()
    .map_err(ws_error)?;

  let mut request = ws_url.as_str().into_client_request().map_err(ws_error)?;
  let auth = HeaderValue::from_str(&basic_auth_header(&credentials.auth_token)).map_err(ws_error)?;
  request.headers_mut().insert("Authorization", auth);
  request
    .headers_mut()
    .insert("Sec-WebSocket-Protocol", HeaderValue::from_static("wamp"));

  let (mut socket, _response) = tokio_tungstenite::connect_async_tls_with_config(
    request,
    None,
    false,
    Some(WsConnector::NativeTls(tls)),
  )
  .await
  .map_err(ws_error)?;

  socket
    .send(Message::Text("[5,\"OnJsonApiEvent\"]".into()))
    .await
    .map_err(ws_error)?;
  debug!("[Transport] Event socket connected on port {}", credentials.port);

  let closed = CancellationToken::new();
  let token = closed.clone();
  tokio::spawn(async move {
    loop {
      tokio::select! {
        _ = token.cancelled() => {
          let _ = socket.close(None).await;
          break;
        }
        msg = socket.next() => match msg {
          Some(Ok(Message::Close(_))) | None => {
            info!("[Transport] Event socket closed by client");
            break;
          }
          Some(Err(e)) => {
            warn!("[Transport] Event socket read error: {}", e);
            break;
          }
          Some(Ok(msg)) => {
            if let Some(uri) = event_uri(&msg) {
              debug!("[Transport] Event {}", uri);
            }
          }
        }
      }
    }
    token.cancel();
  });

  Ok(closed)
}

/// Events arrive as `[8, "OnJsonApiEvent", { uri, eventType, data }]`.
fn event_uri(msg: &Message) -> Option<String> {
  let text = msg.to_text().ok()?;
  let value: Value = serde_json::from_str(text).ok()?;
  value
    .as_array()?
    .get(2)?
    .get("uri")?
    .as_str()
    .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_basic_auth_header() {
    // base64("riot:abc")
    assert_eq!(basic_auth_header("abc"), "Basic cmlvdDphYmM=");
  }

  #[test]
  fn test_event_uri_parsing() {
    let msg = Message::Text(
      r#"[8,"OnJsonApiEvent",{"uri":"/lol-gameflow/v1/gameflow-phase","eventType":"Update","data":"ChampSelect"}]"#.into(),
    );
    assert_eq!(event_uri(&msg).as_deref(), Some("/lol-gameflow/v1/gameflow-phase"));
    assert!(event_uri(&Message::Text("[5,\"OnJsonApiEvent\"]".into())).is_none());
    assert!(event_uri(&Message::Text("not json".into())).is_none());
  }

  #[test]
  fn test_session_close_cancels_token() {
    struct NoopApi;
    #[async_trait]
    impl LcuApi for NoopApi {
      async fn get_json(&self, _path: &str) -> Result<Option<Value>> {
        Ok(None)
      }
      async fn patch_json(&self, _path: &str, _body: Value) -> Result<()> {
        Ok(())
      }
      async fn post_json(&self, _path: &str, _body: Option<Value>) -> Result<()> {
        Ok(())
      }
    }

    let session = LcuSession::new(Arc::new(NoopApi), CancellationToken::new());
    assert!(!session.is_closed());
    session.close();
    session.close();
    assert!(session.is_closed());
  }

  // Process discovery always misses here, so only the lockfile can answer
  #[cfg(not(any(target_os = "windows", target_os = "macos")))]
  #[tokio::test]
  async fn test_connector_falls_back_to_lockfile() {
    let dir = std::env::temp_dir().join(format!("skin-picker-connector-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("LeagueClientUx.lockfile"), "LeagueClientUx:77:51234:lockpw:https").unwrap();

    let connector = LcuConnector::new(Some(dir.clone()), Duration::from_secs(1));
    let creds = connector.credentials().await.unwrap();
    assert_eq!(creds.port, 51234);
    assert_eq!(creds.auth_token, "lockpw");

    let _ = std::fs::remove_dir_all(&dir);
    assert!(matches!(connector.credentials().await, Err(LcuError::ClientNotFound)));
  }

  #[cfg(not(any(target_os = "windows", target_os = "macos")))]
  #[tokio::test]
  async fn test_connector_without_install_path_is_not_found() {
    let connector = LcuConnector::new(None, Duration::from_secs(1));
    assert!(matches!(connector.credentials().await, Err(LcuError::ClientNotFound)));
    assert!(matches!(connector.open().await, Err(LcuError::ClientNotFound)));
  }
}
