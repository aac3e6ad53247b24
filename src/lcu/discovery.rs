// League client discovery: credentials from the process list, with a lockfile fallback

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const CLIENT_PROCESS_NAME: &str = "LeagueClientUx";

const LOCKFILE_NAMES: [&str; 3] = [
  "lockfile",
  "LeagueClientUx.lockfile",
  "LeagueClient.lockfile",
];

static APP_PORT_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"--app-port=([0-9]+)").expect("valid app-port pattern"));
static AUTH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"--remoting-auth-token=([A-Za-z0-9_\-]+)").expect("valid auth-token pattern")
});

/// Port and token for the local client API. Only built when both are present.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub port: u16,
  pub auth_token: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("port", &self.port)
      .field("auth_token", &"<redacted>")
      .finish()
  }
}

impl Credentials {
  pub fn new(port: u16, auth_token: impl Into<String>) -> Option<Self> {
    let auth_token = auth_token.into();
    if port == 0 || auth_token.is_empty() {
      return None;
    }
    Some(Self { port, auth_token })
  }
}

/// Extract credentials from a single process command line.
pub fn parse_command_line(command_line: &str) -> Option<Credentials> {
  let port = APP_PORT_RE
    .captures(command_line)
    .and_then(|c| c.get(1))
    .and_then(|m| m.as_str().parse::<u16>().ok())?;
  let token = AUTH_TOKEN_RE
    .captures(command_line)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())?;
  Credentials::new(port, token)
}

/// Lockfile format: `name:pid:port:password:protocol`
pub fn parse_lockfile(content: &str) -> Option<Credentials> {
  let parts: Vec<&str> = content.trim().split(':').collect();
  if parts.len() < 5 {
    return None;
  }
  let port = parts[2].parse::<u16>().ok()?;
  Credentials::new(port, parts[3])
}

/// Inspect the OS process list for the running client. Never errors: any failure is `None`.
pub async fn find_credentials() -> Option<Credentials> {
  let output = match process_list_output().await {
    Some(o) => o,
    None => {
      debug!("[Discovery] Process list unavailable");
      return None;
    }
  };

  let found = output
    .lines()
    .filter(|line| line.contains(CLIENT_PROCESS_NAME) || line.contains("--app-port="))
    .find_map(parse_command_line);

  if found.is_none() {
    debug!("[Discovery] {} process not found", CLIENT_PROCESS_NAME);
  }
  found
}

/// Read the first valid lockfile in the League install directory.
pub async fn read_lockfile(league_path: &Path) -> Option<Credentials> {
  for name in LOCKFILE_NAMES {
    let path = league_path.join(name);
    if let Ok(content) = tokio::fs::read_to_string(&path).await {
      if let Some(creds) = parse_lockfile(&content) {
        debug!("[Discovery] Using lockfile {}", path.display());
        return Some(creds);
      }
    }
  }
  None
}

#[cfg(target_os = "windows")]
async fn process_list_output() -> Option<String> {
  const CREATE_NO_WINDOW: u32 = 0x08000000;
  let filter = format!("name='{}.exe'", CLIENT_PROCESS_NAME);

  let wmic = tokio::process::Command::new("wmic")
    .args(["process", "where", filter.as_str(), "get", "commandline"])
    .creation_flags(CREATE_NO_WINDOW)
    .output()
    .await;
  if let Ok(output) = wmic {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() && stdout.contains("--app-port=") {
      return Some(stdout);
    }
  }

  // wmic is missing on newer Windows builds
  let script = format!(
    "Get-CimInstance Win32_Process -Filter \"{}\" | Select-Object -ExpandProperty CommandLine",
    filter
  );
  let output = tokio::process::Command::new("powershell")
    .args(["-NoProfile", "-Command", script.as_str()])
    .creation_flags(CREATE_NO_WINDOW)
    .output()
    .await
    .ok()?;
  if !output.status.success() {
    return None;
  }
  Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(target_os = "macos")]
async fn process_list_output() -> Option<String> {
  let output = tokio::process::Command::new("ps")
    .args(["-A", "-o", "args="])
    .output()
    .await
    .ok()?;
  if !output.status.success() {
    return None;
  }
  Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
async fn process_list_output() -> Option<String> {
  None
}
