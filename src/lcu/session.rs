// Champion select session payloads and the facts derived from them

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::payload::{lenient_nested_vec, lenient_vec};

pub const PICK_ACTION: &str = "pick";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
  pub cell_id: Option<i64>,
  pub champion_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionAction {
  pub id: Option<i64>,
  pub actor_cell_id: Option<i64>,
  #[serde(rename = "type")]
  pub action_type: Option<String>,
  pub completed: Option<bool>,
  pub champion_id: Option<i64>,
  pub is_in_progress: Option<bool>,
}

impl SessionAction {
  pub fn is_pick(&self) -> bool {
    self.action_type.as_deref() == Some(PICK_ACTION)
  }

  pub fn is_completed(&self) -> bool {
    self.completed == Some(true)
  }
}

/// Snapshot of `/lol-champ-select/v1/session`. Re-read on every use, the
/// client mutates it on every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampSelectSession {
  pub local_player_cell_id: Option<i64>,
  #[serde(deserialize_with = "lenient_vec")]
  pub my_team: Vec<TeamMember>,
  #[serde(deserialize_with = "lenient_nested_vec")]
  pub actions: Vec<Vec<SessionAction>>,
}

impl ChampSelectSession {
  /// Decode a raw payload. Shapes that do not decode at all yield an empty session.
  pub fn from_value(value: Value) -> Self {
    match serde_json::from_value(value) {
      Ok(session) => session,
      Err(e) => {
        debug!("[Session] Unreadable champ select session: {}", e);
        Self::default()
      }
    }
  }

  /// Champion on the local player's team slot. `0` means nothing picked yet.
  pub fn selected_champion(&self) -> Option<i64> {
    let local = self.local_player_cell_id?;
    self
      .my_team
      .iter()
      .find(|member| member.cell_id == Some(local))
      .and_then(|member| member.champion_id)
      .filter(|id| *id > 0)
  }

  pub fn local_pick_action(&self) -> Option<&SessionAction> {
    let local = self.local_player_cell_id?;
    self
      .actions
      .iter()
      .flatten()
      .find(|action| action.actor_cell_id == Some(local) && action.is_pick())
  }

  pub fn is_locked_in(&self) -> bool {
    self
      .local_pick_action()
      .map(|action| action.is_completed())
      .unwrap_or(false)
  }
}

pub fn selected_champion(session: Option<&ChampSelectSession>) -> Option<i64> {
  session.and_then(|s| s.selected_champion())
}

pub fn is_locked_in(session: Option<&ChampSelectSession>) -> bool {
  session.map(|s| s.is_locked_in()).unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadyCheck {
  pub state: Option<String>,
  pub player_response: Option<String>,
}

impl ReadyCheck {
  pub fn is_in_progress(&self) -> bool {
    self.state.as_deref() == Some("InProgress")
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlayer {
  pub id: i64,
  pub display_name: String,
  pub puuid: Option<String>,
}

impl CurrentPlayer {
  /// Build from `/lol-summoner/v1/current-summoner`. Needs a summoner id.
  pub fn from_value(value: &Value) -> Option<Self> {
    let id = value.get("summonerId").and_then(|v| v.as_i64())?;
    let field = |name: &str| {
      value
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
    };

    let display_name = match (field("displayName"), field("gameName"), field("tagLine")) {
      (Some(name), _, _) => name.to_string(),
      (None, Some(game_name), Some(tag)) => format!("{}#{}", game_name, tag),
      (None, Some(game_name), None) => game_name.to_string(),
      (None, None, _) => format!("User{}", id),
    };

    Some(Self {
      id,
      display_name,
      puuid: field("puuid").map(|s| s.to_string()),
    })
  }
}
