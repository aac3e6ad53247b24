// LCU endpoints used by the skin picker

use serde_json::{json, Value};
use tracing::debug;

use super::session::{ChampSelectSession, CurrentPlayer, ReadyCheck};
use super::transport::LcuApi;
use crate::error::{LcuError, Result};

pub const CURRENT_SUMMONER: &str = "/lol-summoner/v1/current-summoner";
pub const CHAMP_SELECT_SESSION: &str = "/lol-champ-select/v1/session";
pub const MY_SELECTION: &str = "/lol-champ-select/v1/session/my-selection";
pub const SKIN_CAROUSEL: &str = "/lol-champ-select/v1/skin-carousel-skins";
pub const READY_CHECK: &str = "/lol-matchmaking/v1/ready-check";
pub const READY_CHECK_ACCEPT: &str = "/lol-matchmaking/v1/ready-check/accept";
pub const GAMEFLOW_PHASE: &str = "/lol-gameflow/v1/gameflow-phase";

pub fn session_action_path(action_id: i64) -> String {
  format!("{}/actions/{}", CHAMP_SELECT_SESSION, action_id)
}

pub fn champion_skins_path(summoner_id: i64, champion_id: i64) -> String {
  format!(
    "/lol-champions/v1/inventories/{}/champions/{}/skins",
    summoner_id, champion_id
  )
}

pub async fn get_current_player(api: &dyn LcuApi) -> Result<CurrentPlayer> {
  let value = api
    .get_json(CURRENT_SUMMONER)
    .await?
    .ok_or_else(|| LcuError::Status {
      path: CURRENT_SUMMONER.to_string(),
      status: 404,
    })?;
  CurrentPlayer::from_value(&value).ok_or_else(|| LcuError::Status {
    path: CURRENT_SUMMONER.to_string(),
    status: 422,
  })
}

/// `None` when the player is not in champion select.
pub async fn get_champ_select_session(api: &dyn LcuApi) -> Result<Option<ChampSelectSession>> {
  Ok(
    api
      .get_json(CHAMP_SELECT_SESSION)
      .await?
      .map(ChampSelectSession::from_value),
  )
}

/// `None` when no ready check is pending (404 or an empty body).
pub async fn get_ready_check(api: &dyn LcuApi) -> Result<Option<ReadyCheck>> {
  match api.get_json(READY_CHECK).await? {
    Some(Value::Null) | None => Ok(None),
    Some(value) => Ok(Some(serde_json::from_value(value)?)),
  }
}

pub async fn accept_ready_check(api: &dyn LcuApi) -> Result<()> {
  api.post_json(READY_CHECK_ACCEPT, None).await?;
  debug!("[LCU] Ready check accepted");
  Ok(())
}

pub async fn get_gameflow_phase(api: &dyn LcuApi) -> Result<Option<String>> {
  Ok(
    api
      .get_json(GAMEFLOW_PHASE)
      .await?
      .and_then(|v| v.as_str().map(|s| s.to_string())),
  )
}

/// Re-confirm the champion lock. The client rejects a skin choice without it.
pub async fn patch_pick_action(api: &dyn LcuApi, action_id: i64, champion_id: i64) -> Result<()> {
  let body = json!({ "championId": champion_id, "completed": true });
  api.patch_json(&session_action_path(action_id), body).await
}

pub async fn patch_my_selection(api: &dyn LcuApi, selected_skin_id: i64) -> Result<()> {
  let body: Value = json!({ "selectedSkinId": selected_skin_id });
  api.patch_json(MY_SELECTION, body).await
}
