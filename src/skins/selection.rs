// Apply a skin (and chroma) to the local player's champion select slot

use tracing::{info, warn};

use crate::error::{LcuError, Result};
use crate::lcu::endpoints::{get_champ_select_session, patch_my_selection, patch_pick_action};
use crate::lcu::transport::LcuApi;

/// Lock the pick action, select the skin, then the chroma if given. Each write
/// waits for the previous one; the first failure aborts the rest. Writes already
/// applied are not rolled back.
pub async fn apply_skin(
  api: &dyn LcuApi,
  champion_id: i64,
  skin_id: i64,
  chroma_id: Option<i64>,
) -> Result<()> {
  match write_selection(api, champion_id, skin_id, chroma_id).await {
    Ok(()) => {
      info!(
        "[Selection] Applied skin {} (chroma {:?}) for champion {}",
        skin_id, chroma_id, champion_id
      );
      Ok(())
    }
    Err(e) => {
      warn!("[Selection] Failed to apply skin {}: {}", skin_id, e);
      Err(LcuError::select_skin(e))
    }
  }
}

async fn write_selection(
  api: &dyn LcuApi,
  champion_id: i64,
  skin_id: i64,
  chroma_id: Option<i64>,
) -> Result<()> {
  let session = get_champ_select_session(api)
    .await?
    .ok_or(LcuError::NotInChampSelect)?;
  let action_id = session
    .local_pick_action()
    .and_then(|action| action.id)
    .ok_or(LcuError::NoPickAction)?;

  patch_pick_action(api, action_id, champion_id).await?;
  patch_my_selection(api, skin_id).await?;

  // The client reuses selectedSkinId for the chroma; this second write overrides the first
  if let Some(chroma_id) = chroma_id {
    patch_my_selection(api, chroma_id).await?;
  }
  Ok(())
}
