// ConnectorContext: the one shared handle behind every exposed operation

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::{LcuError, Result};
use crate::lcu::endpoints;
use crate::lcu::session::{self, ChampSelectSession, CurrentPlayer, ReadyCheck};
use crate::lcu::supervisor::{ConnectionState, ConnectionSupervisor, ReconnectEvents};
use crate::lcu::transport::{Connector, LcuConnector};
use crate::skins::metadata::{DataDragonClient, MetadataSource};
use crate::skins::resolver::SkinResolver;
use crate::skins::selection;
use crate::skins::types::OwnedSkin;
use crate::skins::urls::ImageUrls;

/// Built once at startup and shared (behind an `Arc`) by every consumer.
/// Background retry and watcher tasks live no longer than the context.
pub struct ConnectorContext {
  config: AppConfig,
  supervisor: ConnectionSupervisor,
  resolver: SkinResolver,
}

impl ConnectorContext {
  pub fn new(config: AppConfig) -> Result<Self> {
    let connector = Arc::new(LcuConnector::new(
      config.league_path.as_ref().map(PathBuf::from),
      config.request_timeout(),
    ));
    let metadata = Arc::new(DataDragonClient::new(
      &config.ddragon_base_url,
      config.request_timeout(),
    )?);
    Ok(Self::with_parts(config, connector, metadata))
  }

  pub fn with_parts(
    config: AppConfig,
    connector: Arc<dyn Connector>,
    metadata: Arc<dyn MetadataSource>,
  ) -> Self {
    let supervisor = ConnectionSupervisor::new(
      connector,
      config.retry_interval(),
      config.probe_timeout(),
    );
    let resolver = SkinResolver::new(metadata, ImageUrls::from_config(&config));
    Self {
      config,
      supervisor,
      resolver,
    }
  }

  pub fn config(&self) -> &AppConfig {
    &self.config
  }

  // Connection lifecycle

  pub fn connect_with_retry(&self) -> ReconnectEvents {
    info!("[Context] Connecting to League client in the background");
    self.supervisor.connect_with_retry()
  }

  pub async fn connect(&self) -> Result<u64> {
    self.supervisor.connect().await
  }

  pub async fn is_connected(&self) -> bool {
    self.supervisor.is_connected().await
  }

  pub fn disconnect(&self) {
    self.supervisor.disconnect();
  }

  pub fn connection_state(&self) -> ConnectionState {
    self.supervisor.state()
  }

  // Reads

  pub async fn get_current_player(&self) -> Result<CurrentPlayer> {
    let api = self.supervisor.api()?;
    endpoints::get_current_player(api.as_ref()).await
  }

  pub async fn get_champ_select_session(&self) -> Result<Option<ChampSelectSession>> {
    let api = self.supervisor.api()?;
    endpoints::get_champ_select_session(api.as_ref()).await
  }

  pub async fn get_selected_champion(&self) -> Result<Option<i64>> {
    let snapshot = self.get_champ_select_session().await?;
    Ok(session::selected_champion(snapshot.as_ref()))
  }

  pub async fn is_locked_in(&self) -> Result<bool> {
    let snapshot = self.get_champ_select_session().await?;
    Ok(session::is_locked_in(snapshot.as_ref()))
  }

  pub async fn get_ready_check(&self) -> Result<Option<ReadyCheck>> {
    let api = self.supervisor.api()?;
    endpoints::get_ready_check(api.as_ref()).await
  }

  pub async fn get_gameflow_phase(&self) -> Result<Option<String>> {
    let api = self.supervisor.api()?;
    endpoints::get_gameflow_phase(api.as_ref()).await
  }

  // Skins

  pub async fn resolve_owned_skins(&self, champion_id: i64) -> Result<Vec<OwnedSkin>> {
    let api = self.supervisor.api()?;
    self.resolver.resolve_owned_skins(api.as_ref(), champion_id).await
  }

  pub async fn champion_name(&self, champion_id: i64) -> String {
    self.resolver.catalog().await.name(champion_id)
  }

  // User actions

  pub async fn accept_ready_check(&self) -> Result<()> {
    let api = self.supervisor.api()?;
    endpoints::accept_ready_check(api.as_ref()).await
  }

  pub async fn apply_skin(&self, champion_id: i64, skin_id: i64, chroma_id: Option<i64>) -> Result<()> {
    let api = self.supervisor.api().map_err(LcuError::select_skin)?;
    selection::apply_skin(api.as_ref(), champion_id, skin_id, chroma_id).await
  }
}

impl Drop for ConnectorContext {
  fn drop(&mut self) {
    self.supervisor.disconnect();
  }
}
