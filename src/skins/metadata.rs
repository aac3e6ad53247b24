// Champion names from Data Dragon, fetched once and kept for the process lifetime

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{LcuError, Result};

/// Version used when the version list cannot be fetched.
pub const FALLBACK_VERSION: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionName {
  /// Data Dragon id, used in image file names (e.g. `MonkeyKing`)
  pub slug: String,
  pub name: String,
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
  /// Newest first.
  async fn versions(&self) -> Result<Vec<String>>;
  async fn champions(&self, version: &str) -> Result<HashMap<i64, ChampionName>>;
}

pub struct DataDragonClient {
  client: reqwest::Client,
  base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChampionListResponse {
  #[serde(default)]
  data: HashMap<String, ChampionEntry>,
}

#[derive(Debug, Deserialize)]
struct ChampionEntry {
  id: String,
  key: String,
  name: String,
}

impl DataDragonClient {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
    let resp = self.client.get(url).send().await?;
    if !resp.status().is_success() {
      return Err(LcuError::Metadata(format!(
        "{} returned status {}",
        url,
        resp.status()
      )));
    }
    Ok(resp.json().await?)
  }
}

#[async_trait]
impl MetadataSource for DataDragonClient {
  async fn versions(&self) -> Result<Vec<String>> {
    self.fetch(&format!("{}/api/versions.json", self.base_url)).await
  }

  async fn champions(&self, version: &str) -> Result<HashMap<i64, ChampionName>> {
    let url = format!("{}/cdn/{}/data/en_US/champion.json", self.base_url, version);
    let list: ChampionListResponse = self.fetch(&url).await?;
    Ok(
      list
        .data
        .into_values()
        .filter_map(|entry| {
          let key = entry.key.parse::<i64>().ok()?;
          Some((
            key,
            ChampionName {
              slug: entry.id,
              name: entry.name,
            },
          ))
        })
        .collect(),
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionCatalog {
  pub version: String,
  pub champions: HashMap<i64, ChampionName>,
}

impl ChampionCatalog {
  pub fn fallback() -> Self {
    Self {
      version: FALLBACK_VERSION.to_string(),
      champions: HashMap::new(),
    }
  }

  pub fn is_fallback(&self) -> bool {
    self.champions.is_empty()
  }

  /// Image slug, or a `Champion{id}` placeholder for unknown champions.
  pub fn slug(&self, champion_id: i64) -> String {
    self
      .champions
      .get(&champion_id)
      .map(|c| c.slug.clone())
      .unwrap_or_else(|| placeholder_name(champion_id))
  }

  pub fn name(&self, champion_id: i64) -> String {
    self
      .champions
      .get(&champion_id)
      .map(|c| c.name.clone())
      .unwrap_or_else(|| placeholder_name(champion_id))
  }
}

pub fn placeholder_name(champion_id: i64) -> String {
  format!("Champion{}", champion_id)
}

/// Written on the first successful fetch, never invalidated. Failures are not
/// cached, so the next call tries again.
pub struct ChampionNames {
  source: Arc<dyn MetadataSource>,
  cache: OnceCell<Arc<ChampionCatalog>>,
}

impl ChampionNames {
  pub fn new(source: Arc<dyn MetadataSource>) -> Self {
    Self {
      source,
      cache: OnceCell::new(),
    }
  }

  /// Never fails: an unreachable CDN degrades to the placeholder catalog.
  pub async fn catalog(&self) -> Arc<ChampionCatalog> {
    match self.cache.get_or_try_init(|| self.fetch_catalog()).await {
      Ok(catalog) => Arc::clone(catalog),
      Err(e) => {
        warn!("[Metadata] Champion list unavailable, using placeholders: {}", e);
        Arc::new(ChampionCatalog::fallback())
      }
    }
  }

  pub async fn version(&self) -> String {
    self.catalog().await.version.clone()
  }

  async fn fetch_catalog(&self) -> Result<Arc<ChampionCatalog>> {
    let version = self
      .source
      .versions()
      .await?
      .into_iter()
      .next()
      .ok_or_else(|| LcuError::Metadata("empty version list".to_string()))?;
    let champions = self.source.champions(&version).await?;
    info!(
      "[Metadata] Loaded {} champions for version {}",
      champions.len(),
      version
    );
    Ok(Arc::new(ChampionCatalog { version, champions }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

  pub struct StaticMetadata {
    pub fail: AtomicBool,
    pub version_calls: AtomicUsize,
    pub champion_calls: AtomicUsize,
  }

  impl StaticMetadata {
    fn new(fail: bool) -> Self {
      Self {
        fail: AtomicBool::new(fail),
        version_calls: AtomicUsize::new(0),
        champion_calls: AtomicUsize::new(0),
      }
    }
  }

  #[async_trait]
  impl MetadataSource for StaticMetadata {
    async fn versions(&self) -> Result<Vec<String>> {
      self.version_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail.load(Ordering::SeqCst) {
        return Err(LcuError::Metadata("offline".to_string()));
      }
      Ok(vec!["14.20.1".to_string(), "14.19.1".to_string()])
    }

    async fn champions(&self, version: &str) -> Result<HashMap<i64, ChampionName>> {
      self.champion_calls.fetch_add(1, Ordering::SeqCst);
      assert_eq!(version, "14.20.1");
      let mut map = HashMap::new();
      map.insert(
        62,
        ChampionName {
          slug: "MonkeyKing".to_string(),
          name: "Wukong".to_string(),
        },
      );
      Ok(map)
    }
  }

  #[tokio::test]
  async fn test_catalog_is_fetched_once() {
    let source = Arc::new(StaticMetadata::new(false));
    let names = ChampionNames::new(source.clone());

    let first = names.catalog().await;
    let second = names.catalog().await;
    assert_eq!(first.version, "14.20.1");
    assert_eq!(second.slug(62), "MonkeyKing");
    assert_eq!(second.name(62), "Wukong");
    assert_eq!(source.version_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.champion_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_failure_degrades_and_retries_later() {
    let source = Arc::new(StaticMetadata::new(true));
    let names = ChampionNames::new(source.clone());

    let catalog = names.catalog().await;
    assert!(catalog.is_fallback());
    assert_eq!(catalog.version, FALLBACK_VERSION);
    assert_eq!(catalog.slug(51), "Champion51");
    assert_eq!(names.version().await, "latest");

    source.fail.store(false, Ordering::SeqCst);
    assert_eq!(names.version().await, "14.20.1");
    assert_eq!(source.version_calls.load(Ordering::SeqCst), 3);
  }

  #[test]
  fn test_champion_list_parsing() {
    let list: ChampionListResponse = serde_json::from_value(serde_json::json!({
      "type": "champion",
      "data": {
        "Caitlyn": { "id": "Caitlyn", "key": "51", "name": "Caitlyn" },
        "MonkeyKing": { "id": "MonkeyKing", "key": "62", "name": "Wukong" }
      }
    }))
    .unwrap();
    assert_eq!(list.data.len(), 2);
    assert_eq!(list.data["MonkeyKing"].key, "62");
  }
}
