// Owned skin resolution: live skin carousel first, champion inventory as fallback

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::metadata::{ChampionCatalog, ChampionNames, MetadataSource};
use super::types::{CarouselSkin, Chroma, InventorySkin, OwnedSkin};
use super::urls::ImageUrls;
use crate::error::Result;
use crate::lcu::endpoints::{champion_skins_path, get_current_player, SKIN_CAROUSEL};
use crate::lcu::payload::values_to_vec;
use crate::lcu::transport::LcuApi;

static TRAILING_NUMBER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"([0-9]+)(?:\.[A-Za-z]+)?$").expect("valid trailing-number pattern"));

/// Chroma number from the trailing digits of its image path, else the raw id.
pub fn chroma_number(chroma_path: Option<&str>, chroma_id: i64) -> i64 {
  chroma_path
    .and_then(|path| TRAILING_NUMBER_RE.captures(path))
    .and_then(|c| c.get(1))
    .and_then(|m| m.as_str().parse::<i64>().ok())
    .unwrap_or(chroma_id)
}

fn skin_name(name: Option<&String>, id: i64) -> String {
  name
    .filter(|n| !n.is_empty())
    .cloned()
    .unwrap_or_else(|| format!("Skin {}", id))
}

/// Owned skins from carousel entries. A skin is kept when it is owned or has an
/// owned child; only owned children are kept. Children with a chroma preview are
/// chromas, the rest are alternate forms shown with splash art.
pub fn carousel_skins(
  entries: &[CarouselSkin],
  champion_id: i64,
  slug: &str,
  urls: &ImageUrls,
) -> Vec<OwnedSkin> {
  entries
    .iter()
    .filter(|entry| entry.belongs_to(champion_id))
    .filter_map(|entry| {
      let id = entry.id?;
      let owned_chromas: Vec<Chroma> = entry
        .child_skins
        .iter()
        .filter(|child| child.is_owned())
        .filter_map(|child| {
          let child_id = child.id?;
          let image_url = if child.is_chroma() {
            urls.chroma(champion_id, child_id)
          } else {
            urls.splash(slug, child_id)
          };
          Some(Chroma {
            id: child_id,
            name: skin_name(child.name.as_ref(), child_id),
            colors: child.colors.clone(),
            image_url,
          })
        })
        .collect();

      if !entry.is_owned() && owned_chromas.is_empty() {
        return None;
      }
      Some(OwnedSkin {
        id,
        name: skin_name(entry.name.as_ref(), id),
        owned_chromas,
        loading_image_url: urls.loading(slug, id),
        splash_image_url: urls.splash(slug, id),
      })
    })
    .collect()
}

/// Owned skins from the champion inventory. Unowned skins and chromas are dropped.
pub fn inventory_skins(
  entries: &[InventorySkin],
  champion_id: i64,
  slug: &str,
  urls: &ImageUrls,
) -> Vec<OwnedSkin> {
  entries
    .iter()
    .filter(|skin| skin.is_owned())
    .filter_map(|skin| {
      let id = skin.id?;
      let owned_chromas = skin
        .chromas
        .iter()
        .filter(|chroma| chroma.is_owned())
        .filter_map(|chroma| {
          let chroma_id = chroma.id?;
          let number = chroma_number(chroma.chroma_path.as_deref(), chroma_id);
          Some(Chroma {
            id: chroma_id,
            name: skin_name(chroma.name.as_ref(), chroma_id),
            colors: chroma.colors.clone(),
            image_url: urls.chroma(champion_id, number),
          })
        })
        .collect();
      Some(OwnedSkin {
        id,
        name: skin_name(skin.name.as_ref(), id),
        owned_chromas,
        loading_image_url: urls.loading(slug, id),
        splash_image_url: urls.splash(slug, id),
      })
    })
    .collect()
}

pub struct SkinResolver {
  names: ChampionNames,
  urls: ImageUrls,
}

impl SkinResolver {
  pub fn new(metadata: Arc<dyn MetadataSource>, urls: ImageUrls) -> Self {
    Self {
      names: ChampionNames::new(metadata),
      urls,
    }
  }

  pub async fn catalog(&self) -> Arc<ChampionCatalog> {
    self.names.catalog().await
  }

  pub async fn resolve_owned_skins(&self, api: &dyn LcuApi, champion_id: i64) -> Result<Vec<OwnedSkin>> {
    let slug = self.names.catalog().await.slug(champion_id);

    match self.from_carousel(api, champion_id, &slug).await {
      Ok(skins) if !skins.is_empty() => {
        debug!(
          "[SkinResolver] {} owned skins for champion {} from carousel",
          skins.len(),
          champion_id
        );
        return Ok(skins);
      }
      Ok(_) => debug!(
        "[SkinResolver] Carousel has nothing for champion {}, using inventory",
        champion_id
      ),
      Err(e) => debug!(
        "[SkinResolver] Carousel unavailable for champion {} ({}), using inventory",
        champion_id, e
      ),
    }

    let skins = self.from_inventory(api, champion_id, &slug).await?;
    debug!(
      "[SkinResolver] {} owned skins for champion {} from inventory",
      skins.len(),
      champion_id
    );
    Ok(skins)
  }

  async fn from_carousel(&self, api: &dyn LcuApi, champion_id: i64, slug: &str) -> Result<Vec<OwnedSkin>> {
    let entries: Vec<CarouselSkin> = match api.get_json(SKIN_CAROUSEL).await? {
      Some(value @ Value::Array(_)) => values_to_vec(value),
      _ => return Ok(Vec::new()),
    };
    Ok(carousel_skins(&entries, champion_id, slug, &self.urls))
  }

  async fn from_inventory(&self, api: &dyn LcuApi, champion_id: i64, slug: &str) -> Result<Vec<OwnedSkin>> {
    let player = get_current_player(api).await?;
    let path = champion_skins_path(player.id, champion_id);
    let entries: Vec<InventorySkin> = match api.get_json(&path).await? {
      Some(value) => values_to_vec(value),
      None => Vec::new(),
    };
    Ok(inventory_skins(&entries, champion_id, slug, &self.urls))
  }
}
