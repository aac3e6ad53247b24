// Skin and chroma data returned to callers, plus the raw LCU payloads they come from

use serde::{Deserialize, Serialize};

use crate::lcu::payload::lenient_vec;

/// An owned skin. `id` is `championId * 1000 + skinIndex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedSkin {
  pub id: i64,
  pub name: String,
  pub owned_chromas: Vec<Chroma>,
  pub loading_image_url: String,
  pub splash_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chroma {
  pub id: i64,
  pub name: String,
  pub colors: Vec<String>,
  pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ownership {
  pub owned: Option<bool>,
}

fn is_owned(unlocked: Option<bool>, ownership: Option<&Ownership>) -> bool {
  unlocked == Some(true) || ownership.and_then(|o| o.owned) == Some(true)
}

/// Entry of `/lol-champ-select/v1/skin-carousel-skins`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselSkin {
  pub id: Option<i64>,
  pub champion_id: Option<i64>,
  pub name: Option<String>,
  pub unlocked: Option<bool>,
  pub ownership: Option<Ownership>,
  #[serde(deserialize_with = "lenient_vec")]
  pub child_skins: Vec<CarouselChildSkin>,
}

impl CarouselSkin {
  pub fn is_owned(&self) -> bool {
    is_owned(self.unlocked, self.ownership.as_ref())
  }

  pub fn belongs_to(&self, champion_id: i64) -> bool {
    match (self.champion_id, self.id) {
      (Some(cid), _) => cid == champion_id,
      (None, Some(id)) => id / 1000 == champion_id,
      (None, None) => false,
    }
  }
}

/// Chroma or alternate form nested under a carousel skin
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselChildSkin {
  pub id: Option<i64>,
  pub name: Option<String>,
  pub unlocked: Option<bool>,
  pub ownership: Option<Ownership>,
  pub chroma_preview_path: Option<String>,
  #[serde(deserialize_with = "lenient_vec")]
  pub colors: Vec<String>,
}

impl CarouselChildSkin {
  pub fn is_owned(&self) -> bool {
    is_owned(self.unlocked, self.ownership.as_ref())
  }

  /// Recolors carry a preview path; alternate forms do not.
  pub fn is_chroma(&self) -> bool {
    self
      .chroma_preview_path
      .as_deref()
      .map(|p| !p.is_empty())
      .unwrap_or(false)
  }
}

/// Entry of `/lol-champions/v1/inventories/{summonerId}/champions/{championId}/skins`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventorySkin {
  pub id: Option<i64>,
  pub name: Option<String>,
  pub ownership: Option<Ownership>,
  #[serde(deserialize_with = "lenient_vec")]
  pub chromas: Vec<InventoryChroma>,
}

impl InventorySkin {
  pub fn is_owned(&self) -> bool {
    is_owned(None, self.ownership.as_ref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryChroma {
  pub id: Option<i64>,
  pub name: Option<String>,
  pub chroma_path: Option<String>,
  #[serde(deserialize_with = "lenient_vec")]
  pub colors: Vec<String>,
  pub ownership: Option<Ownership>,
}

impl InventoryChroma {
  pub fn is_owned(&self) -> bool {
    is_owned(None, self.ownership.as_ref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_owned_skin_serializes_camel_case() {
    let skin = OwnedSkin {
      id: 51005,
      name: "Arcade Caitlyn".to_string(),
      owned_chromas: vec![],
      loading_image_url: "l".to_string(),
      splash_image_url: "s".to_string(),
    };
    let value = serde_json::to_value(&skin).unwrap();
    assert_eq!(value["loadingImageUrl"], "l");
    assert_eq!(value["ownedChromas"], json!([]));
  }

  #[test]
  fn test_ownership_flags() {
    let skin: CarouselSkin = serde_json::from_value(json!({ "id": 1, "unlocked": true })).unwrap();
    assert!(skin.is_owned());
    let skin: CarouselSkin =
      serde_json::from_value(json!({ "id": 1, "ownership": { "owned": true } })).unwrap();
    assert!(skin.is_owned());
    let skin: CarouselSkin = serde_json::from_value(json!({ "id": 1, "unlocked": false })).unwrap();
    assert!(!skin.is_owned());

    let inv: InventorySkin = serde_json::from_value(json!({ "id": 1, "ownership": {} })).unwrap();
    assert!(!inv.is_owned());
  }

  #[test]
  fn test_carousel_champion_match_falls_back_to_id() {
    let skin: CarouselSkin = serde_json::from_value(json!({ "id": 51005 })).unwrap();
    assert!(skin.belongs_to(51));
    assert!(!skin.belongs_to(5));
    let skin: CarouselSkin = serde_json::from_value(json!({ "id": 51005, "championId": 22 })).unwrap();
    assert!(skin.belongs_to(22));
  }

  #[test]
  fn test_child_kind() {
    let chroma: CarouselChildSkin = serde_json::from_value(json!({
      "id": 51006, "chromaPreviewPath": "/lol-game-data/assets/v1/champion-chroma-images/51/51006.png"
    }))
    .unwrap();
    assert!(chroma.is_chroma());
    let form: CarouselChildSkin =
      serde_json::from_value(json!({ "id": 145014, "chromaPreviewPath": "" })).unwrap();
    assert!(!form.is_chroma());
  }
}
