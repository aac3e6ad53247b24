// Image URL construction for skins and chromas

use crate::config::AppConfig;

pub fn skin_index(skin_id: i64) -> i64 {
  skin_id % 1000
}

#[derive(Debug, Clone)]
pub struct ImageUrls {
  ddragon_base: String,
  cdragon_base: String,
}

impl ImageUrls {
  pub fn new(ddragon_base: &str, cdragon_base: &str) -> Self {
    Self {
      ddragon_base: ddragon_base.trim_end_matches('/').to_string(),
      cdragon_base: cdragon_base.trim_end_matches('/').to_string(),
    }
  }

  pub fn from_config(config: &AppConfig) -> Self {
    Self::new(&config.ddragon_base_url, &config.cdragon_base_url)
  }

  pub fn loading(&self, champion_slug: &str, skin_id: i64) -> String {
    format!(
      "{}/cdn/img/champion/loading/{}_{}.jpg",
      self.ddragon_base,
      champion_slug,
      skin_index(skin_id)
    )
  }

  pub fn splash(&self, champion_slug: &str, skin_id: i64) -> String {
    format!(
      "{}/cdn/img/champion/splash/{}_{}.jpg",
      self.ddragon_base,
      champion_slug,
      skin_index(skin_id)
    )
  }

  pub fn chroma(&self, champion_id: i64, chroma_id: i64) -> String {
    format!(
      "{}/champion-chroma-images/{}/{}.png",
      self.cdragon_base, champion_id, chroma_id
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn urls() -> ImageUrls {
    ImageUrls::from_config(&AppConfig::default())
  }

  #[test]
  fn test_loading_url_uses_skin_index() {
    assert_eq!(
      urls().loading("Caitlyn", 51005),
      "https://ddragon.leagueoflegends.com/cdn/img/champion/loading/Caitlyn_5.jpg"
    );
  }

  #[test]
  fn test_splash_url() {
    assert_eq!(
      urls().splash("MonkeyKing", 62000),
      "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/MonkeyKing_0.jpg"
    );
  }

  #[test]
  fn test_chroma_url() {
    assert_eq!(
      urls().chroma(51, 51006),
      "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default/v1/champion-chroma-images/51/51006.png"
    );
  }

  #[test]
  fn test_trailing_slash_is_trimmed() {
    let u = ImageUrls::new("http://cdn/", "http://cd/");
    assert_eq!(u.loading("Ahri", 103086), "http://cdn/cdn/img/champion/loading/Ahri_86.jpg");
    assert_eq!(u.chroma(103, 103087), "http://cd/champion-chroma-images/103/103087.png");
  }
}
