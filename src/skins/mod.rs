// Skins module - owned skin resolution and selection writes

pub mod metadata;
pub mod resolver;
pub mod selection;
pub mod types;
pub mod urls;

#[cfg(test)]
pub(crate) mod tests;

// Re-export public types and functions
pub use metadata::{ChampionCatalog, ChampionNames, DataDragonClient, MetadataSource};
pub use resolver::SkinResolver;
pub use selection::apply_skin;
pub use types::{Chroma, OwnedSkin};
pub use urls::ImageUrls;
