pub mod config;
pub mod context;
pub mod error;
pub mod lcu;
pub mod logging;
pub mod server;
pub mod skins;

pub use context::ConnectorContext;
pub use error::{LcuError, Result};
