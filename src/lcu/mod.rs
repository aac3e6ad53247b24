// LCU module - discovery, transport and session lifecycle for the League client API

pub mod discovery;
pub mod endpoints;
pub mod payload;
pub mod session;
pub mod supervisor;
pub mod transport;

#[cfg(test)]
pub(crate) mod tests;

// Re-export public types and functions
pub use discovery::{find_credentials, Credentials};
pub use session::{ChampSelectSession, CurrentPlayer, ReadyCheck, SessionAction};
pub use supervisor::{ConnectionState, ConnectionSupervisor, ReconnectEvents, Reconnected};
pub use transport::{Connector, LcuApi, LcuConnector, LcuSession};
