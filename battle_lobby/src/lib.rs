pub mod lobby;
pub mod snapshot;
pub mod store;

pub use lobby::{GameInfo, GameStatus, Lobby, LobbyError};
pub use store::{GameStore, MemoryStore, StoreError};
