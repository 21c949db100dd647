//! Pure game rules. Nothing here touches the database or the network.

pub mod inventory;
pub mod prompt;
pub mod sync;
pub mod tags;
pub mod votes;

pub use sync::{route_turn, SyncSlot, TurnRoute, MAIN_THREAD};
pub use tags::{parse_narration, NarrationTags};
