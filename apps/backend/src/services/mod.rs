//! Business logic. Functions take a connection (or the app state when they
//! need the AI client or their own transactions) and return `AppError`.

pub mod admin;
pub mod chat;
pub mod games;
pub mod invitations;
pub mod inventory;
pub mod liveness;
pub mod media;
pub mod narration;
pub mod profiles;
pub mod table_chat;
pub mod users;
pub mod votes;
