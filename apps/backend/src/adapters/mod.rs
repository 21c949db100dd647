//! SeaORM adapters. Functions here return raw `DbErr`; repos map them.

pub mod game_chats_sea;
pub mod games_sea;
pub mod invitations_sea;
pub mod messages_sea;
pub mod participants_sea;
pub mod pending_actions_sea;
pub mod presence_sea;
pub mod profiles_sea;
pub mod typing_sea;
pub mod users_sea;
