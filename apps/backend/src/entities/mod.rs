pub mod game_chats;
pub mod game_participants;
pub mod games;
pub mod invitations;
pub mod messages;
pub mod pending_actions;
pub mod presence;
pub mod profiles;
pub mod typing_status;
pub mod users;

pub use game_participants::Entity as GameParticipants;
pub use game_participants::Model as GameParticipant;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use users::Entity as Users;
pub use users::Model as User;
