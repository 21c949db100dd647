pub mod ai;
pub mod games;
pub mod inventory;
pub mod invitations;
pub mod liveness;
pub mod votes;
