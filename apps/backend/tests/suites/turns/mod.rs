pub mod barrier;
pub mod claims;
pub mod narration;
pub mod single;
