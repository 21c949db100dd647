//! DTOs for games_sea adapter.

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub owner_id: i64,
    pub title: String,
    pub setting: String,
    pub alignment: String,
}

/// Partial update; `None` leaves the column untouched.
///
/// JSON columns are passed pre-encoded.
#[derive(Debug, Clone, Default)]
pub struct GameUpdate {
    pub id: i64,
    pub level: Option<i32>,
    pub alignment: Option<String>,
    pub shared_inventory: Option<String>,
    pub sync_groups: Option<String>,
    pub votes: Option<String>,
}

impl GameUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    pub fn with_shared_inventory(mut self, json: String) -> Self {
        self.shared_inventory = Some(json);
        self
    }

    pub fn with_sync_groups(mut self, json: String) -> Self {
        self.sync_groups = Some(json);
        self
    }

    pub fn with_votes(mut self, json: String) -> Self {
        self.votes = Some(json);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.alignment.is_none()
            && self.shared_inventory.is_none()
            && self.sync_groups.is_none()
            && self.votes.is_none()
    }
}
