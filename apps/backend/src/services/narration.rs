//! Apply the effects carried by narration tags.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::domain::inventory::apply_changes;
use crate::domain::tags::NarrationTags;
use crate::error::AppError;
use crate::repos::games::{self as games_repo, Game, GameChanges};
use crate::repos::participants as participants_repo;
use crate::repos::pending_actions as pending_repo;

/// Whose inventory item tags act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryTarget {
    /// Single-participant resolution: the actor's own inventory
    Personal(i64),
    /// Group resolution: the game's shared inventory
    Shared,
}

/// What actually changed, returned to the client with the narration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NarrationEffects {
    pub items_added: Vec<String>,
    pub items_removed: Vec<String>,
    pub level_up: bool,
    pub new_level: Option<i32>,
    pub alignment: Option<String>,
    pub game_over: bool,
    pub victory: bool,
    /// This narration moved the game to `archived`
    pub archived: bool,
}

pub async fn apply_narration<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &Game,
    target: InventoryTarget,
    tags: &NarrationTags,
) -> Result<NarrationEffects, AppError> {
    let mut effects = NarrationEffects {
        game_over: tags.game_over,
        victory: tags.victory,
        ..NarrationEffects::default()
    };
    if tags.is_empty() {
        return Ok(effects);
    }

    let mut changes = GameChanges::default();
    let touches_items = !tags.items_added.is_empty() || !tags.items_removed.is_empty();

    if touches_items {
        match target {
            InventoryTarget::Personal(user_id) => {
                if let Some(p) = participants_repo::find(conn, game.id, user_id).await? {
                    let mut items = p.inventory;
                    let delta = apply_changes(&mut items, &tags.items_added, &tags.items_removed);
                    participants_repo::set_inventory(conn, p.id, &items).await?;
                    effects.items_added = delta.added;
                    effects.items_removed = delta.removed;
                }
            }
            InventoryTarget::Shared => {
                let mut items = game.shared_inventory.clone();
                let delta = apply_changes(&mut items, &tags.items_added, &tags.items_removed);
                changes.shared_inventory = Some(items);
                effects.items_added = delta.added;
                effects.items_removed = delta.removed;
            }
        }
    }

    if tags.level_up {
        let level = game.level + 1;
        changes.level = Some(level);
        effects.level_up = true;
        effects.new_level = Some(level);
    }
    if let Some(alignment) = &tags.alignment {
        changes.alignment = Some(alignment.clone());
        effects.alignment = Some(alignment.clone());
    }

    if changes.level.is_some() || changes.alignment.is_some() || changes.shared_inventory.is_some()
    {
        games_repo::update_game(conn, game.id, changes).await?;
    }

    if tags.is_terminal() {
        effects.archived = games_repo::archive_if_active(conn, game.id).await?;
        if effects.archived {
            pending_repo::clear_game(conn, game.id).await?;
            info!(game_id = game.id, victory = tags.victory, "Game archived by narration");
        }
    }

    Ok(effects)
}
