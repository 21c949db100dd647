//! Moving items between a participant and the shared stash.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::inventory::{require_item, MAX_ITEM_NAME};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};
use crate::repos::games::{self as games_repo, GameChanges};
use crate::repos::participants as participants_repo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    ToShared,
    ToPersonal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub item: String,
    pub direction: TransferDirection,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryState {
    pub item: String,
    pub personal_inventory: Vec<String>,
    pub shared_inventory: Vec<String>,
}

/// Move exactly one matching item. Run inside a transaction.
pub async fn transfer_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    req: TransferRequest,
) -> Result<InventoryState, AppError> {
    let name = req.item.trim();
    if name.is_empty() || name.chars().count() > MAX_ITEM_NAME {
        return Err(DomainError::validation(
            ValidationKind::Other("Item".into()),
            format!("Item name must be 1-{MAX_ITEM_NAME} characters"),
        )
        .into());
    }

    let game = games_repo::require_game(conn, game_id).await?;
    game.ensure_active()?;
    let participant = participants_repo::find(conn, game_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::forbidden(ForbiddenKind::NotAMember, "Not a participant in this game")
        })?;

    let mut personal = participant.inventory;
    let mut shared = game.shared_inventory;
    let item = match req.direction {
        TransferDirection::ToShared => {
            let item = require_item(&mut personal, name)?;
            shared.push(item.clone());
            item
        }
        TransferDirection::ToPersonal => {
            let item = require_item(&mut shared, name)?;
            personal.push(item.clone());
            item
        }
    };

    participants_repo::set_inventory(conn, participant.id, &personal).await?;
    games_repo::update_game(
        conn,
        game_id,
        GameChanges {
            shared_inventory: Some(shared.clone()),
            ..GameChanges::default()
        },
    )
    .await?;

    info!(game_id, user_id, direction = ?req.direction, "Item transferred");
    Ok(InventoryState {
        item,
        personal_inventory: personal,
        shared_inventory: shared,
    })
}
