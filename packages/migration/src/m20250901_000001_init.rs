use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, ForeignKeyCreateStatement, Index, IntoIden,
    IntoTableRef, Table,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    UserId,
    CharacterName,
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    Preferences,
    UpdatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    OwnerId,
    Title,
    Setting,
    Status,
    Level,
    Alignment,
    SharedInventory,
    SyncGroups,
    Votes,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden)]
enum GameParticipants {
    Table,
    Id,
    GameId,
    UserId,
    SyncMode,
    SyncGroup,
    Inventory,
    JoinedAt,
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    GameId,
    Thread,
    Role,
    Content,
    AuthorId,
    CreatedAt,
}

#[derive(Iden)]
enum GameChats {
    Table,
    Id,
    GameId,
    UserId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum PendingActions {
    Table,
    Id,
    GameId,
    UserId,
    SyncGroup,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    GameId,
    InviterId,
    InviteeId,
    Status,
    CreatedAt,
    RespondedAt,
}

#[derive(Iden)]
enum Presence {
    Table,
    Id,
    GameId,
    UserId,
    LastSeen,
}

#[derive(Iden)]
enum TypingStatus {
    Table,
    Id,
    GameId,
    UserId,
    IsTyping,
    UpdatedAt,
}

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn ts(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn game_fk(name: &str, from: impl IntoTableRef, col: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from, col)
        .to(Games::Table, Games::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

fn user_fk(name: &str, from: impl IntoTableRef, col: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from, col)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts(Users::CreatedAt))
                    .col(ts(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // profiles (one per user)
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk(Profiles::Id))
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::CharacterName).string().not_null())
                    .col(ColumnDef::new(Profiles::Strength).integer().not_null().default(10))
                    .col(ColumnDef::new(Profiles::Dexterity).integer().not_null().default(10))
                    .col(
                        ColumnDef::new(Profiles::Constitution)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Profiles::Intelligence)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(ColumnDef::new(Profiles::Wisdom).integer().not_null().default(10))
                    .col(ColumnDef::new(Profiles::Charisma).integer().not_null().default(10))
                    .col(ColumnDef::new(Profiles::Preferences).text().not_null())
                    .col(ts(Profiles::UpdatedAt))
                    .foreign_key(&mut user_fk(
                        "fk_profiles_user_id",
                        Profiles::Table,
                        Profiles::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(pk(Games::Id))
                    .col(ColumnDef::new(Games::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Games::Title).string().not_null())
                    .col(ColumnDef::new(Games::Setting).text().not_null())
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Games::Level).integer().not_null().default(1))
                    .col(ColumnDef::new(Games::Alignment).string().not_null())
                    .col(ColumnDef::new(Games::SharedInventory).text().not_null())
                    .col(ColumnDef::new(Games::SyncGroups).text().not_null())
                    .col(ColumnDef::new(Games::Votes).text().not_null())
                    .col(ts(Games::CreatedAt))
                    .col(ts(Games::UpdatedAt))
                    .col(
                        ColumnDef::new(Games::ArchivedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(&mut user_fk("fk_games_owner_id", Games::Table, Games::OwnerId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_games_owner_status")
                    .table(Games::Table)
                    .col(Games::OwnerId)
                    .col(Games::Status)
                    .to_owned(),
            )
            .await?;

        // game_participants
        manager
            .create_table(
                Table::create()
                    .table(GameParticipants::Table)
                    .if_not_exists()
                    .col(pk(GameParticipants::Id))
                    .col(ColumnDef::new(GameParticipants::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameParticipants::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameParticipants::SyncMode)
                            .string_len(16)
                            .not_null()
                            .default("main"),
                    )
                    .col(ColumnDef::new(GameParticipants::SyncGroup).string().null())
                    .col(ColumnDef::new(GameParticipants::Inventory).text().not_null())
                    .col(ts(GameParticipants::JoinedAt))
                    .foreign_key(&mut game_fk(
                        "fk_game_participants_game_id",
                        GameParticipants::Table,
                        GameParticipants::GameId,
                    ))
                    .foreign_key(&mut user_fk(
                        "fk_game_participants_user_id",
                        GameParticipants::Table,
                        GameParticipants::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_participants_game_user")
                    .table(GameParticipants::Table)
                    .col(GameParticipants::GameId)
                    .col(GameParticipants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // messages
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(pk(Messages::Id))
                    .col(ColumnDef::new(Messages::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::Thread).string().not_null())
                    .col(ColumnDef::new(Messages::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(ColumnDef::new(Messages::AuthorId).big_integer().null())
                    .col(ts(Messages::CreatedAt))
                    .foreign_key(&mut game_fk(
                        "fk_messages_game_id",
                        Messages::Table,
                        Messages::GameId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_game_thread")
                    .table(Messages::Table)
                    .col(Messages::GameId)
                    .col(Messages::Thread)
                    .col(Messages::Id)
                    .to_owned(),
            )
            .await?;

        // game_chats
        manager
            .create_table(
                Table::create()
                    .table(GameChats::Table)
                    .if_not_exists()
                    .col(pk(GameChats::Id))
                    .col(ColumnDef::new(GameChats::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameChats::UserId).big_integer().not_null())
                    .col(ColumnDef::new(GameChats::Content).text().not_null())
                    .col(ts(GameChats::CreatedAt))
                    .foreign_key(&mut game_fk(
                        "fk_game_chats_game_id",
                        GameChats::Table,
                        GameChats::GameId,
                    ))
                    .to_owned(),
            )
            .await?;

        // pending_actions
        manager
            .create_table(
                Table::create()
                    .table(PendingActions::Table)
                    .if_not_exists()
                    .col(pk(PendingActions::Id))
                    .col(ColumnDef::new(PendingActions::GameId).big_integer().not_null())
                    .col(ColumnDef::new(PendingActions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PendingActions::SyncGroup).string().not_null())
                    .col(ColumnDef::new(PendingActions::Content).text().not_null())
                    .col(ts(PendingActions::CreatedAt))
                    .foreign_key(&mut game_fk(
                        "fk_pending_actions_game_id",
                        PendingActions::Table,
                        PendingActions::GameId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_pending_actions_game_user_group")
                    .table(PendingActions::Table)
                    .col(PendingActions::GameId)
                    .col(PendingActions::UserId)
                    .col(PendingActions::SyncGroup)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // invitations
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(pk(Invitations::Id))
                    .col(ColumnDef::new(Invitations::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Invitations::InviterId).big_integer().not_null())
                    .col(ColumnDef::new(Invitations::InviteeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Invitations::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ts(Invitations::CreatedAt))
                    .col(
                        ColumnDef::new(Invitations::RespondedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(&mut game_fk(
                        "fk_invitations_game_id",
                        Invitations::Table,
                        Invitations::GameId,
                    ))
                    .foreign_key(&mut user_fk(
                        "fk_invitations_invitee_id",
                        Invitations::Table,
                        Invitations::InviteeId,
                    ))
                    .to_owned(),
            )
            .await?;

        // presence
        manager
            .create_table(
                Table::create()
                    .table(Presence::Table)
                    .if_not_exists()
                    .col(pk(Presence::Id))
                    .col(ColumnDef::new(Presence::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Presence::UserId).big_integer().not_null())
                    .col(ts(Presence::LastSeen))
                    .foreign_key(&mut game_fk(
                        "fk_presence_game_id",
                        Presence::Table,
                        Presence::GameId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_presence_game_user")
                    .table(Presence::Table)
                    .col(Presence::GameId)
                    .col(Presence::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // typing_status
        manager
            .create_table(
                Table::create()
                    .table(TypingStatus::Table)
                    .if_not_exists()
                    .col(pk(TypingStatus::Id))
                    .col(ColumnDef::new(TypingStatus::GameId).big_integer().not_null())
                    .col(ColumnDef::new(TypingStatus::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TypingStatus::IsTyping)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts(TypingStatus::UpdatedAt))
                    .foreign_key(&mut game_fk(
                        "fk_typing_status_game_id",
                        TypingStatus::Table,
                        TypingStatus::GameId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_typing_status_game_user")
                    .table(TypingStatus::Table)
                    .col(TypingStatus::GameId)
                    .col(TypingStatus::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first, then parents.
        for table in [
            TypingStatus::Table.into_table_ref(),
            Presence::Table.into_table_ref(),
            Invitations::Table.into_table_ref(),
            PendingActions::Table.into_table_ref(),
            GameChats::Table.into_table_ref(),
            Messages::Table.into_table_ref(),
            GameParticipants::Table.into_table_ref(),
            Games::Table.into_table_ref(),
            Profiles::Table.into_table_ref(),
            Users::Table.into_table_ref(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
