//! Sea-ORM entity for the `sessions` table.

use sea_orm::entity::prelude::*;

/// One persisted session row.
///
/// | Column       | Type              | Description                         |
/// |--------------|-------------------|-------------------------------------|
/// | id           | BIGINT (PK, auto) | Store-assigned row identifier       |
/// | session_data | BINARY            | Encoded session value map           |
/// | created_on   | TIMESTAMPTZ       | Set once at first insert            |
/// | modified_on  | TIMESTAMPTZ       | Set at insert; not refreshed on     |
/// |              |                   | update (see `SeaOrmStore::save`)    |
/// | expires_on   | TIMESTAMPTZ       | Row is dead once now() passes it    |
///
/// The row identifier never leaves the process as a raw value; clients only
/// ever see it wrapped in a codec token.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Store-assigned identifier, the sole join key between cookie and row.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The codec-encoded session value map at last save.
    pub session_data: Vec<u8>,

    /// First-insert timestamp, never changed by normal saves.
    pub created_on: DateTimeWithTimeZone,

    /// Insert-time timestamp, equal to `created_on` at insert.
    pub modified_on: DateTimeWithTimeZone,

    /// Logical death time; loads treat `now() > expires_on` as expired.
    pub expires_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
