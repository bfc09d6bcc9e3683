//! `SeaORM` Entity for the credit notes table.
//!
//! `remaining_amount` is a stored projection of
//! `initial_amount - SUM(active allocations)`; it is only ever written from
//! the recomputed sum inside the transaction that touches the allocations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CreditNoteStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub initial_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub remaining_amount: Decimal,
    pub status: CreditNoteStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_note_allocations::Entity")]
    CreditNoteAllocations,
}

impl Related<super::credit_note_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditNoteAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
