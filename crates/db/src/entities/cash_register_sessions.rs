//! `SeaORM` Entity for the cash register sessions table.
//!
//! At most one OPEN session may exist per register; a partial unique index
//! backs the invariant at the store level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashSessionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_register_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cash_register_id: Uuid,
    pub status: CashSessionStatus,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub opening_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub closing_balance: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub expected_balance: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub difference: Option<Decimal>,
    pub opened_by_user_id: Uuid,
    pub closed_by_user_id: Option<Uuid>,
    pub opened_at: DateTimeWithTimeZone,
    pub closed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_registers::Entity",
        from = "Column::CashRegisterId",
        to = "super::cash_registers::Column::Id"
    )]
    CashRegisters,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OpenedByUserId",
        to = "super::users::Column::Id"
    )]
    OpenedByUser,
    #[sea_orm(has_many = "super::cash_movements::Entity")]
    CashMovements,
}

impl Related<super::cash_registers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashRegisters.def()
    }
}

impl Related<super::cash_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
