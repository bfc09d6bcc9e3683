//! `SeaORM` Entity for the customer payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub payment_date: Date,
    pub cash_register_session_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
    #[sea_orm(
        belongs_to = "super::cash_register_sessions::Entity",
        from = "Column::CashRegisterSessionId",
        to = "super::cash_register_sessions::Column::Id"
    )]
    CashRegisterSessions,
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl Related<super::cash_register_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashRegisterSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
