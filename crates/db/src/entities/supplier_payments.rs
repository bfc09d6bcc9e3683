//! `SeaORM` Entity for the supplier payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub payment_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_payment_allocations::Entity")]
    SupplierPaymentAllocations,
}

impl Related<super::supplier_payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierPaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
