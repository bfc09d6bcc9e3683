//! `SeaORM` Entity for the supplier payment allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_payment_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_allocated: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier_payments::Entity",
        from = "Column::PaymentId",
        to = "super::supplier_payments::Column::Id"
    )]
    SupplierPayments,
    #[sea_orm(
        belongs_to = "super::supplier_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::supplier_invoices::Column::Id"
    )]
    SupplierInvoices,
}

impl Related<super::supplier_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierPayments.def()
    }
}

impl Related<super::supplier_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
