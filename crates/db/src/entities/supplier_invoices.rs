//! `SeaORM` Entity for the supplier invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InvoiceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub due_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_invoice_lines::Entity")]
    SupplierInvoiceLines,
    #[sea_orm(has_many = "super::supplier_payment_allocations::Entity")]
    SupplierPaymentAllocations,
}

impl Related<super::supplier_invoice_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierInvoiceLines.def()
    }
}

impl Related<super::supplier_payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierPaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
