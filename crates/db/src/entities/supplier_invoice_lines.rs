//! `SeaORM` Entity for the supplier invoice lines table.
//!
//! `received_quantity` accumulates through goods receipts and gates the
//! void workflow of the owning invoice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_invoice_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_variant_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub received_quantity: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::supplier_invoices::Column::Id"
    )]
    SupplierInvoices,
}

impl Related<super::supplier_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
