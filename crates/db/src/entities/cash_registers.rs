//! `SeaORM` Entity for the cash registers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashRegisterType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_registers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub register_type: CashRegisterType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_register_sessions::Entity")]
    CashRegisterSessions,
}

impl Related<super::cash_register_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashRegisterSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
