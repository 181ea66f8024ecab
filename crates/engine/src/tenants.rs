//! Tenants: the entities whose budgets the ledger tracks.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

/// An entity (alcaldía, secretaría, hospital) running its own budget.
///
/// Every other table carries the tenant id; nothing is shared across tenants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub id: String,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nombre: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rubros::Entity")]
    Rubros,
    #[sea_orm(has_many = "super::documentos::Entity")]
    Documentos,
}

impl Related<super::rubros::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubros.def()
    }
}

impl Related<super::documentos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documentos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tenant> for ActiveModel {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: ActiveValue::Set(tenant.id.clone()),
            nombre: ActiveValue::Set(tenant.nombre.clone()),
            created_at: ActiveValue::Set(tenant.created_at),
        }
    }
}

impl From<Model> for Tenant {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            created_at: model.created_at,
        }
    }
}
