//! Period cursor: the fiscal year and open month of a tenant.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

/// Where a tenant stands in its fiscal calendar.
///
/// `mes_actual` only moves forward, one month at a time, and stops at 12
/// until the next vigencia is opened explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Periodo {
    pub tenant_id: String,
    pub vigencia: i32,
    pub mes_actual: i32,
}

/// Result of closing a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CierreMes {
    pub vigencia: i32,
    pub mes_cerrado: i32,
    pub mes_actual: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "periodos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    pub vigencia: i32,
    pub mes_actual: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tenants,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Periodo> for ActiveModel {
    fn from(periodo: &Periodo) -> Self {
        Self {
            tenant_id: ActiveValue::Set(periodo.tenant_id.clone()),
            vigencia: ActiveValue::Set(periodo.vigencia),
            mes_actual: ActiveValue::Set(periodo.mes_actual),
        }
    }
}

impl From<Model> for Periodo {
    fn from(model: Model) -> Self {
        Self {
            tenant_id: model.tenant_id,
            vigencia: model.vigencia,
            mes_actual: model.mes_actual,
        }
    }
}
