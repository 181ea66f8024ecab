//! Budget modifications: mid-year changes to appropriations.
//!
//! Additions and reductions move both budget sides by the same amount to
//! preserve fiscal equilibrium; credit transfers move appropriation between
//! two gasto rubros and leave the totals untouched.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Codigo, EngineError, Money, documentos::Estado};

/// Kind of budget modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoModificacion {
    Adicion,
    Reduccion,
    CreditoContracredito,
}

impl TipoModificacion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adicion => "adicion",
            Self::Reduccion => "reduccion",
            Self::CreditoContracredito => "credito_contracredito",
        }
    }
}

impl TryFrom<&str> for TipoModificacion {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "adicion" => Ok(Self::Adicion),
            "reduccion" => Ok(Self::Reduccion),
            "credito_contracredito" => Ok(Self::CreditoContracredito),
            other => Err(EngineError::InvalidState(format!(
                "invalid modification tipo: {other}"
            ))),
        }
    }
}

/// A recorded budget modification.
///
/// For additions and reductions `rubro_gasto` names the expense-side target
/// and `rubro_contrapartida` the revenue-side counterpart. For credit
/// transfers both codes are gasto rubros: `rubro_gasto` receives the credit
/// and `rubro_contrapartida` gives it up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Modificacion {
    pub tenant_id: String,
    pub numero: i64,
    pub tipo: TipoModificacion,
    pub acto: String,
    pub fecha: NaiveDate,
    pub valor: Money,
    pub rubro_gasto: Codigo,
    pub rubro_contrapartida: Codigo,
    pub estado: Estado,
    pub fecha_anulacion: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Totals of the two budget sides over leaf rubros.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Equilibrio {
    pub total_gastos: Money,
    pub total_ingresos: Money,
}

impl Equilibrio {
    #[must_use]
    pub fn equilibrado(&self) -> bool {
        self.total_gastos == self.total_ingresos
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "modificaciones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub numero: i64,
    pub tipo: String,
    pub acto: String,
    pub fecha: Date,
    pub valor: i64,
    pub rubro_gasto: String,
    pub rubro_contrapartida: String,
    pub estado: String,
    pub fecha_anulacion: Option<Date>,
    pub created_at: DateTimeUtc,
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

impl From<&Modificacion> for ActiveModel {
    fn from(modificacion: &Modificacion) -> Self {
        Self {
            tenant_id: ActiveValue::Set(modificacion.tenant_id.clone()),
            numero: ActiveValue::Set(modificacion.numero),
            tipo: ActiveValue::Set(modificacion.tipo.as_str().to_string()),
            acto: ActiveValue::Set(modificacion.acto.clone()),
            fecha: ActiveValue::Set(modificacion.fecha),
            valor: ActiveValue::Set(modificacion.valor.centavos()),
            rubro_gasto: ActiveValue::Set(modificacion.rubro_gasto.as_str().to_string()),
            rubro_contrapartida: ActiveValue::Set(
                modificacion.rubro_contrapartida.as_str().to_string(),
            ),
            estado: ActiveValue::Set(modificacion.estado.as_str().to_string()),
            fecha_anulacion: ActiveValue::Set(modificacion.fecha_anulacion),
            created_at: ActiveValue::Set(modificacion.created_at),
        }
    }
}

impl TryFrom<Model> for Modificacion {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tipo = TipoModificacion::try_from(model.tipo.as_str()).map_err(|_| {
            EngineError::Corruption(format!(
                "modification {} with unknown tipo \"{}\"",
                model.numero, model.tipo
            ))
        })?;
        let estado = Estado::try_from(model.estado.as_str()).map_err(|_| {
            EngineError::Corruption(format!(
                "modification {} with unknown estado \"{}\"",
                model.numero, model.estado
            ))
        })?;
        let rubro_gasto = Codigo::nuevo(&model.rubro_gasto).map_err(|_| {
            EngineError::Corruption(format!(
                "modification {} with malformed rubro code \"{}\"",
                model.numero, model.rubro_gasto
            ))
        })?;
        let rubro_contrapartida = Codigo::nuevo(&model.rubro_contrapartida).map_err(|_| {
            EngineError::Corruption(format!(
                "modification {} with malformed rubro code \"{}\"",
                model.numero, model.rubro_contrapartida
            ))
        })?;
        Ok(Self {
            tenant_id: model.tenant_id,
            numero: model.numero,
            tipo,
            acto: model.acto,
            fecha: model.fecha,
            valor: Money::new(model.valor),
            rubro_gasto,
            rubro_contrapartida,
            estado,
            fecha_anulacion: model.fecha_anulacion,
            created_at: model.created_at,
        })
    }
}
