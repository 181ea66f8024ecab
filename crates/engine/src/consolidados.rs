//! Monthly consolidation snapshots.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Codigo, EngineError, Money, TipoDocumento};

/// Execution totals of one rubro for one closed-or-open month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RubroConsolidado {
    pub codigo: Codigo,
    pub cdp: Money,
    pub rp: Money,
    pub obligaciones: Money,
    pub pagos: Money,
    pub reconocimientos: Money,
    pub recaudos: Money,
}

/// Snapshot produced by consolidating a month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsolidacionMes {
    pub vigencia: i32,
    pub mes: i32,
    pub rubros: Vec<RubroConsolidado>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "consolidados")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub vigencia: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub mes: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub codigo: String,
    pub cdp: i64,
    pub rp: i64,
    pub obligaciones: i64,
    pub pagos: i64,
    pub reconocimientos: i64,
    pub recaudos: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl RubroConsolidado {
    pub(crate) fn vacio(codigo: Codigo) -> Self {
        Self {
            codigo,
            cdp: Money::ZERO,
            rp: Money::ZERO,
            obligaciones: Money::ZERO,
            pagos: Money::ZERO,
            reconocimientos: Money::ZERO,
            recaudos: Money::ZERO,
        }
    }

    /// Add one document's valor to the column of its stage.
    pub(crate) fn registrar(&mut self, tipo: TipoDocumento, valor: Money) {
        match tipo {
            TipoDocumento::Cdp => self.cdp += valor,
            TipoDocumento::Rp => self.rp += valor,
            TipoDocumento::Obligacion => self.obligaciones += valor,
            TipoDocumento::Pago => self.pagos += valor,
            TipoDocumento::Reconocimiento => self.reconocimientos += valor,
            TipoDocumento::Recaudo => self.recaudos += valor,
        }
    }

    pub(crate) fn modelo(&self, tenant_id: &str, vigencia: i32, mes: i32) -> ActiveModel {
        ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            vigencia: ActiveValue::Set(vigencia),
            mes: ActiveValue::Set(mes),
            codigo: ActiveValue::Set(self.codigo.as_str().to_string()),
            cdp: ActiveValue::Set(self.cdp.centavos()),
            rp: ActiveValue::Set(self.rp.centavos()),
            obligaciones: ActiveValue::Set(self.obligaciones.centavos()),
            pagos: ActiveValue::Set(self.pagos.centavos()),
            reconocimientos: ActiveValue::Set(self.reconocimientos.centavos()),
            recaudos: ActiveValue::Set(self.recaudos.centavos()),
        }
    }
}

impl TryFrom<Model> for RubroConsolidado {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let codigo = Codigo::nuevo(&model.codigo).map_err(|_| {
            EngineError::Corruption(format!(
                "consolidated row with malformed code \"{}\"",
                model.codigo
            ))
        })?;
        Ok(Self {
            codigo,
            cdp: Money::new(model.cdp),
            rp: Money::new(model.rp),
            obligaciones: Money::new(model.obligaciones),
            pagos: Money::new(model.pagos),
            reconocimientos: Money::new(model.reconocimientos),
            recaudos: Money::new(model.recaudos),
        })
    }
}
